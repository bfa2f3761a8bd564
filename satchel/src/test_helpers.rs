//! Recording backends used across the test suites. Each backend stores what it is given in plain
//! data so assertions can compare against literal values.

use std::num::NonZeroI32;

use num_bigint::BigInt;

use crate::backend::BackendFactory;
use crate::backend::CspBackend;
use crate::backend::Domain;
use crate::backend::PseudoBooleanBackend;
use crate::backend::SatBackend;
use crate::error::ParseError;
use crate::xcsp::translator::ConstraintFactory;

impl SatBackend for Vec<Vec<i32>> {
    fn add_clause(&mut self, literals: &[NonZeroI32]) -> Result<(), ParseError> {
        self.push(literals.iter().map(|literal| literal.get()).collect());
        Ok(())
    }
}

/// One recorded pseudo-Boolean constraint.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PbConstraint {
    pub(crate) kind: &'static str,
    pub(crate) literals: Vec<i32>,
    pub(crate) coefficients: Vec<BigInt>,
    pub(crate) degree: BigInt,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPb {
    pub(crate) constraints: Vec<PbConstraint>,
}

impl RecordingPb {
    fn record(
        &mut self,
        kind: &'static str,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) {
        self.constraints.push(PbConstraint {
            kind,
            literals: literals.iter().map(|literal| literal.get()).collect(),
            coefficients: coefficients.to_vec(),
            degree,
        });
    }
}

impl PseudoBooleanBackend for RecordingPb {
    fn add_at_least(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError> {
        self.record("at_least", literals, coefficients, degree);
        Ok(())
    }

    fn add_at_most(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError> {
        self.record("at_most", literals, coefficients, degree);
        Ok(())
    }

    fn add_exactly(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError> {
        self.record("exactly", literals, coefficients, degree);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingCsp {
    pub(crate) variables: Vec<(String, Domain)>,
    pub(crate) constraints: Vec<String>,
}

impl CspBackend for RecordingCsp {
    type Constraint = String;

    fn new_variable(&mut self, id: &str, domain: Domain) -> Result<(), ParseError> {
        self.variables.push((id.to_owned(), domain));
        Ok(())
    }

    fn add_intension(&mut self, constraint: String) -> Result<(), ParseError> {
        self.constraints.push(constraint);
        Ok(())
    }
}

/// Renders every constraint back to its textual form, which makes translated trees easy to
/// assert on.
#[derive(Debug, Default)]
pub(crate) struct FormulaFactory;

impl FormulaFactory {
    fn apply(&self, tag: &str, operands: &[String]) -> String {
        format!("{tag}({})", operands.join(","))
    }
}

impl ConstraintFactory for FormulaFactory {
    type Constraint = String;

    fn constant(&mut self, value: BigInt) -> String {
        value.to_string()
    }

    fn variable(&mut self, id: &str) -> String {
        id.to_owned()
    }

    fn abs(&mut self, operand: String) -> String {
        self.apply("abs", &[operand])
    }

    fn neg(&mut self, operand: String) -> String {
        self.apply("neg", &[operand])
    }

    fn sqr(&mut self, operand: String) -> String {
        self.apply("sqr", &[operand])
    }

    fn not(&mut self, operand: String) -> String {
        self.apply("not", &[operand])
    }

    fn dist(&mut self, left: String, right: String) -> String {
        self.apply("dist", &[left, right])
    }

    fn div(&mut self, left: String, right: String) -> String {
        self.apply("div", &[left, right])
    }

    fn modulo(&mut self, left: String, right: String) -> String {
        self.apply("mod", &[left, right])
    }

    fn pow(&mut self, left: String, right: String) -> String {
        self.apply("pow", &[left, right])
    }

    fn sub(&mut self, left: String, right: String) -> String {
        self.apply("sub", &[left, right])
    }

    fn implies(&mut self, left: String, right: String) -> String {
        self.apply("imp", &[left, right])
    }

    fn ge(&mut self, left: String, right: String) -> String {
        self.apply("ge", &[left, right])
    }

    fn gt(&mut self, left: String, right: String) -> String {
        self.apply("gt", &[left, right])
    }

    fn le(&mut self, left: String, right: String) -> String {
        self.apply("le", &[left, right])
    }

    fn lt(&mut self, left: String, right: String) -> String {
        self.apply("lt", &[left, right])
    }

    fn ne(&mut self, left: String, right: String) -> String {
        self.apply("ne", &[left, right])
    }

    fn add(&mut self, operands: Vec<String>) -> String {
        self.apply("add", &operands)
    }

    fn max(&mut self, operands: Vec<String>) -> String {
        self.apply("max", &operands)
    }

    fn min(&mut self, operands: Vec<String>) -> String {
        self.apply("min", &operands)
    }

    fn mult(&mut self, operands: Vec<String>) -> String {
        self.apply("mul", &operands)
    }

    fn equiv(&mut self, operands: Vec<String>) -> String {
        self.apply("iff", &operands)
    }

    fn and(&mut self, operands: Vec<String>) -> String {
        self.apply("and", &operands)
    }

    fn or(&mut self, operands: Vec<String>) -> String {
        self.apply("or", &operands)
    }

    fn xor(&mut self, operands: Vec<String>) -> String {
        self.apply("xor", &operands)
    }

    fn eq(&mut self, operands: Vec<String>) -> String {
        self.apply("eq", &operands)
    }
}

/// A [`BackendFactory`] wiring the recording backends together.
#[derive(Debug, Default)]
pub(crate) struct RecordingFactory;

impl BackendFactory for RecordingFactory {
    type Sat = Vec<Vec<i32>>;
    type PseudoBoolean = RecordingPb;
    type Csp = RecordingCsp;
    type Factory = FormulaFactory;

    fn sat_backend(&mut self) -> Vec<Vec<i32>> {
        Vec::new()
    }

    fn pseudo_boolean_backend(&mut self) -> RecordingPb {
        RecordingPb::default()
    }

    fn csp_backend(&mut self) -> (RecordingCsp, FormulaFactory) {
        (RecordingCsp::default(), FormulaFactory)
    }
}
