//! The abstraction through which parsed constraints reach a solver. Each input format targets its
//! own capability trait, and [`BackendFactory`] produces an already-concrete handle for the
//! detected format, so no downcasting happens after creation.

use std::fmt;
use std::num::NonZeroI32;

use num_bigint::BigInt;

use crate::error::ParseError;
use crate::xcsp::translator::ConstraintFactory;

/// A backend for Boolean satisfaction problems.
///
/// Literals are signed variable references; the sign encodes negation and the magnitude has been
/// checked against the declared number of variables before this trait is invoked.
pub trait SatBackend {
    /// Add a clause over the given literals. Clauses arrive in textual order.
    fn add_clause(&mut self, literals: &[NonZeroI32]) -> Result<(), ParseError>;
}

/// A backend for linear pseudo-Boolean problems.
///
/// Coefficients and degrees are arbitrary-precision; implementations must not assume they fit in
/// a machine integer.
pub trait PseudoBooleanBackend {
    /// Add the constraint `sum(coefficients[i] * literals[i]) >= degree`.
    fn add_at_least(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError>;

    /// Add the constraint `sum(coefficients[i] * literals[i]) <= degree`.
    fn add_at_most(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError>;

    /// Add the constraint `sum(coefficients[i] * literals[i]) == degree`.
    fn add_exactly(
        &mut self,
        literals: &[NonZeroI32],
        coefficients: &[BigInt],
        degree: BigInt,
    ) -> Result<(), ParseError>;
}

/// The domain of an integer variable declared by a constraint network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    /// Every integer between the two bounds, inclusive.
    Range { lower_bound: i64, upper_bound: i64 },
    /// An explicit list of values and intervals, in textual order.
    Values(Vec<DomainValue>),
}

/// One entry of a [`Domain::Values`] list. Intervals are kept symbolic; a wide interval never
/// materializes its members, so domain size is not bounded by memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainValue {
    Single(i64),
    /// Every integer between the two bounds, inclusive.
    Interval { lower_bound: i64, upper_bound: i64 },
}

/// A backend for constraint networks with named variables and intension constraints.
pub trait CspBackend {
    /// The representation of an intension constraint, produced by the matching
    /// [`ConstraintFactory`].
    type Constraint;

    /// Declare a new variable with the given domain.
    fn new_variable(&mut self, id: &str, domain: Domain) -> Result<(), ParseError>;

    /// Add an intension constraint built by the constraint factory.
    fn add_intension(&mut self, constraint: Self::Constraint) -> Result<(), ParseError>;
}

/// Creates the concrete backend for the detected input format.
///
/// The factory is only asked for the one backend kind that matches the input, and the constraint
/// factory for intension constraints is selected here once per parse, together with the backend
/// it feeds.
pub trait BackendFactory {
    type Sat: SatBackend;
    type PseudoBoolean: PseudoBooleanBackend;
    type Csp: CspBackend;
    type Factory: ConstraintFactory<Constraint = <Self::Csp as CspBackend>::Constraint>;

    /// Create the backend used for clause instances.
    fn sat_backend(&mut self) -> Self::Sat;

    /// Create the backend used for linear pseudo-Boolean instances.
    fn pseudo_boolean_backend(&mut self) -> Self::PseudoBoolean;

    /// Create the backend used for constraint networks, along with the constraint factory that
    /// builds its intension constraints.
    fn csp_backend(&mut self) -> (Self::Csp, Self::Factory);
}

/// The populated backend handle returned by a successful parse, tagged with the format that was
/// detected.
pub enum Backend<Factory: BackendFactory> {
    Sat(Factory::Sat),
    PseudoBoolean(Factory::PseudoBoolean),
    Csp(Factory::Csp),
}

impl<Factory: BackendFactory> fmt::Debug for Backend<Factory> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sat(_) => f.write_str("Backend::Sat(..)"),
            Backend::PseudoBoolean(_) => f.write_str("Backend::PseudoBoolean(..)"),
            Backend::Csp(_) => f.write_str("Backend::Csp(..)"),
        }
    }
}
