//! Parser for linear pseudo-Boolean instances in the OPB format. The header is a `*` comment
//! line declaring the number of variables and constraints; each constraint is a sum of weighted
//! terms, a relational operator, an arbitrary-precision degree and a terminating `;`.
//!
//! Objective functions and non-linear products of variables are recognized but rejected, never
//! silently dropped or linearized.

use std::io::Read;
use std::num::NonZeroI32;

use log::debug;
use num_bigint::BigInt;

use crate::backend::PseudoBooleanBackend;
use crate::error::ParseError;
use crate::parser::check_literal;
use crate::scanner::Scanner;

/// The relational operator separating the term sum of a constraint from its degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RelationalOperator {
    Equal,
    GreaterEqual,
    LessEqual,
}

/// Reads a pseudo-Boolean instance and emits every constraint to a [`PseudoBooleanBackend`].
pub(crate) struct OpbParser<'backend, Source, Backend> {
    scanner: Scanner<Source>,
    backend: &'backend mut Backend,
    number_of_variables: i64,
    number_of_constraints: i64,
}

impl<'backend, Source, Backend> OpbParser<'backend, Source, Backend>
where
    Source: Read,
    Backend: PseudoBooleanBackend,
{
    pub(crate) fn new(scanner: Scanner<Source>, backend: &'backend mut Backend) -> Self {
        OpbParser {
            scanner,
            backend,
            number_of_variables: 0,
            number_of_constraints: 0,
        }
    }

    pub(crate) fn parse(mut self) -> Result<(), ParseError> {
        self.read_metadata()?;
        self.skip_comments()?;
        self.read_objective()?;

        let mut constraints_read: i64 = 0;
        while let Some(next) = self.scanner.peek()? {
            if next == b'*' {
                // Comment lines may separate constraints.
                self.skip_comments()?;
                continue;
            }

            self.read_constraint()?;
            constraints_read += 1;
        }

        if constraints_read != self.number_of_constraints {
            return Err(ParseError::WrongConstraintCount {
                expected: self.number_of_constraints,
                actual: constraints_read,
            });
        }

        Ok(())
    }

    /// The first line is a `*` comment carrying the instance sizes.
    fn read_metadata(&mut self) -> Result<(), ParseError> {
        if self.scanner.consume()? != Some(b'*') {
            return Err(ParseError::MissingHeader);
        }

        self.number_of_variables = self.scanner.read_integer()?;
        self.number_of_constraints = self.scanner.read_integer()?;
        self.scanner.skip_line()?;

        debug!(
            "the instance declares {} variables and {} constraints",
            self.number_of_variables, self.number_of_constraints
        );

        Ok(())
    }

    fn skip_comments(&mut self) -> Result<(), ParseError> {
        while let Some(b'*') = self.scanner.peek()? {
            self.scanner.skip_line()?;
        }

        Ok(())
    }

    /// An objective line starts with `min:`. The keyword shape is validated first; only a
    /// correctly spelled keyword reaches the unsupported-objective rejection.
    fn read_objective(&mut self) -> Result<(), ParseError> {
        if self.scanner.peek()? != Some(b'm') {
            // There is no objective function.
            return Ok(());
        }

        let mut keyword = [0; 4];
        for slot in &mut keyword {
            *slot = self
                .scanner
                .consume()?
                .ok_or(ParseError::ExpectedMinKeyword)?;
        }

        if keyword == *b"min:" {
            Err(ParseError::UnsupportedObjective)
        } else {
            Err(ParseError::ExpectedMinKeyword)
        }
    }

    fn read_constraint(&mut self) -> Result<(), ParseError> {
        let mut literals: Vec<NonZeroI32> = Vec::new();
        let mut coefficients: Vec<BigInt> = Vec::new();

        while let Some(next) = self.scanner.peek()? {
            if next == b'>' || next == b'=' {
                // This is the relational operator.
                break;
            }

            if next != b'-'
                && next != b'+'
                && next != b'x'
                && next != b'~'
                && !next.is_ascii_digit()
            {
                // A term should have started here.
                return Err(ParseError::MalformedNumber);
            }

            self.read_term(&mut literals, &mut coefficients)?;
        }

        let operator = self.read_relational_operator()?;
        let degree = self.scanner.read_big_integer()?;

        if self.scanner.peek()? != Some(b';') {
            return Err(ParseError::UnterminatedConstraint);
        }
        let _ = self.scanner.consume()?;

        match operator {
            RelationalOperator::Equal => self.backend.add_exactly(&literals, &coefficients, degree),
            RelationalOperator::GreaterEqual => {
                self.backend.add_at_least(&literals, &coefficients, degree)
            }
            RelationalOperator::LessEqual => {
                self.backend.add_at_most(&literals, &coefficients, degree)
            }
        }
    }

    /// A term is an optional coefficient (defaulting to 1) followed by one or more identifiers.
    /// A term with several identifiers is a product of variables and is rejected.
    fn read_term(
        &mut self,
        literals: &mut Vec<NonZeroI32>,
        coefficients: &mut Vec<BigInt>,
    ) -> Result<(), ParseError> {
        let next = self.scanner.peek()?.ok_or(ParseError::UnexpectedEnd)?;
        let coefficient = if next == b'-' || next == b'+' || next.is_ascii_digit() {
            self.scanner.read_big_integer()?
        } else {
            BigInt::from(1)
        };

        let mut term = Vec::new();
        while let Some(literal) = self.read_identifier()? {
            term.push(literal);
        }

        match term.as_slice() {
            [] => Err(ParseError::ExpectedIdentifier),
            [literal] => {
                literals.push(*literal);
                coefficients.push(coefficient);
                Ok(())
            }
            _ => Err(ParseError::UnsupportedNonLinear),
        }
    }

    /// Read one identifier of the form `[~]x<id>`, or `None` if the next significant byte does
    /// not start an identifier.
    fn read_identifier(&mut self) -> Result<Option<NonZeroI32>, ParseError> {
        let Some(mut next) = self.scanner.peek()? else {
            return Ok(None);
        };

        let mut negated = false;
        if next == b'~' {
            let _ = self.scanner.consume()?;
            negated = true;

            next = self.scanner.peek()?.ok_or(ParseError::ExpectedIdentifier)?;
            if next != b'x' {
                return Err(ParseError::ExpectedIdentifier);
            }
        }

        if next != b'x' {
            return Ok(None);
        }

        let identifier = self.scanner.read_integer()?;
        let literal = check_literal(
            if negated { -identifier } else { identifier },
            self.number_of_variables,
        )?;

        Ok(Some(literal))
    }

    fn read_relational_operator(&mut self) -> Result<RelationalOperator, ParseError> {
        let first = self.scanner.consume()?.ok_or(ParseError::UnexpectedEnd)?;

        if first == b'=' {
            return Ok(RelationalOperator::Equal);
        }

        let second = self.scanner.consume()?.ok_or(ParseError::UnexpectedEnd)?;
        match (first, second) {
            (b'>', b'=') => Ok(RelationalOperator::GreaterEqual),
            (b'<', b'=') => Ok(RelationalOperator::LessEqual),
            _ => Err(ParseError::UnrecognizedOperator),
        }
    }
}
