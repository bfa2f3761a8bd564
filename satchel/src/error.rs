use std::io;

use num_bigint::BigInt;
use thiserror::Error;

/// The errors that can occur while reading a problem instance.
///
/// Parsing is fail-fast: the first violation aborts the parse and propagates to the caller, and
/// no partial result is produced. Errors raised by the backend itself are not intercepted; they
/// surface through [`ParseError::Backend`] unchanged.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read from source: {0}")]
    Io(#[from] io::Error),

    #[error("input is empty")]
    EmptyInput,

    #[error("'{0}' does not start any recognized format")]
    UnrecognizedFormat(char),

    #[error("expected a digit while reading a number")]
    MalformedNumber,

    #[error("the number {0} does not fit in a machine integer")]
    NumberTooLarge(BigInt),

    #[error("literal {literal} is outside the declared variable range [1, {number_of_variables}]")]
    InvalidLiteral {
        literal: i64,
        number_of_variables: i64,
    },

    #[error("expected a '*' header line")]
    MissingHeader,

    #[error("expected the keyword 'min:'")]
    ExpectedMinKeyword,

    #[error("expected 'x' to start a variable identifier")]
    ExpectedIdentifier,

    #[error("unrecognized relational operator")]
    UnrecognizedOperator,

    #[error("expected ';' at the end of the constraint")]
    UnterminatedConstraint,

    #[error("expected {expected} constraints, parsed {actual}")]
    WrongConstraintCount { expected: i64, actual: i64 },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("objective functions are not supported")]
    UnsupportedObjective,

    #[error("non-linear constraints are not supported")]
    UnsupportedNonLinear,

    #[error("unknown operator '{0}' in expression")]
    UnknownExpressionOperator(String),

    #[error("operator '{operator}' cannot be applied to {actual} operand(s)")]
    WrongOperandCount {
        operator: &'static str,
        actual: usize,
    },

    #[error("element '<{0}>' is not supported")]
    UnsupportedElement(String),

    #[error("malformed constraint network: {0}")]
    MalformedNetwork(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("the backend rejected a constraint: {0}")]
    Backend(String),
}
