//! A parsing front end for combinatorial problem instances.
//!
//! Three textual formats are recognized, and the format is detected from the first significant
//! byte of the input rather than from a file extension:
//!
//! - Clause instances in the DIMACS CNF format (first byte `c` or `p`), fed to a
//!   [`SatBackend`](backend::SatBackend).
//! - Linear pseudo-Boolean instances in the OPB format (first byte `*`), fed to a
//!   [`PseudoBooleanBackend`](backend::PseudoBooleanBackend). Coefficients and degrees are
//!   arbitrary-precision integers.
//! - XML constraint networks with intension constraints (first byte `<`), fed to a
//!   [`CspBackend`](backend::CspBackend). The functional expressions in `<intension>` elements
//!   are built through a [`ConstraintFactory`](xcsp::translator::ConstraintFactory).
//!
//! The entry points are [`parse`] and [`parse_file`]. Both take a
//! [`BackendFactory`](backend::BackendFactory) and return the populated backend handle for
//! whichever format was detected. Inputs are streamed byte by byte through
//! [`Scanner`](scanner::Scanner), so instance size is not bounded by memory.

pub mod backend;
mod error;
mod parser;
pub mod scanner;
pub mod xcsp;

pub use error::ParseError;
pub use parser::parse;
pub use parser::parse_file;

#[cfg(test)]
pub(crate) mod test_helpers;
