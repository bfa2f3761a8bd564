//! Format detection and the hand-written grammars.
//!
//! The first significant byte of the input decides which grammar runs and which backend kind is
//! created: `c` or `p` start a clause instance, `*` starts a pseudo-Boolean instance, and `<`
//! starts a constraint network.

mod cnf;
mod opb;

use std::fs::File;
use std::io::Read;
use std::num::NonZeroI32;
use std::path::Path;

use log::debug;

use self::cnf::CnfParser;
use self::opb::OpbParser;
use crate::backend::Backend;
use crate::backend::BackendFactory;
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::xcsp;

/// Detect the format of `source`, feed the instance it contains to a backend created by
/// `factory`, and return the populated backend handle.
pub fn parse<Source, Factory>(
    source: Source,
    factory: &mut Factory,
) -> Result<Backend<Factory>, ParseError>
where
    Source: Read,
    Factory: BackendFactory,
{
    let mut scanner = Scanner::new(source);

    let Some(first) = scanner.peek()? else {
        return Err(ParseError::EmptyInput);
    };

    match first {
        b'c' | b'p' => {
            debug!("first significant byte is '{}': clause instance", first as char);

            let mut backend = factory.sat_backend();
            CnfParser::new(scanner, &mut backend).parse()?;
            Ok(Backend::Sat(backend))
        }

        b'*' => {
            debug!("first significant byte is '*': pseudo-Boolean instance");

            let mut backend = factory.pseudo_boolean_backend();
            OpbParser::new(scanner, &mut backend).parse()?;
            Ok(Backend::PseudoBoolean(backend))
        }

        b'<' => {
            debug!("first significant byte is '<': constraint network");

            let (mut backend, mut constraint_factory) = factory.csp_backend();
            xcsp::parse_network(scanner, &mut backend, &mut constraint_factory)?;
            Ok(Backend::Csp(backend))
        }

        other => Err(ParseError::UnrecognizedFormat(other as char)),
    }
}

/// Open the file at `path` and parse the instance it contains.
pub fn parse_file<Factory: BackendFactory>(
    path: impl AsRef<Path>,
    factory: &mut Factory,
) -> Result<Backend<Factory>, ParseError> {
    parse(File::open(path)?, factory)
}

/// Check `literal` against the declared number of variables. A literal is valid when its
/// magnitude lies in `[1, number_of_variables]`.
pub(crate) fn check_literal(
    literal: i64,
    number_of_variables: i64,
) -> Result<NonZeroI32, ParseError> {
    let out_of_range = || ParseError::InvalidLiteral {
        literal,
        number_of_variables,
    };

    if literal == 0
        || number_of_variables <= 0
        || literal.unsigned_abs() > number_of_variables.unsigned_abs()
    {
        return Err(out_of_range());
    }

    let value = i32::try_from(literal).map_err(|_| out_of_range())?;
    NonZeroI32::new(value).ok_or_else(out_of_range)
}
