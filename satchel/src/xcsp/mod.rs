//! Reader for XML constraint networks. The XML structure is handled by the `quick-xml`
//! tokenizer; this module walks its event stream, declares the variables it encounters, and runs
//! every `<intension>` body through the functional-expression parser and the translator.

pub mod expression;
pub mod translator;

use std::io::Read;

use log::debug;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;

use self::expression::Expression;
use self::translator::translate;
use self::translator::ConstraintFactory;
use crate::backend::CspBackend;
use crate::backend::Domain;
use crate::backend::DomainValue;
use crate::error::ParseError;
use crate::scanner::Scanner;

/// The element whose text content is still to be consumed.
enum Pending {
    Variable(String),
    Intension,
}

/// Walk the constraint network in `scanner` and feed it to `backend`, building intension
/// constraints through `factory`.
pub(crate) fn parse_network<Source, Backend, Factory>(
    scanner: Scanner<Source>,
    backend: &mut Backend,
    factory: &mut Factory,
) -> Result<(), ParseError>
where
    Source: Read,
    Backend: CspBackend,
    Factory: ConstraintFactory<Constraint = Backend::Constraint>,
{
    let mut reader = Reader::from_reader(scanner.into_stream());
    let mut buffer = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut depth: usize = 0;

    loop {
        let event = reader
            .read_event_into(&mut buffer)
            .map_err(|error| ParseError::MalformedNetwork(error.to_string()))?;

        match event {
            Event::Start(element) => {
                depth += 1;

                // A pending element is waiting for its text; a child element here would
                // silently displace it.
                if pending.is_some() {
                    return Err(ParseError::MalformedNetwork(format!(
                        "unexpected nested <{}>",
                        String::from_utf8_lossy(element.local_name().as_ref())
                    )));
                }

                pending = handle_element(&element)?;
            }

            Event::Empty(element) => {
                if pending.is_some() {
                    return Err(ParseError::MalformedNetwork(format!(
                        "unexpected nested <{}>",
                        String::from_utf8_lossy(element.local_name().as_ref())
                    )));
                }

                if handle_element(&element)?.is_some() {
                    return Err(ParseError::MalformedNetwork(
                        "element without content".to_owned(),
                    ));
                }
            }

            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|error| ParseError::MalformedNetwork(error.to_string()))?;
                let content = unescaped.trim();

                if content.is_empty() {
                    continue;
                }

                match pending.take() {
                    Some(Pending::Variable(id)) => {
                        let domain = parse_domain(content)?;
                        debug!("declaring variable {id} with domain {domain:?}");
                        backend.new_variable(&id, domain)?;
                    }
                    Some(Pending::Intension) => {
                        let expression = Expression::parse(content)?;
                        let constraint = translate(&expression, factory)?;
                        backend.add_intension(constraint)?;
                    }
                    None => {
                        return Err(ParseError::MalformedNetwork(format!(
                            "unexpected text {content:?}"
                        )));
                    }
                }
            }

            Event::End(_) => {
                depth = depth.saturating_sub(1);

                if pending.take().is_some() {
                    return Err(ParseError::MalformedNetwork(
                        "element without content".to_owned(),
                    ));
                }
            }

            Event::Eof => {
                if depth != 0 {
                    return Err(ParseError::MalformedNetwork(
                        "unexpected end of document".to_owned(),
                    ));
                }

                break;
            }

            // Declarations, comments and processing instructions carry no instance data.
            _ => {}
        }

        buffer.clear();
    }

    Ok(())
}

/// React to an opening tag. Returns the pending state for elements whose text content still has
/// to arrive.
fn handle_element(element: &BytesStart<'_>) -> Result<Option<Pending>, ParseError> {
    match element.local_name().as_ref() {
        // Structural containers.
        b"instance" | b"variables" | b"constraints" => Ok(None),

        b"var" => {
            let id = attribute(element, "id")?;
            Ok(Some(Pending::Variable(id)))
        }

        b"intension" => Ok(Some(Pending::Intension)),

        b"objectives" => Err(ParseError::UnsupportedObjective),

        other => Err(ParseError::UnsupportedElement(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

/// Look up a required attribute on an element.
fn attribute(element: &BytesStart<'_>, name: &str) -> Result<String, ParseError> {
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|error| ParseError::MalformedNetwork(error.to_string()))?;

        if attribute.key.as_ref() == name.as_bytes() {
            let value = attribute
                .unescape_value()
                .map_err(|error| ParseError::MalformedNetwork(error.to_string()))?;
            return Ok(value.into_owned());
        }
    }

    Err(ParseError::MalformedNetwork(format!(
        "missing attribute {name:?} on <{}>",
        String::from_utf8_lossy(element.local_name().as_ref())
    )))
}

/// Parse the textual form of a domain. A single `a..b` token is kept as a range; any other shape
/// is an explicit value list whose embedded ranges stay symbolic, so domain width never drives
/// an allocation.
fn parse_domain(content: &str) -> Result<Domain, ParseError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();

    if let [token] = tokens.as_slice() {
        if token.contains("..") {
            let (lower_bound, upper_bound) = parse_bounds(token)?;

            return Ok(Domain::Range {
                lower_bound,
                upper_bound,
            });
        }
    }

    if tokens.is_empty() {
        return Err(ParseError::MalformedNetwork("empty domain".to_owned()));
    }

    let mut values = Vec::new();
    for token in tokens {
        if token.contains("..") {
            let (lower_bound, upper_bound) = parse_bounds(token)?;
            values.push(DomainValue::Interval {
                lower_bound,
                upper_bound,
            });
        } else {
            let value = token
                .parse()
                .map_err(|_| ParseError::MalformedNetwork(format!("invalid domain {token:?}")))?;
            values.push(DomainValue::Single(value));
        }
    }

    Ok(Domain::Values(values))
}

/// Parse one `a..b` token into its bounds. A range whose lower bound exceeds its upper bound is
/// empty and rejected rather than passed through.
fn parse_bounds(token: &str) -> Result<(i64, i64), ParseError> {
    let invalid = || ParseError::MalformedNetwork(format!("invalid domain {token:?}"));

    let (lower, upper) = token.split_once("..").ok_or_else(invalid)?;
    let lower_bound: i64 = lower.parse().map_err(|_| invalid())?;
    let upper_bound: i64 = upper.parse().map_err(|_| invalid())?;

    if lower_bound > upper_bound {
        return Err(ParseError::MalformedNetwork(format!(
            "empty domain range {token:?}"
        )));
    }

    Ok((lower_bound, upper_bound))
}
