//! Parser for clause instances in the DIMACS CNF format: lines starting with `c` are comments,
//! the `p` line declares the number of variables and clauses, and the remaining tokens are
//! whitespace-separated signed literals with `0` terminating each clause.

use std::io::Read;
use std::num::NonZeroI32;

use log::debug;

use crate::backend::SatBackend;
use crate::error::ParseError;
use crate::parser::check_literal;
use crate::scanner::Scanner;

/// Reads a clause instance and emits every clause to a [`SatBackend`].
pub(crate) struct CnfParser<'backend, Source, Backend> {
    scanner: Scanner<Source>,
    backend: &'backend mut Backend,
    number_of_variables: i64,
    number_of_constraints: i64,
}

impl<'backend, Source, Backend> CnfParser<'backend, Source, Backend>
where
    Source: Read,
    Backend: SatBackend,
{
    pub(crate) fn new(scanner: Scanner<Source>, backend: &'backend mut Backend) -> Self {
        CnfParser {
            scanner,
            backend,
            number_of_variables: 0,
            number_of_constraints: 0,
        }
    }

    pub(crate) fn parse(mut self) -> Result<(), ParseError> {
        let mut clause: Vec<NonZeroI32> = Vec::new();
        let mut in_clause = false;
        let mut clauses_read: i64 = 0;

        while let Some(next) = self.scanner.peek()? {
            if next == b'c' {
                // A comment line.
                self.scanner.skip_line()?;
            } else if next == b'p' {
                // The problem description line.
                self.number_of_variables = self.scanner.read_integer()?;
                self.number_of_constraints = self.scanner.read_integer()?;
                self.scanner.skip_line()?;

                debug!(
                    "the instance declares {} variables and {} clauses",
                    self.number_of_variables, self.number_of_constraints
                );
            } else {
                let literal = self.scanner.read_integer()?;

                if !in_clause {
                    // The next clause starts here.
                    clause.clear();
                    in_clause = true;
                    clauses_read += 1;
                }

                if literal == 0 {
                    // The sentinel closes the clause.
                    self.backend.add_clause(&clause)?;
                    in_clause = false;
                } else {
                    clause.push(check_literal(literal, self.number_of_variables)?);
                }
            }
        }

        if in_clause {
            // The input ended before the final sentinel; the open clause is emitted anyway,
            // before the count below is checked.
            self.backend.add_clause(&clause)?;
        }

        if clauses_read != self.number_of_constraints {
            return Err(ParseError::WrongConstraintCount {
                expected: self.number_of_constraints,
                actual: clauses_read,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_instance_is_read() {
        let source = "p cnf 2 2\n1 -2 0\n-1 2 0";

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn single_clause_instance_is_read() {
        let source = "p cnf 2 1\n1 -2 0";

        assert_eq!(vec![vec![1, -2]], parse_source(source));
    }

    #[test]
    fn comments_are_ignored() {
        let source = "c this is\nc a comment\np cnf 2 2\n1 -2 0\nc within the file\n-1 2 0\n";

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn whitespace_and_empty_lines_are_ignored() {
        let source = r#"

            p cnf 2 2

             1 -2 0

            -1  2 0
        "#;

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn clauses_on_the_same_line_are_separated() {
        let source = "p cnf 2 2\n1 -2 0 -1 2 0";

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn new_lines_do_not_terminate_a_clause() {
        let source = "p cnf 2 2\n1\n-2 0 -1 2\n 0";

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn an_unterminated_trailing_clause_is_emitted() {
        let source = "p cnf 2 2\n1 -2 0\n-1 2";

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], parse_source(source));
    }

    #[test]
    fn a_lone_sentinel_emits_an_empty_clause() {
        let source = "p cnf 2 1\n0";

        assert_eq!(vec![Vec::<i32>::new()], parse_source(source));
    }

    #[test]
    fn too_few_clauses_is_a_structural_mismatch() {
        let source = "p cnf 2 2\n1 -2 0";

        assert!(matches!(
            parse_error(source),
            ParseError::WrongConstraintCount {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn too_many_clauses_is_a_structural_mismatch() {
        let source = "p cnf 2 1\n1 0 2 0";

        assert!(matches!(
            parse_error(source),
            ParseError::WrongConstraintCount {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn out_of_range_literals_are_rejected() {
        let source = "p cnf 2 1\n1 -3 0";

        assert!(matches!(
            parse_error(source),
            ParseError::InvalidLiteral {
                literal: -3,
                number_of_variables: 2
            }
        ));
    }

    #[test]
    fn literals_before_the_header_are_rejected() {
        let source = "1 -2 0";

        assert!(matches!(
            parse_error(source),
            ParseError::InvalidLiteral { .. }
        ));
    }

    #[test]
    fn backend_failures_propagate() {
        struct Rejecting;

        impl SatBackend for Rejecting {
            fn add_clause(&mut self, _: &[NonZeroI32]) -> Result<(), ParseError> {
                Err(ParseError::Backend("clause database is sealed".to_owned()))
            }
        }

        let mut backend = Rejecting;
        let parser = CnfParser::new(Scanner::new("p cnf 1 1\n1 0".as_bytes()), &mut backend);

        assert!(matches!(
            parser.parse().expect_err("backend rejects the clause"),
            ParseError::Backend(_)
        ));
    }

    fn parse_source(source: &str) -> Vec<Vec<i32>> {
        let mut backend: Vec<Vec<i32>> = Vec::new();
        CnfParser::new(Scanner::new(source.as_bytes()), &mut backend)
            .parse()
            .expect("valid instance");
        backend
    }

    fn parse_error(source: &str) -> ParseError {
        let mut backend: Vec<Vec<i32>> = Vec::new();
        CnfParser::new(Scanner::new(source.as_bytes()), &mut backend)
            .parse()
            .expect_err("invalid instance")
    }
}
