//! The functional expression language used by intension constraints. An expression is either an
//! integer constant, a variable reference, or an operator applied to parenthesized operands, as
//! in `le(add(x,y),10)`.

use num_bigint::BigInt;

use crate::error::ParseError;

/// A parsed intension expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Constant(BigInt),
    Variable(String),
    Operator(Operator, Vec<Expression>),
}

/// The operators of the expression language. The set is closed; a tag outside it is rejected at
/// parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Abs,
    Add,
    And,
    Dist,
    Div,
    Eq,
    Equiv,
    Ge,
    Gt,
    Implies,
    Le,
    Lt,
    Max,
    Min,
    Modulo,
    Mult,
    Ne,
    Neg,
    Not,
    Or,
    Pow,
    Sqr,
    Sub,
    Xor,
}

/// The number of operands an operator accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandCount {
    Unary,
    Binary,
    /// Two or more operands.
    Variadic,
}

impl Operator {
    pub fn from_tag(tag: &str) -> Option<Operator> {
        let operator = match tag {
            "abs" => Operator::Abs,
            "add" => Operator::Add,
            "and" => Operator::And,
            "dist" => Operator::Dist,
            "div" => Operator::Div,
            "eq" => Operator::Eq,
            "iff" => Operator::Equiv,
            "ge" => Operator::Ge,
            "gt" => Operator::Gt,
            "imp" => Operator::Implies,
            "le" => Operator::Le,
            "lt" => Operator::Lt,
            "max" => Operator::Max,
            "min" => Operator::Min,
            "mod" => Operator::Modulo,
            "mul" => Operator::Mult,
            "ne" => Operator::Ne,
            "neg" => Operator::Neg,
            "not" => Operator::Not,
            "or" => Operator::Or,
            "pow" => Operator::Pow,
            "sqr" => Operator::Sqr,
            "sub" => Operator::Sub,
            "xor" => Operator::Xor,
            _ => return None,
        };

        Some(operator)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Operator::Abs => "abs",
            Operator::Add => "add",
            Operator::And => "and",
            Operator::Dist => "dist",
            Operator::Div => "div",
            Operator::Eq => "eq",
            Operator::Equiv => "iff",
            Operator::Ge => "ge",
            Operator::Gt => "gt",
            Operator::Implies => "imp",
            Operator::Le => "le",
            Operator::Lt => "lt",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Modulo => "mod",
            Operator::Mult => "mul",
            Operator::Ne => "ne",
            Operator::Neg => "neg",
            Operator::Not => "not",
            Operator::Or => "or",
            Operator::Pow => "pow",
            Operator::Sqr => "sqr",
            Operator::Sub => "sub",
            Operator::Xor => "xor",
        }
    }

    pub fn operand_count(self) -> OperandCount {
        match self {
            Operator::Abs | Operator::Neg | Operator::Not | Operator::Sqr => OperandCount::Unary,

            Operator::Dist
            | Operator::Div
            | Operator::Ge
            | Operator::Gt
            | Operator::Implies
            | Operator::Le
            | Operator::Lt
            | Operator::Modulo
            | Operator::Ne
            | Operator::Pow
            | Operator::Sub => OperandCount::Binary,

            Operator::Add
            | Operator::And
            | Operator::Eq
            | Operator::Equiv
            | Operator::Max
            | Operator::Min
            | Operator::Mult
            | Operator::Or
            | Operator::Xor => OperandCount::Variadic,
        }
    }
}

impl Expression {
    /// Parse `source` as a complete expression. Trailing content after the expression is
    /// rejected.
    pub fn parse(source: &str) -> Result<Expression, ParseError> {
        let mut parser = FunctionalParser {
            source,
            position: 0,
        };

        let expression = parser.parse_expression()?;
        parser.skip_whitespace();

        if parser.position != parser.source.len() {
            return Err(parser.malformed("trailing content after the expression"));
        }

        Ok(expression)
    }
}

/// A cursor over the textual form of one expression.
struct FunctionalParser<'src> {
    source: &'src str,
    position: usize,
}

impl<'src> FunctionalParser<'src> {
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(self.malformed("expected an expression")),
            Some(byte) if byte == b'-' || byte == b'+' || byte.is_ascii_digit() => {
                self.parse_constant()
            }
            Some(_) => {
                let word = self.parse_word()?;

                if self.peek() == Some(b'(') {
                    self.parse_operands(word)
                } else {
                    Ok(Expression::Variable(word.to_owned()))
                }
            }
        }
    }

    fn parse_constant(&mut self) -> Result<Expression, ParseError> {
        let start = self.position;

        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.position += 1;
        }
        while matches!(self.peek(), Some(byte) if byte.is_ascii_digit()) {
            self.position += 1;
        }

        let digits = &self.source[start..self.position];
        digits
            .parse::<BigInt>()
            .map(Expression::Constant)
            .map_err(|_| self.malformed("expected an integer constant"))
    }

    fn parse_word(&mut self) -> Result<&'src str, ParseError> {
        let source = self.source;
        let start = self.position;

        while matches!(
            self.peek(),
            Some(byte) if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'[' || byte == b']'
        ) {
            self.position += 1;
        }

        if self.position == start {
            return Err(self.malformed("expected an operator or variable name"));
        }

        Ok(&source[start..self.position])
    }

    fn parse_operands(&mut self, tag: &str) -> Result<Expression, ParseError> {
        let operator = Operator::from_tag(tag)
            .ok_or_else(|| ParseError::UnknownExpressionOperator(tag.to_owned()))?;

        // The caller has seen the opening parenthesis.
        self.position += 1;

        let mut operands = vec![self.parse_expression()?];
        loop {
            self.skip_whitespace();

            match self.peek() {
                Some(b',') => {
                    self.position += 1;
                    operands.push(self.parse_expression()?);
                }
                Some(b')') => {
                    self.position += 1;
                    break;
                }
                _ => return Err(self.malformed("expected ',' or ')'")),
            }
        }

        Ok(Expression::Operator(operator, operands))
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn malformed(&self, message: &str) -> ParseError {
        ParseError::MalformedExpression(format!(
            "{message} at offset {} in {:?}",
            self.position, self.source
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_parsed() {
        assert_eq!(
            Expression::Constant(BigInt::from(42)),
            Expression::parse("42").expect("valid expression")
        );
        assert_eq!(
            Expression::Constant(BigInt::from(-7)),
            Expression::parse("-7").expect("valid expression")
        );
    }

    #[test]
    fn variables_are_parsed() {
        assert_eq!(
            Expression::Variable("x".to_owned()),
            Expression::parse("x").expect("valid expression")
        );
        assert_eq!(
            Expression::Variable("x[3]".to_owned()),
            Expression::parse("x[3]").expect("valid expression")
        );
    }

    #[test]
    fn nested_operators_are_parsed() {
        let expression = Expression::parse("le(add(x,y),10)").expect("valid expression");

        assert_eq!(
            Expression::Operator(
                Operator::Le,
                vec![
                    Expression::Operator(
                        Operator::Add,
                        vec![
                            Expression::Variable("x".to_owned()),
                            Expression::Variable("y".to_owned()),
                        ]
                    ),
                    Expression::Constant(BigInt::from(10)),
                ]
            ),
            expression
        );
    }

    #[test]
    fn whitespace_between_tokens_is_ignored() {
        assert_eq!(
            Expression::parse("eq( x , y )").expect("valid expression"),
            Expression::parse("eq(x,y)").expect("valid expression")
        );
    }

    #[test]
    fn unknown_operators_are_rejected() {
        let error = Expression::parse("shift(x,1)").expect_err("not an operator");

        assert!(matches!(
            error,
            ParseError::UnknownExpressionOperator(tag) if tag == "shift"
        ));
    }

    #[test]
    fn bare_words_with_parentheses_need_a_known_tag() {
        // A word without parentheses is a variable, even if it matches an operator tag.
        assert_eq!(
            Expression::Variable("add".to_owned()),
            Expression::parse("add").expect("valid expression")
        );
    }

    #[test]
    fn unterminated_operand_lists_are_rejected() {
        let error = Expression::parse("add(x,y").expect_err("missing ')'");

        assert!(matches!(error, ParseError::MalformedExpression(_)));
    }

    #[test]
    fn trailing_content_is_rejected() {
        let error = Expression::parse("x y").expect_err("two expressions");

        assert!(matches!(error, ParseError::MalformedExpression(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        let error = Expression::parse("   ").expect_err("nothing to parse");

        assert!(matches!(error, ParseError::MalformedExpression(_)));
    }

    #[test]
    fn every_tag_round_trips() {
        for tag in [
            "abs", "add", "and", "dist", "div", "eq", "iff", "ge", "gt", "imp", "le", "lt", "max",
            "min", "mod", "mul", "ne", "neg", "not", "or", "pow", "sqr", "sub", "xor",
        ] {
            let operator = Operator::from_tag(tag).expect("known tag");
            assert_eq!(tag, operator.tag());
        }
    }
}
