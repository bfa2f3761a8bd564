//! Turns a parsed [`Expression`] tree into constraint objects through a [`ConstraintFactory`].
//! The translation recurses in source order, so operands reach the factory in the order they
//! appear in the input.

use num_bigint::BigInt;

use crate::error::ParseError;
use crate::xcsp::expression::Expression;
use crate::xcsp::expression::OperandCount;
use crate::xcsp::expression::Operator;

/// Builds the solver-side representation of intension constraints.
///
/// One method per leaf kind and operator of the expression language. Variadic operators receive
/// at least two operands; unary and binary operators receive exactly the number their signature
/// shows, checked before the factory is called.
pub trait ConstraintFactory {
    /// The representation of a (sub)expression.
    type Constraint;

    fn constant(&mut self, value: BigInt) -> Self::Constraint;
    fn variable(&mut self, id: &str) -> Self::Constraint;

    fn abs(&mut self, operand: Self::Constraint) -> Self::Constraint;
    fn neg(&mut self, operand: Self::Constraint) -> Self::Constraint;
    fn sqr(&mut self, operand: Self::Constraint) -> Self::Constraint;
    fn not(&mut self, operand: Self::Constraint) -> Self::Constraint;

    fn dist(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn div(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn modulo(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn pow(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn sub(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn implies(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn ge(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn gt(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn le(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn lt(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;
    fn ne(&mut self, left: Self::Constraint, right: Self::Constraint) -> Self::Constraint;

    fn add(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn max(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn min(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn mult(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn equiv(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn and(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn or(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn xor(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
    fn eq(&mut self, operands: Vec<Self::Constraint>) -> Self::Constraint;
}

/// Translate `expression` bottom-up through `factory`.
pub fn translate<Factory: ConstraintFactory>(
    expression: &Expression,
    factory: &mut Factory,
) -> Result<Factory::Constraint, ParseError> {
    match expression {
        Expression::Constant(value) => Ok(factory.constant(value.clone())),
        Expression::Variable(id) => Ok(factory.variable(id)),
        Expression::Operator(operator, operands) => {
            translate_operator(*operator, operands, factory)
        }
    }
}

fn translate_operator<Factory: ConstraintFactory>(
    operator: Operator,
    operands: &[Expression],
    factory: &mut Factory,
) -> Result<Factory::Constraint, ParseError> {
    check_arity(operator, operands)?;

    let constraint = match operator {
        Operator::Abs => unary(operands, factory, Factory::abs)?,
        Operator::Neg => unary(operands, factory, Factory::neg)?,
        Operator::Sqr => unary(operands, factory, Factory::sqr)?,
        Operator::Not => unary(operands, factory, Factory::not)?,

        Operator::Dist => binary(operands, factory, Factory::dist)?,
        Operator::Div => binary(operands, factory, Factory::div)?,
        Operator::Modulo => binary(operands, factory, Factory::modulo)?,
        Operator::Pow => binary(operands, factory, Factory::pow)?,
        Operator::Sub => binary(operands, factory, Factory::sub)?,
        Operator::Implies => binary(operands, factory, Factory::implies)?,
        Operator::Ge => binary(operands, factory, Factory::ge)?,
        Operator::Gt => binary(operands, factory, Factory::gt)?,
        Operator::Le => binary(operands, factory, Factory::le)?,
        Operator::Lt => binary(operands, factory, Factory::lt)?,
        Operator::Ne => binary(operands, factory, Factory::ne)?,

        Operator::Add => variadic(operands, factory, Factory::add)?,
        Operator::Max => variadic(operands, factory, Factory::max)?,
        Operator::Min => variadic(operands, factory, Factory::min)?,
        Operator::Mult => variadic(operands, factory, Factory::mult)?,
        Operator::Equiv => variadic(operands, factory, Factory::equiv)?,
        Operator::And => variadic(operands, factory, Factory::and)?,
        Operator::Or => variadic(operands, factory, Factory::or)?,
        Operator::Xor => variadic(operands, factory, Factory::xor)?,
        Operator::Eq => variadic(operands, factory, Factory::eq)?,
    };

    Ok(constraint)
}

fn check_arity(operator: Operator, operands: &[Expression]) -> Result<(), ParseError> {
    let valid = match operator.operand_count() {
        OperandCount::Unary => operands.len() == 1,
        OperandCount::Binary => operands.len() == 2,
        OperandCount::Variadic => operands.len() >= 2,
    };

    if valid {
        Ok(())
    } else {
        Err(ParseError::WrongOperandCount {
            operator: operator.tag(),
            actual: operands.len(),
        })
    }
}

fn unary<Factory: ConstraintFactory>(
    operands: &[Expression],
    factory: &mut Factory,
    build: fn(&mut Factory, Factory::Constraint) -> Factory::Constraint,
) -> Result<Factory::Constraint, ParseError> {
    let operand = translate(&operands[0], factory)?;
    Ok(build(factory, operand))
}

fn binary<Factory: ConstraintFactory>(
    operands: &[Expression],
    factory: &mut Factory,
    build: fn(&mut Factory, Factory::Constraint, Factory::Constraint) -> Factory::Constraint,
) -> Result<Factory::Constraint, ParseError> {
    let left = translate(&operands[0], factory)?;
    let right = translate(&operands[1], factory)?;
    Ok(build(factory, left, right))
}

fn variadic<Factory: ConstraintFactory>(
    operands: &[Expression],
    factory: &mut Factory,
    build: fn(&mut Factory, Vec<Factory::Constraint>) -> Factory::Constraint,
) -> Result<Factory::Constraint, ParseError> {
    let translated = operands
        .iter()
        .map(|operand| translate(operand, factory))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(build(factory, translated))
}
