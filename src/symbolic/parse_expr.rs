// parsing of expression strings into the expression tree
//
// The normalized (whitespace free) string is split at the lowest-precedence operator
// found outside of brackets, scanning for the rightmost one so that chains are left
// associative. Tiers, lowest first: `+ -`, `* /`, leading sign, `^`, function call,
// bracketed group, leaf.

use crate::symbolic::symbolic_engine::{BinaryOp, Expression, Node, UnaryOp};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_traits::Scalar;
use crate::symbolic::utils::{
    brackets_are_balanced, find_pair_to_this_bracket, find_rightmost_operator_outside_brackets,
    is_identifier, strip_whitespace,
};
use log::{debug, trace};
use std::str::FromStr;
use strum::IntoEnumIterator;

const ADDITIVE: [char; 2] = ['+', '-'];
const MULTIPLICATIVE: [char; 2] = ['*', '/'];
const POWER: [char; 1] = ['^'];

pub fn parse_expression<T: Scalar>(input: &str) -> Result<Expression<T>, SymbolicError> {
    let normalized = strip_whitespace(input);
    if normalized.is_empty() {
        return Err(SymbolicError::syntax(input, "empty expression"));
    }
    if !brackets_are_balanced(&normalized) {
        return Err(SymbolicError::syntax(&normalized, "unbalanced parentheses"));
    }
    let node = parse_node::<T>(&normalized)?;
    let expression = Expression::from(node);
    debug!("parsed `{}` as {}", input, expression);
    Ok(expression)
}

fn parse_node<T: Scalar>(input: &str) -> Result<Node<T>, SymbolicError> {
    if input.is_empty() {
        return Err(SymbolicError::syntax(input, "empty operand"));
    }
    if let Some(node) = split_at_operator(input, &ADDITIVE)? {
        return Ok(node);
    }
    if let Some(node) = split_at_operator(input, &MULTIPLICATIVE)? {
        return Ok(node);
    }
    if let Some(node) = parse_signed(input)? {
        return Ok(node);
    }
    if let Some(node) = split_at_operator(input, &POWER)? {
        return Ok(node);
    }
    if let Some(node) = parse_function(input)? {
        return Ok(node);
    }
    if input.starts_with('(') {
        return parse_bracketed(input);
    }
    parse_leaf(input)
}

fn split_at_operator<T: Scalar>(
    input: &str,
    operators: &[char],
) -> Result<Option<Node<T>>, SymbolicError> {
    let Some((pos, symbol)) = find_rightmost_operator_outside_brackets(input, operators) else {
        return Ok(None);
    };
    let op = BinaryOp::from_symbol(symbol)?;
    let left = &input[..pos];
    let right = &input[pos + symbol.len_utf8()..];
    if left.is_empty() {
        return Err(SymbolicError::syntax(
            input,
            format!("missing left operand of '{}'", symbol),
        ));
    }
    if right.is_empty() {
        return Err(SymbolicError::syntax(
            input,
            format!("missing right operand of '{}'", symbol),
        ));
    }
    trace!("split `{}` at '{}' (position {})", input, symbol, pos);
    Ok(Some(Node::binary(op, parse_node(left)?, parse_node(right)?)))
}

fn starts_like_number(token: &str) -> bool {
    token
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '.')
        .unwrap_or(false)
}

// `-2` is a negative literal, `-x` is (-1)*x, `+x` is x
fn parse_signed<T: Scalar>(input: &str) -> Result<Option<Node<T>>, SymbolicError> {
    let (sign, rest) = match input.chars().next() {
        Some(sign @ ('-' | '+')) => (sign, &input[1..]),
        _ => return Ok(None),
    };
    if rest.is_empty() {
        return Err(SymbolicError::syntax(
            input,
            format!("missing operand after '{}'", sign),
        ));
    }
    if sign == '+' {
        return parse_node(rest).map(Some);
    }
    if starts_like_number(rest) {
        if let Some(value) = T::parse_literal(rest) {
            return Ok(Some(Node::Number(T::zero() - value)));
        }
    }
    let minus_one = Node::Number(T::zero() - T::one());
    Ok(Some(Node::binary(
        BinaryOp::Multiply,
        minus_one,
        parse_node(rest)?,
    )))
}

fn parse_function<T: Scalar>(input: &str) -> Result<Option<Node<T>>, SymbolicError> {
    for func in UnaryOp::iter() {
        let name = func.to_string();
        let Some(after_name) = input.strip_prefix(name.as_str()) else {
            continue;
        };
        // `sinx`, `exponent` and the like are plain identifiers
        if !after_name.starts_with('(') {
            continue;
        }
        let open = name.len();
        let close = find_pair_to_this_bracket(input, open).ok_or_else(|| {
            SymbolicError::syntax(input, format!("unbalanced parentheses after {}", name))
        })?;
        if close != input.len() - 1 {
            return Err(SymbolicError::syntax(
                input,
                format!("unexpected text after {}(...)", name),
            ));
        }
        let argument = &input[open + 1..close];
        if argument.is_empty() {
            return Err(SymbolicError::syntax(
                input,
                format!("empty argument of {}", name),
            ));
        }
        return Ok(Some(Node::unary(func, parse_node(argument)?)));
    }
    Ok(None)
}

fn parse_bracketed<T: Scalar>(input: &str) -> Result<Node<T>, SymbolicError> {
    let close = find_pair_to_this_bracket(input, 0)
        .ok_or_else(|| SymbolicError::syntax(input, "unbalanced parentheses"))?;
    if close != input.len() - 1 {
        return Err(SymbolicError::syntax(
            input,
            "missing operator next to a bracketed group",
        ));
    }
    let inner = &input[1..close];
    if inner.is_empty() {
        return Err(SymbolicError::syntax(input, "empty brackets"));
    }
    // a bracketed literal such as `(-1)` or `(1+2i)` is read back as one number
    if let Some(value) = T::parse_literal(inner) {
        return Ok(Node::Number(value));
    }
    parse_node(inner)
}

fn parse_leaf<T: Scalar>(input: &str) -> Result<Node<T>, SymbolicError> {
    if starts_like_number(input) {
        if let Some(value) = T::parse_literal(input) {
            return Ok(Node::Number(value));
        }
        let reason = match input.parse::<f64>() {
            Ok(_) => "numeric literal out of range",
            Err(_) => "invalid numeric literal",
        };
        return Err(SymbolicError::syntax(input, reason));
    }
    if UnaryOp::iter().any(|func| func.to_string() == input) {
        return Err(SymbolicError::syntax(
            input,
            format!("function {} requires an argument in parentheses", input),
        ));
    }
    if is_identifier(input) {
        return Ok(Node::Variable(input.to_string()));
    }
    if input.contains('(') || input.contains(')') {
        return Err(SymbolicError::syntax(
            input,
            "unknown function or misplaced parenthesis",
        ));
    }
    Err(SymbolicError::syntax(input, "unexpected character"))
}

impl<T: Scalar> Expression<T> {
    /// parses infix text such as `sin(x) * (y - 3) ^ 2`
    pub fn parse(input: &str) -> Result<Self, SymbolicError> {
        parse_expression(input)
    }
}

impl<T: Scalar> FromStr for Expression<T> {
    type Err = SymbolicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    fn parse(input: &str) -> Expression<f64> {
        parse_expression(input).unwrap()
    }

    fn is_syntax_error(input: &str) -> bool {
        matches!(
            parse_expression::<f64>(input),
            Err(SymbolicError::Syntax { .. })
        )
    }

    #[test]
    fn test_parse_leaves() {
        assert_eq!(parse("x"), Expression::variable("x"));
        assert_eq!(parse("  42 "), Expression::number(42.0));
        assert_eq!(parse(".5"), Expression::number(0.5));
        assert_eq!(parse("1e-3"), Expression::number(0.001));
        assert_eq!(parse("x_1"), Expression::variable("x_1"));
    }

    #[test]
    fn test_parse_precedence() {
        let x = Expression::<f64>::variable("x");
        let y = Expression::<f64>::variable("y");
        let z = Expression::<f64>::variable("z");
        assert_eq!(parse("x+y*z"), x.clone() + y.clone() * z.clone());
        assert_eq!(parse("x*y^z"), x.clone() * y.clone().pow(z.clone()));
        assert_eq!(parse("(x+y)*z"), (x.clone() + y.clone()) * z.clone());
        assert_eq!(parse("x-y-z"), (x.clone() - y.clone()) - z.clone());
        assert_eq!(parse("x/y/z"), (x.clone() / y.clone()) / z.clone());
        assert_eq!(parse("x^y^z"), x.pow(y).pow(z));
    }

    #[test]
    fn test_parse_signs() {
        let x = Expression::<f64>::variable("x");
        assert_eq!(parse("-2"), Expression::number(-2.0));
        assert_eq!(parse("-x"), Expression::number(-1.0) * x.clone());
        assert_eq!(parse("+x"), x.clone());
        assert_eq!(
            parse("-x^2"),
            Expression::number(-1.0) * x.clone().pow(Expression::number(2.0))
        );
        assert_eq!(parse("2*-x"), Expression::number(2.0) * -x.clone());
        assert_eq!(parse("x^-1"), x.clone().pow(Expression::number(-1.0)));
        assert_eq!(parse("x-(-1)"), x - Expression::number(-1.0));
    }

    #[test]
    fn test_parse_functions() {
        let x = Expression::<f64>::variable("x");
        assert_eq!(parse("sin(x)"), x.clone().sin());
        assert_eq!(parse("exp(ln(x))"), x.clone().ln().exp());
        assert_eq!(parse("cos((x))"), x.clone().cos());
        // identifiers that start like a function name
        assert_eq!(parse("sinx"), Expression::variable("sinx"));
        assert_eq!(parse("exponent"), Expression::variable("exponent"));
        assert_eq!(
            parse("sin(x)*cos(x)"),
            x.clone().sin() * x.cos()
        );
    }

    #[test]
    fn test_parse_errors() {
        for input in [
            "",
            "   ",
            "x+",
            "*x",
            "sin(x",
            "x)",
            "sin",
            "sin()",
            "sin(x)y",
            "(x)(y)",
            "()",
            "2x",
            "1.2.3",
            "x$y",
            "tan(x)",
            "-",
        ] {
            assert!(is_syntax_error(input), "`{}` should be rejected", input);
        }
    }

    #[test]
    fn test_literal_out_of_range() {
        for input in ["1e400", "1e400 + x", "-1e400", "x * 2e308"] {
            match parse_expression::<f64>(input) {
                Err(SymbolicError::Syntax { reason, .. }) => {
                    assert_eq!(reason, "numeric literal out of range", "`{}`", input)
                }
                other => panic!("`{}` parsed as {:?}", input, other),
            }
        }
        assert_eq!(parse("1e300"), Expression::number(1e300));
        assert_eq!(parse(&parse("1e300").render()), Expression::number(1e300));
    }

    #[test]
    fn test_complex_literals() {
        let one_two_i = Complex::new(1.0, 2.0);
        let x = Expression::<Complex<f64>>::variable("x");
        assert_eq!(
            Expression::<Complex<f64>>::parse("2i").unwrap(),
            Expression::number(Complex::new(0.0, 2.0))
        );
        assert_eq!(
            Expression::<Complex<f64>>::parse("(1+2i)").unwrap(),
            Expression::number(one_two_i)
        );
        assert_eq!(
            Expression::<Complex<f64>>::parse("x + (1+2i)").unwrap(),
            x + Expression::number(one_two_i)
        );
        // imaginary literals are rejected over the reals
        assert!(is_syntax_error("2i"));
    }

    #[test]
    fn test_unsupported_operator() {
        assert_eq!(
            BinaryOp::from_symbol('%'),
            Err(SymbolicError::UnsupportedOperation(
                "binary operator '%'".to_string()
            ))
        );
        assert_eq!(BinaryOp::from_symbol('^'), Ok(BinaryOp::Power));
    }

    #[test]
    fn test_from_str_and_complex() {
        let e: Expression<f64> = "x * 2".parse().unwrap();
        assert_eq!(e.render(), "(x * 2)");
        let c = Expression::<Complex<f64>>::parse("x + 1").unwrap();
        assert_eq!(c.render(), "(x + 1)");
    }

    #[test]
    fn test_render_parse_round_trip() {
        for input in [
            "((x + 5) * (y - 3))",
            "sin((x ^ 2))",
            "((-1) * cos(x))",
            "(ln(x) / exp((-2.5)))",
        ] {
            let e = parse(input);
            assert_eq!(e.render(), input);
            assert_eq!(parse(&e.render()), e);
        }
    }
}
