//! # Symbolic Engine Derivatives Module
//!
//! Evaluation and analytical differentiation of expression trees.
//!
//! ## Key Methods
//!
//! ### Evaluation
//! - `evaluate(&Bindings)` - value of the expression under variable bindings
//! - `evaluate_constant()` - value of an expression without free variables
//!
//! ### Differentiation
//! - `differentiate(var)` - analytical partial derivative, textual power rule
//! - `differentiate_with(var, PowerRule)` - explicit choice of the power rule
//! - `nth_derivative(var, n)` - higher-order derivatives
//!
//! ### Numerical Validation
//! - `numerical_derivative(var, &Bindings, h)` - central difference, to cross-check
//!   the analytical result
//!
//! ## Power rule
//!
//! The default `PowerRule::Textual` decides what varies by comparing rendered text:
//! if the exponent renders exactly as the variable name, `d(f^g) = f^g*ln(f)*dg`;
//! else if the base renders as the variable name, `d(f^g) = g*f^(g-1)*df`; any other
//! power differentiates to 0. So `d/dx (2*x)^3` is 0 under this rule.
//! `PowerRule::General` applies the structural chain rule instead, deciding constancy
//! with `contains_variable`.

use crate::symbolic::symbolic_engine::{BinaryOp, Bindings, Expression, Node, UnaryOp};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_traits::Scalar;
use crate::symbolic::utils::numerical_derivative;
use log::{debug, trace};
use strum_macros::{Display, EnumString};

/// how `f^g` is differentiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PowerRule {
    /// decide by comparing the rendered base/exponent with the variable name
    #[default]
    Textual,
    /// structural chain rule for any base and exponent
    General,
}

impl<T: Scalar> Node<T> {
    /// EVALUATION
    ///
    /// Recursive evaluation. Division by zero, ln of non-positive numbers and
    /// overflow are not trapped, they produce the scalar's inf/NaN values.
    pub fn evaluate(&self, bindings: &Bindings<T>) -> Result<T, SymbolicError> {
        match self {
            Node::Number(value) => Ok(*value),
            Node::Variable(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| SymbolicError::UnboundVariable(name.clone())),
            Node::Binary { op, left, right } => {
                let lhs = left.evaluate(bindings)?;
                let rhs = right.evaluate(bindings)?;
                Ok(op.apply(lhs, rhs))
            }
            Node::Unary { op, operand } => Ok(op.apply(operand.evaluate(bindings)?)),
        }
    }

    /// DIFFERENTIATION
    ///
    /// Implements the standard rules:
    /// - Sum/difference: d(f±g) = df ± dg
    /// - Product rule: d(f*g) = df*g + f*dg
    /// - Quotient rule: d(f/g) = (df*g - f*dg)/g^2
    /// - Chain rule for sin, cos, ln, exp
    /// - Power: see `PowerRule`
    ///
    /// The result is not simplified, only `render()` hides the trivial factors.
    pub fn differentiate(&self, var: &str, rule: PowerRule) -> Expression<T> {
        let zero = || Expression::number(T::zero());
        let one = || Expression::number(T::one());
        match self {
            Node::Number(_) => zero(),
            Node::Variable(name) => {
                if name == var {
                    one()
                } else {
                    zero()
                }
            }
            Node::Binary { op, left, right } => {
                let f = || Expression::from((**left).clone());
                let g = || Expression::from((**right).clone());
                let df = left.differentiate(var, rule);
                let dg = right.differentiate(var, rule);
                match op {
                    BinaryOp::Add => df + dg,
                    BinaryOp::Subtract => df - dg,
                    BinaryOp::Multiply => df * g() + f() * dg,
                    BinaryOp::Divide => {
                        (df * g() - f() * dg) / g().pow(Expression::number(T::from_f64(2.0)))
                    }
                    BinaryOp::Power => match rule {
                        PowerRule::Textual => {
                            if right.render() == var {
                                f().pow(g()) * f().ln() * dg
                            } else if left.render() == var {
                                g() * f().pow(g() - one()) * df
                            } else {
                                zero()
                            }
                        }
                        PowerRule::General => {
                            match (left.contains_variable(var), right.contains_variable(var)) {
                                (false, false) => zero(),
                                (true, false) => g() * f().pow(g() - one()) * df,
                                (false, true) => f().pow(g()) * f().ln() * dg,
                                (true, true) => f().pow(g()) * (dg * f().ln() + g() * df / f()),
                            }
                        }
                    },
                }
            }
            Node::Unary { op, operand } => {
                let f = || Expression::from((**operand).clone());
                let df = operand.differentiate(var, rule);
                match op {
                    UnaryOp::Sin => f().cos() * df,
                    UnaryOp::Cos => {
                        (Expression::number(T::zero() - T::one()) * f().sin()) * df
                    }
                    UnaryOp::Ln => df / f(),
                    UnaryOp::Exp => f().exp() * df,
                }
            }
        }
    }
}

impl<T: Scalar> Expression<T> {
    pub fn evaluate(&self, bindings: &Bindings<T>) -> Result<T, SymbolicError> {
        let value = self.node().evaluate(bindings)?;
        trace!("{} evaluated to {} ({})", self, value, T::KIND);
        Ok(value)
    }

    /// evaluation with no bindings, fails on the first variable met
    pub fn evaluate_constant(&self) -> Result<T, SymbolicError> {
        self.evaluate(&Bindings::new())
    }

    /// Analytical derivative with respect to `var`, power handled by `PowerRule::Textual`.
    pub fn differentiate(&self, var: &str) -> Expression<T> {
        self.differentiate_with(var, PowerRule::default())
    }

    pub fn differentiate_with(&self, var: &str, rule: PowerRule) -> Expression<T> {
        let derivative = self.node().differentiate(var, rule);
        debug!("d/d{} {} = {} ({} power rule)", var, self, derivative, rule);
        derivative
    }

    /// n-th derivative by repeated differentiation, order 0 returns a copy
    pub fn nth_derivative(&self, var: &str, n: usize, rule: PowerRule) -> Expression<T> {
        let mut derivative = self.clone();
        for _ in 0..n {
            derivative = derivative.differentiate_with(var, rule);
        }
        derivative
    }
}

impl Expression<f64> {
    /// Central difference derivative with respect to `var` at the point given by
    /// `bindings`. Every variable of the expression must be bound.
    pub fn numerical_derivative(
        &self,
        var: &str,
        bindings: &Bindings<f64>,
        h: f64,
    ) -> Result<f64, SymbolicError> {
        let x0 = *bindings
            .get(var)
            .ok_or_else(|| SymbolicError::UnboundVariable(var.to_string()))?;
        // surfaces unbound variables before the closure hides them
        self.evaluate(bindings)?;
        let f = |x: f64| {
            let mut shifted = bindings.clone();
            shifted.insert(var.to_string(), x);
            self.node().evaluate(&shifted).unwrap_or(f64::NAN)
        };
        Ok(numerical_derivative(f, x0, h))
    }
}
