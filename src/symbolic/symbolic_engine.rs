//! # Symbolic Engine Module
//!
//! The expression tree at the heart of the crate: a closed set of node variants and the
//! public `Expression` value that owns exactly one of them.
//!
//! ## Main Structures
//!
//! ### `Node<T>` enum
//! - **Leaves**: `Number(T)` literal and `Variable(String)` free identifier
//! - **Binary**: `+ - * / ^` applied to two exclusively owned subtrees
//! - **Unary**: `sin`, `cos`, `ln`, `exp` applied to one subtree
//!
//! ### `Expression<T>`
//! Immutable formula. Every operation (`render`, `substitute`, `evaluate`,
//! `differentiate`) takes `&self` and returns a new value, cloning is a deep copy.
//! `T` is the scalar type, `f64` by default, `Complex<f64>` is also supported.
//!
//! ## Interesting Code Features
//!
//! 1. **Operator Overloading**: `std::ops` traits (Add, Sub, Mul, Div, Neg) move the
//!    operands into the new node, so building `x + y * z` never copies a subtree
//!
//! 2. **Render-time peepholes**: `render()` drops `+0`, `*1`, `^1` and folds `*0`,
//!    `sin(0)`, `cos(0)` by comparing the rendered text of the children. The tree
//!    itself is never simplified.
//!
//! 3. **strum-backed operator tags**: `BinaryOp` prints as its symbol and `UnaryOp`
//!    as its function name, the parser goes through the same strings

use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_traits::Scalar;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// values of variables supplied at evaluation time
pub type Bindings<T> = HashMap<String, T>;

/// operators of a binary node, displayed as their infix symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "^")]
    Power,
}

impl BinaryOp {
    /// maps an operator character found by the parser to its tag
    pub fn from_symbol(symbol: char) -> Result<Self, SymbolicError> {
        symbol
            .to_string()
            .parse::<BinaryOp>()
            .map_err(|_| SymbolicError::UnsupportedOperation(format!("binary operator '{}'", symbol)))
    }

    /// no zero check for division, the scalar decides what x/0 is
    pub fn apply<T: Scalar>(self, lhs: T, rhs: T) -> T {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Subtract => lhs - rhs,
            BinaryOp::Multiply => lhs * rhs,
            BinaryOp::Divide => lhs / rhs,
            BinaryOp::Power => lhs.pow(rhs),
        }
    }
}

/// functions of a unary node, displayed as their name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryOp {
    Sin,
    Cos,
    Ln,
    Exp,
}

impl UnaryOp {
    pub fn apply<T: Scalar>(self, value: T) -> T {
        match self {
            UnaryOp::Sin => value.sin(),
            UnaryOp::Cos => value.cos(),
            UnaryOp::Ln => value.ln(),
            UnaryOp::Exp => value.exp(),
        }
    }
}

/// One constituent of the expression tree.
///
/// Children are boxed and owned by exactly one parent, the tree is finite and acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T = f64> {
    /// numerical literal
    Number(T),
    /// symbolic variable, bound only at evaluation time
    Variable(String),
    /// binary operation: left op right
    Binary {
        op: BinaryOp,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
    /// function application: op(operand)
    Unary { op: UnaryOp, operand: Box<Node<T>> },
}

impl<T: Scalar> Node<T> {
    pub fn number(value: T) -> Self {
        Node::Number(value)
    }

    pub fn variable(name: &str) -> Self {
        Node::Variable(name.to_string())
    }

    pub fn binary(op: BinaryOp, left: Node<T>, right: Node<T>) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Node<T>) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Infix text of the subtree.
    ///
    /// Every binary application is wrapped as `(l op r)`; the identities
    /// `e+0`, `0+e`, `e*1`, `1*e`, `e*0`, `0*e`, `e^1`, `sin(0)`, `cos(0)` are applied
    /// to the rendered text of the children, not to the tree.
    pub fn render(&self) -> String {
        match self {
            Node::Number(value) => value.render(),
            Node::Variable(name) => name.clone(),
            Node::Binary { op, left, right } => {
                let lhs = left.render();
                let rhs = right.render();
                match op {
                    BinaryOp::Add if lhs == "0" => rhs,
                    BinaryOp::Add if rhs == "0" => lhs,
                    BinaryOp::Multiply if lhs == "0" || rhs == "0" => "0".to_string(),
                    BinaryOp::Multiply if lhs == "1" => rhs,
                    BinaryOp::Multiply if rhs == "1" => lhs,
                    BinaryOp::Power if rhs == "1" => lhs,
                    _ => format!("({} {} {})", lhs, op, rhs),
                }
            }
            Node::Unary { op, operand } => {
                let arg = operand.render();
                match op {
                    UnaryOp::Sin if arg == "0" => "0".to_string(),
                    UnaryOp::Cos if arg == "0" => "1".to_string(),
                    _ => format!("{}({})", op, arg),
                }
            }
        }
    }

    /// replaces every occurrence of the variable by a copy of `replacement`
    pub fn substitute(&self, var: &str, replacement: &Node<T>) -> Node<T> {
        match self {
            Node::Variable(name) if name == var => replacement.clone(),
            Node::Number(_) | Node::Variable(_) => self.clone(),
            Node::Binary { op, left, right } => Node::binary(
                *op,
                left.substitute(var, replacement),
                right.substitute(var, replacement),
            ),
            Node::Unary { op, operand } => Node::unary(*op, operand.substitute(var, replacement)),
        }
    }

    /// replaces every variable found in the map by a numeric literal
    pub fn set_variables(&self, values: &Bindings<T>) -> Node<T> {
        match self {
            Node::Variable(name) => match values.get(name) {
                Some(value) => Node::Number(*value),
                None => self.clone(),
            },
            Node::Number(_) => self.clone(),
            Node::Binary { op, left, right } => {
                Node::binary(*op, left.set_variables(values), right.set_variables(values))
            }
            Node::Unary { op, operand } => Node::unary(*op, operand.set_variables(values)),
        }
    }

    /// check if the subtree contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Node::Variable(name) => name == var_name,
            Node::Number(_) => false,
            Node::Binary { left, right, .. } => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Node::Unary { operand, .. } => operand.contains_variable(var_name),
        }
    }

    fn collect_variables<'a>(&'a self, found: &mut BTreeSet<&'a str>) {
        match self {
            Node::Variable(name) => {
                found.insert(name.as_str());
            }
            Node::Number(_) => {}
            Node::Binary { left, right, .. } => {
                left.collect_variables(found);
                right.collect_variables(found);
            }
            Node::Unary { operand, .. } => operand.collect_variables(found),
        }
    }
}

impl<T: Scalar> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Immutable algebraic formula, the public face of the engine.
///
/// # Examples
/// ```
/// use RustedDifferentiator::symbolic::symbolic_engine::Expression;
/// let x = Expression::<f64>::variable("x");
/// let f = x.clone().sin() * x + Expression::number(0.0);
/// assert_eq!(f.render(), "(sin(x) * x)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression<T = f64> {
    node: Node<T>,
}

impl<T: Scalar> From<Node<T>> for Expression<T> {
    fn from(node: Node<T>) -> Self {
        Expression { node }
    }
}

impl<T: Scalar> Expression<T> {
    // BASIC FEATURES

    pub fn number(value: T) -> Self {
        Node::number(value).into()
    }

    pub fn variable(name: &str) -> Self {
        Node::variable(name).into()
    }

    /// Creates multiple variables from a comma-separated string like "x, y, z".
    pub fn symbols(names: &str) -> Vec<Self> {
        names
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::variable)
            .collect()
    }

    pub fn binary(op: BinaryOp, lhs: Expression<T>, rhs: Expression<T>) -> Self {
        Node::binary(op, lhs.node, rhs.node).into()
    }

    pub fn unary(op: UnaryOp, operand: Expression<T>) -> Self {
        Node::unary(op, operand.node).into()
    }

    pub fn node(&self) -> &Node<T> {
        &self.node
    }

    pub fn into_node(self) -> Node<T> {
        self.node
    }

    /// power expression self^exponent
    pub fn pow(self, exponent: Expression<T>) -> Self {
        Self::binary(BinaryOp::Power, self, exponent)
    }

    pub fn sin(self) -> Self {
        Self::unary(UnaryOp::Sin, self)
    }

    pub fn cos(self) -> Self {
        Self::unary(UnaryOp::Cos, self)
    }

    pub fn ln(self) -> Self {
        Self::unary(UnaryOp::Ln, self)
    }

    pub fn exp(self) -> Self {
        Self::unary(UnaryOp::Exp, self)
    }

    pub fn render(&self) -> String {
        self.node.render()
    }

    /// New expression with every occurrence of `var` replaced by `replacement`.
    /// The receiver is left untouched.
    pub fn substitute(&self, var: &str, replacement: &Expression<T>) -> Expression<T> {
        self.node.substitute(var, &replacement.node).into()
    }

    /// substitutes a variable with a constant value
    pub fn set_variable(&self, var: &str, value: T) -> Expression<T> {
        self.node.substitute(var, &Node::Number(value)).into()
    }

    /// substitutes every variable present in the map with its value
    pub fn set_variables(&self, values: &Bindings<T>) -> Expression<T> {
        self.node.set_variables(values).into()
    }

    pub fn contains_variable(&self, var_name: &str) -> bool {
        self.node.contains_variable(var_name)
    }

    /// names of all variables of the expression, sorted and deduplicated
    pub fn variables(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.node.collect_variables(&mut found);
        found.into_iter().map(str::to_string).collect()
    }
}

impl<T: Scalar> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

impl<T: Scalar> std::ops::Add for Expression<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expression::binary(BinaryOp::Add, self, rhs)
    }
}

impl<T: Scalar> std::ops::Sub for Expression<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expression::binary(BinaryOp::Subtract, self, rhs)
    }
}

impl<T: Scalar> std::ops::Mul for Expression<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expression::binary(BinaryOp::Multiply, self, rhs)
    }
}

impl<T: Scalar> std::ops::Div for Expression<T> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expression::binary(BinaryOp::Divide, self, rhs)
    }
}

impl<T: Scalar> std::ops::Neg for Expression<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expression::number(T::zero() - T::one()) * self
    }
}
