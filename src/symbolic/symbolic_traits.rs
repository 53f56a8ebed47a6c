// SCALAR TRAITS //////////////////////////////////////////////////////////////////
// The engine is generic over the numeric type its literals and bindings live in.
// Implementations for real (f64) and complex (Complex<f64>) scalars are provided here,
// add other number types as needed

use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Sub};

/// numeric type an expression tree is evaluated in
pub trait Scalar:
    Copy
    + Debug
    + Display
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// short name used in log messages
    const KIND: &'static str;

    fn from_f64(value: f64) -> Self;
    /// parses a numeric literal token of an expression, `None` for malformed or
    /// non-finite values
    fn parse_literal(token: &str) -> Option<Self>;
    /// parses a value supplied from outside, e.g. `x=1+2i` on the command line
    fn parse_value(text: &str) -> Option<Self>;
    fn pow(self, exponent: Self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn ln(self) -> Self;
    fn exp(self) -> Self;
    /// text of a literal inside a rendered expression
    fn render(&self) -> String;
}

impl Scalar for f64 {
    const KIND: &'static str = "real";

    fn from_f64(value: f64) -> Self {
        value
    }

    fn parse_literal(token: &str) -> Option<Self> {
        token.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    fn parse_value(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok()
    }

    fn pow(self, exponent: Self) -> Self {
        f64::powf(self, exponent)
    }

    fn sin(self) -> Self {
        f64::sin(self)
    }

    fn cos(self) -> Self {
        f64::cos(self)
    }

    fn ln(self) -> Self {
        f64::ln(self)
    }

    fn exp(self) -> Self {
        f64::exp(self)
    }

    // negative literals are bracketed so that the text parses back into the same literal
    fn render(&self) -> String {
        if *self < 0.0 {
            format!("({})", self)
        } else if *self == 0.0 {
            "0".to_string()
        } else {
            format!("{}", self)
        }
    }
}

impl Scalar for Complex<f64> {
    const KIND: &'static str = "complex";

    fn from_f64(value: f64) -> Self {
        Complex::new(value, 0.0)
    }

    // `2i` and `1-2.5i` are literals too, that is how `render` writes them
    fn parse_literal(token: &str) -> Option<Self> {
        if token.ends_with('i') && token.chars().any(|c| c.is_ascii_digit()) {
            token
                .parse::<Complex<f64>>()
                .ok()
                .filter(|value| value.re.is_finite() && value.im.is_finite())
        } else {
            <f64 as Scalar>::parse_literal(token).map(Self::from_f64)
        }
    }

    fn parse_value(text: &str) -> Option<Self> {
        text.trim().parse::<Complex<f64>>().ok()
    }

    fn pow(self, exponent: Self) -> Self {
        Complex::powc(self, exponent)
    }

    fn sin(self) -> Self {
        Complex::sin(self)
    }

    fn cos(self) -> Self {
        Complex::cos(self)
    }

    fn ln(self) -> Self {
        Complex::ln(self)
    }

    fn exp(self) -> Self {
        Complex::exp(self)
    }

    fn render(&self) -> String {
        if self.im == 0.0 {
            Scalar::render(&self.re)
        } else {
            format!("({})", self)
        }
    }
}
