//! Error kinds raised by the symbolic engine.
//!
//! The engine never recovers from its own faults: every variant is handed back
//! to the immediate caller with `?`. Purely numeric faults (division by zero,
//! logarithm of a non-positive number, overflow) are not errors at all, they
//! travel through evaluation as the scalar's own inf/NaN values.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    /// malformed expression text, raised by the parser only
    #[error("syntax error in `{input}`: {reason}")]
    Syntax { input: String, reason: String },
    /// evaluation visited a variable that has no value in the bindings
    #[error("variable not found: {0}")]
    UnboundVariable(String),
    /// an operator tag outside the closed operator set reached a dispatch point
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl SymbolicError {
    pub fn syntax(input: &str, reason: impl Into<String>) -> Self {
        SymbolicError::Syntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
