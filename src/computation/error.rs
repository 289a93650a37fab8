//! Defines the error types for the computation module.
use thiserror::Error;

/// A failure while evaluating a graph against a set of inputs.
///
/// Inputs are caller-supplied, so every variant is a recoverable value
/// returned to the caller rather than an abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A `Var` node names a variable that has no binding in the inputs.
    #[error("Missing variable '{name}' in inputs")]
    MissingVariable { name: String },
    /// A caller-supplied `VariableOrder` was built from a different key set.
    #[error("Variable order covers {expected} variables but inputs bind {actual}")]
    OrderMismatch { expected: usize, actual: usize },
    /// An input key is absent from the caller-supplied `VariableOrder`.
    #[error("Variable '{name}' is bound in inputs but has no gradient slot")]
    UnorderedVariable { name: String },
}

impl EvalError {
    pub fn missing(name: &str) -> Self {
        EvalError::MissingVariable { name: name.to_string() }
    }
}
