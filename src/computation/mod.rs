//! Evaluates expression graphs: values and forward-mode gradients.
pub mod engine;
pub mod error;
pub mod ledger;
pub mod ordering;

pub use engine::{eval, eval_grad, eval_grad_with, ComputationEngine};
pub use error::EvalError;
pub use ledger::{Dual, Gradient, Inputs};
pub use ordering::VariableOrder;
