//! Small arithmetic expression graphs over named scalar variables.
//!
//! Graphs are built from constants and variables with `+` and `*`, evaluated
//! against an [`Inputs`] binding, differentiated in forward mode, and persisted
//! in a compact self-describing binary format.
//!
//! ```
//! use gradgraph_core::{Const, Inputs, Var};
//!
//! let (x, y) = (Var::new("x"), Var::new("y"));
//! let g = &x * &y + Const(2.0) * &x;
//!
//! let inputs: Inputs = [("x".to_string(), 3.0), ("y".to_string(), 4.0)].into_iter().collect();
//! let d = g.eval_grad(&inputs)?;
//! assert_eq!(d.value, 18.0);
//! assert_eq!(d.gradient.as_slice(), &[6.0, 3.0]); // [d/dx, d/dy]
//!
//! let back = gradgraph_core::store::deserialize(&gradgraph_core::store::serialize(&g))?;
//! assert_eq!(back.eval(&inputs)?, 18.0);
//! # Ok::<(), gradgraph_core::Error>(())
//! ```

pub mod analysis;
pub mod computation;
pub mod display;
pub mod error;
pub mod graph;
pub mod store;

pub use analysis::GraphStats;
pub use computation::{eval, eval_grad, eval_grad_with, ComputationEngine, Dual, EvalError, Gradient, Inputs, VariableOrder};
pub use error::{Error, Result};
pub use graph::{Const, Graph, Node, Var};
pub use store::{deserialize, read_from_path, serialize, write_to_path, CodecError};
