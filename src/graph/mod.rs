//! Defines the core data structures for the expression graph.
pub mod dag;
pub mod node;
pub mod ops;

// Re-export key types for convenient access
pub use dag::Graph;
pub use node::Node;
pub use ops::{Const, Var};
