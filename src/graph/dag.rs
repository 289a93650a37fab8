//! dag.rs
//! The public handle on an expression graph.

use super::node::Node;
use crate::analysis::topology::{self, GraphStats};
use crate::computation::{self, Dual, EvalError, Inputs};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A compute graph: a shared handle to exactly one root node.
///
/// Cloning is cheap and never copies nodes. Combining graphs with `+`/`*`
/// (or [`Graph::sum`] / [`Graph::product`]) builds one new node that points at
/// both existing roots, leaving the operands untouched and reusable.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    root: Arc<Node>,
}

impl Graph {
    pub fn from_node(node: Node) -> Self {
        Self { root: Arc::new(node) }
    }

    pub(crate) fn from_arc(root: Arc<Node>) -> Self {
        Self { root }
    }

    /// A single-node graph holding a constant.
    pub fn constant(value: f64) -> Self {
        Self::from_node(Node::Const(value))
    }

    /// A single-node graph holding a named placeholder.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::from_node(Node::Var(name.into()))
    }

    /// `a + b` over anything that lifts into a graph.
    pub fn sum(a: impl Into<Graph>, b: impl Into<Graph>) -> Self {
        Self::from_node(Node::Sum { lhs: a.into().root, rhs: b.into().root })
    }

    /// `a * b` over anything that lifts into a graph.
    pub fn product(a: impl Into<Graph>, b: impl Into<Graph>) -> Self {
        Self::from_node(Node::Mul { lhs: a.into().root, rhs: b.into().root })
    }

    pub fn root(&self) -> &Node { &self.root }

    pub(crate) fn root_arc(&self) -> &Arc<Node> { &self.root }

    /// True if both handles point at the very same root node.
    pub fn ptr_eq(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub fn eval(&self, inputs: &Inputs) -> Result<f64, EvalError> {
        computation::eval(self, inputs)
    }

    pub fn eval_grad(&self, inputs: &Inputs) -> Result<Dual, EvalError> {
        computation::eval_grad(self, inputs)
    }

    /// Names of every variable referenced anywhere in the graph, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        topology::variables(&self.root)
    }

    pub fn stats(&self) -> GraphStats {
        topology::stats(&self.root)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.root, f)
    }
}
