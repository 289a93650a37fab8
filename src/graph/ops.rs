//! Operator sugar: bare constants and placeholders combine with `+` and `*`.
//!
//! Every operand is first lifted into a one-node [`Graph`] and the operation is
//! delegated to [`Graph::sum`] / [`Graph::product`]. Lifting always succeeds and
//! never touches an existing node.

use super::dag::Graph;
use std::ops::{Add, Mul};

/// A scalar constant, liftable into a one-node graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Const(pub f64);

/// A scalar variable: a named placeholder for an input to `eval`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }
    pub fn name(&self) -> &str { &self.0 }
}

impl From<Const> for Graph {
    fn from(c: Const) -> Self { Graph::constant(c.0) }
}

impl From<&Const> for Graph {
    fn from(c: &Const) -> Self { Graph::constant(c.0) }
}

impl From<Var> for Graph {
    fn from(v: Var) -> Self { Graph::variable(v.0) }
}

impl From<&Var> for Graph {
    fn from(v: &Var) -> Self { Graph::variable(v.0.clone()) }
}

impl From<&Graph> for Graph {
    fn from(g: &Graph) -> Self { g.clone() }
}

macro_rules! impl_graph_ops {
    ($($lhs:ty),* $(,)?) => {$(
        impl<R: Into<Graph>> Add<R> for $lhs {
            type Output = Graph;
            fn add(self, rhs: R) -> Graph { Graph::sum(self, rhs) }
        }

        impl<R: Into<Graph>> Mul<R> for $lhs {
            type Output = Graph;
            fn mul(self, rhs: R) -> Graph { Graph::product(self, rhs) }
        }
    )*};
}

impl_graph_ops!(Graph, &Graph, Const, &Const, Var, &Var);
