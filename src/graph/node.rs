//! Defines the `Node` sum type and the local evaluation rules of each variant.

use crate::computation::{Dual, EvalError, Inputs, VariableOrder};
use log::trace;
use std::fmt;
use std::mem;
use std::sync::{Arc, OnceLock};

/// The primary enum representing a node in the expression graph.
///
/// Nodes are immutable once built. Operands are shared through `Arc`, so one
/// sub-expression may feed several parents; since a node can only point at
/// nodes that already existed when it was built, the structure is acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `lhs + rhs`
    Sum { lhs: Arc<Node>, rhs: Arc<Node> },
    /// `lhs * rhs`
    Mul { lhs: Arc<Node>, rhs: Arc<Node> },
    /// A scalar constant.
    Const(f64),
    /// A named placeholder; its value is supplied by `Inputs` at evaluation time.
    Var(String),
}

impl Node {
    /// Evaluates this node on the inputs provided.
    pub fn eval(&self, inputs: &Inputs) -> Result<f64, EvalError> {
        match self {
            Node::Sum { lhs, rhs } => Ok(lhs.eval(inputs)? + rhs.eval(inputs)?),
            Node::Mul { lhs, rhs } => Ok(lhs.eval(inputs)? * rhs.eval(inputs)?),
            Node::Const(value) => Ok(*value),
            Node::Var(name) => lookup(inputs, name),
        }
    }

    /// Evaluates this node together with its gradient. `order` must be the
    /// order resolved for `inputs`; it fixes the gradient width and layout.
    pub fn eval_grad(&self, inputs: &Inputs, order: &VariableOrder) -> Result<Dual, EvalError> {
        match self {
            Node::Sum { lhs, rhs } => {
                let l = lhs.eval_grad(inputs, order)?;
                Ok(l + rhs.eval_grad(inputs, order)?)
            }
            Node::Mul { lhs, rhs } => {
                let l = lhs.eval_grad(inputs, order)?;
                Ok(l * rhs.eval_grad(inputs, order)?)
            }
            Node::Const(value) => Ok(Dual::constant(*value, order.len())),
            Node::Var(name) => {
                let value = lookup(inputs, name)?;
                let slot = order
                    .index_of(name)
                    .ok_or_else(|| EvalError::UnorderedVariable { name: name.clone() })?;
                Ok(Dual::variable(value, order.len(), slot))
            }
        }
    }

    /// The two operands of a `Sum`/`Mul`, `None` for leaves.
    pub fn operands(&self) -> Option<(&Arc<Node>, &Arc<Node>)> {
        match self {
            Node::Sum { lhs, rhs } | Node::Mul { lhs, rhs } => Some((lhs, rhs)),
            Node::Const(_) | Node::Var(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Sum { .. } => "Sum",
            Node::Mul { .. } => "Mul",
            Node::Const(_) => "Const",
            Node::Var(_) => "Var",
        }
    }
}

fn lookup(inputs: &Inputs, name: &str) -> Result<f64, EvalError> {
    match inputs.get(name) {
        Some(value) => Ok(*value),
        None => {
            trace!("Variable '{name}' has no binding among {} inputs", inputs.len());
            Err(EvalError::missing(name))
        }
    }
}

// Stand-in operand swapped into a node while it is being torn down.
static DETACHED: OnceLock<Arc<Node>> = OnceLock::new();

fn detached() -> Arc<Node> {
    DETACHED.get_or_init(|| Arc::new(Node::Const(0.0))).clone()
}

fn detach_operands(node: &mut Node, pending: &mut Vec<Arc<Node>>) {
    if let Node::Sum { lhs, rhs } | Node::Mul { lhs, rhs } = node {
        pending.push(mem::replace(lhs, detached()));
        pending.push(mem::replace(rhs, detached()));
    }
}

/// Releases operand chains with an explicit stack: a decoded or constructed
/// graph may be far deeper than the thread stack allows recursive drops.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_operands(self, &mut pending);
        while let Some(operand) = pending.pop() {
            // Only the last owner tears a node down; shared operands just lose a reference.
            if let Ok(mut node) = Arc::try_unwrap(operand) {
                detach_operands(&mut node, &mut pending);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Sum { lhs, rhs } => write!(f, "({lhs} + {rhs})"),
            Node::Mul { lhs, rhs } => write!(f, "({lhs} * {rhs})"),
            Node::Const(value) => write!(f, "{value}"),
            Node::Var(name) => f.write_str(name),
        }
    }
}
