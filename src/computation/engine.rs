//! A synchronous, single-threaded forward-mode differentiation engine.
use crate::computation::error::EvalError;
use crate::computation::ledger::{Dual, Inputs};
use crate::computation::ordering::VariableOrder;
use crate::graph::Graph;
use log::debug;
use std::borrow::Cow;

/// Evaluates graphs against one fixed input binding.
///
/// The variable order is resolved once when the engine is built and reused
/// for every node of every graph it evaluates, so several output graphs over
/// the same inputs share a single resolution.
pub struct ComputationEngine<'a> {
    inputs: &'a Inputs,
    order: Cow<'a, VariableOrder>,
}

impl<'a> ComputationEngine<'a> {
    pub fn new(inputs: &'a Inputs) -> Self {
        let order = VariableOrder::from_inputs(inputs);
        debug!("Resolved gradient order over {} variables", order.len());
        Self { inputs, order: Cow::Owned(order) }
    }

    /// Uses a caller-held order, which must cover exactly the keys of `inputs`.
    pub fn with_order(inputs: &'a Inputs, order: &'a VariableOrder) -> Result<Self, EvalError> {
        if order.len() != inputs.len() {
            return Err(EvalError::OrderMismatch { expected: order.len(), actual: inputs.len() });
        }
        // Equal sizes plus containment make the order a bijection onto the keys.
        if let Some(name) = inputs.keys().find(|name| order.index_of(name).is_none()) {
            return Err(EvalError::UnorderedVariable { name: name.clone() });
        }
        Ok(Self { inputs, order: Cow::Borrowed(order) })
    }

    pub fn order(&self) -> &VariableOrder { &self.order }

    /// Value only; the gradient order is not consulted.
    pub fn value(&self, graph: &Graph) -> Result<f64, EvalError> {
        graph.root().eval(self.inputs)
    }

    /// Value and gradient, gradient ordered by `self.order()`.
    pub fn value_and_gradient(&self, graph: &Graph) -> Result<Dual, EvalError> {
        graph.root().eval_grad(self.inputs, &self.order)
    }
}

/// Evaluates `graph` on `inputs`.
pub fn eval(graph: &Graph, inputs: &Inputs) -> Result<f64, EvalError> {
    graph.root().eval(inputs)
}

/// Evaluates `graph` and its gradient with respect to every key of `inputs`,
/// in ascending lexicographic order of the keys.
pub fn eval_grad(graph: &Graph, inputs: &Inputs) -> Result<Dual, EvalError> {
    ComputationEngine::new(inputs).value_and_gradient(graph)
}

/// As [`eval_grad`], reusing an order built earlier with
/// [`VariableOrder::from_inputs`] on a binding with the same keys.
pub fn eval_grad_with(graph: &Graph, inputs: &Inputs, order: &VariableOrder) -> Result<Dual, EvalError> {
    ComputationEngine::with_order(inputs, order)?.value_and_gradient(graph)
}
