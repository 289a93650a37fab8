use crate::computation::Inputs;
use crate::graph::{Graph, Node};
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

/// Renders an indented audit trace of `graph` evaluated on `inputs`.
///
/// Each node is listed with its value, root first. A node reached again
/// through another parent prints a back-reference to the level where it was
/// first listed instead of repeating its subtree.
pub fn format_trace(graph: &Graph, inputs: &Inputs) -> String {
    let mut tracer = Tracer {
        inputs,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    let stats = graph.stats();
    let _ = writeln!(
        tracer.output,
        "EVALUATION TRACE ({} nodes, {} distinct, {} inputs):",
        stats.tree_nodes, stats.distinct_nodes, inputs.len()
    );
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_node(graph.root_arc(), 1, "");
    tracer.output
}

struct Tracer<'a> {
    inputs: &'a Inputs,
    visited_at_level: HashMap<*const Node, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node: &Arc<Node>, level: usize, prefix: &str) {
        let key = Arc::as_ptr(node);
        if let Some(&first_seen) = self.visited_at_level.get(&key) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(key, level);

        let label = match &**node {
            Node::Var(name) => format!("Var '{name}'"),
            other => other.kind_name().to_string(),
        };
        let value = match node.eval(self.inputs) {
            Ok(v) => v.to_string(),
            Err(e) => format!("<{e}>"),
        };
        let _ = writeln!(self.output, "{}[L{}] {} = {}", prefix, level, label, value);

        if let Some((lhs, rhs)) = node.operands() {
            let child_prefix = format!("{prefix}  ");
            self.trace_node(lhs, level + 1, &child_prefix);
            self.trace_node(rhs, level + 1, &child_prefix);
        }
    }
}
