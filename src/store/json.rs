//! JSON export of expression graphs, for inspection and interchange.
//!
//! The JSON form is a flat [`NodeTable`]: one row per distinct node, operands
//! referenced by row index. Unlike the binary stream it keeps shared subgraphs
//! shared, and its nesting does not grow with graph depth. `serde_json` writes
//! non-finite constants as `null`, which does not read back; use the binary
//! form for those.
use super::error::{CodecError, DecodeReason};
use super::types::{NodeEntry, NodeTable, TABLE_VERSION};
use crate::graph::{Graph, Node};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

pub fn to_json(graph: &Graph) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&NodeTable::from_graph(graph))?)
}

pub fn to_json_pretty(graph: &Graph) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&NodeTable::from_graph(graph))?)
}

pub fn from_json(json: &str) -> Result<Graph, CodecError> {
    let table: NodeTable = serde_json::from_str(json)?;
    table.into_graph()
}

impl NodeTable {
    /// Lists every distinct node reachable from the root, operands first.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut rows: HashMap<*const Node, usize> = HashMap::new();
        let mut nodes = Vec::new();
        // (node, operands already listed)
        let mut stack: Vec<(&Arc<Node>, bool)> = vec![(graph.root_arc(), false)];

        while let Some((node, ready)) = stack.pop() {
            let key = Arc::as_ptr(node);
            if rows.contains_key(&key) {
                continue;
            }
            let row = |operand: &Arc<Node>| {
                *rows.get(&Arc::as_ptr(operand)).expect("BUG: operand must be listed before its parent")
            };
            let entry = match &**node {
                Node::Sum { lhs, rhs } | Node::Mul { lhs, rhs } if !ready => {
                    stack.push((node, true));
                    stack.push((rhs, false));
                    stack.push((lhs, false));
                    continue;
                }
                Node::Sum { lhs, rhs } => NodeEntry::Sum { lhs: row(lhs), rhs: row(rhs) },
                Node::Mul { lhs, rhs } => NodeEntry::Mul { lhs: row(lhs), rhs: row(rhs) },
                Node::Const(value) => NodeEntry::Const { value: *value },
                Node::Var(name) => NodeEntry::Var { name: name.clone() },
            };
            rows.insert(key, nodes.len());
            nodes.push(entry);
        }

        let root = nodes.len().saturating_sub(1);
        debug!("Tabulated graph into {} rows", nodes.len());
        Self { version: TABLE_VERSION, nodes, root }
    }

    /// Rebuilds the graph. All-or-nothing, like the binary decoder.
    pub fn into_graph(self) -> Result<Graph, CodecError> {
        if self.version != TABLE_VERSION {
            return Err(CodecError::InvalidTable(DecodeReason::UnsupportedVersion {
                found: self.version,
                expected: TABLE_VERSION,
            }));
        }

        let mut built: Vec<Arc<Node>> = Vec::with_capacity(self.nodes.len());
        for (entry, row) in self.nodes.into_iter().enumerate() {
            // Only rows already built can be referenced, which rules out cycles.
            let operand = |target: usize| {
                built
                    .get(target)
                    .cloned()
                    .ok_or_else(|| CodecError::InvalidTable(DecodeReason::DanglingReference { entry, target }))
            };
            let node = match row {
                NodeEntry::Sum { lhs, rhs } => Node::Sum { lhs: operand(lhs)?, rhs: operand(rhs)? },
                NodeEntry::Mul { lhs, rhs } => Node::Mul { lhs: operand(lhs)?, rhs: operand(rhs)? },
                NodeEntry::Const { value } => Node::Const(value),
                NodeEntry::Var { name } => Node::Var(name),
            };
            built.push(Arc::new(node));
        }

        let len = built.len();
        built
            .get(self.root)
            .cloned()
            .map(Graph::from_arc)
            .ok_or_else(|| CodecError::InvalidTable(DecodeReason::BadRoot { root: self.root, len }))
    }
}
