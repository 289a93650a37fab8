//! Structural statistics over an expression DAG.
use crate::graph::Node;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Shape of a graph, as seen both as a DAG and as the tree it expands to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Node occurrences once every shared subgraph is expanded (saturating).
    /// This is the number of records in the binary encoding.
    pub tree_nodes: u64,
    /// Nodes counted by identity; shared subgraphs count once.
    pub distinct_nodes: usize,
    /// Longest root-to-leaf path, in nodes.
    pub depth: usize,
    pub sums: usize,
    pub muls: usize,
    pub consts: usize,
    pub vars: usize,
}

impl GraphStats {
    /// True if some node is reachable through more than one parent edge.
    pub fn has_sharing(&self) -> bool {
        self.tree_nodes != self.distinct_nodes as u64
    }
}

// Per distinct node: (expanded tree size, depth).
type Memo = HashMap<*const Node, (u64, usize)>;

/// Computes [`GraphStats`] with one visit per distinct node.
///
/// Tree sizes are memoized by node identity, so a chain of `g = g + g`
/// doublings is measured in linear time even though its expansion is exponential.
pub fn stats(root: &Arc<Node>) -> GraphStats {
    let mut memo = Memo::new();
    let mut out = GraphStats::default();
    let (tree_nodes, depth) = visit(root, &mut memo, &mut out);
    out.tree_nodes = tree_nodes;
    out.depth = depth;
    out.distinct_nodes = memo.len();
    out
}

fn visit(node: &Arc<Node>, memo: &mut Memo, out: &mut GraphStats) -> (u64, usize) {
    let key = Arc::as_ptr(node);
    if let Some(&seen) = memo.get(&key) {
        return seen;
    }

    let measured = match &**node {
        Node::Sum { lhs, rhs } => {
            out.sums += 1;
            join(visit(lhs, memo, out), visit(rhs, memo, out))
        }
        Node::Mul { lhs, rhs } => {
            out.muls += 1;
            join(visit(lhs, memo, out), visit(rhs, memo, out))
        }
        Node::Const(_) => {
            out.consts += 1;
            (1, 1)
        }
        Node::Var(_) => {
            out.vars += 1;
            (1, 1)
        }
    };

    memo.insert(key, measured);
    measured
}

fn join((l_size, l_depth): (u64, usize), (r_size, r_depth): (u64, usize)) -> (u64, usize) {
    (l_size.saturating_add(r_size).saturating_add(1), l_depth.max(r_depth) + 1)
}

/// Names of every `Var` reachable from `root`.
pub fn variables(root: &Arc<Node>) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut visited = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !visited.insert(Arc::as_ptr(node)) {
            continue;
        }
        match &**node {
            Node::Sum { lhs, rhs } | Node::Mul { lhs, rhs } => {
                stack.push(lhs);
                stack.push(rhs);
            }
            Node::Var(name) => {
                names.insert(name.clone());
            }
            Node::Const(_) => {}
        }
    }
    names
}
