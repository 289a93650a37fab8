//! Wire-level vocabulary: stream header, node tags, and the JSON node table.
use crate::graph::Node;
use serde::{Deserialize, Serialize};

/// First bytes of every binary stream.
pub const MAGIC: [u8; 4] = *b"CGAD";

/// Bumped whenever the record layout changes.
pub const FORMAT_VERSION: u8 = 1;

pub const HEADER_LEN: usize = MAGIC.len() + 1;

/// Discriminator preceding each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Sum = 0,
    Mul = 1,
    Const = 2,
    Var = 3,
}

impl Tag {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Sum { .. } => Tag::Sum,
            Node::Mul { .. } => Tag::Mul,
            Node::Const(_) => Tag::Const,
            Node::Var(_) => Tag::Var,
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            0 => Ok(Tag::Sum),
            1 => Ok(Tag::Mul),
            2 => Ok(Tag::Const),
            3 => Ok(Tag::Var),
            other => Err(other),
        }
    }
}

/// Version of the JSON node table layout.
pub const TABLE_VERSION: u8 = 1;

/// One row of a [`NodeTable`]. Operands are indices of earlier rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeEntry {
    Sum { lhs: usize, rhs: usize },
    Mul { lhs: usize, rhs: usize },
    Const { value: f64 },
    Var { name: String },
}

/// Flat form of a graph, used for JSON export.
///
/// Rows are in dependency order: a row may only reference rows before it, so
/// a table cannot describe a cycle. Each distinct node appears once, which
/// keeps sharing intact and keeps the JSON nesting constant whatever the
/// graph depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTable {
    pub version: u8,
    pub nodes: Vec<NodeEntry>,
    pub root: usize,
}
