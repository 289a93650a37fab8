//! Defines the error types for the store module.
use std::path::PathBuf;
use thiserror::Error;

/// Why a byte stream was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeReason {
    #[error("not a graph stream (bad magic number)")]
    BadMagic,
    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },
    #[error("unknown node tag {0}")]
    UnknownTag(u8),
    #[error("truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("variable name is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} trailing bytes after the root record")]
    TrailingBytes(usize),
    #[error("nesting deeper than the limit of {0}")]
    DepthLimit(usize),
    #[error("variable name of {len} bytes exceeds the limit of {limit}")]
    NameTooLong { len: u64, limit: usize },
    #[error("row {entry} references row {target}, which does not precede it")]
    DanglingReference { entry: usize, target: usize },
    #[error("root row {root} is outside a table of {len} rows")]
    BadRoot { root: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum CodecError {
    /// Corrupt, truncated, or unrecognized bytes. No graph is produced.
    #[error("Invalid encoding at byte {offset}: {reason}")]
    InvalidEncoding { offset: usize, reason: DecodeReason },
    /// A JSON node table that parses but does not describe a graph.
    #[error("Invalid node table: {0}")]
    InvalidTable(DecodeReason),
    /// A filesystem open/read/write failure.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub fn invalid(offset: usize, reason: DecodeReason) -> Self {
        CodecError::InvalidEncoding { offset, reason }
    }

    /// The decode reason, if this is an encoding or table error.
    pub fn reason(&self) -> Option<&DecodeReason> {
        match self {
            CodecError::InvalidEncoding { reason, .. } | CodecError::InvalidTable(reason) => Some(reason),
            _ => None,
        }
    }
}
