//! Reading and writing encoded graphs on the filesystem.
use super::codec::{deserialize_with, serialize};
use super::config::DecodeConfig;
use super::error::CodecError;
use crate::graph::Graph;
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Writes the binary encoding of `graph` to `path`, creating or truncating it.
///
/// Every graph can be written. Reading is capped by `DecodeConfig::max_depth`
/// (4096 by default): a graph deeper than the reader's cap is rejected with
/// `DepthLimit` and must be read with [`read_from_path_with`] and a raised limit.
///
/// The file handle is closed on every exit path. No retry on failure.
pub fn write_to_path(graph: &Graph, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let io_err = |source| CodecError::Io { path: path.to_path_buf(), source };

    let bytes = serialize(graph);
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(&bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_from_path(path: impl AsRef<Path>) -> Result<Graph, CodecError> {
    read_from_path_with(path, &DecodeConfig::default())
}

/// Reads and decodes a graph written by [`write_to_path`].
pub fn read_from_path_with(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<Graph, CodecError> {
    let path = path.as_ref();
    let io_err = |source| CodecError::Io { path: path.to_path_buf(), source };

    let mut bytes = Vec::new();
    File::open(path).map_err(io_err)?.read_to_end(&mut bytes).map_err(io_err)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    deserialize_with(&bytes, config)
}
