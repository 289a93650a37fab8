//! Persistence of expression graphs: binary codec, files, and JSON.
pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod json;
pub mod types;

pub use codec::{deserialize, deserialize_with, serialize};
pub use config::DecodeConfig;
pub use error::{CodecError, DecodeReason};
pub use file::{read_from_path, read_from_path_with, write_to_path};
pub use json::{from_json, to_json, to_json_pretty};
