//! Crate-level error, for callers that mix evaluation and persistence.
use crate::computation::EvalError;
use crate::store::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, Error>;
