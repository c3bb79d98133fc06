use tablebin_buffers::AllocError;
use thiserror::Error;

use crate::HostKind;

/// Error type for encoding. Every variant aborts the whole message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("can't save: unsupported type detected ({0})")]
    UnsupportedType(HostKind),
    #[error("can't save: nesting is too deep (limit {limit})")]
    TooDeep { limit: usize },
    #[error("can't save: allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
    #[error("can't save that many items ({0}, limit 255)")]
    TooManyRoots(usize),
    #[error("can't save: table with {0} entries does not fit the size header")]
    TableTooLarge(usize),
}

impl From<AllocError> for EncodeError {
    fn from(err: AllocError) -> Self {
        EncodeError::AllocationFailure {
            requested: err.requested,
        }
    }
}

/// Error type for decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("corrupt data at byte {offset}")]
    CorruptData { offset: usize },
    #[error("corrupt data: nesting is too deep (limit {limit})")]
    TooDeep { limit: usize },
}
