use thiserror::Error;

/// Returned by [`GrowBuffer`](crate::GrowBuffer) when the allocator cannot
/// provide the requested capacity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("allocator could not provide {requested} bytes")]
pub struct AllocError {
    pub requested: usize,
}

/// Error type for bounds-checked reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
}
