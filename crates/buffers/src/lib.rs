//! tablebin-buffers - byte buffer primitives for the tablebin codec.
//!
//! [`GrowBuffer`] accumulates encoder output with block-aligned growth through
//! a caller-supplied [`Allocator`]; [`Reader`] walks decoder input with bounds
//! checks on every read.

mod alloc;
mod error;
mod grow_buffer;
mod reader;

pub use alloc::{Allocator, LimitedAllocator, SystemAllocator};
pub use error::{AllocError, BufferError};
pub use grow_buffer::GrowBuffer;
pub use reader::Reader;
