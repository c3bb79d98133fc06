//! tablebin - compact binary codec for nil/boolean/number/string/table tuples.
//!
//! A message is a one-byte value count followed by that many tagged values.
//! Numbers and length fields use host-native width and byte order: the format
//! is meant for saving and restoring values on the same host, not for
//! interchange.
//!
//! ```
//! use tablebin::{decode, encode, Table, Value};
//!
//! let mut config = Table::new();
//! config.insert("name", "demo");
//! config.insert("retries", 3);
//!
//! let values = vec![Value::Bool(true), Value::Table(config)];
//! let bytes = encode(&values).unwrap();
//! let (back, used) = decode(&bytes).unwrap();
//! assert_eq!(back, values);
//! assert_eq!(used, bytes.len());
//! ```

pub mod constants;
pub mod decoder;
pub mod encoder;
mod error;
mod json;
mod options;
mod value;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, EncodeError};
pub use options::CodecOptions;
pub use value::{HostKind, Table, Value};

pub use tablebin_buffers::{
    AllocError, Allocator, BufferError, GrowBuffer, LimitedAllocator, Reader, SystemAllocator,
};

/// Encodes a tuple with the global allocator and default options.
pub fn encode(values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(values)
}

/// Encodes a tuple, growing the output through `alloc`.
pub fn encode_with_allocator<A: Allocator>(
    values: &[Value],
    alloc: A,
) -> Result<Vec<u8>, EncodeError> {
    Encoder::with_allocator(alloc).encode(values)
}

/// Decodes a tuple, returning it with the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(Vec<Value>, usize), DecodeError> {
    Decoder::new().decode(bytes)
}
