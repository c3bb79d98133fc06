//! Codec configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BLOCK_SIZE, MAX_NESTING};

/// Tunables shared by [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).
///
/// Deserializes from the embedding layer's configuration; missing fields take
/// their defaults.
///
/// ```
/// use tablebin::CodecOptions;
///
/// let options = CodecOptions::from_json_str(r#"{"max_nesting": 16}"#).unwrap();
/// assert_eq!(options.max_nesting, 16);
/// assert_eq!(options.block_size.get(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Growth granularity of the encoder buffer, in bytes.
    pub block_size: NonZeroUsize,
    /// Deepest accepted table nesting.
    pub max_nesting: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            block_size: NonZeroUsize::new(DEFAULT_BLOCK_SIZE).unwrap_or(NonZeroUsize::MIN),
            max_nesting: MAX_NESTING,
        }
    }
}

impl CodecOptions {
    pub fn block_size(mut self, block_size: NonZeroUsize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
