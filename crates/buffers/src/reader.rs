//! Bounds-checked binary reader with cursor tracking.

use crate::BufferError;

/// A read-only cursor over a borrowed byte slice.
///
/// Fixed-width values are read in host-native byte order. Every read checks the
/// remaining length first; a failed read leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use tablebin_buffers::{BufferError, Reader};
///
/// let data = [0x01, 0x02];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8(), Ok(0x01));
/// assert_eq!(reader.try_i32(), Err(BufferError::EndOfBuffer));
/// assert_eq!(reader.size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.uint8 = uint8;
        self.x = 0;
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Returns the number of remaining bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(bytes)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a native-endian signed 32-bit integer.
    #[inline]
    pub fn try_i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_ne_bytes)
    }

    /// Reads a native-endian pointer-width unsigned integer.
    #[inline]
    pub fn try_usize(&mut self) -> Result<usize, BufferError> {
        self.array().map(usize::from_ne_bytes)
    }

    /// Reads a native-endian 64-bit float.
    #[inline]
    pub fn try_f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_ne_bytes)
    }

    /// Returns exactly `size` bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }
}
