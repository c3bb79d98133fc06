//! Append-only byte buffer with block-aligned growth and in-place backpatching.

use std::num::NonZeroUsize;

use crate::{AllocError, Allocator, SystemAllocator};

/// A byte buffer that grows in `block_size` increments through an
/// [`Allocator`].
///
/// The logical length (`end`) is tracked separately from the physical capacity
/// (`buf_size`). Capacity only grows until the buffer is destroyed.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use tablebin_buffers::{GrowBuffer, SystemAllocator};
///
/// let mut buffer = GrowBuffer::new(SystemAllocator, NonZeroUsize::new(16).unwrap());
/// buffer.write(b"T\0\0\0\0").unwrap();
/// buffer.overwrite(1, &[7, 0, 0, 0]).unwrap();
/// assert_eq!(buffer.view(), b"T\x07\0\0\0");
/// assert_eq!(buffer.capacity(), 16);
/// ```
pub struct GrowBuffer<A: Allocator = SystemAllocator> {
    alloc: A,
    block_size: NonZeroUsize,
    buffer: Option<Box<[u8]>>,
    buf_size: usize,
    end: usize,
}

impl<A: Allocator> GrowBuffer<A> {
    /// Creates an empty buffer. Nothing is allocated until the first write.
    pub fn new(alloc: A, block_size: NonZeroUsize) -> Self {
        Self {
            alloc,
            block_size,
            buffer: None,
            buf_size: 0,
            end: 0,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Bytes currently reserved from the allocator.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf_size
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size.get()
    }

    /// Ensures there is room for `delta` more bytes past the current end.
    ///
    /// New capacity is `end + delta` rounded up to the next block boundary.
    /// If the allocator fails, the buffer is left empty with no storage.
    pub fn grow(&mut self, delta: usize) -> Result<(), AllocError> {
        let required = self
            .end
            .checked_add(delta)
            .ok_or(AllocError {
                requested: usize::MAX,
            })?;
        if required <= self.buf_size {
            return Ok(());
        }

        let block = self.block_size.get();
        let new_size = match required % block {
            0 => Some(required),
            remainder => required.checked_add(block - remainder),
        }
        .ok_or(AllocError {
            requested: usize::MAX,
        })?;

        tracing::trace!(
            end = self.end,
            delta,
            from = self.buf_size,
            to = new_size,
            "growing buffer"
        );

        let old = self.buffer.take();
        match self.alloc.reallocate(old, self.buf_size, new_size) {
            Some(block) if block.len() >= new_size => {
                self.buffer = Some(block);
                self.buf_size = new_size;
                Ok(())
            }
            Some(short) => {
                tracing::debug!(
                    requested = new_size,
                    returned = short.len(),
                    "allocator returned a short block"
                );
                let len = short.len();
                self.alloc.reallocate(Some(short), len, 0);
                self.fail(new_size)
            }
            None => {
                tracing::debug!(requested = new_size, "buffer allocation failed");
                self.fail(new_size)
            }
        }
    }

    fn fail(&mut self, requested: usize) -> Result<(), AllocError> {
        self.buf_size = 0;
        self.end = 0;
        Err(AllocError { requested })
    }

    /// Appends `bytes` at the current end.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.grow(bytes.len())?;
        let end = self.end;
        self.storage_mut()[end..end + bytes.len()].copy_from_slice(bytes);
        self.end += bytes.len();
        Ok(())
    }

    /// Writes `bytes` starting at `offset`.
    ///
    /// An `offset` past the end is clamped to the end, so no gaps are ever
    /// created. Writing past the end extends the buffer.
    pub fn overwrite(&mut self, offset: usize, bytes: &[u8]) -> Result<(), AllocError> {
        let offset = offset.min(self.end);
        let stop = offset + bytes.len();
        if stop > self.end {
            self.grow(stop - self.end)?;
            self.end = stop;
        }
        self.storage_mut()[offset..stop].copy_from_slice(bytes);
        Ok(())
    }

    /// Bytes `[0, end)`.
    #[inline]
    pub fn view(&self) -> &[u8] {
        match &self.buffer {
            Some(block) => &block[..self.end],
            None => &[],
        }
    }

    /// Owned copy of [`view`](Self::view).
    pub fn to_vec(&self) -> Vec<u8> {
        self.view().to_vec()
    }

    /// Drops the written bytes but keeps the reserved capacity.
    pub fn clear(&mut self) {
        self.end = 0;
    }

    /// Returns the storage to the allocator. Safe to call more than once.
    pub fn destroy(&mut self) {
        if let Some(block) = self.buffer.take() {
            tracing::trace!(size = self.buf_size, "releasing buffer");
            self.alloc.reallocate(Some(block), self.buf_size, 0);
        }
        self.buf_size = 0;
        self.end = 0;
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        match &mut self.buffer {
            Some(block) => &mut block[..],
            None => &mut [],
        }
    }
}

impl<A: Allocator> Drop for GrowBuffer<A> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<A: Allocator> std::fmt::Debug for GrowBuffer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowBuffer")
            .field("block_size", &self.block_size)
            .field("buf_size", &self.buf_size)
            .field("end", &self.end)
            .finish()
    }
}
