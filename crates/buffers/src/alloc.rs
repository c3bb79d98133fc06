//! Reallocation contract used by [`GrowBuffer`](crate::GrowBuffer).
//!
//! A single entry point covers the three cases a buffer needs:
//!
//! - `block == None`: fresh allocation of `new_size` bytes.
//! - `new_size == 0`: release `block`; the result is always `None`.
//! - otherwise: resize `block`, preserving its first `min(old_size, new_size)`
//!   bytes.
//!
//! Returning `None` for a non-zero request signals failure. The block handed in
//! is consumed in every case, so a failed resize loses the previous contents.

/// Allocator capability handed to a buffer at construction.
pub trait Allocator {
    fn reallocate(
        &mut self,
        block: Option<Box<[u8]>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<Box<[u8]>>;
}

impl<F> Allocator for F
where
    F: FnMut(Option<Box<[u8]>>, usize, usize) -> Option<Box<[u8]>>,
{
    #[inline]
    fn reallocate(
        &mut self,
        block: Option<Box<[u8]>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<Box<[u8]>> {
        self(block, old_size, new_size)
    }
}

/// Allocator backed by the global heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn reallocate(
        &mut self,
        block: Option<Box<[u8]>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<Box<[u8]>> {
        if new_size == 0 {
            return None;
        }
        let mut data = block.map(Vec::from).unwrap_or_default();
        data.truncate(old_size.min(new_size));
        data.resize(new_size, 0);
        Some(data.into_boxed_slice())
    }
}

/// Wraps another allocator and refuses any request above `limit` bytes.
///
/// Releases are always forwarded.
#[derive(Debug, Clone)]
pub struct LimitedAllocator<A = SystemAllocator> {
    inner: A,
    limit: usize,
}

impl LimitedAllocator<SystemAllocator> {
    pub fn new(limit: usize) -> Self {
        Self::wrap(SystemAllocator, limit)
    }
}

impl<A: Allocator> LimitedAllocator<A> {
    pub fn wrap(inner: A, limit: usize) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<A: Allocator> Allocator for LimitedAllocator<A> {
    fn reallocate(
        &mut self,
        block: Option<Box<[u8]>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<Box<[u8]>> {
        if new_size > self.limit {
            // Hand the block back to the inner allocator for release.
            if block.is_some() {
                self.inner.reallocate(block, old_size, 0);
            }
            return None;
        }
        self.inner.reallocate(block, old_size, new_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_fresh_block_is_zeroed() {
        let block = SystemAllocator.reallocate(None, 0, 16).unwrap();
        assert_eq!(block.len(), 16);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn system_allocator_resize_preserves_prefix() {
        let mut block = SystemAllocator.reallocate(None, 0, 4).unwrap();
        block.copy_from_slice(&[1, 2, 3, 4]);
        let grown = SystemAllocator.reallocate(Some(block), 4, 8).unwrap();
        assert_eq!(&grown[..], &[1, 2, 3, 4, 0, 0, 0, 0]);
        let shrunk = SystemAllocator.reallocate(Some(grown), 8, 2).unwrap();
        assert_eq!(&shrunk[..], &[1, 2]);
    }

    #[test]
    fn system_allocator_release_returns_none() {
        let block = SystemAllocator.reallocate(None, 0, 4);
        assert!(SystemAllocator.reallocate(block, 4, 0).is_none());
    }

    #[test]
    fn limited_allocator_refuses_oversized_requests() {
        let mut alloc = LimitedAllocator::new(8);
        let block = alloc.reallocate(None, 0, 8);
        assert!(block.is_some());
        assert!(alloc.reallocate(block, 8, 9).is_none());
    }

    #[test]
    fn closures_are_allocators() {
        let mut calls = Vec::new();
        let mut alloc = |block: Option<Box<[u8]>>, old: usize, new: usize| {
            calls.push((old, new));
            SystemAllocator.reallocate(block, old, new)
        };
        let block = alloc.reallocate(None, 0, 4);
        alloc.reallocate(block, 4, 0);
        assert_eq!(calls, vec![(0, 4), (4, 0)]);
    }
}
