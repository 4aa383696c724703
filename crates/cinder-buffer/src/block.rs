//! Reference-counted storage blocks.
//!
//! A [`Block`] is one counted reference to a block allocated by
//! [`raw::allocate`]. It deliberately has no `Drop` impl: owners hand the
//! reference back through [`Block::release`], which frees the memory when
//! the last reference goes.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr::NonNull;
use std::slice;

use crate::element::Element;
use crate::error::{ownership_violation, BufferError};
use crate::raw::{self, Header};
use crate::sync::{fence, Ordering};

/// Refcounts above this are treated as a leak and abort the process.
const MAX_REFCOUNT: usize = isize::MAX as usize;

/// One counted reference to a storage block of `T` elements.
pub(crate) struct Block<T> {
    header: NonNull<Header>,
    _marker: PhantomData<T>,
}

// SAFETY: shared owners only ever read elements, and `&mut` access is only
// granted after observing a refcount of one, the same contract as `Arc<[T]>`.
unsafe impl<T: Send + Sync> Send for Block<T> {}
// SAFETY: as above.
unsafe impl<T: Send + Sync> Sync for Block<T> {}

impl<T: Element> Block<T> {
    /// Allocate a block of `count` zeroed elements.
    ///
    /// `count` must be non-zero: empty buffers hold no block.
    pub(crate) fn allocate(count: usize, limit: usize) -> Result<Self, BufferError> {
        debug_assert!(count > 0, "empty buffers never allocate a block");
        let out_of_memory = BufferError::OutOfMemory {
            requested: count,
            limit,
        };
        if count > limit {
            return Err(out_of_memory);
        }
        let header = raw::allocate::<T>(count).ok_or(out_of_memory)?;
        Ok(Self {
            header,
            _marker: PhantomData,
        })
    }

    fn header(&self) -> &Header {
        // SAFETY: the block stays allocated while this reference is held.
        unsafe { self.header.as_ref() }
    }

    pub(crate) fn count(&self) -> usize {
        self.header().count
    }

    pub(crate) fn ref_count(&self) -> usize {
        self.header().refs.load(Ordering::Acquire)
    }

    /// Whether this is the only reference to the block.
    ///
    /// The `Acquire` load pairs with the `Release` decrement in
    /// [`release`](Self::release), so writes made through references that
    /// have since been released are visible before any mutation.
    pub(crate) fn is_unique(&self) -> bool {
        self.ref_count() == 1
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        self.header == other.header
    }

    pub(crate) fn data(&self) -> NonNull<T> {
        // SAFETY: the block was allocated for `T` and is still live.
        unsafe { raw::elements::<T>(self.header) }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: the first `count` slots are initialised (zeroed at
        // allocation, and all-zero is a valid `T`). Mutable access is only
        // handed out by `as_mut_slice`, which needs `&mut self`.
        unsafe { slice::from_raw_parts(self.data().as_ptr(), self.count()) }
    }

    /// Mutable view of the elements. The caller must be the sole owner.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        if !self.is_unique() {
            ownership_violation("mutable access to a shared block");
        }
        // SAFETY: no other reference to the block exists and `&mut self`
        // excludes aliasing through this one.
        unsafe { slice::from_raw_parts_mut(self.data().as_ptr(), self.count()) }
    }

    /// Overwrite the element count in place.
    ///
    /// Only lowers the count of a block this reference solely owns; the
    /// truncated slots are unreachable afterwards.
    pub(crate) fn set_count(&mut self, count: usize) {
        if !self.is_unique() {
            ownership_violation("in-place count update on a shared block");
        }
        assert!(
            count > 0 && count <= self.count(),
            "in-place count update must shrink to a non-zero count: {} -> {count}",
            self.count(),
        );
        // SAFETY: sole owner, so no other thread can read the header.
        unsafe { (*self.header.as_ptr()).count = count };
    }

    /// Take another counted reference to the same block.
    pub(crate) fn acquire(&self) -> Self {
        let previous = self.header().refs.fetch_add(1, Ordering::Relaxed);
        if previous > MAX_REFCOUNT {
            std::process::abort();
        }
        Self {
            header: self.header,
            _marker: PhantomData,
        }
    }

    /// Give this reference back, freeing the block if it was the last one.
    ///
    /// Returns `true` when the block was freed.
    pub(crate) fn release(self) -> bool {
        if self.header().refs.fetch_sub(1, Ordering::Release) != 1 {
            return false;
        }
        fence(Ordering::Acquire);
        // SAFETY: the refcount just reached zero, so this was the last
        // reference and nothing else can touch the block.
        unsafe { raw::free::<T>(self.header) };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_starts_unique_with_zeroed_elements() {
        let block = Block::<u32>::allocate(3, usize::MAX).unwrap();
        assert_eq!(block.count(), 3);
        assert!(block.is_unique());
        assert_eq!(block.as_slice(), &[0, 0, 0]);
        assert!(block.release());
    }

    #[test]
    fn allocate_respects_limit() {
        let err = Block::<u8>::allocate(9, 8).err().unwrap();
        assert_eq!(
            err,
            BufferError::OutOfMemory {
                requested: 9,
                limit: 8
            }
        );
    }

    #[test]
    fn allocate_reports_layout_overflow_as_oom() {
        let err = Block::<u64>::allocate(usize::MAX / 2, usize::MAX).err().unwrap();
        assert!(matches!(err, BufferError::OutOfMemory { .. }));
    }

    #[test]
    fn acquire_and_release_track_refcount() {
        let block = Block::<u8>::allocate(1, usize::MAX).unwrap();
        let second = block.acquire();
        assert!(block.ptr_eq(&second));
        assert_eq!(block.ref_count(), 2);
        assert!(!second.is_unique());
        assert!(!second.release());
        assert!(block.is_unique());
        assert!(block.release());
    }

    #[test]
    fn set_count_shrinks_without_moving() {
        let mut block = Block::<u16>::allocate(4, usize::MAX).unwrap();
        block.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
        let before = block.data();
        block.set_count(2);
        assert_eq!(block.data(), before);
        assert_eq!(block.as_slice(), &[1, 2]);
        assert!(block.release());
    }

    #[test]
    #[should_panic(expected = "ownership violation")]
    fn set_count_on_shared_block_panics() {
        let mut block = Block::<u16>::allocate(4, usize::MAX).unwrap();
        let _other = block.acquire();
        block.set_count(2);
    }

    #[test]
    #[should_panic(expected = "ownership violation")]
    fn mutable_access_on_shared_block_panics() {
        let mut block = Block::<u16>::allocate(4, usize::MAX).unwrap();
        let _other = block.acquire();
        block.as_mut_slice()[0] = 1;
    }
}
