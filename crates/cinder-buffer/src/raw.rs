//! Low-level primitives for block memory.
//!
//! A block is one allocation laid out as `[Header][T; capacity]`. The
//! header and the elements are allocated and freed together, so a single
//! `dealloc` call releases both. Every function here is `unsafe` at heart;
//! each unsafe block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::ownership_violation;
use crate::sync::{AtomicUsize, Ordering};

/// Bookkeeping stored in front of the elements of every block.
#[repr(C)]
pub(crate) struct Header {
    /// Number of handles referencing the block.
    pub(crate) refs: AtomicUsize,
    /// Number of live elements. Never zero.
    pub(crate) count: usize,
    /// Number of element slots the block was allocated with.
    pub(crate) capacity: usize,
}

/// Byte offset of the first element from the start of the block.
pub(crate) const fn elements_offset<T>() -> usize {
    mem::size_of::<Header>().next_multiple_of(mem::align_of::<T>())
}

/// Layout of a block holding `capacity` elements of `T`.
///
/// Returns `None` when the size overflows `isize::MAX`.
pub(crate) fn layout_for<T>(capacity: usize) -> Option<Layout> {
    let elements = mem::size_of::<T>().checked_mul(capacity)?;
    let size = elements_offset::<T>().checked_add(elements)?;
    let align = mem::align_of::<Header>().max(mem::align_of::<T>());
    Layout::from_size_align(size, align).ok()
}

/// Allocate a block of `capacity` zeroed elements with a refcount of one.
///
/// Returns `None` when the layout overflows or the allocator fails.
pub(crate) fn allocate<T>(capacity: usize) -> Option<NonNull<Header>> {
    let layout = layout_for::<T>(capacity)?;
    // SAFETY: the layout always includes the header, so its size is non-zero.
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    let header = NonNull::new(ptr)?.cast::<Header>();
    // SAFETY: the allocation is fresh and aligned for `Header`.
    unsafe {
        ptr::write(
            header.as_ptr(),
            Header {
                refs: AtomicUsize::new(1),
                count: capacity,
                capacity,
            },
        );
    }
    Some(header)
}

/// Pointer to the first element slot of a block.
///
/// # Safety
///
/// `header` must point at a live block allocated for elements of `T`.
pub(crate) unsafe fn elements<T>(header: NonNull<Header>) -> NonNull<T> {
    // SAFETY: the offset stays inside the allocation made by `allocate::<T>`.
    unsafe { header.cast::<u8>().add(elements_offset::<T>()).cast::<T>() }
}

/// Free a block whose refcount has reached zero.
///
/// Panics with an ownership violation if references remain.
///
/// # Safety
///
/// `header` must point at a live block allocated for elements of `T`, and
/// must not be used after this call.
pub(crate) unsafe fn free<T>(header: NonNull<Header>) {
    // SAFETY: the caller guarantees the block is still allocated.
    let (refs, capacity) = unsafe {
        let h = header.as_ref();
        (h.refs.load(Ordering::Acquire), h.capacity)
    };
    if refs != 0 {
        ownership_violation("released a block that still has live references");
    }
    let Some(layout) = layout_for::<T>(capacity) else {
        ownership_violation("block header no longer describes its allocation");
    };
    // SAFETY: same pointer and layout as the original allocation; elements
    // are `Copy` so only the header needs dropping.
    unsafe {
        ptr::drop_in_place(header.as_ptr());
        alloc::dealloc(header.as_ptr().cast::<u8>(), layout);
    }
}
