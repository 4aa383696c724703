//! Shared buffer handles.
//!
//! A [`SharedBuffer`] is a cloneable handle to a storage block. Cloning
//! shares the block and bumps its refcount; no element data is copied until
//! a handle needs a private copy to resize or write.

#![allow(unsafe_code)]

use std::fmt;
use std::ops::Deref;
use std::ptr;
use std::slice;

use crate::block::Block;
use crate::config::BufferConfig;
use crate::element::Element;
use crate::error::BufferError;

/// A reference-counted, resizable array of [`Element`]s.
///
/// Handles are cheap to clone: every clone references the same storage
/// block. Reads go straight to the shared storage. Writes and resizes
/// either mutate in place, when this handle is the block's only owner, or
/// move this handle onto a fresh block so sibling handles keep their view.
///
/// An empty buffer holds no block at all, so [`data`](Self::data) is null
/// and [`ref_count`](Self::ref_count) is zero.
///
/// # Concurrency
///
/// Reference counts are atomic, so handles may be cloned, read and dropped
/// from any number of threads. Resizing and writing take `&mut self`, which
/// gives each handle a single writer. A sibling handle on another thread
/// can only release its reference while this one checks for sole
/// ownership, never add one, so a positive check stays valid.
pub struct SharedBuffer<T: Element> {
    pub(crate) block: Option<Block<T>>,
    pub(crate) limit: usize,
}

impl<T: Element> SharedBuffer<T> {
    /// Create an empty buffer with the default configuration.
    pub fn new() -> Self {
        Self {
            block: None,
            limit: BufferConfig::DEFAULT_MAX_COUNT,
        }
    }

    /// Create an empty buffer whose allocations obey `config`.
    pub fn with_config(config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self {
            block: None,
            limit: config.max_count,
        })
    }

    /// Create a buffer of `count` zero-valued elements.
    pub fn try_with_count(count: usize) -> Result<Self, BufferError> {
        let mut buffer = Self::new();
        buffer.resize(count, false)?;
        Ok(buffer)
    }

    /// Create a buffer of `count` zero-valued elements.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn with_count(count: usize) -> Self {
        expect_alloc(Self::try_with_count(count))
    }

    /// Create a buffer of `count` copies of `value`.
    pub fn try_filled(count: usize, value: T) -> Result<Self, BufferError> {
        let mut buffer = Self::new();
        buffer.resize_fill(count, value)?;
        Ok(buffer)
    }

    /// Create a buffer of `count` copies of `value`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn filled(count: usize, value: T) -> Self {
        expect_alloc(Self::try_filled(count, value))
    }

    /// Create a buffer holding a copy of `values`.
    pub fn try_from_slice(values: &[T]) -> Result<Self, BufferError> {
        let mut buffer = Self::try_with_count(values.len())?;
        if let Some(block) = buffer.block.as_mut() {
            block.as_mut_slice().copy_from_slice(values);
        }
        Ok(buffer)
    }

    /// Create a buffer holding a copy of `values`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn from_slice(values: &[T]) -> Self {
        expect_alloc(Self::try_from_slice(values))
    }

    /// Number of live elements; zero for an empty buffer.
    pub fn len(&self) -> usize {
        self.block.as_ref().map_or(0, Block::count)
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    /// Pointer to the first element, or null for an empty buffer.
    pub fn data(&self) -> *const T {
        self.block
            .as_ref()
            .map_or(ptr::null(), |block| block.data().as_ptr().cast_const())
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        match &self.block {
            Some(block) => block.as_slice(),
            None => &[],
        }
    }

    /// Iterate over the elements in index order.
    ///
    /// Each call starts a fresh pass; an empty buffer yields nothing.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Checked element access.
    ///
    /// Returns [`BufferError::IndexOutOfRange`] for `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T, BufferError> {
        self.as_slice()
            .get(index)
            .ok_or(BufferError::IndexOutOfRange {
                index,
                count: self.len(),
            })
    }

    /// Unchecked element access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len). Anything else is
    /// undefined behaviour.
    pub unsafe fn at_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len(), "at_unchecked index {index} out of range");
        // SAFETY: the caller guarantees `index < len()`.
        unsafe { self.as_slice().get_unchecked(index) }
    }

    /// Number of handles sharing this buffer's block; zero when empty.
    pub fn ref_count(&self) -> usize {
        self.block.as_ref().map_or(0, Block::ref_count)
    }

    /// Whether this handle is the sole owner of a block.
    pub fn is_unique(&self) -> bool {
        self.block.as_ref().is_some_and(Block::is_unique)
    }

    /// Whether both handles reference the same block.
    ///
    /// Empty handles reference no block and never compare as aliases.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.block, &other.block) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The largest element count this handle will allocate.
    pub fn max_count(&self) -> usize {
        self.limit
    }

    /// Mutable access to the elements, if no other handle shares them.
    ///
    /// Returns `None` while the block is shared. An empty buffer yields an
    /// empty slice.
    pub fn get_mut(&mut self) -> Option<&mut [T]> {
        match self.block.as_mut() {
            None => Some(Default::default()),
            Some(block) if block.is_unique() => Some(block.as_mut_slice()),
            Some(_) => None,
        }
    }

    /// Mutable access to the elements, copying them first if shared.
    ///
    /// After this call the handle is the sole owner of its block, so
    /// writes are never visible through sibling handles.
    pub fn make_mut(&mut self) -> Result<&mut [T], BufferError> {
        if self.block.is_some() && !self.is_unique() {
            self.resize(self.len(), true)?;
        }
        let elements: &mut [T] = match self.block.as_mut() {
            Some(block) => block.as_mut_slice(),
            None => &mut [],
        };
        Ok(elements)
    }

    /// Drop this handle's reference, leaving it empty.
    pub fn clear(&mut self) {
        if let Some(block) = self.block.take() {
            block.release();
        }
    }
}

fn expect_alloc<T>(result: Result<T, BufferError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

impl<T: Element> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            block: self.block.as_ref().map(Block::acquire),
            limit: self.limit,
        }
    }
}

impl<T: Element> Drop for SharedBuffer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Element> Default for SharedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Deref for SharedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element> AsRef<[T]> for SharedBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for SharedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T: Element> IntoIterator for &'a SharedBuffer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<T: Element> From<&[T]> for SharedBuffer<T> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for SharedBuffer<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_slice(&values)
    }
}

/// Iterators with an exact `size_hint` are written straight into a fresh
/// block. Anything else is collected into a `Vec` first.
impl<T: Element> FromIterator<T> for SharedBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut iter = iter.into_iter();
        let exact = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => lower,
            _ => {
                let values: Vec<T> = iter.collect();
                return Self::from_slice(&values);
            }
        };

        let mut buffer = Self::with_count(exact);
        let mut written = 0;
        if let Some(elements) = buffer.get_mut() {
            for (slot, value) in elements.iter_mut().zip(iter.by_ref()) {
                *slot = value;
                written += 1;
            }
        }
        // The hint was wrong: drop unwritten slots, append any overflow.
        let overflow: Vec<T> = iter.collect();
        if written < exact {
            expect_alloc(buffer.resize(written, true));
        }
        if !overflow.is_empty() {
            expect_alloc(buffer.resize(written + overflow.len(), true));
            if let Some(elements) = buffer.get_mut() {
                elements[written..].copy_from_slice(&overflow);
            }
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_round_trip() {
        for n in [0usize, 1, 2, 17, 256] {
            let buffer = SharedBuffer::<u32>::with_count(n);
            assert_eq!(buffer.len(), n);
            assert_eq!(buffer.iter().count(), n);
            assert_eq!(buffer.data().is_null(), n == 0);
        }
    }

    #[test]
    fn new_slots_are_zero() {
        let buffer = SharedBuffer::<f32>::with_count(4);
        assert_eq!(buffer.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn empty_handle_has_no_block() {
        let buffer = SharedBuffer::<u8>::new();
        assert!(buffer.is_empty());
        assert!(buffer.data().is_null());
        assert_eq!(buffer.ref_count(), 0);
        assert!(!buffer.is_unique());
        assert!(!buffer.ptr_eq(&buffer.clone()));
        assert_eq!(buffer.iter().next(), None);
    }

    #[test]
    fn clone_shares_block() {
        let a = SharedBuffer::from_slice(&[1u8, 2, 3]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.data(), b.data());
        assert_eq!(a.ref_count(), 2);
        drop(b);
        assert_eq!(a.ref_count(), 1);
        assert!(a.is_unique());
    }

    #[test]
    fn checked_access() {
        let buffer = SharedBuffer::from_slice(&[10u16, 20, 30]);
        assert_eq!(buffer.at(1), Ok(&20));
        assert_eq!(
            buffer.at(3),
            Err(BufferError::IndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(
            SharedBuffer::<u16>::new().at(0),
            Err(BufferError::IndexOutOfRange { index: 0, count: 0 })
        );
    }

    #[test]
    fn unchecked_access_in_range() {
        let buffer = SharedBuffer::from_slice(&[5i64, 6]);
        // SAFETY: both indices are below len() == 2.
        unsafe {
            assert_eq!(*buffer.at_unchecked(0), 5);
            assert_eq!(*buffer.at_unchecked(1), 6);
        }
    }

    #[test]
    fn indexing_goes_through_slice() {
        let buffer = SharedBuffer::from([1u8, 2, 3]);
        assert_eq!(buffer[2], 3);
        assert_eq!(&buffer[..2], &[1, 2]);
    }

    #[test]
    fn iteration_is_restartable() {
        let buffer: SharedBuffer<u32> = (1..=4).collect();
        let first: Vec<u32> = buffer.iter().copied().collect();
        let second: Vec<u32> = (&buffer).into_iter().copied().collect();
        assert_eq!(first, vec![1, 2, 3, 4]);
        assert_eq!(first, second);
    }

    /// Reports an exact `size_hint` of `claimed` but yields `actual` items.
    struct MisreportedLen {
        next: u32,
        actual: u32,
        claimed: usize,
    }

    impl Iterator for MisreportedLen {
        type Item = u32;

        fn next(&mut self) -> Option<u32> {
            (self.next < self.actual).then(|| {
                self.next += 1;
                self.next
            })
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (self.claimed, Some(self.claimed))
        }
    }

    #[test]
    fn collect_with_exact_hint_fills_block_directly() {
        let buffer: SharedBuffer<u32> = (0..5).map(|v| v * 2).collect();
        assert_eq!(buffer.as_slice(), &[0, 2, 4, 6, 8]);
        assert!(buffer.is_unique());

        let filtered: SharedBuffer<u32> = (0..10).filter(|v| v % 3 == 0).collect();
        assert_eq!(filtered.as_slice(), &[0, 3, 6, 9]);

        let empty: SharedBuffer<u32> = std::iter::empty().collect();
        assert!(empty.is_empty());
    }

    #[test]
    fn collect_survives_a_wrong_size_hint() {
        let short: SharedBuffer<u32> = MisreportedLen {
            next: 0,
            actual: 2,
            claimed: 5,
        }
        .collect();
        assert_eq!(short.as_slice(), &[1, 2]);

        let long: SharedBuffer<u32> = MisreportedLen {
            next: 0,
            actual: 4,
            claimed: 1,
        }
        .collect();
        assert_eq!(long.as_slice(), &[1, 2, 3, 4]);

        let none: SharedBuffer<u32> = MisreportedLen {
            next: 0,
            actual: 0,
            claimed: 3,
        }
        .collect();
        assert!(none.is_empty());
    }

    #[test]
    fn get_mut_only_when_unique() {
        let mut a = SharedBuffer::from_slice(&[1u8, 2]);
        a.get_mut().unwrap()[0] = 9;
        let b = a.clone();
        assert!(a.get_mut().is_none());
        drop(b);
        assert_eq!(a.get_mut().unwrap(), &mut [9, 2]);
    }

    #[test]
    fn make_mut_detaches_shared_handle() {
        let mut a = SharedBuffer::from_slice(&[1u8, 2, 3]);
        let b = a.clone();
        a.make_mut().unwrap()[1] = 7;
        assert_eq!(a.as_slice(), &[1, 7, 3]);
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert!(!a.ptr_eq(&b));
        assert!(a.is_unique() && b.is_unique());
    }

    #[test]
    fn make_mut_on_unique_handle_keeps_block() {
        let mut a = SharedBuffer::from_slice(&[4u32, 5]);
        let before = a.data();
        a.make_mut().unwrap()[0] = 0;
        assert_eq!(a.data(), before);
        assert_eq!(a.as_slice(), &[0, 5]);
    }

    #[test]
    fn config_limit_is_enforced_and_inherited() {
        let config = BufferConfig::with_max_count(4);
        let mut a = SharedBuffer::<u8>::with_config(config).unwrap();
        a.resize(4, false).unwrap();
        let mut b = a.clone();
        assert_eq!(b.max_count(), 4);
        assert_eq!(
            b.resize(5, true),
            Err(BufferError::OutOfMemory {
                requested: 5,
                limit: 4
            })
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = SharedBuffer::<u8>::with_config(BufferConfig::with_max_count(0))
            .err()
            .unwrap();
        assert!(matches!(err, BufferError::InvalidConfig { .. }));
    }

    #[test]
    #[should_panic(expected = "out of memory")]
    fn infallible_constructor_panics_on_overflow() {
        let _ = SharedBuffer::<u64>::with_count(usize::MAX);
    }

    #[test]
    fn debug_lists_elements() {
        let buffer = SharedBuffer::from_slice(&[1u8, 2]);
        assert_eq!(format!("{buffer:?}"), "[1, 2]");
    }

    #[test]
    fn handles_are_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<SharedBuffer<u64>>();
    }
}
