//! Reusable buffer fixtures.
//!
//! - [`ramp`]: a sole-owned buffer holding `1..=len`.
//! - [`shared_pair`]: two handles aliasing one block.
//! - [`fan_out`]: `n` handles aliasing one block.

use cinder_buffer::{Element, SharedBuffer};

/// A sole-owned buffer holding `1, 2, ..., len`.
pub fn ramp(len: u32) -> SharedBuffer<u32> {
    (1..=len).collect()
}

/// Two handles sharing one freshly allocated block holding `values`.
///
/// Both handles report a refcount of two.
pub fn shared_pair<T: Element>(values: &[T]) -> (SharedBuffer<T>, SharedBuffer<T>) {
    let first = SharedBuffer::from_slice(values);
    let second = first.clone();
    (first, second)
}

/// `n` handles sharing one block holding `values`.
///
/// Returns an empty vec when `n` is zero.
pub fn fan_out<T: Element>(values: &[T], n: usize) -> Vec<SharedBuffer<T>> {
    if n == 0 {
        return Vec::new();
    }
    let first = SharedBuffer::from_slice(values);
    let mut handles = Vec::with_capacity(n);
    for _ in 1..n {
        handles.push(first.clone());
    }
    handles.push(first);
    handles
}
