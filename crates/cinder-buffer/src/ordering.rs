//! Length-first ordering of buffers against arbitrary sequences.
//!
//! Buffers compare by length first: a shorter sequence always sorts before
//! a longer one. Sequences of equal length compare element by element in
//! index order, and the first differing pair decides. This differs from the
//! lexicographic order of slices, so comparing `buf.as_slice()` directly
//! gives different answers for sequences of different length.
//!
//! [`compare`] and [`partial_compare`] accept any finite sequence of the
//! element type, not only other buffers. The trait impls below (`PartialEq`,
//! `Eq`, `PartialOrd`, `Ord`, `Hash`) are all consistent with this order.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::element::Element;
use crate::handle::SharedBuffer;

/// Walk both sequences once, returning the length-first ordering.
///
/// `None` means some equal-length pair was incomparable under `cmp`.
fn length_first<T, I, F>(lhs: &[T], rhs: I, mut cmp: F) -> Option<Ordering>
where
    I: IntoIterator,
    I::Item: Borrow<T>,
    F: FnMut(&T, &T) -> Option<Ordering>,
{
    let mut left = lhs.iter();
    let mut rhs_len = 0usize;
    let mut first_difference = Some(Ordering::Equal);
    for item in rhs {
        rhs_len += 1;
        if first_difference != Some(Ordering::Equal) {
            continue;
        }
        if let Some(l) = left.next() {
            first_difference = cmp(l, item.borrow());
        }
    }
    match lhs.len().cmp(&rhs_len) {
        Ordering::Equal => first_difference,
        unequal => Some(unequal),
    }
}

/// Total length-first comparison of `buffer` against any finite sequence.
pub fn compare<T, I>(buffer: &SharedBuffer<T>, other: I) -> Ordering
where
    T: Element + Ord,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    length_first(buffer.as_slice(), other, |a, b| Some(a.cmp(b))).unwrap_or(Ordering::Equal)
}

/// Length-first comparison for elements with only a partial order.
///
/// Returns `None` if the lengths match and the first non-equal pair is
/// incomparable (e.g. a NaN).
pub fn partial_compare<T, I>(buffer: &SharedBuffer<T>, other: I) -> Option<Ordering>
where
    T: Element + PartialOrd,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    length_first(buffer.as_slice(), other, |a, b| a.partial_cmp(b))
}

impl<T: Element + PartialEq> PartialEq for SharedBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + Eq> Eq for SharedBuffer<T> {}

impl<T: Element + PartialEq> PartialEq<[T]> for SharedBuffer<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Element + PartialEq> PartialEq<&[T]> for SharedBuffer<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Element + PartialEq, const N: usize> PartialEq<[T; N]> for SharedBuffer<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + PartialEq> PartialEq<Vec<T>> for SharedBuffer<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + PartialOrd> PartialOrd for SharedBuffer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        partial_compare(self, other.as_slice())
    }
}

impl<T: Element + PartialOrd> PartialOrd<[T]> for SharedBuffer<T> {
    fn partial_cmp(&self, other: &[T]) -> Option<Ordering> {
        partial_compare(self, other)
    }
}

impl<T: Element + PartialOrd> PartialOrd<Vec<T>> for SharedBuffer<T> {
    fn partial_cmp(&self, other: &Vec<T>) -> Option<Ordering> {
        partial_compare(self, other)
    }
}

impl<T: Element + Ord> Ord for SharedBuffer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other.as_slice())
    }
}

/// Hashes the length followed by every element, matching `[T]`.
impl<T: Element + Hash> Hash for SharedBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
