//! The element capability required by shared buffers.

#![allow(unsafe_code)]

/// A value that may be stored in a [`SharedBuffer`](crate::SharedBuffer).
///
/// Blocks move elements with raw byte copies and never run destructors, so
/// elements must be `Copy`. Slots that are allocated but not written by a
/// resize are observed as all-zero bytes.
///
/// # Safety
///
/// Implementors must guarantee that the all-zero bit pattern is a valid
/// value of the type.
pub unsafe trait Element: Copy + 'static {}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: zero is a valid value of every primitive listed here.
            unsafe impl Element for $ty {}
        )*
    };
}

impl_element!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, (),
);

// SAFETY: an array of zeroed elements is a zeroed array.
unsafe impl<T: Element, const N: usize> Element for [T; N] {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_element<T: Element>() {}

    #[test]
    fn primitives_and_arrays_are_elements() {
        assert_element::<u8>();
        assert_element::<f64>();
        assert_element::<char>();
        assert_element::<bool>();
        assert_element::<()>();
        assert_element::<[u16; 4]>();
        assert_element::<[[f32; 3]; 3]>();
    }
}
