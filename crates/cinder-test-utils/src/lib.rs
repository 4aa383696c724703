//! Test utilities for Cinder development.
//!
//! Provides buffer [`fixtures`], assertions for the length-first order
//! laws, and a tracing subscriber hook for tests that want to see resize
//! decisions.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use cinder_buffer::{Element, SharedBuffer};

pub use fixtures::{fan_out, ramp, shared_pair};

/// Install a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// Filtering follows `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hash a value with the std default hasher.
pub fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Assert that `a`, `b` and `c` satisfy the total order laws, and that
/// equality and hashing agree with the order.
pub fn assert_order_laws<T>(a: &SharedBuffer<T>, b: &SharedBuffer<T>, c: &SharedBuffer<T>)
where
    T: Element + Ord + Hash + Debug,
{
    for x in [a, b, c] {
        assert_eq!(x.cmp(x), Ordering::Equal, "reflexivity failed for {x:?}");
        assert_eq!(x, x);
    }
    for (x, y) in [(a, b), (b, c), (a, c)] {
        assert_eq!(
            x.cmp(y),
            y.cmp(x).reverse(),
            "antisymmetry failed for {x:?} vs {y:?}"
        );
        assert_eq!(x == y, x.cmp(y) == Ordering::Equal);
        if x == y {
            assert_eq!(hash_of(x), hash_of(y), "equal buffers hashed differently");
        }
        if x.len() != y.len() {
            assert_ne!(x, y, "buffers of different length compared equal");
            assert_eq!(x.cmp(y), x.len().cmp(&y.len()));
        }
    }
    let mut sorted = [a, b, c];
    sorted.sort();
    assert!(sorted[0] <= sorted[2], "transitivity failed for {sorted:?}");
}
