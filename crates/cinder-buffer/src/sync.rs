//! Atomic primitives used for block reference counts.
//!
//! Under `--cfg loom` these resolve to loom's model-checked atomics so the
//! refcount protocol can be explored exhaustively.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{fence, AtomicUsize, Ordering};
#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{fence, AtomicUsize, Ordering};
