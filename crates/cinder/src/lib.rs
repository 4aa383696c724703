//! Cinder: reference-counted, copy-on-write resizable buffers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Cinder sub-crates. For most users, adding `cinder` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cinder::prelude::*;
//!
//! let mut a = SharedBuffer::from_slice(&[1u32, 2, 3, 4]);
//! let b = a.clone();
//! assert!(a.ptr_eq(&b));
//!
//! // Shared, so shrinking copies instead of touching `b`.
//! assert_eq!(a.resize(2, true).unwrap(), ResizePath::Reallocated);
//! assert_eq!(a, [1, 2]);
//! assert_eq!(b, [1, 2, 3, 4]);
//!
//! // Now the sole owner: shrinking rewrites the count in place.
//! let before = a.data();
//! assert_eq!(a.resize(1, true).unwrap(), ResizePath::ShrunkInPlace);
//! assert_eq!(a.data(), before);
//!
//! // Length decides first.
//! assert!(a < b);
//! assert_eq!(compare(&b, [9u32, 9, 9]), std::cmp::Ordering::Greater);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`buffer`] | `cinder-buffer` | `SharedBuffer`, resize policy, ordering |
//! | [`types`] | `cinder-core` | Error kinds and diagnostics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Shared buffers and their resize policy (`cinder-buffer`).
///
/// Most users only need [`buffer::SharedBuffer`]; it is also in the
/// [`prelude`].
pub use cinder_buffer as buffer;

/// Error kinds and structured diagnostics (`cinder-core`).
pub use cinder_core as types;

/// Common imports for typical Cinder usage.
///
/// ```rust
/// use cinder::prelude::*;
/// ```
pub mod prelude {
    // Buffers
    pub use cinder_buffer::{compare, partial_compare, Element, ResizePath, SharedBuffer};

    // Configuration
    pub use cinder_buffer::BufferConfig;

    // Errors
    pub use cinder_buffer::BufferError;
    pub use cinder_core::{Diagnostic, ErrorKind};
}
