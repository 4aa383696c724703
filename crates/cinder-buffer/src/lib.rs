//! Reference-counted, copy-on-write resizable buffers.
//!
//! A [`SharedBuffer`] is a cheap-to-clone handle to a storage block: one
//! allocation holding a small header (refcount, element count, capacity)
//! followed by the elements themselves. Handles that share a block see the
//! same elements. Resizing or writing through one handle never changes
//! what its siblings observe.
//!
//! # Architecture
//!
//! ```text
//! SharedBuffer<T> (handle: Option<Block<T>> + allocation limit)
//! └── Block<T> (one counted reference)
//!     └── [Header { refs, count, capacity }][T; capacity]   (single allocation)
//! ```
//!
//! # Resize policy
//!
//! [`SharedBuffer::resize`] takes one of three paths (see [`ResizePath`]):
//!
//! - **Released:** new count is zero; the handle drops its block.
//! - **ShrunkInPlace:** the handle is the sole owner and the count does not
//!   grow; only the header count changes and `data()` stays put.
//! - **Reallocated:** growing, shared, or empty; a fresh block is
//!   allocated and the preserved prefix copied over.
//!
//! # Elements
//!
//! Elements must implement [`Element`]: `Copy` types for which all-zero
//! bytes is a valid value. Blocks are allocated zeroed and moved with byte
//! copies, so no destructors or element-wise constructors ever run.
//!
//! # Safety
//!
//! Raw memory handling is confined to `raw.rs` and `block.rs`. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod block;
pub mod config;
pub mod element;
pub mod error;
pub mod handle;
pub mod ordering;
mod raw;
pub mod resize;
mod sync;

// Public re-exports for the primary API surface.
pub use config::BufferConfig;
pub use element::Element;
pub use error::BufferError;
pub use handle::SharedBuffer;
pub use ordering::{compare, partial_compare};
pub use resize::ResizePath;
