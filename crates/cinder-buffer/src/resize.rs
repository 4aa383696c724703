//! The resize policy.
//!
//! A resize picks exactly one of three paths from the requested count, the
//! current count, and whether the handle solely owns its block:
//!
//! - [`ResizePath::Released`]: the new count is zero. The handle drops its
//!   reference and becomes empty.
//! - [`ResizePath::ShrunkInPlace`]: the handle is the sole owner and the
//!   new count does not exceed the current one. Only the header's count is
//!   rewritten; nothing moves.
//! - [`ResizePath::Reallocated`]: anything else (growing, a shared block,
//!   or an empty handle). A fresh block is allocated, the preserved prefix
//!   copied over, and the old reference released.
//!
//! Shrinking in place is unobservable to other owners because there are
//! none. A shared block is never mutated, so sibling handles keep their
//! count and contents.

use tracing::{debug, trace};

use crate::block::Block;
use crate::element::Element;
use crate::error::BufferError;
use crate::handle::SharedBuffer;

/// Which branch of the resize policy a call took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizePath {
    /// The handle released its block and is now empty.
    Released,
    /// The header count was lowered in place; storage did not move.
    ShrunkInPlace,
    /// The handle was rebound to a newly allocated block.
    Reallocated,
}

impl ResizePath {
    /// Decide the path for resizing a handle.
    ///
    /// `current` is the handle's element count (zero when empty) and
    /// `unique` whether it solely owns its block.
    pub fn decide(current: usize, unique: bool, requested: usize) -> Self {
        if requested == 0 {
            Self::Released
        } else if current > 0 && unique && requested <= current {
            Self::ShrunkInPlace
        } else {
            Self::Reallocated
        }
    }
}

impl<T: Element> SharedBuffer<T> {
    /// Resize to `count` elements.
    ///
    /// With `preserve` set, the first `min(len(), count)` elements keep
    /// their values. Slots not copied from the old block read as zero.
    ///
    /// On error the handle is left untouched.
    pub fn resize(&mut self, count: usize, preserve: bool) -> Result<ResizePath, BufferError> {
        let current = self.len();
        let path = ResizePath::decide(current, self.is_unique(), count);
        match path {
            ResizePath::Released => self.clear(),
            ResizePath::ShrunkInPlace => {
                if let Some(block) = self.block.as_mut() {
                    block.set_count(count);
                }
            }
            ResizePath::Reallocated => self.reallocate(count, preserve)?,
        }
        trace!(?path, current, count, preserve, "resized shared buffer");
        Ok(path)
    }

    /// Resize to `count` elements, writing `value` into every slot past the
    /// previous length.
    ///
    /// Existing elements are preserved. Follows the same path selection as
    /// [`resize`](Self::resize).
    pub fn resize_fill(&mut self, count: usize, value: T) -> Result<ResizePath, BufferError> {
        let current = self.len();
        let path = self.resize(count, true)?;
        if count > current {
            if let Some(block) = self.block.as_mut() {
                block.as_mut_slice()[current..].fill(value);
            }
        }
        Ok(path)
    }

    fn reallocate(&mut self, count: usize, preserve: bool) -> Result<(), BufferError> {
        let mut fresh = Block::allocate(count, self.limit).inspect_err(|err| {
            debug!(requested = count, limit = self.limit, %err, "block allocation refused");
        })?;
        if preserve {
            if let Some(old) = self.block.as_ref() {
                let kept = old.count().min(count);
                fresh.as_mut_slice()[..kept].copy_from_slice(&old.as_slice()[..kept]);
            }
        }
        if let Some(old) = self.block.replace(fresh) {
            old.release();
        }
        Ok(())
    }
}
