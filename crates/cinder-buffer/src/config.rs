//! Buffer configuration parameters.

use crate::error::BufferError;

/// Configuration for a shared buffer handle.
///
/// Controls the allocation ceiling enforced on every block the handle
/// creates. Clones of a handle inherit its configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Largest element count any block of the buffer may hold.
    ///
    /// Default: `usize::MAX`, meaning allocations are bounded only by the
    /// platform's maximum layout size. Must be non-zero.
    pub max_count: usize,
}

impl BufferConfig {
    /// Default maximum element count.
    pub const DEFAULT_MAX_COUNT: usize = usize::MAX;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            max_count: Self::DEFAULT_MAX_COUNT,
        }
    }

    /// Create a config capping blocks at `max_count` elements.
    pub fn with_max_count(max_count: usize) -> Self {
        Self { max_count }
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.max_count == 0 {
            return Err(BufferError::InvalidConfig {
                reason: "max_count must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new()
    }
}
