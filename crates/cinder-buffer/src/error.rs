//! Buffer-specific error types.

use cinder_core::{Diagnostic, ErrorKind};

/// Errors that can occur during buffer operations.
///
/// Every variant is recoverable: the handle an operation was called on is
/// left exactly as it was. Broken refcount bookkeeping is not reported
/// here; it panics with an [`ErrorKind::OwnershipViolation`] diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A block of the requested size could not be allocated.
    #[error("out of memory: requested {requested} elements, limit {limit}")]
    OutOfMemory {
        /// Number of elements requested.
        requested: usize,
        /// Configured element limit of the handle.
        limit: usize,
    },
    /// A checked accessor was given an index at or past the element count.
    #[error("index {index} out of range for buffer of {count} elements")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Element count at the time of access.
        count: usize,
    },
    /// A [`BufferConfig`](crate::BufferConfig) failed validation.
    #[error("invalid buffer config: {reason}")]
    InvalidConfig {
        /// Which constraint was violated.
        reason: &'static str,
    },
}

impl BufferError {
    /// The library-wide category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

impl From<BufferError> for Diagnostic {
    #[track_caller]
    fn from(err: BufferError) -> Self {
        Diagnostic::new(err.kind(), err.to_string())
    }
}

/// Abort the current operation on a refcount bookkeeping bug.
#[cold]
#[track_caller]
pub(crate) fn ownership_violation(what: &str) -> ! {
    let diagnostic = Diagnostic::new(ErrorKind::OwnershipViolation, what);
    panic!("{diagnostic}");
}
