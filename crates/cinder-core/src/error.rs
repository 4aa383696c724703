//! Diagnostics shared by every Cinder utility.
//!
//! Subsystem crates keep their own precise error enums and convert them
//! into a [`Diagnostic`] at the library boundary. The diagnostic records
//! the failure category, a human-readable message, and the file/line of
//! the code that produced it.

use std::fmt;
use std::panic::Location;

/// Broad category of a library failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation could not be satisfied.
    OutOfMemory,
    /// A checked accessor was given an index past the end of a sequence.
    IndexOutOfRange,
    /// Internal ownership bookkeeping was found inconsistent.
    ///
    /// Always a bug in the reporting crate, never a caller error.
    OwnershipViolation,
    /// A configuration value was rejected during validation.
    InvalidConfig,
}

impl ErrorKind {
    /// Whether a failure of this kind leaves the process in a state that
    /// cannot be trusted afterwards.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::OwnershipViolation)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::IndexOutOfRange => write!(f, "index out of range"),
            Self::OwnershipViolation => write!(f, "ownership violation"),
            Self::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}

/// A failure report carrying its category, message, and origin.
///
/// Construct with [`Diagnostic::new`] from the code that detects the
/// failure; the caller's source location is captured automatically.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message} ({file}:{line})")]
pub struct Diagnostic {
    kind: ErrorKind,
    message: String,
    file: &'static str,
    line: u32,
}

impl Diagnostic {
    /// Create a diagnostic attributed to the caller's source location.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            kind,
            message: message.into(),
            file: location.file(),
            line: location.line(),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The rendered failure message, without location.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source file that raised the diagnostic.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line that raised the diagnostic.
    pub fn line(&self) -> u32 {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_caller_location() {
        let line = line!() + 1;
        let diag = Diagnostic::new(ErrorKind::OutOfMemory, "requested 64 bytes");
        assert_eq!(diag.kind(), ErrorKind::OutOfMemory);
        assert_eq!(diag.message(), "requested 64 bytes");
        assert!(diag.file().ends_with("error.rs"));
        assert_eq!(diag.line(), line);
    }

    #[test]
    fn display_includes_kind_message_and_location() {
        let diag = Diagnostic::new(ErrorKind::IndexOutOfRange, "index 4, count 3");
        let rendered = diag.to_string();
        assert!(rendered.starts_with("index out of range: index 4, count 3 ("));
        assert!(rendered.contains("error.rs:"));
    }

    #[test]
    fn only_ownership_violation_is_fatal() {
        assert!(ErrorKind::OwnershipViolation.is_fatal());
        assert!(!ErrorKind::OutOfMemory.is_fatal());
        assert!(!ErrorKind::IndexOutOfRange.is_fatal());
        assert!(!ErrorKind::InvalidConfig.is_fatal());
    }
}
