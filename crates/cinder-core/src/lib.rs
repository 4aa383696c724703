//! Core types for the Cinder systems utilities.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! diagnostics record that every other Cinder crate reports failures
//! through: an [`ErrorKind`] category, a rendered message, and the source
//! location that raised it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;

pub use error::{Diagnostic, ErrorKind};
