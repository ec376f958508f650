//! Filesystem helpers for the SSH config manager
//!
//! Provides path expansion for `Include` patterns and locked, atomic
//! whole-file writes used by every mutating operation.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::{absolutize, expand_tilde, resolve_relative, sibling_dir};
