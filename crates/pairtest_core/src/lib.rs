//! Provide pure, dependency-free helpers for the pairtest harness.
//!
//! This crate holds the parts of the harness that need no I/O and no global state:
//! - the error-kind vocabulary used by `exception()` checks (a hierarchy rooted at `Exception`), and
//! - numeric helpers used by `similar()` checks and timer reporting (array shapes, absolute-tolerance closeness,
//!   `%g`-style significant figures).

pub mod errors;
pub mod numeric;

pub use errors::{ErrorKind, RaisedError};
pub use numeric::{NdArray, RaggedArray, Shape, ToNdArray};
