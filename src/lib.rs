#![forbid(unsafe_code)]
//! Pairtest: an in-process micro test harness.
//!
//! A function `add` is paired with a test function `add_test` by naming convention. Wrapping `add` runs
//! `add_test` against it, records each assertion in a fresh [`TestSession`], prints a short report, and hands `add`
//! back unchanged.
//!
//! ```ignore
//! use pairtest::{Harness, TestFnResult, TestSession, wrap};
//!
//! fn add(a: i32, b: i32) -> i32 { a + b }
//!
//! fn add_test(t: &mut TestSession, add: &impl Fn(i32, i32) -> i32) -> TestFnResult {
//!     t.equal(add(2, 3), 5)?;
//!     t.is_true(add(0, 0) == 0)?;
//!     Ok(())
//! }
//!
//! let mut harness = Harness::new();
//! let add = wrap!(harness, add)?;
//! // ### TESTING add: PASSED 2/2
//! // ###
//! ```
//!
//! ## Panic Policy
//!
//! - **Library code**: Use `Result` with `?`. Assertion failures are recorded, never returned as errors; only misuse
//!   of the recorder, defects in a paired test, and report I/O produce a [`HarnessError`].
//!
//! - **Raise helpers**: [`raise`] and friends panic on purpose. That is how code under test signals an error kind that
//!   [`TestSession::exception`] can observe.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

#![deny(clippy::unwrap_used)]

// `wrap!` expands to `::pairtest::...` paths, which must also resolve inside this crate.
extern crate self as pairtest;

pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod harness;
pub mod raise;
pub mod report;
pub mod scope;
pub mod session;
pub mod timer;

pub use compare::{NumericComparator, Unavailable, default_comparator};
#[cfg(feature = "numeric")]
pub use compare::AbsoluteTolerance;
pub use config::HarnessConfig;
pub use errors::{HarnessError, HarnessResult, TestFnError, TestFnResult};
pub use harness::{Harness, paired_name};
pub use raise::{
    is_raised, raise, raise_index_error, raise_key_error, raise_kind_fmt, raise_type_error, raise_value_error,
    raise_zero_division,
};
pub use report::{ConsoleSink, Report, ReportSink};
pub use scope::TestScope;
pub use session::{Raises, TestResult, TestSession};
pub use timer::{Timer, timed};

pub use pairtest_core::{ErrorKind, NdArray, RaisedError, Shape, ToNdArray};
pub use pairtest_macros::wrap;
