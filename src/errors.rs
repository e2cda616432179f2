//! Harness error types.
//!
//! Only two things escape a `wrap` call as errors: misuse of the assertion primitives and defects inside the paired
//! test function itself. Failed assertions are never errors; they are recorded in the session.

use miette::Diagnostic;
use thiserror::Error;

/// Error type a paired test function may return.
///
/// Any `std::error::Error` converts into it with `?`, including [`HarnessError`].
pub type TestFnError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of a paired test function.
pub type TestFnResult = Result<(), TestFnError>;

/// Errors surfaced by the harness.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("Why are you calling `{operation}` outside a test function?")]
    #[diagnostic(
        code(pairtest::invalid_usage),
        help("assertion primitives only record into the session lent to a paired test by `wrap`")
    )]
    InvalidUsage { operation: &'static str },

    #[error("paired test `{test}` failed: {source}")]
    #[diagnostic(code(pairtest::paired_test))]
    PairedTest {
        test: String,
        #[source]
        source: TestFnError,
    },

    #[error("failed to write report: {0}")]
    #[diagnostic(code(pairtest::io))]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub(crate) fn invalid_usage(operation: &'static str) -> Self {
        HarnessError::InvalidUsage { operation }
    }

    /// Wrap an error returned by a paired test, passing harness errors through untouched.
    pub(crate) fn from_paired_test(test: &str, source: TestFnError) -> Self {
        match source.downcast::<HarnessError>() {
            Ok(inner) => *inner,
            Err(source) => HarnessError::PairedTest {
                test: test.to_string(),
                source,
            },
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
