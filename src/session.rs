//! Assertion recorder.
//!
//! A [`TestSession`] is the ordered log of results for one `wrap` invocation. The harness opens it, lends it to the
//! paired test function as `&mut TestSession`, and closes it once the test returns. Each primitive computes a
//! [`TestResult`] first and only then appends it; nothing is signalled through panics except the subject of
//! `exception()` itself.

use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use pairtest_core::{ErrorKind, RaisedError, ToNdArray};

use crate::compare::{NumericComparator, Unavailable};
use crate::config::DEFAULT_TOLERANCE;
use crate::errors::{HarnessError, HarnessResult};
use crate::raise::from_panic_payload;

/// Message carried by every passing result.
pub const PASSED: &str = "Passed";

/// Outcome of one assertion. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    passed: bool,
    message: String,
}

impl TestResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: PASSED.to_string(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What a thunk handed to [`TestSession::exception`] can return.
///
/// `()` never raises; `Result` raises its `Err`. Panics raise regardless of the return type.
pub trait Raises {
    fn into_raised(self) -> Option<RaisedError>;
}

impl Raises for () {
    fn into_raised(self) -> Option<RaisedError> {
        None
    }
}

impl<T, E: Into<RaisedError>> Raises for Result<T, E> {
    fn into_raised(self) -> Option<RaisedError> {
        self.err().map(Into::into)
    }
}

/// Ordered log of assertion results for the test currently running.
pub struct TestSession {
    results: Vec<TestResult>,
    active: bool,
    comparator: Arc<dyn NumericComparator>,
    tolerance: f64,
}

impl TestSession {
    pub(crate) fn open(comparator: Arc<dyn NumericComparator>, tolerance: f64) -> Self {
        tracing::debug!("opening test session");
        Self {
            results: Vec::new(),
            active: true,
            comparator,
            tolerance,
        }
    }

    /// A session that was never opened by a harness. Every primitive on it fails with
    /// [`HarnessError::InvalidUsage`].
    pub fn detached() -> Self {
        Self {
            results: Vec::new(),
            active: false,
            comparator: Arc::new(Unavailable),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Close the session and hand back its results. Later primitive calls are misuse.
    pub(crate) fn close(&mut self) -> Vec<TestResult> {
        if self.active {
            tracing::debug!(results = self.results.len(), "closing test session");
        }
        self.active = false;
        std::mem::take(&mut self.results)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Results recorded so far, in insertion order.
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Append one result.
    pub fn record(&mut self, passed: bool, message: impl Into<String>) -> HarnessResult<()> {
        self.ensure_active("record")?;
        let result = if passed {
            TestResult::pass()
        } else {
            TestResult::fail(message)
        };
        self.push(result);
        Ok(())
    }

    /// Pass iff `value == reference`.
    pub fn equal<T, U>(&mut self, value: T, reference: U) -> HarnessResult<()>
    where
        T: PartialEq<U> + Debug,
        U: Debug,
    {
        self.ensure_active("equal")?;
        let result = if value == reference {
            TestResult::pass()
        } else {
            TestResult::fail(format!("Failed: {value:?} is not equal to {reference:?}"))
        };
        self.push(result);
        Ok(())
    }

    /// Pass iff `predicate` holds.
    pub fn is_true(&mut self, predicate: bool) -> HarnessResult<()> {
        self.ensure_active("is_true")?;
        let result = if predicate {
            TestResult::pass()
        } else {
            TestResult::fail("Assertion failed")
        };
        self.push(result);
        Ok(())
    }

    /// Pass iff `thunk` raises an error of kind `expected` or a refinement of it.
    ///
    /// The thunk raises by returning `Err` or by panicking; either way the error stops here. Panic payloads in the
    /// canonical `Kind: message` form keep their kind, anything else counts as a plain `Exception`.
    ///
    /// A caught panic still runs the process panic hook, so the default hook prints its message to stderr. Install a
    /// filtering hook (see [`is_raised`](crate::raise::is_raised)) to silence expected raises.
    pub fn exception<R, F>(&mut self, thunk: F, expected: ErrorKind) -> HarnessResult<()>
    where
        F: FnOnce() -> R,
        R: Raises,
    {
        self.ensure_active("exception")?;

        let raised = match panic::catch_unwind(AssertUnwindSafe(thunk)) {
            Ok(output) => output.into_raised(),
            Err(payload) => Some(from_panic_payload(payload.as_ref())),
        };

        let result = match raised {
            None => TestResult::fail("No exception thrown."),
            Some(err) if err.kind().is_subkind_of(expected) => TestResult::pass(),
            Some(err) => TestResult::fail(format!("Exception type {err}, not subclass of {expected}")),
        };
        self.push(result);
        Ok(())
    }

    /// [`exception`](Self::exception) with the most general expected kind.
    pub fn raises<R, F>(&mut self, thunk: F) -> HarnessResult<()>
    where
        F: FnOnce() -> R,
        R: Raises,
    {
        self.exception(thunk, ErrorKind::Exception)
    }

    /// Compare numeric arrays with the harness's default tolerance.
    pub fn similar<C, R>(&mut self, computed: C, reference: R) -> HarnessResult<()>
    where
        C: ToNdArray,
        R: ToNdArray,
    {
        let tolerance = self.tolerance;
        self.similar_within(computed, reference, tolerance)
    }

    /// Compare numeric arrays: shapes must match and every element must lie within `tolerance` (absolute).
    pub fn similar_within<C, R>(&mut self, computed: C, reference: R, tolerance: f64) -> HarnessResult<()>
    where
        C: ToNdArray,
        R: ToNdArray,
    {
        self.ensure_active("similar")?;

        let result = if !self.comparator.is_available() {
            TestResult::fail("cannot check array similarity without a numeric comparator!")
        } else {
            match (computed.to_ndarray(), reference.to_ndarray()) {
                (Ok(c), Ok(r)) if c.shape() != r.shape() => {
                    TestResult::fail(format!("Shapes disagree ({} != {})", c.shape(), r.shape()))
                }
                (Ok(c), Ok(r)) => {
                    if self.comparator.all_close(&c, &r, tolerance) {
                        TestResult::pass()
                    } else {
                        TestResult::fail("Values are not similar")
                    }
                }
                (c, r) => TestResult::fail(format!(
                    "Shapes disagree ({} != {})",
                    describe_shape(&c),
                    describe_shape(&r)
                )),
            }
        };
        self.push(result);
        Ok(())
    }

    fn ensure_active(&self, operation: &'static str) -> HarnessResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(HarnessError::invalid_usage(operation))
        }
    }

    fn push(&mut self, result: TestResult) {
        tracing::trace!(
            index = self.results.len(),
            passed = result.passed,
            message = %result.message,
            "recorded result"
        );
        self.results.push(result);
    }
}

fn describe_shape(array: &Result<pairtest_core::NdArray, pairtest_core::RaggedArray>) -> String {
    match array {
        Ok(a) => a.shape().to_string(),
        Err(ragged) => ragged.to_string(),
    }
}
