//! The invoker: pairs a function with its test, runs it, and reports.
//!
//! ## Pairing
//!
//! For a target named `add` the paired test is named `add_test`. It can be supplied three ways:
//! - lexically, with the [`wrap!`](crate::wrap) macro (resolved where the macro is written);
//! - explicitly, with [`Harness::wrap_with`];
//! - by name at runtime, with [`Harness::wrap`] and a [`TestScope`].
//!
//! Whatever the route, the target is handed back unchanged. The only errors are defects inside the paired test
//! itself (an `Err` returned outside any assertion primitive) and report I/O failures.

use std::any::type_name;
use std::io;
use std::sync::Arc;

use crate::compare::{NumericComparator, default_comparator};
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, HarnessResult, TestFnResult};
use crate::report::{ConsoleSink, Report, ReportSink};
use crate::scope::{Lookup, TestScope};
use crate::session::TestSession;
use crate::timer::Timer;

/// Name of the paired test for `name`.
pub fn paired_name(name: &str) -> String {
    format!("{name}_test")
}

/// Runs paired tests and sends their reports to a sink.
pub struct Harness<S = ConsoleSink<io::Stdout>> {
    config: HarnessConfig,
    comparator: Arc<dyn NumericComparator>,
    sink: S,
}

impl Harness {
    /// A harness configured from the environment, reporting to stdout.
    pub fn new() -> Self {
        Self::with_sink(HarnessConfig::from_env(), ConsoleSink::stdout())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ReportSink> Harness<S> {
    pub fn with_sink(config: HarnessConfig, sink: S) -> Self {
        Self {
            config,
            comparator: default_comparator(),
            sink,
        }
    }

    /// Replace the numeric comparison capability used by `similar()`.
    pub fn with_comparator(mut self, comparator: impl NumericComparator + 'static) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Start a named scoped timer.
    pub fn timed(&self, name: &str) -> Timer {
        Timer::named(name)
    }

    /// Resolve `<name>_test` in `scope`, run it against `target`, report, and return `target`.
    ///
    /// A missing pair is not an error: the report shows `0/0` with a diagnostic line.
    #[tracing::instrument(skip_all, fields(function = name))]
    pub fn wrap<F: 'static>(&mut self, name: &str, target: F, scope: &TestScope) -> HarnessResult<F> {
        if self.config.disabled {
            tracing::trace!("testing disabled");
            return Ok(target);
        }

        let test_name = paired_name(name);
        match scope.lookup::<F>(&test_name) {
            Lookup::Found(test) => self.run(name, &test_name, target, test),
            Lookup::Missing => {
                tracing::warn!(test = %test_name, "paired test not found");
                let diagnostic = format!("Cannot locate test function named {test_name}");
                self.emit(&Report::new(name, Vec::new(), vec![diagnostic]))?;
                Ok(target)
            }
            Lookup::WrongType { registered_for } => {
                tracing::warn!(test = %test_name, registered_for, "paired test has the wrong target type");
                let diagnostic = format!(
                    "Test function named {test_name} does not accept {} (registered for {registered_for})",
                    type_name::<F>()
                );
                self.emit(&Report::new(name, Vec::new(), vec![diagnostic]))?;
                Ok(target)
            }
        }
    }

    /// Run `test` as the paired test of `target`, report, and return `target`.
    #[tracing::instrument(skip_all, fields(function = name))]
    pub fn wrap_with<F, T>(&mut self, name: &str, target: F, test: T) -> HarnessResult<F>
    where
        T: FnOnce(&mut TestSession, &F) -> TestFnResult,
    {
        if self.config.disabled {
            tracing::trace!("testing disabled");
            return Ok(target);
        }

        let test_name = paired_name(name);
        self.run(name, &test_name, target, test)
    }

    fn run<F, T>(&mut self, name: &str, test_name: &str, target: F, test: T) -> HarnessResult<F>
    where
        T: FnOnce(&mut TestSession, &F) -> TestFnResult,
    {
        tracing::debug!(test = test_name, "running paired test");

        let mut session = TestSession::open(Arc::clone(&self.comparator), self.config.tolerance);
        let outcome = test(&mut session, &target);
        let results = session.close();

        // The test's own defects propagate; its return value is otherwise discarded.
        outcome.map_err(|source| HarnessError::from_paired_test(test_name, source))?;

        self.emit(&Report::new(name, results, Vec::new()))?;
        Ok(target)
    }

    fn emit(&mut self, report: &Report) -> HarnessResult<()> {
        tracing::debug!(passed = report.passed(), total = report.total(), "report ready");
        self.sink.report(report)?;
        Ok(())
    }
}
