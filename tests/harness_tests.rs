//! Integration tests for wrapping functions with their paired tests

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use pairtest::{
    ConsoleSink, ErrorKind, Harness, HarnessConfig, HarnessError, RaisedError, Report, TestFnResult, TestScope,
    TestSession, raise_value_error, wrap,
};

fn collecting() -> Harness<Vec<Report>> {
    Harness::with_sink(HarnessConfig::new(), Vec::new())
}

fn add(a: i32, b: i32) -> i32 {
    a + b
}

fn add_test(t: &mut TestSession, add: &impl Fn(i32, i32) -> i32) -> TestFnResult {
    t.equal(add(2, 3), 5)?;
    t.is_true(add(0, 0) == 0)?;
    Ok(())
}

fn boom() -> i32 {
    raise_value_error("boom")
}

fn boom_test(t: &mut TestSession, boom: &impl Fn() -> i32) -> TestFnResult {
    t.exception(
        || {
            boom();
        },
        ErrorKind::ValueError,
    )?;
    t.exception(
        || {
            boom();
        },
        ErrorKind::TypeError,
    )?;
    Ok(())
}

mod math {
    use super::*;

    pub fn negate(x: i64) -> i64 {
        -x
    }

    pub fn negate_test(t: &mut TestSession, negate: &fn(i64) -> i64) -> TestFnResult {
        t.equal(negate(3), -3)?;
        t.equal(negate(negate(9)), 9)?;
        Ok(())
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_add_passes_two_of_two() {
    let mut harness = collecting();
    let wrapped = wrap!(harness, add).unwrap();

    assert_eq!(wrapped(40, 2), 42);
    let report = &harness.sink()[0];
    assert_eq!(report.to_string(), "### TESTING add: PASSED 2/2\n###\n\n");
}

#[test]
fn test_missing_pair_reports_zero_of_zero() {
    let mut harness = collecting();
    let wrapped = harness.wrap("add", add as fn(i32, i32) -> i32, &TestScope::new()).unwrap();

    assert_eq!(wrapped(1, 1), 2);
    let report = &harness.sink()[0];
    assert_eq!((report.passed(), report.total()), (0, 0));
    assert_eq!(report.diagnostics, vec!["Cannot locate test function named add_test"]);
}

#[test]
fn test_exception_kinds() {
    let mut harness = collecting();
    wrap!(harness, boom).unwrap();

    let report = &harness.sink()[0];
    assert!(report.results[0].passed());
    assert!(!report.results[1].passed());
    assert_eq!(
        report.results[1].message(),
        "Exception type ValueError: boom, not subclass of TypeError"
    );
}

#[test]
fn test_similar_values() {
    let mut harness = collecting();
    harness
        .wrap_with("values", || vec![1.0, 2.0], |t, values| {
            t.similar(values(), [1.0, 2.0000000001])?;
            t.similar(values(), [1.0, 2.1])?;
            Ok(())
        })
        .unwrap();

    let report = &harness.sink()[0];
    assert_eq!(report.passed(), 1);
    assert_eq!(report.results[1].message(), "Values are not similar");
}

#[test]
fn test_similar_shapes() {
    let mut harness = collecting();
    harness
        .wrap_with("pair", || [1, 2], |t, pair| {
            t.similar(pair(), [1, 2, 3])?;
            t.similar(vec![pair(), pair()], [[1, 2], [1, 2]])?;
            Ok(())
        })
        .unwrap();

    let report = &harness.sink()[0];
    assert_eq!(report.results[0].message(), "Shapes disagree ((2,) != (3,))");
    assert!(report.results[1].passed());
}

// ============================================================================
// Pairing routes
// ============================================================================

#[test]
fn test_wrap_macro_resolves_module_paths() {
    let mut harness = collecting();
    let negate = wrap!(&mut harness, math::negate as fn(i64) -> i64).unwrap();

    assert_eq!(negate(5), -5);
    assert_eq!(harness.sink()[0].target, "negate");
    assert!(harness.sink()[0].is_clean());
}

#[test]
fn test_wrap_macro_with_default_harness_returns_target() {
    let wrapped = wrap!(add).unwrap();
    assert_eq!(wrapped(2, 2), 4);
}

#[test]
fn test_scope_registry_with_named_fn() {
    let mut scope = TestScope::new();
    scope.register("negate_test", math::negate_test);

    let mut harness = collecting();
    let negate = harness.wrap("negate", math::negate as fn(i64) -> i64, &scope).unwrap();
    assert_eq!(negate(-1), 1);
    assert_eq!(harness.sink()[0].total(), 2);
}

// ============================================================================
// Toggle, errors and output
// ============================================================================

#[test]
fn test_disable_toggle_values() {
    assert!(!HarnessConfig::from_env_value(None).disabled);
    assert!(!HarnessConfig::from_env_value(Some("")).disabled);
    assert!(HarnessConfig::from_env_value(Some("1")).disabled);
    assert!(HarnessConfig::from_env_value(Some("0")).disabled);
}

#[test]
fn test_disabled_harness_is_silent() {
    let config = HarnessConfig::from_env_value(Some("yes"));
    let mut harness = Harness::with_sink(config, ConsoleSink::new(Vec::<u8>::new()));
    let wrapped = wrap!(harness, add).unwrap();

    assert_eq!(wrapped(3, 4), 7);
    assert!(harness.into_sink().into_writer().is_empty());
}

#[test]
fn test_console_output_sequence() {
    let mut harness = Harness::with_sink(HarnessConfig::new(), ConsoleSink::new(Vec::new()));
    wrap!(harness, add).unwrap();
    harness.wrap("mul", add as fn(i32, i32) -> i32, &TestScope::new()).unwrap();

    let out = String::from_utf8(harness.into_sink().into_writer()).unwrap();
    assert_eq!(
        out,
        "### TESTING add: PASSED 2/2\n###\n\n\
         ### TESTING mul: PASSED 0/0\n# Cannot locate test function named mul_test\n###\n\n"
    );
}

#[test]
fn test_paired_test_error_propagates() {
    let mut harness = collecting();
    let err = harness
        .wrap_with("add", add, |t, add| {
            t.equal(add(1, 1), 2)?;
            Err(RaisedError::new(ErrorKind::KeyError, "fixture").into())
        })
        .err().expect("expected wrap_with to fail");

    match err {
        HarnessError::PairedTest { test, source } => {
            assert_eq!(test, "add_test");
            assert_eq!(source.to_string(), "KeyError: fixture");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(harness.sink().is_empty());
}

#[test]
fn test_paired_test_panic_unwinds_without_report() {
    let mut harness = collecting();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        harness.wrap_with("add", add, |t, add| {
            t.is_true(add(1, 1) == 2)?;
            panic!("fixture exploded");
        })
    }));

    let payload = outcome.err().expect("panic propagates");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"fixture exploded"));
    assert!(harness.sink().is_empty());
}

#[test]
fn test_similar_large_magnitudes_are_absolute() {
    let mut harness = collecting();
    harness
        .wrap_with("big", [1e15], |t, big| {
            t.similar(big, [1e15 + 0.125])?;
            t.similar_within([1e8], [1e8 + 1.49e-8], 0.0)?;
            t.similar_within(big, big, 0.0)?;
            Ok(())
        })
        .unwrap();

    let report = &harness.sink()[0];
    if cfg!(feature = "numeric") {
        let failed: Vec<usize> = report.failures().map(|(i, _)| i).collect();
        assert_eq!(failed, vec![0, 1]);
        assert_eq!(report.results[0].message(), "Values are not similar");
    }
}

#[test]
fn test_detached_session_is_misuse() {
    let mut session = TestSession::detached();
    assert!(matches!(session.equal(1, 1), Err(HarnessError::InvalidUsage { operation: "equal" })));
    assert!(matches!(session.is_true(true), Err(HarnessError::InvalidUsage { .. })));
    assert!(session.results().is_empty());
}

#[test]
fn test_nested_wrap_keeps_sessions_apart() {
    let mut inner = collecting();
    let mut outer = collecting();

    outer
        .wrap_with("add", add, |t, add| {
            t.equal(add(1, 2), 3)?;
            inner.wrap_with("negate", math::negate, |t, negate| {
                t.equal(negate(1), 1)?;
                Ok(())
            })?;
            t.is_true(true)?;
            Ok(())
        })
        .unwrap();

    assert_eq!((outer.sink()[0].passed(), outer.sink()[0].total()), (2, 2));
    assert_eq!((inner.sink()[0].passed(), inner.sink()[0].total()), (0, 1));
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_report_write_failure_is_io_error() {
    let mut harness = Harness::with_sink(HarnessConfig::new(), ConsoleSink::new(BrokenPipe));
    let err = wrap!(harness, add).err().expect("expected wrap to fail");
    assert!(matches!(err, HarnessError::Io(_)));
}

#[test]
fn test_timer_around_wrap() {
    let harness = collecting();
    let timer = harness.timed("setup");
    assert_eq!(timer.name(), Some("setup"));
    assert!(timer.completion_line().is_some_and(|l| l.starts_with("setup completed in ")));
}
