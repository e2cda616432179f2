//! Bundled demonstration scenarios for `pairtest demo`.
//!
//! Each scenario wraps one small function through the harness it is given, so the same code drives the console demo
//! and the tests (which pass a harness with a `Vec<Report>` sink).

use crate::errors::{HarnessResult, TestFnResult};
use crate::harness::Harness;
use crate::raise::raise_value_error;
use crate::report::ReportSink;
use crate::scope::TestScope;
use crate::session::TestSession;
use crate::timer::Timer;
use crate::wrap;
use pairtest_core::ErrorKind;

/// A named demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Add,
    Missing,
    Boom,
    Similar,
    Shapes,
    Timed,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Add,
        Scenario::Missing,
        Scenario::Boom,
        Scenario::Similar,
        Scenario::Shapes,
        Scenario::Timed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Add => "add",
            Scenario::Missing => "missing",
            Scenario::Boom => "boom",
            Scenario::Similar => "similar",
            Scenario::Shapes => "shapes",
            Scenario::Timed => "timed",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::Add => "equal and is_true against add(a, b), paired with add_test",
            Scenario::Missing => "add with no add_test in scope",
            Scenario::Boom => "exception() with the right and the wrong error kind",
            Scenario::Similar => "similar() within and beyond the default tolerance",
            Scenario::Shapes => "similar() on arrays of different shapes",
            Scenario::Timed => "a scoped timer around a wrapped computation",
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Scenario::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Run one scenario through `harness`.
pub fn run_scenario<S: ReportSink>(harness: &mut Harness<S>, scenario: Scenario) -> HarnessResult<()> {
    tracing::debug!(scenario = scenario.name(), "running scenario");
    match scenario {
        Scenario::Add => {
            let add = wrap!(harness, add)?;
            tracing::trace!(sum = add(20, 22), "wrapped add still works");
        }
        Scenario::Missing => {
            harness.wrap("add", add as fn(i32, i32) -> i32, &TestScope::new())?;
        }
        Scenario::Boom => {
            wrap!(harness, boom)?;
        }
        Scenario::Similar => {
            wrap!(harness, halves)?;
        }
        Scenario::Shapes => {
            wrap!(harness, pair)?;
        }
        Scenario::Timed => {
            let _timer = harness.timed("fibonacci");
            let mut scope = TestScope::new();
            scope.register("fibonacci_test", fibonacci_test);
            let fib = harness.wrap("fibonacci", fibonacci as fn(u64) -> u64, &scope)?;
            tracing::trace!(value = fib(20), "fibonacci(20)");
        }
    }
    Ok(())
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

fn halves() -> Vec<f64> {
    vec![1.0, 2.0]
}

fn halves_test(t: &mut TestSession, halves: &impl Fn() -> Vec<f64>) -> TestFnResult {
    t.similar(halves(), [1.0, 2.0000000001])?;
    t.similar(halves(), [1.0, 2.1])?;
    Ok(())
}

fn pair() -> [i32; 2] {
    [1, 2]
}

fn pair_test(t: &mut TestSession, pair: &impl Fn() -> [i32; 2]) -> TestFnResult {
    t.similar(pair(), [1, 2, 3])?;
    Ok(())
}

fn fibonacci(n: u64) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        (a, b) = (b, a.wrapping_add(b));
    }
    a
}

fn fibonacci_test(t: &mut TestSession, fib: &fn(u64) -> u64) -> TestFnResult {
    let timer = Timer::anonymous();
    t.equal(fib(0), 0)?;
    t.equal(fib(1), 1)?;
    t.equal(fib(10), 55)?;
    t.is_true(timer.duration() >= 0.0)?;
    Ok(())
}
