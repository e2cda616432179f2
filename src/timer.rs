//! Scoped timer.
//!
//! A [`Timer`] captures a monotonic start time when created and, if it was given a non-empty name, writes
//! `<name> completed in <elapsed>s` when dropped, on every exit path including `?` returns and unwinding. Nested timers
//! are independent: each reports only its own elapsed time.
//!
//! Timers write to stdout unless built with [`Timer::with_writer`].

use std::io::{self, Write};
use std::time::Instant;

use pairtest_core::numeric::{format_general, round_to};

/// RAII stopwatch.
#[derive(Debug)]
#[must_use = "a timer reports when dropped; binding it to `_` drops it immediately"]
pub struct Timer<W: Write = io::Stdout> {
    name: Option<String>,
    start: Instant,
    out: W,
}

impl Timer {
    /// A timer that reports to stdout. An empty name behaves like [`Timer::anonymous`].
    pub fn named(name: impl Into<String>) -> Self {
        Timer::with_writer(name, io::stdout())
    }

    /// A timer that never prints; useful for reading `duration()` only.
    pub fn anonymous() -> Self {
        Timer::with_writer("", io::stdout())
    }
}

impl<W: Write> Timer<W> {
    /// A timer that reports to `out`.
    pub fn with_writer(name: impl Into<String>, out: W) -> Self {
        let name = name.into();
        Self {
            name: (!name.is_empty()).then_some(name),
            start: Instant::now(),
            out,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Seconds elapsed since the timer was created.
    pub fn duration(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// The line written on drop, or `None` for anonymous timers.
    pub fn completion_line(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(|name| completion_message(name, self.duration()))
    }

    /// Write the completion line now. Anonymous timers write nothing.
    fn report(&mut self) -> io::Result<()> {
        let elapsed = self.duration();
        tracing::debug!(name = self.name.as_deref(), elapsed, "timer finished");
        match &self.name {
            Some(name) => writeln!(self.out, "{}", completion_message(name, elapsed)),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for Timer<W> {
    fn drop(&mut self) {
        // Drop may run during unwinding; a failed write must not panic again.
        if let Err(err) = self.report() {
            tracing::warn!(%err, "failed to write timer line");
        }
    }
}

/// Start a stdout timer, named or not.
pub fn timed(name: Option<&str>) -> Timer {
    match name {
        Some(name) => Timer::named(name),
        None => Timer::anonymous(),
    }
}

/// Rounded to milliseconds first, then three significant figures.
pub fn completion_message(name: &str, seconds: f64) -> String {
    format!("{name} completed in {}s", format_general(round_to(seconds, 3), 3))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::time::Duration;

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec()).unwrap().lines().map(str::to_string).collect()
    }

    fn read_input(fail: bool) -> Result<u32, String> {
        if fail {
            Err("missing input".to_string())
        } else {
            Ok(7)
        }
    }

    fn load(out: &mut Vec<u8>, fail: bool) -> Result<u32, String> {
        let _timer = Timer::with_writer("load", out);
        let value = read_input(fail)?;
        Ok(value)
    }

    #[test]
    fn completion_message_formats_three_significant_figures() {
        assert_eq!(completion_message("load", 0.012345), "load completed in 0.012s");
        assert_eq!(completion_message("load", 1.2341), "load completed in 1.23s");
        assert_eq!(completion_message("load", 0.0001), "load completed in 0s");
        assert_eq!(completion_message("load", 2.0), "load completed in 2s");
        assert_eq!(completion_message("load", 4321.0), "load completed in 4.32e+03s");
    }

    #[test]
    fn duration_is_monotonic() {
        let timer = Timer::anonymous();
        let first = timer.duration();
        std::thread::sleep(Duration::from_millis(5));
        let second = timer.duration();
        assert!(second >= first);
        assert!(second >= 0.005);
    }

    #[test]
    fn anonymous_timer_has_no_line() {
        let timer = timed(None);
        assert!(timer.name().is_none());
        assert!(timer.completion_line().is_none());
    }

    #[test]
    fn empty_name_is_anonymous() {
        let mut out = Vec::new();
        {
            let timer = Timer::with_writer("", &mut out);
            assert!(timer.name().is_none());
            assert!(timer.completion_line().is_none());
        }
        assert!(out.is_empty());
        assert!(timed(Some("")).name().is_none());
    }

    #[test]
    fn drop_writes_on_normal_exit() {
        let mut out = Vec::new();
        assert_eq!(load(&mut out, false), Ok(7));
        let written = lines(&out);
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("load completed in "));
        assert!(written[0].ends_with('s'));
    }

    #[test]
    fn drop_writes_on_early_return() {
        let mut out = Vec::new();
        assert_eq!(load(&mut out, true), Err("missing input".to_string()));
        assert_eq!(lines(&out).len(), 1);
        assert!(lines(&out)[0].starts_with("load completed in "));
    }

    #[test]
    fn drop_writes_while_unwinding() {
        let mut out = Vec::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _timer = Timer::with_writer("crash", &mut out);
            panic!("defect");
        }));
        assert!(result.is_err());
        assert!(lines(&out)[0].starts_with("crash completed in "));
    }

    #[test]
    fn nested_timers_are_independent() {
        let mut outer_out = Vec::new();
        let mut inner_out = Vec::new();
        {
            let outer = Timer::with_writer("outer", &mut outer_out);
            std::thread::sleep(Duration::from_millis(5));
            let inner_elapsed = {
                let inner = Timer::with_writer("inner", &mut inner_out);
                inner.duration()
            };
            assert!(outer.duration() > inner_elapsed);
        }
        assert_eq!(lines(&inner_out).len(), 1);
        assert_eq!(lines(&outer_out).len(), 1);
        assert!(lines(&outer_out)[0].starts_with("outer completed in "));
    }
}
