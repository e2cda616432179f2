//! Numeric comparison capability used by `similar()`.
//!
//! The harness never assumes a comparator exists: it is injected at construction. [`Unavailable`] is the explicit
//! stub for builds without one (the `numeric` feature off), and makes every `similar()` call record a
//! capability-missing failure instead of crashing.

use pairtest_core::NdArray;

/// Element-wise closeness check over equally-shaped arrays.
pub trait NumericComparator: Send + Sync {
    /// Whether this comparator can actually compare arrays.
    fn is_available(&self) -> bool {
        true
    }

    /// Compare two arrays whose shapes are already known to match.
    fn all_close(&self, computed: &NdArray, reference: &NdArray, tolerance: f64) -> bool;
}

/// Stub comparator that reports the capability as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl NumericComparator for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn all_close(&self, _computed: &NdArray, _reference: &NdArray, _tolerance: f64) -> bool {
        false
    }
}

/// Absolute-tolerance comparator: `|a - b| <= tolerance` for every element, with no relative component.
#[cfg(feature = "numeric")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteTolerance;

#[cfg(feature = "numeric")]
impl NumericComparator for AbsoluteTolerance {
    fn all_close(&self, computed: &NdArray, reference: &NdArray, tolerance: f64) -> bool {
        pairtest_core::numeric::all_close_abs(computed.data(), reference.data(), tolerance)
    }
}

/// The comparator a default harness is built with.
pub fn default_comparator() -> std::sync::Arc<dyn NumericComparator> {
    #[cfg(feature = "numeric")]
    {
        std::sync::Arc::new(AbsoluteTolerance)
    }
    #[cfg(not(feature = "numeric"))]
    {
        std::sync::Arc::new(Unavailable)
    }
}
