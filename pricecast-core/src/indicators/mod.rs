//! Technical indicators over a single price series.
//!
//! Indicators are pure functions: a series in, a series of the same length
//! out. Warmup positions and any window touching a missing input are `None`,
//! never zero. No value at index t depends on input after t.

pub mod lag;
pub mod returns;
pub mod sma;
pub mod volatility;

pub use lag::Lag;
pub use returns::Returns;
pub use sma::Sma;
pub use volatility::Volatility;

/// Trait for indicators.
pub trait Indicator: Send + Sync {
    /// Column name the output is written under (e.g. "MA_7").
    fn name(&self) -> &str;

    /// Leading positions that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series.
    fn compute(&self, series: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// Wrap plain values as a fully present series.
#[cfg(test)]
pub fn make_series(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
