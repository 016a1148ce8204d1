//! BD-rate calculation and summary statistics.
//!
//! ## Rate-Distortion Analysis
//!
//! - [`bd_rate`]: Bjontegaard Delta Rate from four raw sequences
//! - [`compute`]: the same, returning a [`BdRateReport`] with intermediates
//! - [`BdRateConfig`]: minimum overlap and interpolation method
//!
//! ## Core Statistics
//!
//! - [`Summary`]: Descriptive statistics over many BD-rate results

use serde::{Deserialize, Serialize};

use crate::curve::PreparedCurve;
use crate::error::{Error, Result};
use crate::interpolation::{Method, definite_integral};
use crate::overlap::{self, OverlapWindow};

/// Default minimum overlap ratio.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.5;

/// Configuration for a BD-rate computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BdRateConfig {
    /// Minimum fraction of the combined metric range both curves must share.
    pub min_overlap: f64,
    /// Interpolation method used for both curves.
    pub method: Method,
}

impl Default for BdRateConfig {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            method: Method::Akima,
        }
    }
}

impl BdRateConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> BdRateConfigBuilder {
        BdRateConfigBuilder::default()
    }
}

/// Builder for [`BdRateConfig`].
#[derive(Debug, Default)]
pub struct BdRateConfigBuilder {
    min_overlap: Option<f64>,
    method: Option<Method>,
}

impl BdRateConfigBuilder {
    /// Set the minimum overlap ratio (`0.0..=1.0`).
    #[must_use]
    pub fn min_overlap(mut self, min_overlap: f64) -> Self {
        self.min_overlap = Some(min_overlap);
        self
    }

    /// Set the interpolation method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Build the configuration.
    ///
    /// The overlap threshold is range-checked when the configuration is used.
    #[must_use]
    pub fn build(self) -> BdRateConfig {
        BdRateConfig {
            min_overlap: self.min_overlap.unwrap_or(DEFAULT_MIN_OVERLAP),
            method: self.method.unwrap_or_default(),
        }
    }
}

/// Full result of a BD-rate computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BdRateReport {
    /// BD-rate in percent. Negative = test needs fewer bits at equal quality.
    pub bd_rate: f64,
    /// Mean `log10(test_rate) - log10(anchor_rate)` over the window.
    pub avg_log_diff: f64,
    /// Metric interval the curves were integrated over.
    pub window: OverlapWindow,
    /// Integral of the anchor's log-rate over the window.
    pub anchor_integral: f64,
    /// Integral of the test's log-rate over the window.
    pub test_integral: f64,
    /// Interpolation method used.
    pub method: Method,
}

/// Calculate BD-Rate (Bjontegaard Delta Rate).
///
/// BD-Rate measures the average bitrate difference between two rate-quality
/// curves at the same quality level. A negative value means the test curve
/// is more efficient (lower bitrate at same quality).
///
/// # Example
///
/// ```
/// use bd_rate::stats::{BdRateConfig, bd_rate};
///
/// let bd = bd_rate(
///     &[100.0, 200.0, 400.0],
///     &[30.0, 33.0, 36.0],
///     &[90.0, 180.0, 360.0],
///     &[30.0, 33.0, 36.0],
///     &BdRateConfig::default(),
/// )
/// .unwrap();
///
/// assert!((bd + 10.0).abs() < 1e-9); // 10% fewer bits everywhere
/// ```
pub fn bd_rate(
    anchor_rate: &[f64],
    anchor_metric: &[f64],
    test_rate: &[f64],
    test_metric: &[f64],
    config: &BdRateConfig,
) -> Result<f64> {
    compute(anchor_rate, anchor_metric, test_rate, test_metric, config).map(|r| r.bd_rate)
}

/// Calculate BD-Rate from raw sequences, keeping the intermediate values.
pub fn compute(
    anchor_rate: &[f64],
    anchor_metric: &[f64],
    test_rate: &[f64],
    test_metric: &[f64],
    config: &BdRateConfig,
) -> Result<BdRateReport> {
    overlap::check_min_overlap(config.min_overlap)?;

    let anchor = PreparedCurve::prepare_labeled("anchor", anchor_rate, anchor_metric)?;
    let test = PreparedCurve::prepare_labeled("test", test_rate, test_metric)?;

    compute_curves(&anchor, &test, config)
}

/// Calculate BD-Rate for two prepared curves.
pub fn compute_curves(
    anchor: &PreparedCurve,
    test: &PreparedCurve,
    config: &BdRateConfig,
) -> Result<BdRateReport> {
    let window = overlap::validate(anchor, test, config.min_overlap)?;

    let anchor_spline = config.method.fit(anchor)?;
    let test_spline = config.method.fit(test)?;

    let anchor_integral = definite_integral(&anchor_spline, window.lo, window.hi);
    let test_integral = definite_integral(&test_spline, window.lo, window.hi);

    let avg_log_diff = (test_integral - anchor_integral) / window.width();
    let bd_rate = (10_f64.powf(avg_log_diff) - 1.0) * 100.0;
    if !bd_rate.is_finite() {
        return Err(Error::invalid_input(
            "rate",
            format!("mean log10 rate difference {avg_log_diff} has no finite BD-rate"),
        ));
    }

    Ok(BdRateReport {
        bd_rate,
        avg_log_diff,
        window,
        anchor_integral,
        test_integral,
        method: config.method,
    })
}

/// Descriptive statistics for a set of measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if the slice is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_rate::stats::Summary;
    ///
    /// let summary = Summary::compute(&[-12.0, -8.0, -10.0]).unwrap();
    /// assert_eq!(summary.median, -10.0);
    /// ```
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            median: percentile_sorted(&sorted, 0.5),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p5: percentile_sorted(&sorted, 0.05),
            p25: percentile_sorted(&sorted, 0.25),
            p75: percentile_sorted(&sorted, 0.75),
            p95: percentile_sorted(&sorted, 0.95),
        })
    }
}

/// Percentile (`p` in `0.0..=1.0`) of pre-sorted values, R-7 interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
