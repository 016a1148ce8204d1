//! Rate-quality curve preparation.
//!
//! Raw `(rate, metric)` samples arrive in caller order. A [`PreparedCurve`]
//! sorts them by ascending rate and maps them to interpolation space:
//! `x = metric`, `y = log10(rate)`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single measured point on a rate-quality curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Bitrate (or file size, bpp, ...). Must be positive.
    pub rate: f64,
    /// Quality metric value (e.g. PSNR). Higher is better.
    pub metric: f64,
}

impl Sample {
    /// Create a new sample.
    #[must_use]
    pub fn new(rate: f64, metric: f64) -> Self {
        Self { rate, metric }
    }
}

/// A curve sorted by rate and transformed to `(metric, log10(rate))`.
///
/// Invariants: `x.len() == y.len() >= 2` and `x` is strictly ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedCurve {
    label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PreparedCurve {
    /// Prepare a curve from parallel rate and metric sequences.
    ///
    /// Samples are sorted by rate. Equal rates are ordered by metric rather
    /// than kept in input order, so the result does not depend on how the
    /// samples were listed.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_rate::curve::PreparedCurve;
    ///
    /// let curve = PreparedCurve::prepare(&[400.0, 100.0, 200.0], &[36.0, 30.0, 33.0]).unwrap();
    /// assert_eq!(curve.x(), &[30.0, 33.0, 36.0]);
    /// assert!((curve.y()[0] - 2.0).abs() < 1e-12);
    /// ```
    pub fn prepare(rate: &[f64], metric: &[f64]) -> Result<Self> {
        Self::prepare_labeled("curve", rate, metric)
    }

    /// Like [`PreparedCurve::prepare`], but errors name the curve `label`.
    pub fn prepare_labeled(label: &str, rate: &[f64], metric: &[f64]) -> Result<Self> {
        if rate.len() != metric.len() {
            return Err(Error::invalid_input(
                label,
                format!(
                    "rate and metric lengths differ ({} vs {})",
                    rate.len(),
                    metric.len()
                ),
            ));
        }
        if rate.len() < 2 {
            return Err(Error::invalid_input(
                label,
                format!("at least 2 samples required, got {}", rate.len()),
            ));
        }
        if let Some((i, r)) = rate
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r <= 0.0)
        {
            return Err(Error::invalid_input(
                label,
                format!("rate[{i}] = {r} is not a positive finite number"),
            ));
        }
        if let Some((i, m)) = metric.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(Error::invalid_input(
                label,
                format!("metric[{i}] = {m} is not finite"),
            ));
        }

        // Ties on rate are broken by metric so the result is independent of input order.
        let mut indices: Vec<usize> = (0..rate.len()).collect();
        indices.sort_by(|&i, &j| {
            rate[i]
                .total_cmp(&rate[j])
                .then_with(|| metric[i].total_cmp(&metric[j]))
        });

        let x: Vec<f64> = indices.iter().map(|&i| metric[i]).collect();
        let y: Vec<f64> = indices.iter().map(|&i| rate[i].log10()).collect();

        check_ascending(label, &x)?;

        Ok(Self {
            label: label.to_string(),
            x,
            y,
        })
    }

    /// Prepare a curve from samples.
    pub fn from_samples(label: &str, samples: &[Sample]) -> Result<Self> {
        let rate: Vec<f64> = samples.iter().map(|s| s.rate).collect();
        let metric: Vec<f64> = samples.iter().map(|s| s.metric).collect();
        Self::prepare_labeled(label, &rate, &metric)
    }

    /// Curve label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Metric values, ascending.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// `log10(rate)` values, in the same order as [`PreparedCurve::x`].
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false; a prepared curve holds at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Smallest metric value.
    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    /// Largest metric value.
    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }
}

/// Require `x` to be strictly ascending.
///
/// Sorting by rate only sorts by metric when the two are co-monotonic, so a
/// curve where more bits buy less quality is rejected here.
pub(crate) fn check_ascending(label: &str, x: &[f64]) -> Result<()> {
    for (i, pair) in x.windows(2).enumerate() {
        if pair[1] == pair[0] {
            return Err(Error::degenerate(
                label,
                format!("duplicate metric value {} at sorted index {}", pair[0], i + 1),
            ));
        }
        if pair[1] < pair[0] {
            return Err(Error::degenerate(
                label,
                format!(
                    "metric is not increasing with rate ({} then {} at sorted index {})",
                    pair[0],
                    pair[1],
                    i + 1
                ),
            ));
        }
    }
    Ok(())
}
