//! Quality-domain overlap between two curves.
//!
//! BD-rate is only meaningful over the metric range both curves cover. The
//! overlap ratio is the width of that shared range divided by the width of
//! the combined range, and must reach a caller-chosen minimum.

use serde::{Deserialize, Serialize};

use crate::curve::PreparedCurve;
use crate::error::{Error, Result};

/// The shared metric interval of two curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapWindow {
    /// Lower bound of the shared interval.
    pub lo: f64,
    /// Upper bound of the shared interval.
    pub hi: f64,
    /// Shared width divided by combined width, in `[0, 1]`.
    pub ratio: f64,
}

impl OverlapWindow {
    /// Width of the shared interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// Compute the overlap ratio of two intervals `[a.0, a.1]` and `[b.0, b.1]`.
///
/// Returns `0.0` for disjoint or touching intervals, and also when both
/// intervals collapse to the same single point.
///
/// # Example
///
/// ```
/// use bd_rate::overlap::overlap_ratio;
///
/// assert!((overlap_ratio((30.0, 36.0), (33.0, 39.0)) - 3.0 / 9.0).abs() < 1e-12);
/// assert_eq!(overlap_ratio((30.0, 33.0), (34.0, 39.0)), 0.0);
/// ```
#[must_use]
pub fn overlap_ratio(a: (f64, f64), b: (f64, f64)) -> f64 {
    // Halved widths stay finite for any finite endpoints
    let total = a.1.max(b.1) / 2.0 - a.0.min(b.0) / 2.0;
    let shared = (a.1.min(b.1) / 2.0 - a.0.max(b.0) / 2.0).max(0.0);
    if total > 0.0 { shared / total } else { 0.0 }
}

/// Compute the overlap window of two prepared curves and enforce `min_overlap`.
///
/// Fails with [`Error::NoOverlap`] when the ratio is zero and with
/// [`Error::InsufficientOverlap`] when it is positive but below `min_overlap`.
/// Metric ranges whose combined width is not representable as an `f64` are
/// rejected with [`Error::InvalidInput`].
pub fn validate(
    anchor: &PreparedCurve,
    test: &PreparedCurve,
    min_overlap: f64,
) -> Result<OverlapWindow> {
    check_min_overlap(min_overlap)?;

    let a = (anchor.x_min(), anchor.x_max());
    let b = (test.x_min(), test.x_max());

    let total = a.1.max(b.1) - a.0.min(b.0);
    if !total.is_finite() {
        return Err(Error::invalid_input(
            "metric",
            format!(
                "combined range [{}, {}] is too wide",
                a.0.min(b.0),
                a.1.max(b.1)
            ),
        ));
    }

    let ratio = overlap_ratio(a, b);
    if ratio == 0.0 {
        return Err(Error::NoOverlap { anchor: a, test: b });
    }
    if ratio < min_overlap {
        return Err(Error::InsufficientOverlap {
            overlap: ratio,
            min_overlap,
        });
    }

    Ok(OverlapWindow {
        lo: a.0.max(b.0),
        hi: a.1.min(b.1),
        ratio,
    })
}

/// Reject thresholds outside `[0, 1]`.
pub(crate) fn check_min_overlap(min_overlap: f64) -> Result<()> {
    if (0.0..=1.0).contains(&min_overlap) {
        Ok(())
    } else {
        Err(Error::invalid_input(
            "min_overlap",
            format!("{min_overlap} is outside [0, 1]"),
        ))
    }
}
