//! Piecewise-cubic interpolation of prepared rate-quality curves.
//!
//! Two fitting methods are supported, selected by [`Method`]:
//!
//! - [`Method::Akima`]: locally weighted Hermite slopes, resistant to
//!   overshoot near sharp changes in curvature.
//! - [`Method::Cubic`]: natural cubic spline (C2, zero curvature at both ends).
//!
//! Both produce an [`Interpolant`], a list of cubic segments in local form
//! `c0 + c1*t + c2*t^2 + c3*t^3` with `t = x - x_i`. Integration uses the
//! closed-form antiderivative of each segment.

mod akima;
mod cubic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curve::{PreparedCurve, check_ascending};
use crate::error::{Error, Result};

pub use akima::Akima;
pub use cubic::NaturalCubic;

/// Local cubic coefficients `[c0, c1, c2, c3]` of one segment.
pub type Segment = [f64; 4];

/// Interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Akima spline (default).
    #[default]
    Akima,
    /// Natural cubic spline.
    Cubic,
}

impl Method {
    /// All supported methods.
    pub const ALL: [Self; 2] = [Self::Akima, Self::Cubic];

    /// Lowercase method name as accepted by [`Method::from_str`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Akima => "akima",
            Self::Cubic => "cubic",
        }
    }

    /// Fit a prepared curve with this method.
    pub fn fit(self, curve: &PreparedCurve) -> Result<Interpolant> {
        self.fit_points(curve.label(), curve.x(), curve.y())
    }

    /// Fit raw knots. `x` must be strictly ascending with at least two points.
    pub fn fit_points(self, label: &str, x: &[f64], y: &[f64]) -> Result<Interpolant> {
        if x.len() != y.len() {
            return Err(Error::invalid_input(
                label,
                format!("x and y lengths differ ({} vs {})", x.len(), y.len()),
            ));
        }
        if x.len() < 2 {
            return Err(Error::degenerate(
                label,
                format!("{} needs at least 2 points, got {}", self, x.len()),
            ));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(Error::invalid_input(label, "non-finite knot value"));
        }
        check_ascending(label, x)?;

        let segments = match self {
            Self::Akima => Akima.segments(x, y),
            Self::Cubic => NaturalCubic.segments(x, y),
        };
        Ok(Interpolant::from_segments(self, x.to_vec(), segments))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "akima" => Ok(Self::Akima),
            "cubic" => Ok(Self::Cubic),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// Capability shared by the fitting algorithms.
///
/// Implementors receive validated knots (strictly ascending `x`, at least
/// two points) and return one [`Segment`] per knot interval.
pub trait SplineFit {
    /// Compute the local cubic coefficients of every segment.
    fn segments(&self, x: &[f64], y: &[f64]) -> Vec<Segment>;
}

/// Cubic Hermite segment through `(0, y0)` and `(h, y1)` with end slopes `d0`, `d1`.
pub(crate) fn hermite_segment(h: f64, y0: f64, y1: f64, d0: f64, d1: f64) -> Segment {
    let s = (y1 - y0) / h;
    [
        y0,
        d0,
        (3.0 * s - 2.0 * d0 - d1) / h,
        (d0 + d1 - 2.0 * s) / (h * h),
    ]
}

/// A fitted piecewise-cubic function over `[x_min, x_max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpolant {
    method: Method,
    knots: Vec<f64>,
    segments: Vec<Segment>,
    /// Integral from the first knot to each knot.
    cumulative: Vec<f64>,
}

impl Interpolant {
    /// Fit a prepared curve. Shorthand for [`Method::fit`].
    ///
    /// # Example
    ///
    /// ```
    /// use bd_rate::curve::PreparedCurve;
    /// use bd_rate::interpolation::{Interpolant, Method};
    ///
    /// let curve = PreparedCurve::prepare(&[100.0, 200.0, 400.0], &[30.0, 33.0, 36.0]).unwrap();
    /// let spline = Interpolant::fit(&curve, Method::Cubic).unwrap();
    ///
    /// // log10(rate) is linear in the metric here, so the spline is exact
    /// let expected = 2.0 + 1.5 * 2f64.log10();
    /// assert!((spline.evaluate(34.5) - expected).abs() < 1e-9);
    /// assert!((spline.integrate(30.0, 36.0) - 6.0 * 200f64.log10()).abs() < 1e-9);
    /// ```
    pub fn fit(curve: &PreparedCurve, method: Method) -> Result<Self> {
        method.fit(curve)
    }

    fn from_segments(method: Method, knots: Vec<f64>, segments: Vec<Segment>) -> Self {
        let mut cumulative = Vec::with_capacity(knots.len());
        let mut total = 0.0;
        cumulative.push(total);
        for (i, seg) in segments.iter().enumerate() {
            total += segment_antiderivative(seg, knots[i + 1] - knots[i]);
            cumulative.push(total);
        }

        Self {
            method,
            knots,
            segments,
            cumulative,
        }
    }

    /// Method used to build this interpolant.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Knot positions.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Per-segment local coefficients.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `(x_min, x_max)` of the fitted data.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Index of the segment used for `x`. Outside the domain the first or
    /// last segment is extended.
    fn segment_index(&self, x: f64) -> usize {
        self.knots
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(self.segments.len() - 1)
    }

    /// Evaluate the interpolant at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        let [c0, c1, c2, c3] = self.segments[i];
        let t = x - self.knots[i];
        c0 + t * (c1 + t * (c2 + t * c3))
    }

    /// Integral of the interpolant from `x_min` to `x`.
    #[must_use]
    pub fn antiderivative(&self, x: f64) -> f64 {
        let i = self.segment_index(x);
        self.cumulative[i] + segment_antiderivative(&self.segments[i], x - self.knots[i])
    }

    /// Definite integral from `a` to `b`. Negative when `a > b`.
    #[must_use]
    pub fn integrate(&self, a: f64, b: f64) -> f64 {
        self.antiderivative(b) - self.antiderivative(a)
    }
}

/// Integral of a local cubic from `0` to `t`.
fn segment_antiderivative(seg: &Segment, t: f64) -> f64 {
    let [c0, c1, c2, c3] = *seg;
    t * (c0 + t * (c1 / 2.0 + t * (c2 / 3.0 + t * c3 / 4.0)))
}

/// Definite integral of `interpolant` over `[lo, hi]`.
///
/// Both curves of a comparison are integrated over the same window with this
/// function; fitting has already rejected every failure case.
#[must_use]
pub fn definite_integral(interpolant: &Interpolant, lo: f64, hi: f64) -> f64 {
    interpolant.integrate(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> (Vec<f64>, Vec<f64>) {
        let x = vec![28.0, 30.5, 33.0, 34.2, 37.0, 39.5];
        let y = vec![1.9, 2.1, 2.45, 2.6, 2.95, 3.4];
        (x, y)
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("akima".parse::<Method>().unwrap(), Method::Akima);
        assert_eq!("Cubic".parse::<Method>().unwrap(), Method::Cubic);
        assert_eq!(" CUBIC ".parse::<Method>().unwrap(), Method::Cubic);

        let err = "linear".parse::<Method>().unwrap_err();
        assert!(matches!(err, Error::UnknownMethod(ref m) if m == "linear"));
    }

    #[test]
    fn test_method_display_and_default() {
        assert_eq!(Method::default(), Method::Akima);
        assert_eq!(Method::Akima.to_string(), "akima");
        assert_eq!(Method::Cubic.to_string(), "cubic");
        assert_eq!(serde_json::to_string(&Method::Cubic).unwrap(), "\"cubic\"");
    }

    #[test]
    fn test_interpolates_knots() {
        let (x, y) = sample_points();
        for method in Method::ALL {
            let spline = method.fit_points("t", &x, &y).unwrap();
            for (xi, yi) in x.iter().zip(&y) {
                assert!(
                    (spline.evaluate(*xi) - yi).abs() < 1e-12,
                    "{method} at {xi}: {} != {yi}",
                    spline.evaluate(*xi)
                );
            }
        }
    }

    #[test]
    fn test_linear_data_reproduced() {
        let x = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 0.3 * v + 1.0).collect();

        for method in Method::ALL {
            let spline = method.fit_points("t", &x, &y).unwrap();
            for t in [0.5, 1.7, 3.3, 6.1] {
                assert!((spline.evaluate(t) - (0.3 * t + 1.0)).abs() < 1e-12);
            }
            // Integral of 0.3x + 1 over [0.5, 6.5] = 0.15*(6.5^2 - 0.5^2) + 6
            let expected = 0.15 * (6.5f64.powi(2) - 0.25) + 6.0;
            assert!((spline.integrate(0.5, 6.5) - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_two_points_degrade_to_linear() {
        for method in Method::ALL {
            let spline = method.fit_points("t", &[1.0, 3.0], &[2.0, 6.0]).unwrap();
            assert_eq!(spline.segments().len(), 1);
            assert!((spline.evaluate(2.0) - 4.0).abs() < 1e-12);
            assert!((spline.integrate(1.0, 3.0) - 8.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_integrate_additive_and_reversed() {
        let (x, y) = sample_points();
        for method in Method::ALL {
            let spline = method.fit_points("t", &x, &y).unwrap();
            let whole = spline.integrate(29.0, 38.0);
            let split = spline.integrate(29.0, 33.7) + spline.integrate(33.7, 38.0);
            assert!((whole - split).abs() < 1e-10);
            assert!((spline.integrate(38.0, 29.0) + whole).abs() < 1e-12);
            assert_eq!(spline.integrate(31.0, 31.0), 0.0);
        }
    }

    #[test]
    fn test_integrate_matches_numeric_quadrature() {
        let (x, y) = sample_points();
        for method in Method::ALL {
            let spline = method.fit_points("t", &x, &y).unwrap();
            let (lo, hi) = (29.2, 38.8);

            // Composite Simpson's rule, exact enough for cubics on a fine grid
            let n = 20_000;
            let h = (hi - lo) / n as f64;
            let mut sum = spline.evaluate(lo) + spline.evaluate(hi);
            for i in 1..n {
                let w = if i % 2 == 1 { 4.0 } else { 2.0 };
                sum += w * spline.evaluate(lo + h * i as f64);
            }
            let simpson = sum * h / 3.0;

            assert!((spline.integrate(lo, hi) - simpson).abs() < 1e-7);
        }
    }

    #[test]
    fn test_antiderivative_at_knots() {
        let (x, y) = sample_points();
        let spline = Method::Cubic.fit_points("t", &x, &y).unwrap();
        assert_eq!(spline.antiderivative(x[0]), 0.0);
        assert_eq!(spline.domain(), (28.0, 39.5));
        assert_eq!(spline.method(), Method::Cubic);
        assert!(definite_integral(&spline, 28.0, 39.5) > 0.0);
    }

    #[test]
    fn test_fit_rejects_duplicates() {
        for method in Method::ALL {
            let err = method
                .fit_points("t", &[1.0, 2.0, 2.0, 3.0], &[1.0, 2.0, 2.5, 3.0])
                .unwrap_err();
            assert!(matches!(err, Error::DegenerateCurve { .. }));
        }
    }

    #[test]
    fn test_fit_rejects_descending_and_short() {
        let err = Method::Akima
            .fit_points("t", &[3.0, 2.0, 1.0], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateCurve { .. }));

        let err = Method::Cubic.fit_points("t", &[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, Error::DegenerateCurve { .. }));

        let err = Method::Cubic
            .fit_points("t", &[1.0, 2.0], &[1.0])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }
}
