//! Akima spline slopes.

use super::{Segment, SplineFit, hermite_segment};

/// Akima (1970) piecewise-cubic Hermite interpolation.
///
/// The slope at each knot is a weighted mean of the two adjacent secants,
/// each weighted by how much the secants on the *opposite* side change.
/// At the ends, two extra secants per side are extrapolated linearly
/// (`m[-1] = 2*m[0] - m[1]`, and so on). Two points give a straight line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Akima;

impl SplineFit for Akima {
    fn segments(&self, x: &[f64], y: &[f64]) -> Vec<Segment> {
        let slopes = akima_slopes(x, y);
        (0..x.len() - 1)
            .map(|i| hermite_segment(x[i + 1] - x[i], y[i], y[i + 1], slopes[i], slopes[i + 1]))
            .collect()
    }
}

/// Knot slopes for Akima interpolation.
fn akima_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 2 {
        let s = (y[1] - y[0]) / (x[1] - x[0]);
        return vec![s, s];
    }

    // m[k + 2] holds the secant of segment k, for k in -2..=n.
    let mut m = vec![0.0; n + 3];
    for i in 0..n - 1 {
        m[i + 2] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    m[n + 1] = 2.0 * m[n] - m[n - 1];
    m[n + 2] = 2.0 * m[n + 1] - m[n];

    (0..n)
        .map(|i| {
            let w_left = (m[i + 3] - m[i + 2]).abs();
            let w_right = (m[i + 1] - m[i]).abs();
            if w_left + w_right > 0.0 {
                (w_left * m[i + 1] + w_right * m[i + 2]) / (w_left + w_right)
            } else {
                // Locally linear: all four secants agree
                (m[i + 1] + m[i + 2]) / 2.0
            }
        })
        .collect()
}
