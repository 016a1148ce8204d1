//! Natural cubic spline.

use super::{Segment, SplineFit};

/// Natural cubic spline: C2 continuous, zero second derivative at both ends.
///
/// The interior second derivatives `M[1..n-1]` solve the tridiagonal system
///
/// ```text
/// h[i-1]*M[i-1] + 2*(h[i-1] + h[i])*M[i] + h[i]*M[i+1] = 6*(s[i] - s[i-1])
/// ```
///
/// with `M[0] = M[n-1] = 0`, `h` the knot spacing and `s` the secants. The
/// matrix is strictly diagonally dominant for ascending knots, so the Thomas
/// algorithm needs no pivoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalCubic;

impl SplineFit for NaturalCubic {
    fn segments(&self, x: &[f64], y: &[f64]) -> Vec<Segment> {
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();
        let m = second_derivatives(&h, &s);

        (0..n - 1)
            .map(|i| {
                [
                    y[i],
                    s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / (6.0 * h[i]),
                ]
            })
            .collect()
    }
}

/// Second derivatives at every knot, natural boundary.
fn second_derivatives(h: &[f64], s: &[f64]) -> Vec<f64> {
    let n = h.len() + 1;
    let mut m = vec![0.0; n];
    let interior = n - 2;
    if interior == 0 {
        return m;
    }

    // Row k of the system is knot k + 1.
    let mut diag: Vec<f64> = (0..interior).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
    let mut rhs: Vec<f64> = (0..interior).map(|k| 6.0 * (s[k + 1] - s[k])).collect();

    // Forward elimination: sub-diagonal of row k is h[k], super-diagonal is h[k + 1].
    for k in 1..interior {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * h[k];
        rhs[k] -= w * rhs[k - 1];
    }

    // Back substitution
    m[interior] = rhs[interior - 1] / diag[interior - 1];
    for k in (0..interior - 1).rev() {
        m[k + 1] = (rhs[k] - h[k + 1] * m[k + 2]) / diag[k];
    }

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Method;

    #[test]
    fn test_known_values() {
        // Natural spline through (0,0), (1,1), (2,0): M1 = -3
        let spline = Method::Cubic
            .fit_points("t", &[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0])
            .unwrap();

        let seg = spline.segments()[0];
        assert!((seg[1] - 1.5).abs() < 1e-12);
        assert!(seg[2].abs() < 1e-12);
        assert!((seg[3] + 0.5).abs() < 1e-12);

        assert!((spline.evaluate(0.5) - 0.6875).abs() < 1e-12);
        assert!((spline.evaluate(1.5) - 0.6875).abs() < 1e-12);
        assert!((spline.integrate(0.0, 2.0) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_natural_boundary() {
        let x = [0.0, 0.7, 1.9, 2.4, 4.0];
        let y = [1.0, 0.2, 2.3, 2.0, 3.1];
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<f64> = (0..4).map(|i| (y[i + 1] - y[i]) / h[i]).collect();
        let m = second_derivatives(&h, &s);

        assert_eq!(m[0], 0.0);
        assert_eq!(m[4], 0.0);

        // Every interior row of the tridiagonal system holds
        for i in 1..4 {
            let lhs = h[i - 1] * m[i - 1] + 2.0 * (h[i - 1] + h[i]) * m[i] + h[i] * m[i + 1];
            assert!((lhs - 6.0 * (s[i] - s[i - 1])).abs() < 1e-10);
        }
    }

    #[test]
    fn test_c2_continuity() {
        let x = [0.0, 0.7, 1.9, 2.4, 4.0];
        let y = [1.0, 0.2, 2.3, 2.0, 3.1];
        let spline = Method::Cubic.fit_points("t", &x, &y).unwrap();
        let segs = spline.segments();

        for i in 0..segs.len() - 1 {
            let h = x[i + 1] - x[i];
            let [_, c1, c2, c3] = segs[i];
            let slope_end = c1 + 2.0 * c2 * h + 3.0 * c3 * h * h;
            let curv_end = 2.0 * c2 + 6.0 * c3 * h;
            assert!((slope_end - segs[i + 1][1]).abs() < 1e-10);
            assert!((curv_end - 2.0 * segs[i + 1][2]).abs() < 1e-10);
        }

        // Zero curvature at the last knot
        let last = segs[segs.len() - 1];
        let h = x[4] - x[3];
        assert!((2.0 * last[2] + 6.0 * last[3] * h).abs() < 1e-10);
    }
}
