use serde::{Deserialize, Serialize};

use crate::error::{ProcyonError, Result};

/// One (input, output) anchor of an interpolated tone curve, both in [0,1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f32,
    pub y: f32,
}

impl ControlPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An ordered set of at least two control points with strictly increasing x.
///
/// Validated at construction; a violating set is a configuration error, so
/// curve evaluation never has to re-check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ControlPoint>", into = "Vec<ControlPoint>")]
pub struct ControlPointSet {
    points: Vec<ControlPoint>,
}

impl ControlPointSet {
    pub fn new(points: Vec<ControlPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ProcyonError::InvalidCurveConfig(format!(
                "need at least 2 control points, got {}",
                points.len()
            )));
        }
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(ProcyonError::InvalidCurveConfig(format!(
                    "non-finite control point ({}, {})",
                    p.x, p.y
                )));
            }
        }
        for pair in points.windows(2) {
            if pair[1].x <= pair[0].x {
                return Err(ProcyonError::InvalidCurveConfig(format!(
                    "control point x values must be strictly increasing ({} then {})",
                    pair[0].x, pair[1].x
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }
}

impl TryFrom<Vec<ControlPoint>> for ControlPointSet {
    type Error = ProcyonError;

    fn try_from(points: Vec<ControlPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<ControlPointSet> for Vec<ControlPoint> {
    fn from(set: ControlPointSet) -> Self {
        set.points
    }
}

/// Natural cubic spline through a control point set.
///
/// Second derivatives are solved once at fit time (tridiagonal system with
/// natural boundary conditions); evaluation is O(log n) per sample.
/// Control points are reproduced exactly.
#[derive(Clone, Debug)]
pub struct NaturalCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivs: Vec<f64>,
}

impl NaturalCubicSpline {
    pub fn fit(set: &ControlPointSet) -> Self {
        let xs: Vec<f64> = set.points().iter().map(|p| p.x as f64).collect();
        let ys: Vec<f64> = set.points().iter().map(|p| p.y as f64).collect();
        let second_derivs = solve_second_derivatives(&xs, &ys);
        Self {
            xs,
            ys,
            second_derivs,
        }
    }

    /// Evaluate the spline at `x`. Values outside the control point range are
    /// extrapolated with the boundary segment's cubic.
    pub fn evaluate(&self, x: f32) -> f32 {
        let x = x as f64;
        let n = self.xs.len();
        let i = match self.xs.binary_search_by(|xk| xk.total_cmp(&x)) {
            Ok(i) => i.min(n - 2),
            Err(i) => i.saturating_sub(1).min(n - 2),
        };

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = 1.0 - a;
        let y = a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.second_derivs[i]
                + (b.powi(3) - b) * self.second_derivs[i + 1])
                * h
                * h
                / 6.0;
        y as f32
    }
}

/// Solve the natural-spline tridiagonal system for second derivatives.
/// Boundary values are zero; interior values come from a Thomas solve.
fn solve_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0f64; n];
    if n <= 2 {
        return m;
    }

    let interior = n - 2;
    let mut diag = vec![0.0f64; interior];
    let mut upper = vec![0.0f64; interior];
    let mut rhs = vec![0.0f64; interior];

    for k in 0..interior {
        let i = k + 1;
        let h_lo = xs[i] - xs[i - 1];
        let h_hi = xs[i + 1] - xs[i];
        diag[k] = 2.0 * (h_lo + h_hi);
        upper[k] = h_hi;
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h_hi - (ys[i] - ys[i - 1]) / h_lo);
    }

    // Forward elimination. The sub-diagonal entry for row k is h between
    // points k and k+1, recomputed on the fly.
    for k in 1..interior {
        let lower = xs[k + 1] - xs[k];
        let factor = lower / diag[k - 1];
        diag[k] -= factor * upper[k - 1];
        rhs[k] -= factor * rhs[k - 1];
    }

    // Back substitution into the interior of m.
    m[interior] = rhs[interior - 1] / diag[interior - 1];
    for k in (0..interior - 1).rev() {
        m[k + 1] = (rhs[k] - upper[k] * m[k + 2]) / diag[k];
    }

    m
}
