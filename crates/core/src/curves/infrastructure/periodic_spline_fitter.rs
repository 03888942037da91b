use crate::curves::domain::curve_fitter::{CurveFitter, FitResult, SkipReason};
use crate::curves::domain::smoothed_curve::SmoothedCurve;
use crate::shapes::domain::polygon::Polygon;
use crate::shared::constants::{MIN_SPLINE_POINTS, SPLINE_SMOOTHING};

use super::skyline::SkylineMatrix;

/// Penalty weights are searched within this many decades either side of
/// the weight that balances roughness against fidelity for uniform knots.
const PENALTY_DECADES: f64 = 8.0;
const MAX_BISECTIONS: usize = 100;
/// Relative tolerance on the residual target.
const RESIDUAL_TOLERANCE: f64 = 1e-3;

/// Fits a closed cubic smoothing spline through a polygon's vertices.
///
/// Vertices are parameterized by cumulative chord length normalized to
/// `[0, 1)`, with the closing edge included so the curve is periodic.
/// The spline minimizes `Σ |p_i - s(t_i)|² + λ ∫ |s''(t)|² dt`; `λ` is
/// chosen so the summed squared residual over both coordinates equals the
/// smoothing tolerance. When even the smoothest admissible curve stays
/// within tolerance, that curve is used.
pub struct PeriodicSplineFitter {
    smoothing: f64,
    samples: Option<usize>,
}

impl PeriodicSplineFitter {
    /// `samples = None` evaluates once per vertex; otherwise the curve is
    /// resampled at `samples` evenly spaced parameters. Either way the last
    /// sample repeats the first so the curve is drawn closed.
    pub fn new(smoothing: f64, samples: Option<usize>) -> Self {
        Self {
            smoothing: smoothing.max(0.0),
            samples,
        }
    }

    fn try_fit(&self, polygon: &Polygon) -> Result<SmoothedCurve, SkipReason> {
        let mut points: Vec<(f64, f64)> = polygon
            .points()
            .iter()
            .map(|&(x, y)| (x as f64, y as f64))
            .collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < MIN_SPLINE_POINTS {
            return Err(SkipReason::TooFewPoints {
                found: points.len(),
                required: MIN_SPLINE_POINTS,
            });
        }

        let knots = Knots::chord_length(&points)?;
        let system = PeriodicSystem::new(&knots);
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let fit = system.fit_within(&xs, &ys, self.smoothing)?;

        let params: Vec<f64> = match self.samples {
            Some(m) if m >= 2 => (0..m).map(|i| i as f64 / (m - 1) as f64).collect(),
            _ => knots.t.iter().copied().chain(std::iter::once(1.0)).collect(),
        };

        let mut cx = Vec::with_capacity(params.len());
        let mut cy = Vec::with_capacity(params.len());
        for &t in &params {
            let (x, y) = fit.evaluate(&knots, t);
            if !x.is_finite() || !y.is_finite() {
                return Err(SkipReason::NonFinite);
            }
            cx.push(x);
            cy.push(y);
        }

        Ok(SmoothedCurve::new(cx, cy))
    }
}

impl Default for PeriodicSplineFitter {
    fn default() -> Self {
        Self::new(SPLINE_SMOOTHING, None)
    }
}

impl CurveFitter for PeriodicSplineFitter {
    fn fit(&self, polygon: &Polygon) -> FitResult {
        match self.try_fit(polygon) {
            Ok(curve) => FitResult::Fitted(curve),
            Err(reason) => FitResult::Skipped(reason),
        }
    }
}

/// Knot parameters `t_i` and spacings `h_i = t_{i+1} - t_i`, where
/// `t_n = 1` closes the loop.
struct Knots {
    t: Vec<f64>,
    h: Vec<f64>,
}

impl Knots {
    fn chord_length(points: &[(f64, f64)]) -> Result<Self, SkipReason> {
        let n = points.len();
        let lengths: Vec<f64> = (0..n)
            .map(|i| {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % n];
                (x1 - x0).hypot(y1 - y0)
            })
            .collect();

        if let Some(index) = lengths.iter().position(|&l| l == 0.0) {
            return Err(SkipReason::DuplicatePoints { index });
        }

        let perimeter: f64 = lengths.iter().sum();
        let h: Vec<f64> = lengths.iter().map(|l| l / perimeter).collect();
        let t = h
            .iter()
            .scan(0.0, |acc, &hi| {
                let ti = *acc;
                *acc += hi;
                Some(ti)
            })
            .collect();
        Ok(Self { t, h })
    }

    fn len(&self) -> usize {
        self.t.len()
    }

    /// Index `i` of the span `[t_i, t_{i+1})` containing `t`.
    fn span(&self, t: f64) -> usize {
        self.t.partition_point(|&ti| ti <= t).saturating_sub(1)
    }
}

/// The cyclic second-difference operator `Q` and the Gram matrix `R` of
/// the periodic cubic spline space on a fixed knot sequence.
///
/// Second derivatives `γ` at the knots satisfy `(R + λ Q²) γ = Q y`, and
/// the fitted values are `g = y - λ Q γ` (`Q` is symmetric for periodic
/// knots).
struct PeriodicSystem {
    n: usize,
    q_rows: Vec<[(usize, f64); 3]>,
    r_terms: Vec<(usize, usize, f64)>,
    qq_terms: Vec<(usize, usize, f64)>,
}

struct SplineFit {
    gx: Vec<f64>,
    gy: Vec<f64>,
    gamma_x: Vec<f64>,
    gamma_y: Vec<f64>,
    residual: f64,
}

impl PeriodicSystem {
    fn new(knots: &Knots) -> Self {
        let n = knots.len();
        let h = &knots.h;
        let prev = |i: usize| (i + n - 1) % n;
        let next = |i: usize| (i + 1) % n;

        let q_rows: Vec<[(usize, f64); 3]> = (0..n)
            .map(|i| {
                let hp = h[prev(i)];
                let hi = h[i];
                [
                    (prev(i), 1.0 / hp),
                    (i, -1.0 / hp - 1.0 / hi),
                    (next(i), 1.0 / hi),
                ]
            })
            .collect();

        let mut r_terms = Vec::with_capacity(2 * n);
        for i in 0..n {
            r_terms.push((i, i, (h[prev(i)] + h[i]) / 3.0));
            r_terms.push((next(i), i, h[i] / 6.0));
        }

        // Q² restricted to the lower triangle (the product is symmetric).
        let mut qq_terms = Vec::with_capacity(9 * n);
        for (i, row) in q_rows.iter().enumerate() {
            for &(k, a) in row {
                for &(j, b) in &q_rows[k] {
                    if j <= i {
                        qq_terms.push((i, j, a * b));
                    }
                }
            }
        }

        Self {
            n,
            q_rows,
            r_terms,
            qq_terms,
        }
    }

    fn apply_q(&self, v: &[f64]) -> Vec<f64> {
        self.q_rows
            .iter()
            .map(|row| row.iter().map(|&(k, a)| a * v[k]).sum())
            .collect()
    }

    fn solve(&self, xs: &[f64], ys: &[f64], lambda: f64) -> Result<SplineFit, SkipReason> {
        let coords = self
            .r_terms
            .iter()
            .chain(&self.qq_terms)
            .map(|&(i, j, _)| (i, j));
        let mut a = SkylineMatrix::with_profile(self.n, coords);
        for &(i, j, v) in &self.r_terms {
            a.add(i, j, v);
        }
        if lambda > 0.0 {
            for &(i, j, v) in &self.qq_terms {
                a.add(i, j, lambda * v);
            }
        }
        let chol = a.factor().ok_or(SkipReason::SingularSystem)?;

        let gamma_x = chol.solve(&self.apply_q(xs));
        let gamma_y = chol.solve(&self.apply_q(ys));
        let dx = self.apply_q(&gamma_x);
        let dy = self.apply_q(&gamma_y);

        let gx: Vec<f64> = xs.iter().zip(&dx).map(|(v, d)| v - lambda * d).collect();
        let gy: Vec<f64> = ys.iter().zip(&dy).map(|(v, d)| v - lambda * d).collect();
        let residual = lambda
            * lambda
            * dx.iter().chain(&dy).map(|d| d * d).sum::<f64>();

        if !residual.is_finite() {
            return Err(SkipReason::NonFinite);
        }
        Ok(SplineFit {
            gx,
            gy,
            gamma_x,
            gamma_y,
            residual,
        })
    }

    /// Picks `λ` so the residual matches `smoothing`. The residual grows
    /// monotonically with `λ`, so bisection in log space converges.
    fn fit_within(&self, xs: &[f64], ys: &[f64], smoothing: f64) -> Result<SplineFit, SkipReason> {
        if smoothing == 0.0 {
            return self.solve(xs, ys, 0.0);
        }

        let natural = (self.n as f64).powi(-3);
        let mut lo = natural * 10f64.powf(-PENALTY_DECADES);
        let mut hi = natural * 10f64.powf(PENALTY_DECADES);

        let smoothest = self.solve(xs, ys, hi)?;
        if smoothest.residual <= smoothing {
            return Ok(smoothest);
        }
        let mut best = self.solve(xs, ys, lo)?;
        if best.residual >= smoothing {
            return Ok(best);
        }

        for _ in 0..MAX_BISECTIONS {
            let mid = (lo * hi).sqrt();
            let fit = self.solve(xs, ys, mid)?;
            if (fit.residual - smoothing).abs() <= RESIDUAL_TOLERANCE * smoothing {
                return Ok(fit);
            }
            if fit.residual < smoothing {
                lo = mid;
                best = fit;
            } else {
                hi = mid;
            }
        }
        Ok(best)
    }
}

impl SplineFit {
    fn evaluate(&self, knots: &Knots, t: f64) -> (f64, f64) {
        let n = knots.len();
        let t = t.clamp(0.0, 1.0);
        let i = knots.span(t);
        let j = (i + 1) % n;
        let h = knots.h[i];
        let a = t - knots.t[i];
        let b = h - a;

        let cubic = |g: &[f64], gamma: &[f64]| {
            (a * g[j] + b * g[i]) / h
                - a * b / 6.0 * ((1.0 + a / h) * gamma[j] + (1.0 + b / h) * gamma[i])
        };
        (cubic(&self.gx, &self.gamma_x), cubic(&self.gy, &self.gamma_y))
    }
}
