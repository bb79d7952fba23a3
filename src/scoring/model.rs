use ndarray::{s, Array1, Array2};

use crate::error::{Result, ScoringError};

/// Default polynomial degree; high enough to follow the table's curvature.
pub const DEFAULT_DEGREE: usize = 15;

/// Which way a model maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// x = mark, y = points
    MarkToPoints,
    /// x = points, y = mark
    PointsToMark,
}

impl Direction {
    pub(crate) fn slot(&self) -> usize {
        match self {
            Direction::MarkToPoints => 0,
            Direction::PointsToMark => 1,
        }
    }
}

/// Least-squares polynomial fitted to one event column in one direction.
///
/// The independent variable is mapped affinely onto [-1, 1] before fitting;
/// `coefficients` are in ascending powers of that scaled variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    direction: Direction,
    degree: usize,
    center: f64,
    half_range: f64,
    coefficients: Vec<f64>,
    samples: usize,
}

impl ScoringModel {
    /// Fit a model to `(points, mark)` samples.
    ///
    /// With fewer than `degree + 1` samples the system is under-determined
    /// and the highest coefficients are left at zero; such models track
    /// the table poorly.
    pub fn fit(
        event: &str,
        samples: &[(f64, f64)],
        direction: Direction,
        degree: usize,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(ScoringError::InsufficientData(event.to_string()));
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = match direction {
            Direction::PointsToMark => samples.iter().copied().unzip(),
            Direction::MarkToPoints => samples.iter().map(|&(p, m)| (m, p)).unzip(),
        };

        let (lo, hi) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let center = (lo + hi) / 2.0;
        let half_range = if hi > lo { (hi - lo) / 2.0 } else { 1.0 };

        let scaled: Vec<f64> = xs.iter().map(|x| (x - center) / half_range).collect();
        let vandermonde = Array2::from_shape_fn((scaled.len(), degree + 1), |(i, j)| {
            scaled[i].powi(j as i32)
        });

        let coefficients = least_squares(vandermonde, Array1::from(ys)).to_vec();

        Ok(Self {
            direction,
            degree,
            center,
            half_range,
            coefficients,
            samples: samples.len(),
        })
    }

    /// Evaluate the polynomial at `x`. Values outside the fitted range are
    /// extrapolated, not clamped.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.half_range;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * t + c)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of tabulated pairs the model was fitted to
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Solve `min |a x - b|` by Householder QR.
///
/// Columns whose pivot vanishes (rank deficiency, or more unknowns than
/// rows) get a zero coefficient.
fn least_squares(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let (rows, cols) = a.dim();
    let steps = rows.min(cols);

    for k in 0..steps {
        let mut v = a.slice(s![k.., k]).to_owned();
        let norm = v.dot(&v).sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if v[0] > 0.0 { -norm } else { norm };
        v[0] -= alpha;
        let v_norm2 = v.dot(&v);
        if v_norm2 == 0.0 {
            continue;
        }

        for j in k..cols {
            let proj = 2.0 * v.dot(&a.slice(s![k.., j])) / v_norm2;
            a.slice_mut(s![k.., j]).scaled_add(-proj, &v);
        }
        let proj = 2.0 * v.dot(&b.slice(s![k..])) / v_norm2;
        b.slice_mut(s![k..]).scaled_add(-proj, &v);
    }

    let max_pivot = (0..steps).map(|i| a[[i, i]].abs()).fold(0.0, f64::max);
    let tolerance = max_pivot * f64::EPSILON * rows.max(cols) as f64;

    let mut x = Array1::zeros(cols);
    for i in (0..steps).rev() {
        let pivot = a[[i, i]];
        if pivot.abs() <= tolerance {
            continue;
        }
        let mut acc = b[i];
        for j in (i + 1)..steps {
            acc -= a[[i, j]] * x[j];
        }
        x[i] = acc / pivot;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic_samples() -> Vec<(f64, f64)> {
        // mark = 10 + 0.01 * (1000 - p) + 2e-6 * (1000 - p)^2
        (1..=1000)
            .rev()
            .map(|p| {
                let u = 1000.0 - p as f64;
                (p as f64, 10.0 + 0.01 * u + 2e-6 * u * u)
            })
            .collect()
    }

    #[test]
    fn test_recovers_exact_polynomial() {
        let samples = quadratic_samples();
        let model = ScoringModel::fit("M-100m", &samples, Direction::PointsToMark, 2).unwrap();
        for &(p, m) in samples.iter().step_by(97) {
            assert_relative_eq!(model.evaluate(p), m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_high_degree_fit_tracks_samples() {
        let samples = quadratic_samples();
        let model =
            ScoringModel::fit("M-100m", &samples, Direction::PointsToMark, DEFAULT_DEGREE).unwrap();
        assert_eq!(model.coefficients().len(), DEFAULT_DEGREE + 1);
        for &(p, m) in samples.iter().step_by(50) {
            assert_relative_eq!(model.evaluate(p), m, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_mark_to_points_swaps_axes() {
        let samples = quadratic_samples();
        let model =
            ScoringModel::fit("M-100m", &samples, Direction::MarkToPoints, DEFAULT_DEGREE).unwrap();
        assert_eq!(model.direction(), Direction::MarkToPoints);
        for &(p, m) in samples.iter().skip(100).step_by(100) {
            assert!((model.evaluate(m) - p).abs() < 0.05, "p={} got {}", p, model.evaluate(m));
        }
    }

    #[test]
    fn test_extrapolation_is_not_clamped() {
        let samples: Vec<(f64, f64)> = (1..=100).map(|p| (p as f64, 2.0 * p as f64)).collect();
        let model = ScoringModel::fit("M-LJ", &samples, Direction::PointsToMark, 1).unwrap();
        assert_relative_eq!(model.evaluate(500.0), 1000.0, epsilon = 1e-6);
        assert_relative_eq!(model.evaluate(-10.0), -20.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_samples_is_insufficient_data() {
        let result = ScoringModel::fit("W-HJ", &[], Direction::PointsToMark, DEFAULT_DEGREE);
        assert_eq!(result, Err(ScoringError::InsufficientData("W-HJ".to_string())));
    }

    #[test]
    fn test_under_determined_fit_still_returns_a_model() {
        let samples = vec![(10.0, 1.0), (20.0, 3.0), (30.0, 5.0)];
        let model =
            ScoringModel::fit("M-PV", &samples, Direction::PointsToMark, DEFAULT_DEGREE).unwrap();
        assert_eq!(model.samples(), 3);
        assert!(model.coefficients()[3..].iter().all(|c| *c == 0.0));
        for (p, m) in samples {
            assert_relative_eq!(model.evaluate(p), m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_sample() {
        let model = ScoringModel::fit("M-PV", &[(700.0, 5.5)], Direction::PointsToMark, 3).unwrap();
        assert_relative_eq!(model.evaluate(700.0), 5.5);
    }
}
