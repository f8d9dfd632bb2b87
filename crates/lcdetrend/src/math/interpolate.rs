//! Piecewise quadratic interpolation on sorted knots.
//!
//! ## Purpose
//!
//! Known transits are masked out before detrending so the smoother does not
//! follow the dip. The masked samples are refilled from their unmasked
//! neighbors with a three-point Lagrange polynomial, which keeps curvature
//! that linear interpolation would flatten.
//!
//! ## Invariants
//!
//! * Knots must be strictly increasing; [`merge_repeated_knots`] collapses
//!   repeated time stamps of a non-decreasing series first.
//! * Evaluating at a knot returns that knot's value exactly.
//! * Queries outside the knot range extrapolate with the outermost triple.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::DetrendError;

/// Quadratic interpolant through sorted `(x, y)` knots.
#[derive(Debug, Clone)]
pub struct QuadraticInterpolator<'a, T> {
    x: &'a [T],
    y: &'a [T],
}

impl<'a, T: Float> QuadraticInterpolator<'a, T> {
    /// Build an interpolant. Needs at least two strictly increasing knots.
    pub fn new(x: &'a [T], y: &'a [T]) -> Result<Self, DetrendError> {
        if x.len() != y.len() {
            return Err(DetrendError::MismatchedInputs {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(DetrendError::TooFewPoints {
                got: x.len(),
                min: 2,
            });
        }
        if let Some(i) = x.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(DetrendError::InvalidInput(format!(
                "interpolation knots must be strictly increasing (index {})",
                i + 1
            )));
        }
        Ok(Self { x, y })
    }

    /// Evaluate the interpolant at `xq`.
    pub fn eval(&self, xq: T) -> T {
        let n = self.x.len();

        if n == 2 {
            let (x0, x1) = (self.x[0], self.x[1]);
            let t = (xq - x0) / (x1 - x0);
            return self.y[0] + t * (self.y[1] - self.y[0]);
        }

        // Index of the first knot >= xq
        let pos = self.x.partition_point(|&v| v < xq);
        if pos < n && self.x[pos] == xq {
            return self.y[pos];
        }

        // Nearest triple around the bracketing interval
        let start = if pos == 0 {
            0
        } else if pos >= n {
            n - 3
        } else {
            let lo = pos - 1;
            let extra_left = lo > 0
                && (pos + 1 >= n || (xq - self.x[lo - 1]) <= (self.x[pos + 1] - xq));
            if extra_left { lo - 1 } else { lo }
        };
        let start = start.min(n - 3);

        let (x0, x1, x2) = (self.x[start], self.x[start + 1], self.x[start + 2]);
        let (y0, y1, y2) = (self.y[start], self.y[start + 1], self.y[start + 2]);

        let l0 = (xq - x1) * (xq - x2) / ((x0 - x1) * (x0 - x2));
        let l1 = (xq - x0) * (xq - x2) / ((x1 - x0) * (x1 - x2));
        let l2 = (xq - x0) * (xq - x1) / ((x2 - x0) * (x2 - x1));

        y0 * l0 + y1 * l1 + y2 * l2
    }
}

/// Collapse runs of equal `x` in a non-decreasing series into one knot
/// carrying the mean of their `y`.
pub fn merge_repeated_knots<T: Float>(x: &[T], y: &[T]) -> (Vec<T>, Vec<T>) {
    let mut xs: Vec<T> = Vec::with_capacity(x.len());
    let mut ys: Vec<T> = Vec::with_capacity(x.len());
    let mut run = 0usize;

    for (&xi, &yi) in x.iter().zip(y) {
        if xs.last() == Some(&xi) {
            run += 1;
            if let Some(acc) = ys.last_mut() {
                // Running mean over the run
                *acc = *acc + (yi - *acc) / T::from(run).unwrap();
            }
        } else {
            xs.push(xi);
            ys.push(yi);
            run = 1;
        }
    }
    (xs, ys)
}
