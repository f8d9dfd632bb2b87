//! Delta optimization for densely sampled light curves.
//!
//! Anchor points at least `delta` apart are fitted exactly; samples between
//! two anchors take the straight line joining them. A delta of zero fits
//! every sample. Tied timestamps always share the fitted value of the first
//! sample in the tie.

// External dependencies
use num_traits::Float;

/// Index of the next sample to fit after the anchor at `*last_fitted`.
///
/// Samples tied with the anchor receive its fitted value and advance
/// `*last_fitted`. The returned index is the last sample within `delta` of
/// the anchor, but never earlier than the sample right after the ties. It
/// is clamped to `n - 1`.
pub fn next_anchor<T: Float>(x: &[T], y_smooth: &mut [T], last_fitted: &mut usize, delta: T) -> usize {
    let n = x.len();
    let anchor = *last_fitted;
    let cutpoint = x[anchor] + delta;

    // First index past the delta window
    let beyond = x[anchor + 1..].partition_point(|&xi| xi <= cutpoint) + anchor + 1;

    let x_anchor = x[anchor];
    for i in anchor + 1..beyond.min(n) {
        if x[i] != x_anchor {
            break;
        }
        y_smooth[i] = y_smooth[anchor];
        *last_fitted = i;
    }

    usize::max(beyond.saturating_sub(1), *last_fitted + 1).min(n - 1)
}

/// Fill `y_smooth` strictly between two fitted anchors by linear interpolation.
pub fn interpolate_gap<T: Float>(x: &[T], y_smooth: &mut [T], last_fitted: usize, current: usize) {
    if current <= last_fitted + 1 {
        return;
    }

    let (x0, x1) = (x[last_fitted], x[current]);
    let (y0, y1) = (y_smooth[last_fitted], y_smooth[current]);
    let dx = x1 - x0;

    if dx <= T::zero() {
        let avg = (y0 + y1) / (T::one() + T::one());
        y_smooth[last_fitted + 1..current].fill(avg);
        return;
    }

    let slope = (y1 - y0) / dx;
    for k in last_fitted + 1..current {
        y_smooth[k] = y0 + (x[k] - x0) * slope;
    }
}
