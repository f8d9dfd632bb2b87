//! Nearest-neighbour windows over sorted time stamps.
//!
//! A segment smoothed with a fraction of one gets a window spanning every
//! sample, which never moves; narrower windows slide along the segment so
//! each local fit sees the samples closest in time.

// External dependencies
use num_traits::Float;

/// Inclusive sample range `[left, right]` feeding one local fit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    pub left: usize,
    pub right: usize,
}

impl Window {
    /// Window covering all `n` samples.
    #[inline]
    pub fn spanning(n: usize) -> Self {
        Self {
            left: 0,
            right: n.saturating_sub(1),
        }
    }

    /// Window of `window_size` samples placed as close to centred on `idx` as
    /// the series bounds allow.
    #[inline]
    pub fn initialize(idx: usize, window_size: usize, n: usize) -> Self {
        debug_assert!(window_size >= 1, "initialize: window_size must be at least 1");

        if window_size >= n {
            return Self::spanning(n);
        }

        let left = idx.saturating_sub(window_size / 2).min(n - window_size);
        Self {
            left,
            right: left + window_size - 1,
        }
    }

    /// True when the window holds every one of `n` samples.
    #[inline]
    pub fn spans(&self, n: usize) -> bool {
        self.left == 0 && self.right + 1 >= n
    }

    /// Shift the window, keeping its size, onto the nearest neighbours of
    /// `x[current]`. Ties keep the window where it is.
    #[inline]
    pub fn recenter<T: Float>(&mut self, x: &[T], current: usize, n: usize) {
        debug_assert!(current < n, "recenter: current index out of bounds");

        if self.spans(n) {
            return;
        }
        self.right = self.right.min(n - 1);
        self.left = self.left.min(self.right);

        let at = x[current];
        while self.right + 1 < n && x[self.right + 1] - at < at - x[self.left] {
            self.left += 1;
            self.right += 1;
        }
        while self.left > 0 && at - x[self.left - 1] < x[self.right] - at {
            self.left -= 1;
            self.right -= 1;
        }
    }

    /// Distance from `at` to the farther window edge.
    #[inline]
    pub fn max_distance<T: Float>(&self, x: &[T], at: T) -> T {
        T::max(at - x[self.left], x[self.right] - at)
    }

    /// Samples per window for `fraction` of an `n`-sample series, at least 2
    /// and at most `n`.
    #[inline]
    pub fn calculate_span<T: Float>(n: usize, fraction: T) -> usize {
        let scaled = fraction * T::from(n).unwrap() + T::from(1e-5).unwrap();
        scaled.to_usize().unwrap_or(0).clamp(2.min(n), n)
    }
}
