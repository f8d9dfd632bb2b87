//! Sorting utilities for paired series.
//!
//! ## Purpose
//!
//! Phase folding reorders a light curve by phase, and the transit mask merges
//! interpolated points back into time order. Both need a stable argsort that
//! carries a companion array along.
//!
//! ## Invariants
//!
//! * Sorted keys are non-decreasing for finite values; non-finite keys go last.
//! * The index mapping is a valid permutation of `0..n`.
//! * Equal keys keep their insertion order.

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;

/// Result of sorting a value series by a key series.
#[derive(Debug, Clone)]
pub struct SortedData<T> {
    /// Sorted keys.
    pub keys: Vec<T>,

    /// Values reordered to match the sorted keys.
    pub values: Vec<T>,

    /// Index mapping where `indices[sorted_pos] = original_pos`.
    pub indices: Vec<usize>,
}

/// Stable argsort of `keys`, with non-finite keys moved to the end.
pub fn argsort<T: Float>(keys: &[T]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..keys.len()).collect();

    if keys.windows(2).all(|w| w[0] <= w[1]) {
        return indices;
    }

    indices.sort_by(|&a, &b| {
        let (ka, kb) = (keys[a], keys[b]);
        match (ka.is_finite(), kb.is_finite()) {
            (true, true) => ka.partial_cmp(&kb).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    });
    indices
}

/// Sort `values` by `keys` in ascending key order.
pub fn sort_by_key<T: Float>(keys: &[T], values: &[T]) -> SortedData<T> {
    debug_assert_eq!(keys.len(), values.len());

    let indices = argsort(keys);
    SortedData {
        keys: indices.iter().map(|&i| keys[i]).collect(),
        values: indices.iter().map(|&i| values[i]).collect(),
        indices,
    }
}
