//! Common utilities used across the crate.
//!
//! Row-wise softmax helpers and argmax shared by the binning function,
//! the loss and the evaluation metrics.

use ndarray::{ArrayView1, ArrayViewMut1};

// =============================================================================
// Row Utilities
// =============================================================================

/// Index of the largest value in `row`.
///
/// Ties resolve to the first occurrence. NaN never wins against a number.
/// Returns 0 for an empty row.
#[inline]
pub fn argmax(row: ArrayView1<f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Numerically stable `log(sum(exp(row)))`.
#[inline]
pub fn log_sum_exp(row: ArrayView1<f32>) -> f32 {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f32 = row.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// In-place softmax of `row / temperature`.
///
/// The max is subtracted before exponentiation so large logits do not
/// overflow.
#[inline]
pub fn softmax_inplace(mut row: ArrayViewMut1<f32>, temperature: f32) {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    row.mapv_inplace(|v| {
        let e = ((v - max) / temperature).exp();
        sum += e;
        e
    });
    row.mapv_inplace(|v| v / sum);
}
