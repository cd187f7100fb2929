//! Soft binning of a single feature.
//!
//! With `C` cut points `s_0 <= ... <= s_{C-1}` (sorted), bin `j` of value `x`
//! gets the logit
//!
//! ```text
//! h_j = (j + 1) * x - (s_0 + ... + s_{j-1})
//! ```
//!
//! and the bin distribution is `softmax(h / T)`. For neighbouring bins
//! `h_{j+1} - h_j = x - s_j`, so as `T -> 0` the distribution becomes the
//! one-hot indicator of the hard bin `#{k : s_k < x}`.
//!
//! Sorting is done on a copy. The permutation is kept so gradients land on the
//! cut points in storage order.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::error::{ConfigError, DndtError};
use crate::utils::softmax_inplace;

/// Check a softmax temperature.
pub(crate) fn validate_temperature(temperature: f32) -> Result<(), ConfigError> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTemperature(temperature))
    }
}

/// Soft bin assignment of `values` for the given cut points.
///
/// Returns `[values.len(), cut_points.len() + 1]`; every row sums to 1. With no
/// cut points the result is a single column of ones.
///
/// # Example
///
/// ```
/// use dndt::tree::soft_bin;
/// use ndarray::array;
///
/// let probs = soft_bin(array![0.1, 0.9].view(), array![0.5].view(), 0.01).unwrap();
/// assert!(probs[[0, 0]] > 0.99); // below the cut
/// assert!(probs[[1, 1]] > 0.99); // above the cut
/// ```
pub fn soft_bin(
    values: ArrayView1<f32>,
    cut_points: ArrayView1<f32>,
    temperature: f32,
) -> Result<Array2<f32>, DndtError> {
    validate_temperature(temperature)?;
    Ok(SoftBinning::forward(values, cut_points, temperature).probs)
}

/// Forward result of soft binning, kept for the backward pass.
#[derive(Debug, Clone)]
pub struct SoftBinning {
    /// `order[k]` is the storage index of the k-th smallest cut point.
    order: Vec<usize>,
    /// Bin distribution `[n_samples, n_cuts + 1]`.
    probs: Array2<f32>,
    temperature: f32,
}

impl SoftBinning {
    /// Bin `values`. The caller is responsible for a valid temperature.
    pub fn forward(values: ArrayView1<f32>, cut_points: ArrayView1<f32>, temperature: f32) -> Self {
        let order = ascending_order(cut_points);
        let bias = bin_bias(cut_points, &order);

        let mut probs = Array2::<f32>::zeros((values.len(), bias.len()));
        Zip::from(probs.rows_mut())
            .and(&values)
            .for_each(|mut row, &x| {
                for (j, (h, &b)) in row.iter_mut().zip(bias.iter()).enumerate() {
                    *h = x * (j + 1) as f32 + b;
                }
                softmax_inplace(row, temperature);
            });

        Self {
            order,
            probs,
            temperature,
        }
    }

    /// Bin distribution `[n_samples, n_cuts + 1]`.
    #[inline]
    pub fn probs(&self) -> ArrayView2<'_, f32> {
        self.probs.view()
    }

    /// Number of cut points.
    #[inline]
    pub fn n_cuts(&self) -> usize {
        self.order.len()
    }

    /// Gradient with respect to the cut points, in storage order.
    ///
    /// `grad_probs` is the loss gradient with respect to [`probs`](Self::probs).
    pub fn backward(&self, grad_probs: ArrayView2<f32>) -> Array1<f32> {
        let n_bins = self.probs.ncols();
        debug_assert_eq!(grad_probs.dim(), self.probs.dim());

        // Softmax backward, summed over samples: d(bias_j) = sum_i d(h_ij).
        let mut grad_bias = Array1::<f32>::zeros(n_bins);
        Zip::from(self.probs.rows())
            .and(grad_probs.rows())
            .for_each(|y, g| {
                let dot = y.dot(&g);
                Zip::from(&mut grad_bias)
                    .and(&y)
                    .and(&g)
                    .for_each(|gb, &yj, &gj| *gb += yj * (gj - dot) / self.temperature);
            });

        // bias_j = -(s_0 + ... + s_{j-1}), so d(s_k) = -sum_{j > k} d(bias_j).
        let mut grad_cuts = Array1::<f32>::zeros(self.order.len());
        let mut suffix = 0.0f32;
        for k in (0..self.order.len()).rev() {
            suffix += grad_bias[k + 1];
            grad_cuts[self.order[k]] = -suffix;
        }
        grad_cuts
    }
}

/// Storage indices of `cut_points` in ascending value order.
fn ascending_order(cut_points: ArrayView1<f32>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cut_points.len()).collect();
    order.sort_by(|&a, &b| cut_points[a].total_cmp(&cut_points[b]));
    order
}

/// `[0, -s_0, -s_0 - s_1, ...]` over the sorted cut points.
fn bin_bias(cut_points: ArrayView1<f32>, order: &[usize]) -> Array1<f32> {
    let mut bias = Array1::<f32>::zeros(order.len() + 1);
    let mut acc = 0.0f32;
    for (k, &idx) in order.iter().enumerate() {
        acc -= cut_points[idx];
        bias[k + 1] = acc;
    }
    bias
}
