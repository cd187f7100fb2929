//! Joint leaf membership from per-feature bin distributions.
//!
//! The row-wise Kronecker product of the bin matrices, folded left to right:
//! `Z = B_0 ⊗ B_1 ⊗ ... ⊗ B_{D-1}`. Feature 0 is the slowest-varying index of
//! a leaf column.

use ndarray::{Array2, ArrayView2, Zip, s};

use crate::error::{ConfigError, DndtError};

/// Row-wise Kronecker product: `out[i, p * K + q] = a[i, p] * b[i, q]`.
///
/// # Errors
///
/// [`DndtError::Dimension`] if the row counts differ.
pub fn kron_rows(a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<Array2<f32>, DndtError> {
    if a.nrows() != b.nrows() {
        return Err(DndtError::dimension("kronecker rows", a.nrows(), b.nrows()));
    }
    Ok(kron_rows_unchecked(a, b))
}

fn kron_rows_unchecked(a: ArrayView2<f32>, b: ArrayView2<f32>) -> Array2<f32> {
    let k = b.ncols();
    let mut out = Array2::<f32>::zeros((a.nrows(), a.ncols() * k));
    Zip::from(out.rows_mut())
        .and(a.rows())
        .and(b.rows())
        .for_each(|mut out_row, a_row, b_row| {
            for (p, &ap) in a_row.iter().enumerate() {
                let block = out_row.slice_mut(s![p * k..(p + 1) * k]);
                Zip::from(block).and(&b_row).for_each(|o, &bq| *o = ap * bq);
            }
        });
    out
}

/// Joint leaf membership of a list of bin matrices.
///
/// # Errors
///
/// [`ConfigError::NoBinnedFeatures`] for an empty list and
/// [`DndtError::Dimension`] if the matrices disagree on sample count.
pub fn combine(factors: &[ArrayView2<f32>]) -> Result<Array2<f32>, DndtError> {
    JointMembership::combine(factors).map(JointMembership::into_joint)
}

/// Joint membership with the intermediate products kept for the backward pass.
#[derive(Debug, Clone)]
pub struct JointMembership {
    /// `partials[d]` is `B_0 ⊗ ... ⊗ B_d`; the last entry is the joint matrix.
    partials: Vec<Array2<f32>>,
}

impl JointMembership {
    /// Fold the factors into the joint membership matrix.
    pub fn combine(factors: &[ArrayView2<f32>]) -> Result<Self, DndtError> {
        let (first, rest) = factors.split_first().ok_or(ConfigError::NoBinnedFeatures)?;

        let mut partials = Vec::with_capacity(factors.len());
        partials.push(first.to_owned());
        for (d, factor) in rest.iter().enumerate() {
            let next = kron_rows(partials[d].view(), factor.view())?;
            partials.push(next);
        }
        Ok(Self { partials })
    }

    /// Joint membership `[n_samples, n_leaves]`.
    #[inline]
    pub fn joint(&self) -> ArrayView2<'_, f32> {
        // `combine` always pushes at least one partial.
        self.partials[self.partials.len() - 1].view()
    }

    /// Number of leaves.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.joint().ncols()
    }

    fn into_joint(mut self) -> Array2<f32> {
        self.partials.pop().unwrap_or_default()
    }

    /// Gradients with respect to each factor, given the gradient with respect
    /// to the joint matrix.
    ///
    /// `factors` must be the same list passed to [`combine`](Self::combine).
    pub fn backward(&self, factors: &[ArrayView2<f32>], grad_joint: ArrayView2<f32>) -> Vec<Array2<f32>> {
        debug_assert_eq!(factors.len(), self.partials.len());

        let mut grads = vec![Array2::<f32>::zeros((0, 0)); factors.len()];
        let mut grad = grad_joint.to_owned();
        for d in (1..factors.len()).rev() {
            let (grad_prev, grad_factor) =
                kron_rows_backward(self.partials[d - 1].view(), factors[d], grad.view());
            grads[d] = grad_factor;
            grad = grad_prev;
        }
        grads[0] = grad;
        grads
    }
}

/// Backward of [`kron_rows`]:
/// `dA[i, p] = Σ_q G[i, pK + q] b[i, q]` and `dB[i, q] = Σ_p G[i, pK + q] a[i, p]`.
fn kron_rows_backward(
    a: ArrayView2<f32>,
    b: ArrayView2<f32>,
    grad: ArrayView2<f32>,
) -> (Array2<f32>, Array2<f32>) {
    let k = b.ncols();
    let mut grad_a = Array2::<f32>::zeros(a.raw_dim());
    let mut grad_b = Array2::<f32>::zeros(b.raw_dim());
    Zip::from(grad.rows())
        .and(a.rows())
        .and(b.rows())
        .and(grad_a.rows_mut())
        .and(grad_b.rows_mut())
        .for_each(|g_row, a_row, b_row, mut ga, mut gb| {
            for (p, &ap) in a_row.iter().enumerate() {
                let block = g_row.slice(s![p * k..(p + 1) * k]);
                ga[p] = block.dot(&b_row);
                gb.scaled_add(ap, &block);
            }
        });
    (grad_a, grad_b)
}
