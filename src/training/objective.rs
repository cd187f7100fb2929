//! Softmax cross-entropy training objective.

use ndarray::{Array2, ArrayView2, Zip};

use crate::data::Targets;
use crate::utils::log_sum_exp;

/// Mean softmax cross-entropy over class scores.
///
/// With class probabilities `p = softmax(scores)` and target row `t`
/// (one-hot for class-index targets), the per-sample loss is
/// `-Σ_c t_c log p_c` and the gradient with respect to the scores is
/// `(p Σ_c t_c - t) / N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftmaxCrossEntropy;

impl SoftmaxCrossEntropy {
    /// Mean loss and its gradient with respect to `scores`.
    ///
    /// The loss is accumulated in `f64`. An empty batch gives a loss of 0.
    pub fn loss_and_gradient(&self, scores: ArrayView2<f32>, targets: &Targets) -> (f64, Array2<f32>) {
        let n_rows = scores.nrows();
        debug_assert_eq!(n_rows, targets.n_samples());

        let mut grad = Array2::<f32>::zeros(scores.raw_dim());
        if n_rows == 0 {
            return (0.0, grad);
        }
        let inv_n = 1.0 / n_rows as f32;

        let mut total = 0.0f64;
        for (i, (row, mut grad_row)) in scores.rows().into_iter().zip(grad.rows_mut()).enumerate() {
            let lse = log_sum_exp(row);
            match targets {
                Targets::Classes(labels) => {
                    let label = labels[i];
                    total += f64::from(lse - row[label]);
                    Zip::from(&mut grad_row)
                        .and(&row)
                        .for_each(|g, &s| *g = (s - lse).exp() * inv_n);
                    grad_row[label] -= inv_n;
                }
                Targets::OneHot(matrix) => {
                    let target = matrix.row(i);
                    let mass = target.sum();
                    Zip::from(&mut grad_row)
                        .and(&row)
                        .and(&target)
                        .for_each(|g, &s, &t| {
                            total += f64::from(t) * f64::from(lse - s);
                            *g = ((s - lse).exp() * mass - t) * inv_n;
                        });
                }
            }
        }
        (total / n_rows as f64, grad)
    }

    /// Mean loss without the gradient.
    pub fn loss(&self, scores: ArrayView2<f32>, targets: &Targets) -> f64 {
        self.loss_and_gradient(scores, targets).0
    }
}
