//! Evaluation metrics over class scores.
//!
//! Metrics take raw class scores `[n_samples, n_classes]` (pre-softmax) and the
//! dataset targets. They are separate from the training loss: the trainer
//! optimizes cross-entropy and reports whatever metrics it is asked for.

use ndarray::ArrayView2;

use crate::data::Targets;
use crate::utils::{argmax, log_sum_exp};

/// A metric computed from class scores and targets.
pub trait MetricFn {
    /// Compute the metric. `scores` has one row per target.
    fn compute(&self, scores: ArrayView2<f32>, targets: &Targets) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

// =============================================================================
// MulticlassAccuracy
// =============================================================================

/// Fraction of samples whose highest-scoring class equals the true class.
///
/// Ties go to the lowest class index. One-hot targets use the argmax of the
/// target row as the true class. Returns 0 for an empty input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MulticlassAccuracy;

impl MetricFn for MulticlassAccuracy {
    fn compute(&self, scores: ArrayView2<f32>, targets: &Targets) -> f64 {
        let n_rows = scores.nrows();
        debug_assert_eq!(n_rows, targets.n_samples());
        if n_rows == 0 {
            return 0.0;
        }

        let correct = scores
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(i, row)| argmax(row.view()) == targets.class_of(*i))
            .count();
        correct as f64 / n_rows as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}

// =============================================================================
// MulticlassLogLoss
// =============================================================================

/// Mean softmax cross-entropy of the scores.
///
/// For one-hot targets the per-sample loss is `-Σ_c t_c log p_c`.
/// Returns 0 for an empty input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MulticlassLogLoss;

impl MetricFn for MulticlassLogLoss {
    fn compute(&self, scores: ArrayView2<f32>, targets: &Targets) -> f64 {
        let n_rows = scores.nrows();
        debug_assert_eq!(n_rows, targets.n_samples());
        if n_rows == 0 {
            return 0.0;
        }

        let total: f64 = scores
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let lse = f64::from(log_sum_exp(row.view()));
                match targets {
                    Targets::Classes(labels) => lse - f64::from(row[labels[i]]),
                    Targets::OneHot(matrix) => row
                        .iter()
                        .zip(matrix.row(i))
                        .map(|(&s, &t)| f64::from(t) * (lse - f64::from(s)))
                        .sum::<f64>(),
                }
            })
            .sum();
        total / n_rows as f64
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn accuracy_counts_argmax_matches() {
        let scores = array![[2.0f32, 1.0], [0.0, 3.0], [5.0, -1.0], [0.2, 0.1]];
        let targets = Targets::Classes(array![0, 1, 1, 0]);
        assert_abs_diff_eq!(MulticlassAccuracy.compute(scores.view(), &targets), 0.75);
    }

    #[test]
    fn accuracy_uses_one_hot_argmax() {
        let scores = array![[0.0f32, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let targets = Targets::OneHot(array![[0.0, 0.9, 0.1], [0.0, 0.0, 1.0]]);
        assert_abs_diff_eq!(MulticlassAccuracy.compute(scores.view(), &targets), 0.5);
    }

    #[test]
    fn accuracy_ties_go_to_lowest_class() {
        let scores = array![[1.0f32, 1.0], [1.0, 1.0]];
        let targets = Targets::Classes(array![0, 1]);
        assert_abs_diff_eq!(MulticlassAccuracy.compute(scores.view(), &targets), 0.5);
    }

    #[test]
    fn empty_input_scores_zero() {
        let scores = Array2::<f32>::zeros((0, 3));
        let targets = Targets::Classes(ndarray::Array1::zeros(0));
        assert_eq!(MulticlassAccuracy.compute(scores.view(), &targets), 0.0);
        assert_eq!(MulticlassLogLoss.compute(scores.view(), &targets), 0.0);
    }

    #[test]
    fn logloss_of_uniform_scores_is_log_k() {
        let scores = Array2::<f32>::zeros((4, 3));
        let targets = Targets::Classes(array![0, 1, 2, 0]);
        assert_abs_diff_eq!(
            MulticlassLogLoss.compute(scores.view(), &targets),
            3.0f64.ln(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn logloss_agrees_across_target_forms() {
        let scores = array![[1.5f32, -0.5, 0.2], [0.1, 0.4, 2.0]];
        let classes = Targets::Classes(array![0, 2]);
        let one_hot = Targets::OneHot(array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_abs_diff_eq!(
            MulticlassLogLoss.compute(scores.view(), &classes),
            MulticlassLogLoss.compute(scores.view(), &one_hot),
            epsilon = 1e-9
        );
    }

    #[test]
    fn metric_directions() {
        assert!(MulticlassAccuracy.higher_is_better());
        assert!(!MulticlassLogLoss.higher_is_better());
        assert_eq!(MulticlassAccuracy.name(), "accuracy");
    }
}
