//! Evaluation of trained parameters.
//!
//! Evaluation borrows the parameters immutably and never touches optimizer
//! state, so it can run at any point during or after training.

use crate::data::{Dataset, Targets};
use crate::error::DndtError;
use crate::tree::{TreeParams, predict_scores};

use super::metrics::{MetricFn, MulticlassAccuracy};

// =============================================================================
// MetricValue
// =============================================================================

/// A computed metric value with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Name of the metric (e.g., "train-accuracy").
    pub name: String,
    /// The computed value.
    pub value: f64,
    /// Whether higher values are better.
    pub higher_is_better: bool,
}

impl MetricValue {
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Compute `metric` for `params` on `dataset`.
///
/// `prefix` names the dataset in the returned value (e.g. `"test"` gives
/// `"test-accuracy"`).
pub fn evaluate<M: MetricFn>(
    params: &TreeParams,
    dataset: &Dataset,
    temperature: f32,
    metric: &M,
    prefix: &str,
) -> Result<MetricValue, DndtError> {
    check_classes(params, dataset)?;
    let scores = predict_scores(params, dataset.features(), temperature)?;
    let value = metric.compute(scores.view(), dataset.targets());
    Ok(MetricValue::new(
        format!("{prefix}-{}", metric.name()),
        value,
        metric.higher_is_better(),
    ))
}

/// Fraction of samples in `dataset` whose predicted class is the true class.
///
/// An empty dataset scores 0.
pub fn evaluate_accuracy(params: &TreeParams, dataset: &Dataset, temperature: f32) -> Result<f64, DndtError> {
    evaluate(params, dataset, temperature, &MulticlassAccuracy, "eval").map(|m| m.value)
}

/// Class labels may cover fewer classes than the model; one-hot rows must match
/// the model width exactly.
fn check_classes(params: &TreeParams, dataset: &Dataset) -> Result<(), DndtError> {
    let fits = match dataset.targets() {
        Targets::Classes(_) => dataset.n_classes() <= params.n_classes(),
        Targets::OneHot(_) => dataset.n_classes() == params.n_classes(),
    };
    if !fits {
        return Err(DndtError::dimension("classes", params.n_classes(), dataset.n_classes()));
    }
    Ok(())
}
