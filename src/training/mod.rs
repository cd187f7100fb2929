//! Training infrastructure for the differentiable tree.
//!
//! - [`DndtTrainer`], [`TrainerParams`]: full-batch training loop
//! - [`SoftmaxCrossEntropy`]: training loss and its gradient
//! - [`Adam`], [`AdamParams`]: the optimizer
//! - [`MetricFn`], [`MulticlassAccuracy`], [`MulticlassLogLoss`]: evaluation metrics
//! - [`evaluate`], [`evaluate_accuracy`]: evaluation of borrowed parameters
//! - [`TrainingLogger`], [`Verbosity`]: structured logging through `tracing`

mod eval;
mod logger;
mod metrics;
mod objective;
mod optimizer;
mod trainer;

pub use eval::{MetricValue, evaluate, evaluate_accuracy};
pub use logger::{PROGRESS_INTERVAL, TrainingLogger, Verbosity};
pub use metrics::{MetricFn, MulticlassAccuracy, MulticlassLogLoss};
pub use objective::SoftmaxCrossEntropy;
pub use optimizer::{Adam, AdamParams};
pub use trainer::{DndtTrainer, TrainerParams, TrainingOutcome, TrainingState};
