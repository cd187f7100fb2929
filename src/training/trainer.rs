//! Full-batch gradient descent trainer for a single tree.
//!
//! Every iteration runs the forward pass on the whole training set, computes
//! the mean softmax cross-entropy, backpropagates to the cut points and leaf
//! scores and takes one Adam step. There is no early stopping: training always
//! runs for the configured number of iterations unless it fails.

use crate::data::Dataset;
use crate::error::{ConfigError, DndtError};
use crate::tree::{ForwardPass, TreeParams, binning::validate_temperature};

use super::eval::MetricValue;
use super::logger::{TrainingLogger, Verbosity};
use super::metrics::{MetricFn, MulticlassAccuracy};
use super::objective::SoftmaxCrossEntropy;
use super::optimizer::{Adam, AdamParams};

// ============================================================================
// TrainerParams
// ============================================================================

/// Parameters for the trainer.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerParams {
    /// Softmax temperature of the binning function. Not learned.
    pub temperature: f32,
    /// Adam learning rate.
    pub learning_rate: f32,
    /// Number of full-batch iterations.
    pub n_iterations: u32,
    /// Adam decay and epsilon terms.
    pub adam: AdamParams,
    /// Verbosity level for training output.
    pub verbosity: Verbosity,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            learning_rate: 0.1,
            n_iterations: 1000,
            adam: AdamParams::default(),
            verbosity: Verbosity::default(),
        }
    }
}

impl TrainerParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_temperature(self.temperature)?;
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        self.adam.validate()
    }
}

// ============================================================================
// TrainingState / TrainingOutcome
// ============================================================================

/// Where a trainer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// No iteration has run yet.
    Initialized,
    /// Currently in (or, after a failure, stopped in) this iteration.
    Training { iteration: u32 },
    /// The iteration budget was used up.
    StoppedAtIterationLimit,
}

/// Result of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Trained parameters.
    pub params: TreeParams,
    /// Training loss at the start of every iteration, before its update.
    pub loss_history: Vec<f64>,
    /// Final state; always [`TrainingState::StoppedAtIterationLimit`].
    pub state: TrainingState,
}

// ============================================================================
// DndtTrainer
// ============================================================================

/// Trains [`TreeParams`] on a dataset.
#[derive(Debug, Clone)]
pub struct DndtTrainer {
    params: TrainerParams,
    objective: SoftmaxCrossEntropy,
    state: TrainingState,
}

impl DndtTrainer {
    pub fn new(params: TrainerParams) -> Self {
        Self {
            params,
            objective: SoftmaxCrossEntropy,
            state: TrainingState::Initialized,
        }
    }

    #[inline]
    pub fn params(&self) -> &TrainerParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// Train `initial` on `train`.
    ///
    /// The tree reads the first `initial.n_features()` columns of `train`.
    ///
    /// # Errors
    ///
    /// - [`DndtError::Configuration`] for invalid parameters or an empty dataset
    /// - [`DndtError::Dimension`] if the tree needs more features than the
    ///   dataset has, or the class counts differ
    /// - [`DndtError::Numerical`] if the loss or a gradient stops being finite;
    ///   the trainer stays in the failing [`TrainingState::Training`] iteration
    pub fn train(&mut self, initial: TreeParams, train: &Dataset) -> Result<TrainingOutcome, DndtError> {
        self.params.validate()?;
        train.validate_for_training()?;
        if initial.n_features() > train.n_features() {
            return Err(DndtError::dimension("feature columns", initial.n_features(), train.n_features()));
        }
        if initial.n_classes() != train.n_classes() {
            return Err(DndtError::dimension("classes", initial.n_classes(), train.n_classes()));
        }

        let n_iterations = self.params.n_iterations;
        let temperature = self.params.temperature;
        let mut logger = TrainingLogger::new(self.params.verbosity);
        logger.start_training(n_iterations, train.n_samples(), initial.n_leaves());

        let mut params = initial;
        let mut adam = Adam::new(self.params.adam, self.params.learning_rate, &params);
        let mut loss_history = Vec::with_capacity(n_iterations as usize);

        for iteration in 0..n_iterations {
            self.state = TrainingState::Training { iteration };

            let pass = ForwardPass::run(&params, train.features(), temperature)?;
            let (loss, grad_scores) = self.objective.loss_and_gradient(pass.scores(), train.targets());
            if !loss.is_finite() {
                logger.warn("training loss is not finite");
                return Err(DndtError::Numerical {
                    quantity: "loss",
                    iteration,
                });
            }

            let grads = pass.backward(&params, grad_scores.view());
            if !grads.is_finite() {
                logger.warn("parameter gradient is not finite");
                return Err(DndtError::Numerical {
                    quantity: "gradient",
                    iteration,
                });
            }

            loss_history.push(loss);
            if logger.should_log_iteration(iteration) {
                let accuracy = MulticlassAccuracy.compute(pass.scores(), train.targets());
                let metrics = [MetricValue::new("train-accuracy", accuracy, true)];
                logger.log_iteration(iteration, loss, &metrics);
            }

            adam.step(&mut params, &grads);
        }

        self.state = TrainingState::StoppedAtIterationLimit;
        logger.finish_training(loss_history.last().copied());

        Ok(TrainingOutcome {
            params,
            loss_history,
            state: self.state,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
