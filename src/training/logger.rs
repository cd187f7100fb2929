//! Training progress logging.
//!
//! Events go through `tracing`; installing a subscriber is left to the
//! application. [`Verbosity`] decides which events are emitted at all.

use super::eval::MetricValue;

/// Iterations between progress lines at [`Verbosity::Info`].
pub const PROGRESS_INTERVAL: u32 = 100;

/// How much the trainer reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Start, finish and periodic progress.
    Info,
    /// Every iteration.
    Debug,
}

/// Emits training events according to a [`Verbosity`].
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    n_iterations: u32,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            n_iterations: 0,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// True if an iteration line should be emitted for `iteration` (0-based).
    pub fn should_log_iteration(&self, iteration: u32) -> bool {
        match self.verbosity {
            Verbosity::Debug => true,
            Verbosity::Info => {
                iteration % PROGRESS_INTERVAL == 0 || iteration + 1 == self.n_iterations
            }
            _ => false,
        }
    }

    pub fn start_training(&mut self, n_iterations: u32, n_samples: usize, n_leaves: usize) {
        self.n_iterations = n_iterations;
        if self.verbosity >= Verbosity::Info {
            tracing::info!(n_iterations, n_samples, n_leaves, "starting DNDT training");
        }
    }

    /// Log one iteration's loss and metrics, if this iteration is reported.
    pub fn log_iteration(&self, iteration: u32, loss: f64, metrics: &[MetricValue]) {
        if !self.should_log_iteration(iteration) {
            return;
        }
        let metrics = metrics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(iteration, loss, %metrics, "iteration");
        } else {
            tracing::info!(iteration, loss, %metrics, "iteration");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!("{message}");
        }
    }

    pub fn finish_training(&self, final_loss: Option<f64>) {
        if self.verbosity >= Verbosity::Info {
            match final_loss {
                Some(loss) => tracing::info!(final_loss = loss, "training finished"),
                None => tracing::info!("training finished"),
            }
        }
    }
}
