//! Error types.
//!
//! [`DndtError`] is returned by every fallible operation in the crate.
//! Configuration problems are grouped in [`ConfigError`], which is also what
//! [`DndtConfig::builder`](crate::model::DndtConfig::builder) returns on
//! validation failure.

// =============================================================================
// ConfigError
// =============================================================================

/// Invalid hyperparameter or tree configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Temperature must be finite and > 0.
    #[error("temperature must be finite and > 0, got {0}")]
    InvalidTemperature(f32),

    /// Learning rate must be finite and > 0.
    #[error("learning_rate must be finite and > 0, got {0}")]
    InvalidLearningRate(f32),

    /// Iteration budget must be at least 1.
    #[error("n_iterations must be at least 1")]
    InvalidIterations,

    /// The dataset has no feature columns.
    #[error("dataset has no features")]
    NoFeatures,

    /// The dataset has no samples.
    #[error("dataset has no samples")]
    EmptyDataset,

    /// The cut-point configuration names no features.
    #[error("cut-point configuration is empty")]
    EmptyCutSpec,

    /// The combiner was given no per-feature bin matrices.
    #[error("at least one feature is required to build joint leaf membership")]
    NoBinnedFeatures,

    /// Test fraction must be in (0, 1).
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f64),

    /// A split left the train or test side without samples.
    #[error("split of {n_samples} samples leaves an empty {side} set")]
    EmptySplit {
        side: &'static str,
        n_samples: usize,
    },

    /// The number of leaves exceeds [`MAX_LEAVES`](crate::tree::MAX_LEAVES).
    #[error("number of leaves exceeds {} for the configured cut points", crate::tree::MAX_LEAVES)]
    TooManyLeaves,

    /// An Adam hyperparameter is out of range.
    #[error("adam {field} out of range, got {value}")]
    InvalidAdam { field: &'static str, value: f32 },
}

// =============================================================================
// DndtError
// =============================================================================

/// Error returned by training, prediction and data preparation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DndtError {
    /// Shapes of features, cut points or leaf scores do not line up.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    Dimension {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration, detected before any training iteration.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Loss or gradient became NaN or infinite.
    #[error("non-finite {quantity} at iteration {iteration}")]
    Numerical {
        quantity: &'static str,
        iteration: u32,
    },

    /// A class index is outside `0..n_classes`.
    #[error("label {label} at sample {index} is out of range for {n_classes} classes")]
    InvalidLabel {
        index: usize,
        label: usize,
        n_classes: usize,
    },

    /// A one-hot target row holds a negative or non-finite entry.
    #[error("target row {index} must be finite and non-negative")]
    InvalidTarget { index: usize },

    /// A label was not seen when the encoder was fitted.
    #[error("label at position {index} was not seen during fit")]
    UnknownLabel { index: usize },
}

impl DndtError {
    pub(crate) fn dimension(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::Dimension {
            context,
            expected,
            actual,
        }
    }
}
