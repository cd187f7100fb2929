//! High-level DNDT configuration with builder pattern.
//!
//! [`DndtConfig`] collects everything [`DndtModel::train`](super::DndtModel::train)
//! needs. It uses the `bon` crate for builder generation and validates values
//! when the builder finishes.
//!
//! # Example
//!
//! ```
//! use dndt::model::{CutSpec, DndtConfig, TestSplit};
//!
//! // All defaults: one cut per feature, temperature 0.1, 1000 iterations
//! let config = DndtConfig::builder().build().unwrap();
//!
//! // Two features with one cut each, 80/20 split
//! let config = DndtConfig::builder()
//!     .cuts(CutSpec::first_features(2, 1))
//!     .n_iterations(100)
//!     .seed(42)
//!     .test_split(TestSplit::new(0.2, 42))
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::error::{ConfigError, DndtError};
use crate::training::{AdamParams, TrainerParams, Verbosity};
use crate::tree::leaf_count;

// =============================================================================
// CutSpec
// =============================================================================

/// Number of cut points per tree feature.
///
/// The tree uses feature columns in order, starting from column 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutSpec {
    /// The same number of cuts on every feature column of the dataset.
    Uniform(usize),
    /// Cuts for the first `len()` feature columns.
    PerFeature(Vec<usize>),
}

impl Default for CutSpec {
    fn default() -> Self {
        Self::Uniform(1)
    }
}

impl CutSpec {
    /// `n_cuts` cut points on each of the first `n_features` columns.
    pub fn first_features(n_features: usize, n_cuts: usize) -> Self {
        Self::PerFeature(vec![n_cuts; n_features])
    }

    /// Cuts per tree feature for a dataset with `n_features` columns.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoFeatures`] if `n_features` is 0
    /// - [`ConfigError::EmptyCutSpec`] for an empty per-feature list
    /// - [`DndtError::Dimension`] if more features are listed than exist
    /// - [`ConfigError::TooManyLeaves`] if the leaf count overflows
    pub fn resolve(&self, n_features: usize) -> Result<Vec<usize>, DndtError> {
        if n_features == 0 {
            return Err(ConfigError::NoFeatures.into());
        }
        let cuts = match self {
            Self::Uniform(c) => vec![*c; n_features],
            Self::PerFeature(cuts) => {
                if cuts.is_empty() {
                    return Err(ConfigError::EmptyCutSpec.into());
                }
                if cuts.len() > n_features {
                    return Err(DndtError::dimension("cut spec features", n_features, cuts.len()));
                }
                cuts.clone()
            }
        };
        leaf_count(&cuts)?;
        Ok(cuts)
    }
}

// =============================================================================
// TestSplit
// =============================================================================

/// Held-out evaluation split: `ceil(n * fraction)` samples, chosen by `seed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestSplit {
    pub fraction: f64,
    pub seed: u64,
}

impl TestSplit {
    pub fn new(fraction: f64, seed: u64) -> Self {
        Self { fraction, seed }
    }
}

// =============================================================================
// DndtConfig
// =============================================================================

/// High-level configuration for DNDT training.
///
/// # Structure
///
/// - **Tree**: cut points per feature via [`CutSpec`] and the binning temperature
/// - **Optimization**: learning rate, iteration budget, Adam terms
/// - **Data**: optional held-out split
/// - **Reproducibility**: seed for parameter initialization
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct DndtConfig {
    // === Tree ===
    /// Cut points per feature. Default: one cut on every feature.
    #[builder(default)]
    pub cuts: CutSpec,

    /// Softmax temperature of the binning function. Default: 0.1.
    ///
    /// Smaller values make the bins closer to hard splits.
    #[builder(default = 0.1)]
    pub temperature: f32,

    // === Optimization ===
    /// Adam learning rate. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// Number of full-batch iterations. Default: 1000.
    #[builder(default = 1000)]
    pub n_iterations: u32,

    /// Adam decay and epsilon terms.
    #[builder(default)]
    pub adam: AdamParams,

    // === Data ===
    /// Evaluate on a held-out split instead of the training data.
    pub test_split: Option<TestSplit>,

    // === Reproducibility ===
    /// Seed for parameter initialization. If `None`, one is drawn and
    /// reported in the training report.
    pub seed: Option<u64>,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: dndt_config_builder::IsComplete> DndtConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any value is invalid:
    /// - `temperature` not finite and > 0
    /// - `learning_rate` not finite and > 0
    /// - `n_iterations == 0`
    /// - empty per-feature cut list
    /// - test fraction outside (0, 1)
    /// - Adam terms out of range
    pub fn build(self) -> Result<DndtConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl DndtConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.trainer_params().validate()?;

        if let CutSpec::PerFeature(cuts) = &self.cuts {
            if cuts.is_empty() {
                return Err(ConfigError::EmptyCutSpec);
            }
            leaf_count(cuts)?;
        }

        if let Some(split) = &self.test_split {
            if !(split.fraction > 0.0 && split.fraction < 1.0) {
                return Err(ConfigError::InvalidTestFraction(split.fraction));
            }
        }

        Ok(())
    }

    /// Trainer parameters derived from this config.
    pub fn trainer_params(&self) -> TrainerParams {
        TrainerParams {
            temperature: self.temperature,
            learning_rate: self.learning_rate,
            n_iterations: self.n_iterations,
            adam: self.adam,
            verbosity: self.verbosity,
        }
    }
}

impl Default for DndtConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
