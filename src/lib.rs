//! dndt: Deep Neural Decision Trees for Rust.
//!
//! A decision tree whose splits are learned by gradient descent. Each feature
//! gets a set of continuous cut points; a temperature-controlled softmax turns
//! them into soft bin memberships, the per-feature memberships are combined
//! into leaf memberships by a row-wise Kronecker product, and a learned
//! leaf-score matrix maps leaves to class scores.
//!
//! # Key Types
//!
//! - [`DndtModel`] - Trained tree with train/predict
//! - [`DndtConfig`] - Configuration builder
//! - [`Dataset`] - Features with class-index or one-hot targets
//! - [`TreeParams`] - Learnable cut points and leaf scores
//!
//! # Training
//!
//! Use `DndtConfig::builder()` to configure, then `DndtModel::train()`.
//!
//! ```
//! use dndt::{Dataset, DndtConfig, DndtModel};
//! use dndt::model::CutSpec;
//! use ndarray::array;
//!
//! let ds = Dataset::new(
//!     array![[0.1, 0.3], [0.3, 0.9], [0.7, 0.2], [0.9, 0.6]],
//!     array![0, 0, 1, 1],
//! )?;
//! let config = DndtConfig::builder()
//!     .cuts(CutSpec::first_features(2, 1))
//!     .n_iterations(200)
//!     .seed(0)
//!     .build()?;
//! let report = DndtModel::train(&ds, config)?;
//! println!("accuracy {:.2} after {} iterations", report.accuracy, report.loss_history.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Lower-level pieces live in [`tree`] (forward and backward pass) and
//! [`training`] (loss, optimizer, trainer, metrics).

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod model;
pub mod testing;
pub mod training;
pub mod tree;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{Dataset, Targets};
pub use error::{ConfigError, DndtError};
pub use model::{DndtConfig, DndtModel, TrainReport};
pub use training::{MetricFn, Verbosity};
pub use tree::{TreeGradients, TreeParams};
