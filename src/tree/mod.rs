//! The differentiable tree.
//!
//! A forward pass goes through three stages:
//!
//! 1. [`binning`]: each tree feature's values become a soft bin distribution
//!    `[n_samples, n_cuts + 1]`
//! 2. [`combiner`]: the per-feature distributions are combined into joint
//!    leaf membership `[n_samples, n_leaves]` by a row-wise Kronecker product
//! 3. [`scoring`]: leaf membership times the leaf-score matrix gives class
//!    scores `[n_samples, n_classes]`
//!
//! [`ForwardPass`] runs all three and keeps what the backward pass needs.
//! Gradients come back as [`TreeGradients`], shaped like [`TreeParams`].

pub mod binning;
pub mod combiner;
mod forward;
mod params;
pub mod scoring;

pub use binning::{SoftBinning, soft_bin};
pub use combiner::{JointMembership, combine, kron_rows};
pub use forward::{ForwardPass, predict_scores};
pub use params::{MAX_LEAVES, TreeGradients, TreeParams, leaf_count};
pub use scoring::{score, score_backward};
