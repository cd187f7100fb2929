//! Learnable tree parameters and their gradients.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DndtError};

/// Largest supported number of leaves.
///
/// The joint membership matrix holds `n_samples * n_leaves` values per pass.
pub const MAX_LEAVES: usize = 1 << 20;

/// Number of leaves for the given cuts per feature: `Π (c + 1)`.
///
/// # Errors
///
/// [`ConfigError::EmptyCutSpec`] for an empty slice and
/// [`ConfigError::TooManyLeaves`] if the product exceeds [`MAX_LEAVES`].
pub fn leaf_count(cuts_per_feature: &[usize]) -> Result<usize, ConfigError> {
    if cuts_per_feature.is_empty() {
        return Err(ConfigError::EmptyCutSpec);
    }
    cuts_per_feature.iter().try_fold(1usize, |acc, &c| {
        c.checked_add(1)
            .and_then(|bins| acc.checked_mul(bins))
            .filter(|&n| n <= MAX_LEAVES)
            .ok_or(ConfigError::TooManyLeaves)
    })
}

/// Check that a `[n_leaves, n_classes]` leaf matrix is addressable.
fn check_leaf_matrix(n_leaves: usize, n_classes: usize) -> Result<(), ConfigError> {
    match n_leaves.checked_mul(n_classes.max(1)) {
        Some(len) if len <= isize::MAX as usize => Ok(()),
        _ => Err(ConfigError::TooManyLeaves),
    }
}

// =============================================================================
// TreeParams
// =============================================================================

/// Cut points per feature and the leaf-score matrix.
///
/// Feature `i` of the tree reads column `i` of the feature matrix. Leaf rows are
/// ordered with feature 0 as the slowest-varying bin index.
///
/// Cut points are stored in the order the optimizer sees them. They are sorted
/// into a temporary copy for each forward pass and never reordered here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    cut_points: Vec<Array1<f32>>,
    leaf_scores: Array2<f32>,
}

impl TreeParams {
    /// Assemble parameters, checking the leaf matrix against the cut counts.
    pub fn new(cut_points: Vec<Array1<f32>>, leaf_scores: Array2<f32>) -> Result<Self, DndtError> {
        let cuts: Vec<usize> = cut_points.iter().map(|c| c.len()).collect();
        let n_leaves = leaf_count(&cuts)?;
        if leaf_scores.nrows() != n_leaves {
            return Err(DndtError::dimension("leaf scores rows", n_leaves, leaf_scores.nrows()));
        }
        Ok(Self {
            cut_points,
            leaf_scores,
        })
    }

    /// Draw parameters uniformly from `[0, 1)`.
    ///
    /// Cut points are drawn feature by feature, then the leaf matrix row by
    /// row, so the same generator state always yields the same parameters.
    pub fn random<R: Rng>(
        cuts_per_feature: &[usize],
        n_classes: usize,
        rng: &mut R,
    ) -> Result<Self, DndtError> {
        let n_leaves = leaf_count(cuts_per_feature)?;
        check_leaf_matrix(n_leaves, n_classes)?;

        let cut_points: Vec<Array1<f32>> = cuts_per_feature
            .iter()
            .map(|&c| Array1::from_shape_fn(c, |_| rng.r#gen::<f32>()))
            .collect();
        let leaf_scores = Array2::from_shape_fn((n_leaves, n_classes), |_| rng.r#gen::<f32>());

        Ok(Self {
            cut_points,
            leaf_scores,
        })
    }

    /// Number of features the tree splits on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.cut_points.len()
    }

    /// Number of leaves.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.leaf_scores.nrows()
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.leaf_scores.ncols()
    }

    /// Number of cut points of each feature.
    pub fn cuts_per_feature(&self) -> Vec<usize> {
        self.cut_points.iter().map(|c| c.len()).collect()
    }

    /// Cut points of every feature, in storage order.
    #[inline]
    pub fn cut_points(&self) -> &[Array1<f32>] {
        &self.cut_points
    }

    /// Cut points of one feature, in storage order.
    #[inline]
    pub fn feature_cut_points(&self, feature: usize) -> ArrayView1<'_, f32> {
        self.cut_points[feature].view()
    }

    /// Cut points of one feature, ascending. The stored order is untouched.
    pub fn sorted_cut_points(&self, feature: usize) -> Array1<f32> {
        let mut sorted = self.cut_points[feature].to_vec();
        sorted.sort_by(f32::total_cmp);
        Array1::from(sorted)
    }

    /// Leaf-score matrix `[n_leaves, n_classes]`.
    #[inline]
    pub fn leaf_scores(&self) -> ArrayView2<'_, f32> {
        self.leaf_scores.view()
    }

    pub(crate) fn cut_points_mut(&mut self) -> &mut [Array1<f32>] {
        &mut self.cut_points
    }

    pub(crate) fn leaf_scores_mut(&mut self) -> &mut Array2<f32> {
        &mut self.leaf_scores
    }

    /// True if every parameter is finite.
    pub fn is_finite(&self) -> bool {
        self.cut_points.iter().all(|c| c.iter().all(|v| v.is_finite()))
            && self.leaf_scores.iter().all(|v| v.is_finite())
    }
}

// =============================================================================
// TreeGradients
// =============================================================================

/// Gradient of a scalar loss with respect to every [`TreeParams`] entry.
///
/// Shapes match the parameters, and cut-point gradients are in storage
/// order (not sorted order).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGradients {
    pub cut_points: Vec<Array1<f32>>,
    pub leaf_scores: Array2<f32>,
}

impl TreeGradients {
    /// Zero gradients shaped like `params`.
    pub fn zeros_like(params: &TreeParams) -> Self {
        Self {
            cut_points: params.cut_points.iter().map(|c| Array1::zeros(c.len())).collect(),
            leaf_scores: Array2::zeros(params.leaf_scores.raw_dim()),
        }
    }

    /// True if every gradient entry is finite.
    pub fn is_finite(&self) -> bool {
        self.cut_points.iter().all(|c| c.iter().all(|v| v.is_finite()))
            && self.leaf_scores.iter().all(|v| v.is_finite())
    }
}
