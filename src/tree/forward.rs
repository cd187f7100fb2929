//! Full forward pass of the tree, with the state needed for backpropagation.

use ndarray::{Array2, ArrayView2};

use super::binning::{SoftBinning, validate_temperature};
use super::combiner::JointMembership;
use super::params::{TreeGradients, TreeParams};
use super::scoring::{score, score_backward};
use crate::error::DndtError;

/// Binning, joint membership and class scores for one batch of samples.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    binnings: Vec<SoftBinning>,
    joint: JointMembership,
    scores: Array2<f32>,
}

impl ForwardPass {
    /// Run the tree on `features` `[n_samples, n_columns]`.
    ///
    /// Tree feature `i` reads column `i`; columns past `params.n_features()`
    /// are ignored.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidTemperature`](crate::error::ConfigError::InvalidTemperature)
    /// - [`DndtError::Dimension`] if there are fewer columns than tree features
    pub fn run(params: &TreeParams, features: ArrayView2<f32>, temperature: f32) -> Result<Self, DndtError> {
        validate_temperature(temperature)?;
        if features.ncols() < params.n_features() {
            return Err(DndtError::dimension("feature columns", params.n_features(), features.ncols()));
        }

        let binnings: Vec<SoftBinning> = params
            .cut_points()
            .iter()
            .enumerate()
            .map(|(f, cuts)| SoftBinning::forward(features.column(f), cuts.view(), temperature))
            .collect();

        let joint = {
            let factors: Vec<ArrayView2<f32>> = binnings.iter().map(SoftBinning::probs).collect();
            JointMembership::combine(&factors)?
        };
        let scores = score(joint.joint(), params.leaf_scores())?;

        Ok(Self {
            binnings,
            joint,
            scores,
        })
    }

    /// Class scores `[n_samples, n_classes]`.
    #[inline]
    pub fn scores(&self) -> ArrayView2<'_, f32> {
        self.scores.view()
    }

    /// Joint leaf membership `[n_samples, n_leaves]`.
    #[inline]
    pub fn joint(&self) -> ArrayView2<'_, f32> {
        self.joint.joint()
    }

    pub fn into_scores(self) -> Array2<f32> {
        self.scores
    }

    /// Gradients of the loss with respect to every parameter, given the loss
    /// gradient with respect to the scores.
    pub fn backward(&self, params: &TreeParams, grad_scores: ArrayView2<f32>) -> TreeGradients {
        let (grad_joint, grad_leaf_scores) =
            score_backward(self.joint.joint(), params.leaf_scores(), grad_scores);

        let factors: Vec<ArrayView2<f32>> = self.binnings.iter().map(SoftBinning::probs).collect();
        let grad_factors = self.joint.backward(&factors, grad_joint.view());

        let cut_points = self
            .binnings
            .iter()
            .zip(&grad_factors)
            .map(|(binning, grad)| binning.backward(grad.view()))
            .collect();

        TreeGradients {
            cut_points,
            leaf_scores: grad_leaf_scores,
        }
    }
}

/// Class scores of `features` under `params`, without keeping backward state.
pub fn predict_scores(
    params: &TreeParams,
    features: ArrayView2<f32>,
    temperature: f32,
) -> Result<Array2<f32>, DndtError> {
    ForwardPass::run(params, features, temperature).map(ForwardPass::into_scores)
}
