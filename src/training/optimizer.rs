//! Adam optimizer over [`TreeParams`].

use ndarray::{ArrayView, ArrayViewMut, Dimension, Zip};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tree::{TreeGradients, TreeParams};

/// Adam hyperparameters other than the learning rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamParams {
    /// First-moment decay. Default: 0.9.
    pub beta1: f32,
    /// Second-moment decay. Default: 0.999.
    pub beta2: f32,
    /// Denominator term. Default: 1e-8.
    pub epsilon: f32,
}

impl Default for AdamParams {
    fn default() -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl AdamParams {
    /// Both decays must be in `[0, 1)` and epsilon finite and > 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::InvalidAdam { field, value });
            }
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidAdam {
                field: "epsilon",
                value: self.epsilon,
            });
        }
        Ok(())
    }
}

/// Adam state for one set of tree parameters.
///
/// Moment buffers are shaped like the parameters and start at zero. The step
/// uses bias-corrected moments:
///
/// ```text
/// m = β1 m + (1 - β1) g
/// v = β2 v + (1 - β2) g²
/// θ -= lr · m̂ / (sqrt(v̂) + ε),   m̂ = m / (1 - β1^t),  v̂ = v / (1 - β2^t)
/// ```
#[derive(Debug, Clone)]
pub struct Adam {
    params: AdamParams,
    learning_rate: f32,
    step: u32,
    first: TreeGradients,
    second: TreeGradients,
}

impl Adam {
    pub fn new(params: AdamParams, learning_rate: f32, tree: &TreeParams) -> Self {
        Self {
            params,
            learning_rate,
            step: 0,
            first: TreeGradients::zeros_like(tree),
            second: TreeGradients::zeros_like(tree),
        }
    }

    /// Number of steps taken so far.
    #[inline]
    pub fn n_steps(&self) -> u32 {
        self.step
    }

    /// Apply one update to every parameter in `tree`.
    pub fn step(&mut self, tree: &mut TreeParams, grads: &TreeGradients) {
        self.step += 1;
        let t = self.step as i32;
        let update = Update {
            lr: self.learning_rate,
            beta1: self.params.beta1,
            beta2: self.params.beta2,
            epsilon: self.params.epsilon,
            correction1: 1.0 - self.params.beta1.powi(t),
            correction2: 1.0 - self.params.beta2.powi(t),
        };

        for (((theta, g), m), v) in tree
            .cut_points_mut()
            .iter_mut()
            .zip(&grads.cut_points)
            .zip(&mut self.first.cut_points)
            .zip(&mut self.second.cut_points)
        {
            update.apply(theta.view_mut(), g.view(), m.view_mut(), v.view_mut());
        }
        update.apply(
            tree.leaf_scores_mut().view_mut(),
            grads.leaf_scores.view(),
            self.first.leaf_scores.view_mut(),
            self.second.leaf_scores.view_mut(),
        );
    }
}

struct Update {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    correction1: f32,
    correction2: f32,
}

impl Update {
    fn apply<D: Dimension>(
        &self,
        theta: ArrayViewMut<f32, D>,
        grad: ArrayView<f32, D>,
        first: ArrayViewMut<f32, D>,
        second: ArrayViewMut<f32, D>,
    ) {
        Zip::from(theta)
            .and(grad)
            .and(first)
            .and(second)
            .for_each(|theta, &g, m, v| {
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                let m_hat = *m / self.correction1;
                let v_hat = *v / self.correction2;
                *theta -= self.lr * m_hat / (v_hat.sqrt() + self.epsilon);
            });
    }
}
