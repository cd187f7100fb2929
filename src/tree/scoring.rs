//! Leaf scoring: class scores as membership-weighted leaf scores.

use ndarray::{Array2, ArrayView2};

use crate::error::DndtError;

/// Class scores `[n_samples, n_classes]` = `joint · leaf_scores`.
///
/// # Errors
///
/// [`DndtError::Dimension`] if `joint` has a different number of columns than
/// `leaf_scores` has rows.
pub fn score(joint: ArrayView2<f32>, leaf_scores: ArrayView2<f32>) -> Result<Array2<f32>, DndtError> {
    if joint.ncols() != leaf_scores.nrows() {
        return Err(DndtError::dimension("leaf count", leaf_scores.nrows(), joint.ncols()));
    }
    Ok(joint.dot(&leaf_scores))
}

/// Backward of [`score`]: returns `(d_joint, d_leaf_scores)`.
pub fn score_backward(
    joint: ArrayView2<f32>,
    leaf_scores: ArrayView2<f32>,
    grad_scores: ArrayView2<f32>,
) -> (Array2<f32>, Array2<f32>) {
    let grad_joint = grad_scores.dot(&leaf_scores.t());
    let grad_leaf_scores = joint.t().dot(&grad_scores);
    (grad_joint, grad_leaf_scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn hard_membership_selects_leaf_row() {
        let joint = array![[0.0f32, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let leaves = array![[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let scores = score(joint.view(), leaves.view()).unwrap();
        assert_eq!(scores, array![[3.0f32, 4.0], [1.0, 2.0]]);
    }

    #[test]
    fn soft_membership_mixes_leaf_rows() {
        let joint = array![[0.25f32, 0.75]];
        let leaves = array![[4.0f32, 0.0], [0.0, 4.0]];
        let scores = score(joint.view(), leaves.view()).unwrap();
        assert_abs_diff_eq!(scores, array![[1.0f32, 3.0]], epsilon = 1e-6);
    }

    #[test]
    fn rejects_leaf_count_mismatch() {
        let joint = Array2::<f32>::ones((2, 4));
        let leaves = Array2::<f32>::ones((3, 2));
        assert!(matches!(
            score(joint.view(), leaves.view()),
            Err(DndtError::Dimension {
                expected: 3,
                actual: 4,
                ..
            })
        ));
    }

    #[test]
    fn backward_shapes_and_values() {
        let joint = array![[0.5f32, 0.5], [1.0, 0.0]];
        let leaves = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let grad = array![[1.0f32, 0.0, 0.0], [0.0, 0.0, 1.0]];

        let (d_joint, d_leaves) = score_backward(joint.view(), leaves.view(), grad.view());
        assert_eq!(d_joint, array![[1.0f32, 4.0], [3.0, 6.0]]);
        assert_eq!(d_leaves, array![[0.5f32, 0.0, 1.0], [0.5, 0.0, 0.0]]);
    }
}
