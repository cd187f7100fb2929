//! Preprocessing applied before training.
//!
//! - [`LabelEncoder`]: arbitrary ordered labels to contiguous class indices
//! - [`MinMaxScaler`]: per-column rescaling to `[0, 1]`

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::error::DndtError;

// =============================================================================
// LabelEncoder
// =============================================================================

/// Maps labels to class indices by their sorted position.
///
/// The classes are the sorted unique labels seen during [`fit`](Self::fit), so
/// the smallest label becomes class 0.
///
/// # Example
///
/// ```
/// use dndt::data::LabelEncoder;
///
/// let species = ["virginica", "setosa", "setosa", "versicolor"];
/// let encoder = LabelEncoder::fit(&species);
/// assert_eq!(encoder.n_classes(), 3);
/// assert_eq!(encoder.transform(&species).unwrap().to_vec(), vec![2usize, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder<T> {
    classes: Vec<T>,
}

impl<T: Ord + Clone> LabelEncoder<T> {
    /// Learn the class set from `labels`.
    pub fn fit(labels: &[T]) -> Self {
        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Sorted class labels; position is the class index.
    pub fn classes(&self) -> &[T] {
        &self.classes
    }

    /// Number of distinct classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class index of every label.
    pub fn transform(&self, labels: &[T]) -> Result<Array1<usize>, DndtError> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                self.classes
                    .binary_search(label)
                    .map_err(|_| DndtError::UnknownLabel { index })
            })
            .collect()
    }

    /// Label of a class index, if it exists.
    pub fn inverse(&self, class: usize) -> Option<&T> {
        self.classes.get(class)
    }

    /// Fit on a categorical feature column and return its numeric codes.
    pub fn encode_column(column: &[T]) -> Array1<f32> {
        let encoder = Self::fit(column);
        column
            .iter()
            .map(|v| encoder.classes.binary_search(v).map_or(0.0, |c| c as f32))
            .collect()
    }
}

// =============================================================================
// MinMaxScaler
// =============================================================================

/// Rescales each feature column to `[0, 1]` using ranges learned at fit time.
///
/// Constant columns map to 0. Values outside the fitted range extrapolate
/// linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: Array1<f32>,
    scale: Array1<f32>,
}

impl MinMaxScaler {
    /// Learn per-column minimum and range from `features` `[n_samples, n_features]`.
    pub fn fit(features: ArrayView2<f32>) -> Self {
        let min = features.fold_axis(Axis(0), f32::INFINITY, |&acc, &v| acc.min(v));
        let max = features.fold_axis(Axis(0), f32::NEG_INFINITY, |&acc, &v| acc.max(v));
        let scale = Zip::from(&min).and(&max).map_collect(|&lo, &hi| {
            let range = hi - lo;
            if range > 0.0 && range.is_finite() { 1.0 / range } else { 0.0 }
        });
        Self { min, scale }
    }

    /// Number of columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.min.len()
    }

    /// Apply the learned scaling.
    pub fn transform(&self, features: ArrayView2<f32>) -> Result<Array2<f32>, DndtError> {
        if features.ncols() != self.n_features() {
            return Err(DndtError::dimension("scaler features", self.n_features(), features.ncols()));
        }
        let mut out = features.to_owned();
        self.apply(&mut out);
        Ok(out)
    }

    /// Fit on `features` and transform them in one go.
    pub fn fit_transform(features: ArrayView2<f32>) -> (Self, Array2<f32>) {
        let scaler = Self::fit(features);
        let mut out = features.to_owned();
        scaler.apply(&mut out);
        (scaler, out)
    }

    fn apply(&self, features: &mut Array2<f32>) {
        for mut row in features.rows_mut() {
            Zip::from(&mut row)
                .and(&self.min)
                .and(&self.scale)
                .for_each(|v, &lo, &s| *v = (*v - lo) * s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn label_encoder_uses_sorted_order() {
        let encoder = LabelEncoder::fit(&[30, 10, 20, 10]);
        assert_eq!(encoder.classes(), &[10, 20, 30]);
        assert_eq!(encoder.transform(&[20, 30, 10]).unwrap(), array![1usize, 2, 0]);
        assert_eq!(encoder.inverse(2), Some(&30));
        assert_eq!(encoder.inverse(3), None);
    }

    #[test]
    fn label_encoder_rejects_unseen_label() {
        let encoder = LabelEncoder::fit(&["a", "b"]);
        assert_eq!(
            encoder.transform(&["a", "c"]),
            Err(DndtError::UnknownLabel { index: 1 })
        );
    }

    #[test]
    fn encode_column_produces_codes() {
        let codes = LabelEncoder::encode_column(&["red", "blue", "red", "green"]);
        assert_eq!(codes, array![2.0f32, 0.0, 2.0, 1.0]);
    }

    #[test]
    fn min_max_scales_columns_to_unit_range() {
        let features = array![[1.0f32, 5.0, 3.0], [3.0, 5.0, 1.0], [2.0, 5.0, 2.0]];
        let (scaler, scaled) = MinMaxScaler::fit_transform(features.view());

        assert_eq!(scaler.n_features(), 3);
        assert_abs_diff_eq!(
            scaled,
            array![[0.0f32, 0.0, 1.0], [1.0, 0.0, 0.0], [0.5, 0.0, 0.5]],
            epsilon = 1e-6
        );
    }

    #[test]
    fn min_max_transform_checks_width() {
        let scaler = MinMaxScaler::fit(array![[0.0f32, 1.0]].view());
        assert!(scaler.transform(array![[0.0f32]].view()).is_err());
        let out = scaler.transform(array![[2.0f32, 1.0]].view()).unwrap();
        assert_eq!(out, array![[0.0f32, 0.0]]);
    }
}
