//! Dataset container.
//!
//! This module provides [`Dataset`] and the [`Targets`] it carries.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{ConfigError, DndtError};
use crate::utils::argmax;

// =============================================================================
// Targets
// =============================================================================

/// Training targets, one entry per sample.
///
/// The loss accepts either form; accuracy always compares against the class
/// index (the argmax of a one-hot row).
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Class index per sample, in `0..n_classes`.
    Classes(Array1<usize>),
    /// Target distribution per sample: `[n_samples, n_classes]`.
    OneHot(Array2<f32>),
}

impl Targets {
    /// Number of samples covered by the targets.
    pub fn n_samples(&self) -> usize {
        match self {
            Self::Classes(labels) => labels.len(),
            Self::OneHot(matrix) => matrix.nrows(),
        }
    }

    /// True class of sample `i`.
    #[inline]
    pub fn class_of(&self, i: usize) -> usize {
        match self {
            Self::Classes(labels) => labels[i],
            Self::OneHot(matrix) => argmax(matrix.row(i)),
        }
    }

    /// Class index per sample.
    pub fn classes(&self) -> Array1<usize> {
        (0..self.n_samples()).map(|i| self.class_of(i)).collect()
    }

    /// Targets restricted to the given rows, in the given order.
    pub fn select(&self, rows: &[usize]) -> Self {
        match self {
            Self::Classes(labels) => Self::Classes(labels.select(Axis(0), rows)),
            Self::OneHot(matrix) => Self::OneHot(matrix.select(Axis(0), rows)),
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Feature matrix with paired targets.
///
/// # Storage Layout
///
/// Features are **sample-major**: `[n_samples, n_features]`. The tree reads one
/// column per feature it splits on, in column order.
///
/// # Example
///
/// ```
/// use dndt::data::Dataset;
/// use ndarray::array;
///
/// let features = array![[0.1, 0.9], [0.8, 0.2], [0.7, 0.4]];
/// let labels = array![0, 1, 1];
/// let ds = Dataset::new(features, labels).unwrap();
///
/// assert_eq!(ds.n_samples(), 3);
/// assert_eq!(ds.n_features(), 2);
/// assert_eq!(ds.n_classes(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    targets: Targets,
    n_classes: usize,
}

impl Dataset {
    /// Create a dataset from class-index labels.
    ///
    /// The class count is inferred as `max(label) + 1`.
    pub fn new(features: Array2<f32>, labels: Array1<usize>) -> Result<Self, DndtError> {
        let n_classes = labels.iter().copied().max().map_or(0, |m| m + 1);
        Self::with_n_classes(features, labels, n_classes)
    }

    /// Create a dataset from class-index labels with an explicit class count.
    ///
    /// Use this when a split or subset may not contain every class.
    pub fn with_n_classes(
        features: Array2<f32>,
        labels: Array1<usize>,
        n_classes: usize,
    ) -> Result<Self, DndtError> {
        if labels.len() != features.nrows() {
            return Err(DndtError::dimension("labels", features.nrows(), labels.len()));
        }
        if let Some((index, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= n_classes) {
            return Err(DndtError::InvalidLabel {
                index,
                label,
                n_classes,
            });
        }

        Ok(Self {
            features,
            targets: Targets::Classes(labels),
            n_classes,
        })
    }

    /// Create a dataset from one-hot (or soft) target rows.
    pub fn from_one_hot(features: Array2<f32>, targets: Array2<f32>) -> Result<Self, DndtError> {
        if targets.nrows() != features.nrows() {
            return Err(DndtError::dimension("one-hot targets", features.nrows(), targets.nrows()));
        }
        if let Some(index) = targets
            .rows()
            .into_iter()
            .position(|row| row.iter().any(|&v| !v.is_finite() || v < 0.0))
        {
            return Err(DndtError::InvalidTarget { index });
        }

        let n_classes = targets.ncols();
        Ok(Self {
            features,
            targets: Targets::OneHot(targets),
            n_classes,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Feature matrix `[n_samples, n_features]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// Values of one feature across all samples.
    #[inline]
    pub fn feature(&self, index: usize) -> ArrayView1<'_, f32> {
        self.features.column(index)
    }

    /// Targets.
    #[inline]
    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    /// Target representation converted to one-hot rows.
    pub fn one_hot_targets(&self) -> Array2<f32> {
        match &self.targets {
            Targets::OneHot(matrix) => matrix.clone(),
            Targets::Classes(labels) => {
                let mut out = Array2::zeros((labels.len(), self.n_classes));
                for (i, &label) in labels.iter().enumerate() {
                    out[[i, label]] = 1.0;
                }
                out
            }
        }
    }

    // =========================================================================
    // Subsets
    // =========================================================================

    /// Subset of samples, in the given order. The class count is preserved.
    ///
    /// # Panics
    ///
    /// Panics if a row index is out of bounds.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            targets: self.targets.select(rows),
            n_classes: self.n_classes,
        }
    }

    /// Keep only the given feature columns, in the given order.
    pub fn select_features(&self, columns: &[usize]) -> Result<Self, DndtError> {
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.n_features()) {
            return Err(DndtError::dimension("feature index", self.n_features(), bad));
        }
        Ok(Self {
            features: self.features.select(Axis(1), columns),
            targets: self.targets.clone(),
            n_classes: self.n_classes,
        })
    }

    /// Remove the given feature columns, keeping the rest in order.
    pub fn drop_features(&self, columns: &[usize]) -> Result<Self, DndtError> {
        let keep: Vec<usize> = (0..self.n_features())
            .filter(|c| !columns.contains(c))
            .collect();
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.n_features()) {
            return Err(DndtError::dimension("feature index", self.n_features(), bad));
        }
        self.select_features(&keep)
    }

    /// Check that the dataset can be trained on.
    pub(crate) fn validate_for_training(&self) -> Result<(), DndtError> {
        if self.n_features() == 0 {
            return Err(ConfigError::NoFeatures.into());
        }
        if self.n_samples() == 0 {
            return Err(ConfigError::EmptyDataset.into());
        }
        Ok(())
    }
}
