//! Testing utilities: seeded synthetic datasets.
//!
//! Used by unit tests, integration tests and benches.
//!
//! ```
//! use dndt::testing::axis_separable;
//!
//! let ds = axis_separable(50, 42);
//! assert_eq!(ds.n_samples(), 50);
//! assert_eq!(ds.n_classes(), 2);
//! ```

use ndarray::{Array1, Array2};
use rand::prelude::*;

use crate::data::Dataset;

// =============================================================================
// Synthetic Data
// =============================================================================

/// Random features `[rows, cols]`, uniform in `[min, max)`.
pub fn random_features(rows: usize, cols: usize, seed: u64, min: f32, max: f32) -> Array2<f32> {
    assert!(max >= min);
    let mut rng = StdRng::seed_from_u64(seed);
    let width = max - min;
    Array2::from_shape_fn((rows, cols), |_| min + rng.r#gen::<f32>() * width)
}

/// Two features in `[0, 1)`; the class is 1 iff feature 0 exceeds 0.5.
///
/// Feature 1 is noise. Both classes are present whenever `n >= 2`.
pub fn axis_separable(n: usize, seed: u64) -> Dataset {
    let mut features = random_features(n, 2, seed, 0.0, 1.0);
    // Pin the first two rows so neither class is missing.
    if n >= 2 {
        features[[0, 0]] = 0.1;
        features[[1, 0]] = 0.9;
    }
    let labels: Array1<usize> = features.column(0).mapv(|x| usize::from(x > 0.5));
    Dataset::with_n_classes(features, labels, 2).expect("labels are 0 or 1")
}

/// Four classes by quadrant of the first two features in `[0, 1)`.
///
/// Class `2 * [x0 > 0.5] + [x1 > 0.5]`, so feature 0 selects the high bit.
/// `extra_cols` noise columns are appended.
pub fn quadrants(n: usize, extra_cols: usize, seed: u64) -> Dataset {
    let features = random_features(n, 2 + extra_cols, seed, 0.0, 1.0);
    let labels: Array1<usize> = features
        .rows()
        .into_iter()
        .map(|row| 2 * usize::from(row[0] > 0.5) + usize::from(row[1] > 0.5))
        .collect();
    Dataset::with_n_classes(features, labels, 4).expect("labels are below 4")
}

/// One-hot version of [`axis_separable`].
pub fn axis_separable_one_hot(n: usize, seed: u64) -> Dataset {
    let ds = axis_separable(n, seed);
    Dataset::from_one_hot(ds.features().to_owned(), ds.one_hot_targets()).expect("one-hot rows are valid")
}
