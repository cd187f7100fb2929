//! Deterministic train/test split.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::Dataset;
use crate::error::{ConfigError, DndtError};

/// Deterministic train/test split of row indices.
///
/// Shuffles `0..rows` with a generator seeded from `seed` and moves the first
/// `ceil(rows * test_fraction)` indices to the test side.
///
/// Returns `(train_idx, test_idx)`.
pub fn split_indices(
    rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), ConfigError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ConfigError::InvalidTestFraction(test_fraction));
    }

    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test_len = ((rows as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(rows);
    if test_len == 0 {
        return Err(ConfigError::EmptySplit {
            side: "test",
            n_samples: rows,
        });
    }
    if test_len == rows {
        return Err(ConfigError::EmptySplit {
            side: "train",
            n_samples: rows,
        });
    }

    let (test, train) = idx.split_at(test_len);
    Ok((train.to_vec(), test.to_vec()))
}

/// Split a dataset into `(train, test)` parts.
///
/// Both parts keep the full class count of `dataset`.
///
/// # Example
///
/// ```
/// use dndt::data::{train_test_split, Dataset};
/// use ndarray::{Array1, Array2};
///
/// let ds = Dataset::new(Array2::zeros((50, 2)), Array1::from_elem(50, 0)).unwrap();
/// let (train, test) = train_test_split(&ds, 0.2, 7).unwrap();
/// assert_eq!(train.n_samples(), 40);
/// assert_eq!(test.n_samples(), 10);
/// ```
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), DndtError> {
    let (train_idx, test_idx) = split_indices(dataset.n_samples(), test_fraction, seed)?;
    Ok((dataset.select_rows(&train_idx), dataset.select_rows(&test_idx)))
}
