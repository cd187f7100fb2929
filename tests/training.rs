//! End-to-end training tests through the public model API.

use dndt::data::{Dataset, train_test_split};
use dndt::model::{CutSpec, DndtConfig, DndtModel, EvalSplit, TestSplit};
use dndt::testing::{axis_separable, axis_separable_one_hot, quadrants};
use dndt::{ConfigError, DndtError};
use ndarray::{Array1, Array2, array};

// =============================================================================
// Helpers
// =============================================================================

fn four_samples() -> Dataset {
    Dataset::new(
        array![[0.1f32, 0.5], [0.2, 0.4], [0.8, 0.6], [0.9, 0.3]],
        array![0, 0, 1, 1],
    )
    .unwrap()
}

fn config(n_iterations: u32, seed: u64) -> DndtConfig {
    DndtConfig::builder()
        .cuts(CutSpec::first_features(2, 1))
        .n_iterations(n_iterations)
        .seed(seed)
        .build()
        .unwrap()
}

// =============================================================================
// Accuracy
// =============================================================================

#[test]
fn separates_four_samples() {
    for seed in [0, 1, 42] {
        let report = DndtModel::train(&four_samples(), config(100, seed)).unwrap();
        assert_eq!(report.model.n_leaves(), 4);
        assert_eq!(report.model.n_classes(), 2);
        assert!(report.accuracy >= 0.75, "seed {seed}: accuracy {}", report.accuracy);
    }
}

#[test]
fn held_out_accuracy_uses_only_test_samples() {
    let ds = axis_separable(50, 11);
    let cfg = DndtConfig::builder()
        .cuts(CutSpec::first_features(2, 1))
        .n_iterations(200)
        .seed(5)
        .test_split(TestSplit::new(0.2, 9))
        .build()
        .unwrap();

    let report = DndtModel::train(&ds, cfg).unwrap();
    assert_eq!(report.evaluated_on, EvalSplit::Test);
    assert_eq!(report.n_eval_samples, 10);

    // Same split, recomputed by hand.
    let (train, test) = train_test_split(&ds, 0.2, 9).unwrap();
    assert_eq!(train.n_samples(), 40);
    assert_eq!(report.accuracy, report.model.accuracy(&test).unwrap());
    assert!((0.0..=1.0).contains(&report.accuracy));
}

#[test]
fn learns_quadrants_with_noise_columns() {
    let ds = quadrants(200, 2, 4);
    let cfg = DndtConfig::builder()
        .cuts(CutSpec::first_features(2, 1))
        .n_iterations(300)
        .seed(8)
        .build()
        .unwrap();

    let report = DndtModel::train(&ds, cfg).unwrap();
    assert_eq!(report.model.n_features(), 2);
    assert_eq!(report.model.n_leaves(), 4);
    assert_eq!(report.model.leaf_scores().dim(), (4, 4));
    assert!(report.accuracy > 0.5, "accuracy {}", report.accuracy);
}

#[test]
fn one_hot_targets_train_like_class_indices() {
    let indices = DndtModel::train(&axis_separable(40, 2), config(50, 6)).unwrap();
    let one_hot = DndtModel::train(&axis_separable_one_hot(40, 2), config(50, 6)).unwrap();

    assert_eq!(indices.loss_history.len(), one_hot.loss_history.len());
    for (a, b) in indices.loss_history.iter().zip(&one_hot.loss_history) {
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }
}

// =============================================================================
// Loss curve and determinism
// =============================================================================

#[test]
fn loss_history_has_one_entry_per_iteration_and_decreases() {
    let report = DndtModel::train(&axis_separable(60, 3), config(150, 1)).unwrap();
    let history = &report.loss_history;
    assert_eq!(history.len(), 150);
    assert!(history.iter().all(|l| l.is_finite() && *l >= 0.0));
    assert!(history[149] < history[0], "{} !< {}", history[149], history[0]);
}

#[test]
fn default_iteration_budget_lowers_the_loss() {
    let cfg = DndtConfig::builder()
        .cuts(CutSpec::first_features(2, 1))
        .seed(4)
        .build()
        .unwrap();
    assert_eq!(cfg.n_iterations, 1000);

    let report = DndtModel::train(&axis_separable(60, 12), cfg).unwrap();
    let history = &report.loss_history;
    assert_eq!(history.len(), 1000);
    assert!(history.iter().all(|l| l.is_finite()));
    assert!(history[999] < history[0], "{} !< {}", history[999], history[0]);
}

#[test]
fn fixed_seed_reproduces_the_model() {
    let a = DndtModel::train(&axis_separable(30, 7), config(40, 99)).unwrap();
    let b = DndtModel::train(&axis_separable(30, 7), config(40, 99)).unwrap();
    assert_eq!(a.model, b.model);
    assert_eq!(a.loss_history, b.loss_history);
    assert_eq!(a.accuracy, b.accuracy);
}

#[test]
fn evaluation_leaves_parameters_untouched() {
    let report = DndtModel::train(&four_samples(), config(20, 0)).unwrap();
    let before = report.model.clone();

    let _ = report.model.accuracy(&four_samples()).unwrap();
    let _ = report.model.predict_proba(four_samples().features()).unwrap();
    assert_eq!(report.model, before);
}

#[test]
fn held_out_labels_may_miss_a_class() {
    let report = DndtModel::train(&four_samples(), config(50, 0)).unwrap();
    let only_low = Dataset::new(array![[0.1f32, 0.5], [0.15, 0.45]], array![0, 0]).unwrap();
    assert_eq!(only_low.n_classes(), 1);

    let accuracy = report.model.accuracy(&only_low).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn extra_feature_columns_are_ignored_at_prediction() {
    let report = DndtModel::train(&four_samples(), config(30, 0)).unwrap();
    let narrow = four_samples();
    let mut wide = Array2::<f32>::zeros((4, 5));
    wide.slice_mut(ndarray::s![.., ..2]).assign(&narrow.features());
    wide.slice_mut(ndarray::s![.., 2..]).fill(123.0);

    let a = report.model.predict_raw(narrow.features()).unwrap();
    let b = report.model.predict_raw(wide.view()).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn too_many_tree_features_is_a_dimension_error() {
    let cfg = DndtConfig::builder()
        .cuts(CutSpec::first_features(3, 1))
        .n_iterations(5)
        .seed(0)
        .build()
        .unwrap();
    let err = DndtModel::train(&four_samples(), cfg).unwrap_err();
    assert!(matches!(err, DndtError::Dimension { expected: 2, actual: 3, .. }));
}

#[test]
fn oversized_tree_is_a_configuration_error() {
    let ds = Dataset::new(Array2::zeros((2, 63)), array![0, 1]).unwrap();
    let cfg = DndtConfig::builder().cuts(CutSpec::Uniform(1)).seed(0).build().unwrap();
    let err = DndtModel::train(&ds, cfg).unwrap_err();
    assert_eq!(err, DndtError::Configuration(ConfigError::TooManyLeaves));

    assert!(matches!(
        DndtConfig::builder().cuts(CutSpec::first_features(21, 1)).build(),
        Err(ConfigError::TooManyLeaves)
    ));
}

#[test]
fn empty_dataset_is_rejected() {
    let ds = Dataset::with_n_classes(Array2::zeros((0, 2)), Array1::zeros(0), 2).unwrap();
    let err = DndtModel::train(&ds, config(5, 0)).unwrap_err();
    assert_eq!(err, DndtError::Configuration(ConfigError::EmptyDataset));
}

#[test]
fn non_finite_features_abort_training() {
    let ds = Dataset::new(array![[f32::NAN, 0.5], [0.9, 0.4]], array![0, 1]).unwrap();
    let err = DndtModel::train(&ds, config(5, 0)).unwrap_err();
    assert!(matches!(err, DndtError::Numerical { iteration: 0, .. }));
}

#[test]
fn invalid_config_values_fail_at_build() {
    assert!(matches!(
        DndtConfig::builder().temperature(-1.0).build(),
        Err(ConfigError::InvalidTemperature(_))
    ));
    assert!(matches!(
        DndtConfig::builder().n_iterations(0).build(),
        Err(ConfigError::InvalidIterations)
    ));
}
