//! Trained DNDT model and the end-to-end training entry point.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::config::DndtConfig;
use crate::data::{Dataset, train_test_split};
use crate::error::DndtError;
use crate::training::{DndtTrainer, Verbosity, evaluate_accuracy};
use crate::tree::{TreeParams, binning::validate_temperature, predict_scores};
use crate::utils::{argmax, softmax_inplace};

// =============================================================================
// TrainReport
// =============================================================================

/// Which samples the reported accuracy was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalSplit {
    /// The whole training set (no split requested).
    Train,
    /// The held-out test part of a split. No training sample is included.
    Test,
}

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model: DndtModel,
    /// Fraction of correctly classified evaluation samples.
    pub accuracy: f64,
    pub evaluated_on: EvalSplit,
    /// Number of samples in the accuracy denominator.
    pub n_eval_samples: usize,
    /// Training loss per iteration.
    pub loss_history: Vec<f64>,
    /// Seed used for parameter initialization.
    pub seed: u64,
}

// =============================================================================
// DndtModel
// =============================================================================

/// A trained deep neural decision tree.
///
/// Holds the learned cut points and leaf scores together with the temperature
/// they were trained at. Prediction uses that same temperature.
///
/// # Example
///
/// ```
/// use dndt::data::Dataset;
/// use dndt::model::{CutSpec, DndtConfig, DndtModel};
/// use ndarray::array;
///
/// let ds = Dataset::new(
///     array![[0.1, 0.5], [0.2, 0.4], [0.8, 0.6], [0.9, 0.3]],
///     array![0, 0, 1, 1],
/// )
/// .unwrap();
/// let config = DndtConfig::builder()
///     .cuts(CutSpec::first_features(2, 1))
///     .n_iterations(100)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let report = DndtModel::train(&ds, config).unwrap();
/// assert_eq!(report.model.n_leaves(), 4);
/// assert_eq!(report.n_eval_samples, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DndtModel {
    params: TreeParams,
    temperature: f32,
}

impl DndtModel {
    /// Wrap existing parameters.
    pub fn from_params(params: TreeParams, temperature: f32) -> Result<Self, DndtError> {
        validate_temperature(temperature)?;
        Ok(Self { params, temperature })
    }

    /// Train a model on `dataset`.
    ///
    /// Steps:
    /// 1. resolve the cut configuration against the dataset width
    /// 2. split off a test set if `config.test_split` is set
    /// 3. draw initial parameters from a generator seeded with `config.seed`
    ///    (or a fresh random seed, reported back)
    /// 4. train for `config.n_iterations` iterations
    /// 5. report accuracy on the test set, or on the training set without a split
    ///
    /// # Errors
    ///
    /// Any configuration, dimension or numerical error from the steps above.
    /// Configuration problems are reported before the first iteration.
    pub fn train(dataset: &Dataset, config: DndtConfig) -> Result<TrainReport, DndtError> {
        dataset.validate_for_training()?;
        let cuts = config.cuts.resolve(dataset.n_features())?;

        let split = config
            .test_split
            .map(|s| train_test_split(dataset, s.fraction, s.seed))
            .transpose()?;
        let (train, eval, evaluated_on) = match &split {
            Some((train, test)) => (train, test, EvalSplit::Test),
            None => (dataset, dataset, EvalSplit::Train),
        };

        let seed = config.seed.unwrap_or_else(rand::random);
        if config.verbosity >= Verbosity::Info {
            tracing::info!(
                seed,
                n_train = train.n_samples(),
                n_eval = eval.n_samples(),
                ?evaluated_on,
                "preparing DNDT training"
            );
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let initial = TreeParams::random(&cuts, dataset.n_classes(), &mut rng)?;

        let mut trainer = DndtTrainer::new(config.trainer_params());
        let outcome = trainer.train(initial, train)?;

        let model = Self {
            params: outcome.params,
            temperature: config.temperature,
        };
        let accuracy = evaluate_accuracy(&model.params, eval, model.temperature)?;

        Ok(TrainReport {
            model,
            accuracy,
            evaluated_on,
            n_eval_samples: eval.n_samples(),
            loss_history: outcome.loss_history,
            seed,
        })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Raw class scores `[n_samples, n_classes]`.
    pub fn predict_raw(&self, features: ArrayView2<f32>) -> Result<Array2<f32>, DndtError> {
        predict_scores(&self.params, features, self.temperature)
    }

    /// Class probabilities: softmax of each row of [`predict_raw`](Self::predict_raw).
    pub fn predict_proba(&self, features: ArrayView2<f32>) -> Result<Array2<f32>, DndtError> {
        let mut scores = self.predict_raw(features)?;
        for row in scores.rows_mut() {
            softmax_inplace(row, 1.0);
        }
        Ok(scores)
    }

    /// Highest-scoring class per sample. Ties go to the lowest class index.
    pub fn predict_class(&self, features: ArrayView2<f32>) -> Result<Array1<usize>, DndtError> {
        let scores = self.predict_raw(features)?;
        Ok(scores.axis_iter(Axis(0)).map(argmax).collect())
    }

    /// Accuracy on `dataset`. Parameters are not modified.
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64, DndtError> {
        evaluate_accuracy(&self.params, dataset, self.temperature)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Learned cut points per feature, in storage order.
    #[inline]
    pub fn cut_points(&self) -> &[Array1<f32>] {
        self.params.cut_points()
    }

    /// Learned cut points of one feature, ascending.
    pub fn sorted_cut_points(&self, feature: usize) -> Array1<f32> {
        self.params.sorted_cut_points(feature)
    }

    #[inline]
    pub fn leaf_scores(&self) -> ArrayView2<'_, f32> {
        self.params.leaf_scores()
    }

    /// Scores of one leaf.
    #[inline]
    pub fn leaf(&self, index: usize) -> ArrayView1<'_, f32> {
        self.params.leaf_scores().index_axis_move(Axis(0), index)
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.params.n_leaves()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.params.n_features()
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.params.n_classes()
    }

    #[inline]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn into_params(self) -> TreeParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CutSpec, TestSplit};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn axis_separable() -> Dataset {
        Dataset::new(
            array![[0.1f32, 0.5], [0.2, 0.4], [0.8, 0.6], [0.9, 0.3]],
            array![0, 0, 1, 1],
        )
        .unwrap()
    }

    fn short_config() -> DndtConfig {
        DndtConfig::builder()
            .cuts(CutSpec::first_features(2, 1))
            .n_iterations(100)
            .seed(3)
            .build()
            .unwrap()
    }

    #[test]
    fn train_reports_on_training_set_without_split() {
        let report = DndtModel::train(&axis_separable(), short_config()).unwrap();
        assert_eq!(report.evaluated_on, EvalSplit::Train);
        assert_eq!(report.n_eval_samples, 4);
        assert_eq!(report.seed, 3);
        assert_eq!(report.loss_history.len(), 100);
        assert!(report.accuracy >= 0.75, "accuracy {}", report.accuracy);
    }

    #[test]
    fn random_seed_is_reported() {
        let config = DndtConfig::builder()
            .cuts(CutSpec::Uniform(1))
            .n_iterations(2)
            .build()
            .unwrap();
        let report = DndtModel::train(&axis_separable(), config.clone()).unwrap();

        let replay = DndtConfig {
            seed: Some(report.seed),
            ..config
        };
        let again = DndtModel::train(&axis_separable(), replay).unwrap();
        assert_eq!(report.model, again.model);
    }

    #[test]
    fn predictions_are_consistent() {
        let report = DndtModel::train(&axis_separable(), short_config()).unwrap();
        let model = report.model;
        let x = axis_separable();

        let raw = model.predict_raw(x.features()).unwrap();
        let proba = model.predict_proba(x.features()).unwrap();
        let classes = model.predict_class(x.features()).unwrap();

        assert_eq!(raw.dim(), (4, 2));
        for (i, row) in proba.rows().into_iter().enumerate() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-5);
            assert_eq!(argmax(row), classes[i]);
        }
    }

    #[test]
    fn split_larger_than_dataset_errors_before_training() {
        let config = DndtConfig::builder()
            .test_split(TestSplit::new(0.9, 0))
            .build()
            .unwrap();
        let ds = Dataset::new(array![[0.1f32], [0.9]], array![0, 1]).unwrap();
        assert!(matches!(
            DndtModel::train(&ds, config),
            Err(DndtError::Configuration(_))
        ));
    }

    #[test]
    fn from_params_validates_temperature() {
        let params = TreeParams::new(vec![array![0.5f32]], Array2::zeros((2, 2))).unwrap();
        assert!(DndtModel::from_params(params.clone(), 0.0).is_err());
        let model = DndtModel::from_params(params, 0.1).unwrap();
        assert_eq!(model.n_leaves(), 2);
        assert_eq!(model.leaf(1).len(), 2);
    }

    #[test]
    fn model_serializes_round_trip() {
        let report = DndtModel::train(&axis_separable(), short_config()).unwrap();
        let json = serde_json::to_string(&report.model).unwrap();
        let back: DndtModel = serde_json::from_str(&json).unwrap();

        assert_abs_diff_eq!(back.temperature(), report.model.temperature(), epsilon = 1e-6);
        assert_abs_diff_eq!(back.leaf_scores(), report.model.leaf_scores(), epsilon = 1e-6);
        for (a, b) in back.cut_points().iter().zip(report.model.cut_points()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
    }
}
