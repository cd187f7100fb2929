//! Property-based tests for the tree building blocks.

use dndt::tree::{combine, leaf_count, soft_bin};
use ndarray::{Array1, Array2};
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_values() -> impl Strategy<Value = Vec<f32>> {
    prop_vec(-5.0f32..5.0, 1..20)
}

fn arb_cuts() -> impl Strategy<Value = Vec<f32>> {
    prop_vec(-5.0f32..5.0, 0..6)
}

fn arb_temperature() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.01f32), Just(0.1), Just(1.0), 0.05f32..10.0]
}

/// Row-stochastic matrix with `rows` rows and `cols` columns.
fn stochastic(rows: usize, cols: usize, raw: &[f32]) -> Array2<f32> {
    let mut m = Array2::from_shape_fn((rows, cols), |(i, j)| raw[(i * cols + j) % raw.len()] + 0.01);
    for mut row in m.rows_mut() {
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    m
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn bin_rows_are_distributions(values in arb_values(), cuts in arb_cuts(), t in arb_temperature()) {
        let probs = soft_bin(Array1::from(values.clone()).view(), Array1::from(cuts.clone()).view(), t).unwrap();
        prop_assert_eq!(probs.dim(), (values.len(), cuts.len() + 1));
        for row in probs.rows() {
            prop_assert!(row.iter().all(|&p| p.is_finite() && p >= 0.0));
            prop_assert!((row.sum() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn bins_do_not_depend_on_cut_order(values in arb_values(), mut cuts in arb_cuts(), t in arb_temperature()) {
        let a = soft_bin(Array1::from(values.clone()).view(), Array1::from(cuts.clone()).view(), t).unwrap();
        cuts.reverse();
        let b = soft_bin(Array1::from(values).view(), Array1::from(cuts).view(), t).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn joint_width_is_leaf_count(
        rows in 1usize..8,
        bins in prop_vec(1usize..4, 1..4),
        raw in prop_vec(0.0f32..1.0, 1..64),
    ) {
        let factors: Vec<Array2<f32>> = bins.iter().map(|&b| stochastic(rows, b, &raw)).collect();
        let views: Vec<_> = factors.iter().map(|f| f.view()).collect();
        let joint = combine(&views).unwrap();

        let cuts: Vec<usize> = bins.iter().map(|b| b - 1).collect();
        prop_assert_eq!(joint.dim(), (rows, leaf_count(&cuts).unwrap()));
        for row in joint.rows() {
            prop_assert!((row.sum() - 1.0).abs() < 1e-4);
        }
    }
}
