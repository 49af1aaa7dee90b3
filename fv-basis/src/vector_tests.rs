use crate::{BasisError, BasisFunction, FactoredVector};

use fv_core::{to_index, PartialFactorsEnumerator, ScopeError};
use nalgebra::DVector;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

const EPS: f64 = 1e-9;

fn two_binary() -> (Vec<usize>, FactoredVector) {
    let space = vec![2, 2];
    let f = FactoredVector::new(vec![
        BasisFunction::new(vec![0], DVector::from_vec(vec![1.0, 2.0]), &space).unwrap(),
        BasisFunction::new(vec![1], DVector::from_vec(vec![3.0, 4.0]), &space).unwrap(),
    ]);
    (space, f)
}

fn random_function(rng: &mut ChaCha8Rng, space: &[usize], n_bases: usize) -> FactoredVector {
    let bases = (0..n_bases)
        .map(|_| {
            // Random non-empty scope without duplicates, in random order.
            let mut vars: Vec<usize> = (0..space.len()).collect();
            for i in (1..vars.len()).rev() {
                vars.swap(i, rng.gen_range(0..=i));
            }
            vars.truncate(rng.gen_range(1..=space.len().min(3)));
            BasisFunction::from_fn(vars, space, |_| rng.gen_range(-5.0..5.0)).unwrap()
        })
        .collect();
    FactoredVector::new(bases)
}

#[test]
fn unweighted_value_sums_scoped_entries() {
    let (space, f) = two_binary();
    assert_eq!(f.get_value(&space, &[1, 0]), 5.0);
    assert_eq!(f.get_value(&space, &[0, 0]), 4.0);
    assert_eq!(f.get_value(&space, &[1, 1]), 6.0);
}

#[test]
fn weighted_value_with_and_without_bias() {
    let (space, f) = two_binary();
    let x = [1, 0];
    assert_eq!(f.get_weighted_value(&space, &x, &DVector::from_vec(vec![2.0, 0.5])), 5.5);
    assert_eq!(
        f.get_weighted_value(&space, &x, &DVector::from_vec(vec![2.0, 0.5, 1.0])),
        6.5
    );
}

#[test]
fn scaling_with_bias_reproduces_weighted_value() {
    let (space, f) = two_binary();
    let w = DVector::from_vec(vec![2.0, 0.5, 1.0]);

    let mut g = f.clone();
    g.scale_by_weights(&w);

    // Bias is spread as 0.5 per basis, on every entry.
    assert_eq!(g.bases()[0].values, DVector::from_vec(vec![2.5, 4.5]));
    assert_eq!(g.bases()[1].values, DVector::from_vec(vec![2.0, 2.5]));

    for x in PartialFactorsEnumerator::full(&space) {
        let expected = f.get_weighted_value(&space, &x, &w);
        assert!((g.get_value(&space, &x) - expected).abs() < EPS, "{x:?}");
    }
}

#[test]
fn bias_is_spread_evenly_regardless_of_weights() {
    let (space, f) = two_binary();
    let w = DVector::from_vec(vec![0.0, 0.0, 3.0]);
    let g = f * &w;
    for b in g.bases() {
        assert!(b.values.iter().all(|&v| v == 1.5));
    }
    assert_eq!(g.get_value(&space, &[0, 1]), 3.0);
}

#[test]
fn operators_are_symmetric() {
    let (space, f) = two_binary();
    let w = DVector::from_vec(vec![2.0, -1.0, 0.25]);

    let left = f.clone() * &w;
    let right = &w * f.clone();
    let mut in_place = f.clone();
    in_place *= &w;
    assert_eq!(left, right);
    assert_eq!(left, in_place);

    let left = f.clone() * 3.0;
    let right = 3.0 * f.clone();
    let mut in_place = f.clone();
    in_place *= 3.0;
    assert_eq!(left, right);
    assert_eq!(left, in_place);
    assert_eq!(left.get_value(&space, &[1, 0]), 15.0);

    // The consuming forms leave the original untouched.
    assert_eq!(f, two_binary().1);
}

#[test]
fn scale_round_trip_restores_tables() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let space = [3, 2, 4, 2];
    let f = random_function(&mut rng, &space, 5);

    for &c in &[2.0, -0.3, 1e-3, 7.5] {
        let mut g = f.clone();
        g.scale(c).scale(1.0 / c);
        for (a, b) in f.bases().iter().zip(g.bases()) {
            assert_eq!(a.tag, b.tag);
            assert!((&a.values - &b.values).amax() < 1e-9);
        }
    }
}

#[test]
fn weighted_value_matches_scaling_randomized() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let space = [2, 3, 2, 4, 3];

    for _ in 0..50 {
        let n = rng.gen_range(1..6);
        let f = random_function(&mut rng, &space, n);
        let with_bias = rng.gen_bool(0.5);
        let len = if with_bias { n + 1 } else { n };
        let w = DVector::from_iterator(len, (0..len).map(|_| rng.gen_range(-2.0..2.0)));

        let g = f.clone() * &w;
        for _ in 0..20 {
            let x: Vec<usize> = space.iter().map(|&c| rng.gen_range(0..c)).collect();
            let a = f.get_weighted_value(&space, &x, &w);
            let b = g.get_value(&space, &x);
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }
}

#[test]
fn from_fn_agrees_with_partial_index() {
    let space = [3, 2, 4];
    // Encode the scoped values into the table so every lookup is checkable.
    let b = BasisFunction::from_fn(vec![2, 0], &space, |v| (v[0] * 10 + v[1]) as f64).unwrap();
    assert_eq!(b.values.len(), 12);

    for x in PartialFactorsEnumerator::full(&space) {
        assert_eq!(b.value(&space, &x), (x[2] * 10 + x[0]) as f64);
    }
    // First scope variable is least significant.
    assert_eq!(b.values[1], 10.0);
    assert_eq!(b.values[4], 1.0);
}

#[test]
fn to_dense_lists_every_joint_value() {
    let (space, f) = two_binary();
    let dense = f.to_dense(&space);
    assert_eq!(dense.len(), 4);
    for x in PartialFactorsEnumerator::full(&space) {
        assert_eq!(dense[to_index(&space, &x)], f.get_value(&space, &x));
    }
    assert_eq!(dense, DVector::from_vec(vec![4.0, 5.0, 5.0, 6.0]));
}

#[test]
fn empty_function() {
    let f = FactoredVector::default();
    let space = [2];
    assert!(f.is_empty());
    assert_eq!(f.get_value(&space, &[1]), 0.0);
    assert_eq!(f.get_weighted_value(&space, &[1], &DVector::from_vec(vec![2.0])), 2.0);

    // No table can hold the bias; scaling keeps the function empty.
    let g = f * &DVector::from_vec(vec![2.0]);
    assert!(g.is_empty());
}

#[test]
fn checked_construction_rejects_bad_bases() {
    let space = [2, 3];
    assert_eq!(
        BasisFunction::new(vec![1], DVector::from_vec(vec![0.0; 2]), &space).unwrap_err(),
        BasisError::TableLength {
            tag: vec![1],
            expected: 3,
            got: 2
        }
    );
    assert_eq!(
        BasisFunction::new(vec![2], DVector::from_vec(vec![0.0; 2]), &space).unwrap_err(),
        BasisError::Scope(ScopeError::UnknownVariable { var: 2, num_vars: 2 })
    );
    assert!(matches!(
        BasisFunction::from_fn(vec![0, 0], &space, |_| 0.0),
        Err(BasisError::Scope(ScopeError::DuplicateVariable { var: 0 }))
    ));
}

#[test]
fn validate_reports_the_failing_entry() {
    let space = vec![2, 2];
    let ok = BasisFunction::new(vec![0], DVector::zeros(2), &space).unwrap();
    let bad = BasisFunction {
        tag: vec![0, 1],
        values: DVector::zeros(3),
    };
    let f = FactoredVector::new(vec![ok, bad]);
    match f.validate(&space) {
        Err(BasisError::Entry { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
#[should_panic(expected = "coefficients")]
fn wrong_weight_count_panics_on_evaluate() {
    let (space, f) = two_binary();
    let _ = f.get_weighted_value(&space, &[0, 0], &DVector::from_vec(vec![1.0]));
}

#[test]
#[should_panic(expected = "coefficients")]
fn wrong_weight_count_panics_on_scale() {
    let (_, mut f) = two_binary();
    f *= &DVector::from_vec(vec![1.0, 1.0, 1.0, 1.0]);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "assignment has 1 values for a space of 2 variables")]
fn short_state_panics_in_debug() {
    let (space, f) = two_binary();
    let _ = f.get_value(&space, &[1]);
}
