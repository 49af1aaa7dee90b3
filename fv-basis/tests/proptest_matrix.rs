//! Property tests for the matrix form.


use fv_basis::Factored2DMatrix;
use fv_core::to_index;
use generators::{arb_assignment, arb_matrix, arb_weights, close, SpaceParams};
use nalgebra::DVector;
use proptest::prelude::*;

type Case = (
    Vec<usize>,
    Vec<usize>,
    Factored2DMatrix,
    Vec<usize>,
    Vec<usize>,
    DVector<f64>,
);

fn arb_case() -> impl Strategy<Value = Case> {
    let params = SpaceParams {
        max_vars: 4,
        max_card: 3,
        max_scope: 2,
        max_bases: 4,
    };
    arb_matrix(params).prop_flat_map(|(space, actions, q)| {
        let n = q.len();
        (
            Just(space.clone()),
            Just(actions.clone()),
            Just(q),
            arb_assignment(&space),
            arb_assignment(&actions),
            arb_weights(n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn weighted_value_equals_scaled_value((s, a, q, x, u, w) in arb_case()) {
        let expected = q.get_weighted_value(&s, &a, &x, &u, &w);
        let got = (&w * q.clone()).get_value(&s, &a, &x, &u);
        prop_assert!(close(got, expected), "{} vs {}", got, expected);
    }

    #[test]
    fn bias_is_redistributed((s, a, q, x, u, w) in arb_case(), b in -5.0f64..5.0) {
        let n = q.len();
        let coeffs = w.rows(0, n).into_owned();
        let mut biased = coeffs.clone().resize_vertically(n + 1, 0.0);
        biased[n] = b;

        let plain = (q.clone() * &coeffs).get_value(&s, &a, &x, &u);
        let with_bias = (q.clone() * &biased).get_value(&s, &a, &x, &u);
        prop_assert!(close(with_bias, plain + b), "{} vs {} + {}", with_bias, plain, b);
    }

    #[test]
    fn scalar_round_trip(
        (_s, _a, q, _x, _u, _w) in arb_case(),
        c in prop_oneof![0.05f64..20.0, -20.0f64..-0.05],
    ) {
        let mut r = q.clone();
        r *= c;
        r *= 1.0 / c;
        for (b0, b1) in q.bases().iter().zip(r.bases()) {
            prop_assert_eq!(b0.values.shape(), b1.values.shape());
            for (v0, v1) in b0.values.iter().zip(b1.values.iter()) {
                prop_assert!(close(*v0, *v1));
            }
        }
    }

    #[test]
    fn linear_in_weights((s, a, q, x, u, w) in arb_case()) {
        let n = q.len();
        let w1 = w.rows(0, n).into_owned();
        let w2 = w1.map(|v| 1.0 - v);
        let lhs = q.get_weighted_value(&s, &a, &x, &u, &(&w1 + &w2));
        let rhs = q.get_weighted_value(&s, &a, &x, &u, &w1)
            + q.get_weighted_value(&s, &a, &x, &u, &w2);
        prop_assert!(close(lhs, rhs));
    }

    #[test]
    fn dense_matches_pointwise((s, a, q, x, u, _w) in arb_case()) {
        let dense = q.to_dense(&s, &a);
        prop_assert_eq!(dense[(to_index(&s, &x), to_index(&a, &u))], q.get_value(&s, &a, &x, &u));
    }

    #[test]
    fn generated_functions_validate((s, a, q, _x, _u, _w) in arb_case()) {
        prop_assert!(q.validate(&s, &a).is_ok());
    }
}
