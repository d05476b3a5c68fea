//! Property-based tests for the Poincaré ball.

use nalgebra::DMatrix;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use riemannball_core::manifold::Manifold;
use riemannball_manifolds::{mobius_addition, PoincareBall};

/// A `k × n` point whose columns have norm at most `max_radius`.
fn arb_point(k: usize, n: usize, max_radius: f64) -> impl Strategy<Value = DMatrix<f64>> {
    (
        prop::collection::vec(-1.0f64..1.0, k * n),
        prop::collection::vec(0.0f64..max_radius, n),
    )
        .prop_map(move |(entries, radii)| {
            let mut point = DMatrix::from_vec(k, n, entries);
            for (j, radius) in radii.into_iter().enumerate() {
                let norm = point.column(j).norm();
                if norm > 1e-12 {
                    let scaled = point.column(j) * (radius / norm);
                    point.set_column(j, &scaled);
                } else {
                    point.column_mut(j).fill(0.0);
                }
            }
            point
        })
}

/// A ball shape together with two points and a tangent vector on it.
fn arb_case() -> impl Strategy<Value = (usize, usize, DMatrix<f64>, DMatrix<f64>, DMatrix<f64>)> {
    (1usize..6, 1usize..4).prop_flat_map(|(k, n)| {
        (
            Just(k),
            Just(n),
            arb_point(k, n, 0.9),
            arb_point(k, n, 0.9),
            prop::collection::vec(-1.0f64..1.0, k * n)
                .prop_map(move |entries| DMatrix::from_vec(k, n, entries)),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_projection_is_identity((k, n, x, _y, v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        prop_assert_eq!(ball.project_tangent(&x, &v).unwrap(), v);
    }

    #[test]
    fn prop_exp_of_zero_is_identity((k, n, x, _y, _v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        let zero = ball.zero_vector(&x);
        let moved = ball.exp(&x, &zero).unwrap();
        prop_assert!((moved - &x).norm() < 1e-14);
    }

    #[test]
    fn prop_log_of_self_is_zero((k, n, x, _y, _v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        let v = ball.log(&x, &x).unwrap();
        prop_assert!(v.norm() < 1e-12);
    }

    #[test]
    fn prop_distance_axioms((k, n, x, y, _v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        prop_assert_eq!(ball.distance(&x, &x).unwrap(), 0.0);

        let dxy = ball.distance(&x, &y).unwrap();
        let dyx = ball.distance(&y, &x).unwrap();
        prop_assert!(dxy >= 0.0);
        prop_assert!((dxy - dyx).abs() <= 1e-12 * dxy.max(1.0));
    }

    #[test]
    fn prop_exp_log_round_trip((k, n, x, y, v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();

        let small = &v * 1e-2;
        let there = ball.exp(&x, &small).unwrap();
        let back = ball.log(&x, &there).unwrap();
        prop_assert!((back - &small).norm() < 1e-6);

        let to_y = ball.log(&x, &y).unwrap();
        let reached = ball.exp(&x, &to_y).unwrap();
        prop_assert!((reached - &y).norm() < 1e-6);
    }

    #[test]
    fn prop_conformal_factor_at_least_two((k, n, x, _y, _v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        for lambda in ball.conformal_factor(&x).unwrap() {
            prop_assert!(lambda >= 2.0);
        }
    }

    #[test]
    fn prop_mobius_left_inverse((_k, _n, x, y, _v) in arb_case()) {
        // (−x) ⊕ (x ⊕ y) = y
        let sum = mobius_addition(&x, &y).unwrap();
        let back = mobius_addition(&(-&x), &sum).unwrap();
        prop_assert!((back - &y).norm() < 1e-9);
    }

    #[test]
    fn prop_exp_stays_in_ball((k, n, x, _y, v) in arb_case()) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        let moved = ball.exp(&x, &(&v * 0.2)).unwrap();
        prop_assert!(ball.is_point_on_manifold(&moved, 0.0));
    }

    #[test]
    fn prop_random_point_in_ball(seed in any::<u64>(), k in 1usize..40, n in 1usize..5) {
        let ball = PoincareBall::<f64>::new(k, n).unwrap();
        let x = ball.random_point(&mut StdRng::seed_from_u64(seed));
        prop_assert!(x.column_iter().all(|c| c.norm() < 1.0));
    }
}
