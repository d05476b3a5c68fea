//! Integration tests for riemannball-manifolds
//!
//! These tests drive the Poincaré ball through the generic tooling of
//! riemannball-core: the property testers and the numerical validators.

use nalgebra::DMatrix;
use rand::{rngs::StdRng, SeedableRng};
use riemannball_core::{
    config::ValidationMode,
    error::ManifoldError,
    manifold::Manifold,
    test_utils::{ManifoldPropertyTester, PropertyTestConfig},
    validation::{NumericalValidationConfig, NumericalValidator},
};
use riemannball_manifolds::PoincareBall;

fn config() -> PropertyTestConfig<f64> {
    PropertyTestConfig {
        tolerance: 1e-8,
        num_points: 20,
        num_tangents: 5,
        tangent_scale: 0.1,
        seed: 7,
    }
}

/// Points drawn uniformly from the ball can sit within 1e-5 of the boundary,
/// where 1 − ‖x‖² loses digits and the exp/log round trip degrades.
fn round_trip_config() -> PropertyTestConfig<f64> {
    PropertyTestConfig {
        tolerance: 1e-5,
        ..config()
    }
}

#[test]
fn test_concrete_examples() {
    let ball = PoincareBall::<f64>::new(2, 1).unwrap();
    let a = DMatrix::from_column_slice(2, 1, &[0.0, 0.0]);
    let b = DMatrix::from_column_slice(2, 1, &[0.5, 0.0]);

    assert!((ball.distance(&a, &b).unwrap() - 1.0986).abs() < 1e-4);
    assert_eq!(ball.mobius_addition(&a, &b).unwrap(), b);

    let rgrad = ball
        .euclidean_to_riemannian_gradient(&a, &DMatrix::from_column_slice(2, 1, &[1.0, 0.0]))
        .unwrap();
    assert_eq!(rgrad, DMatrix::from_column_slice(2, 1, &[0.25, 0.0]));
}

#[test]
fn test_contract_properties_single_ball() {
    let ball = PoincareBall::<f64>::new(3, 1).unwrap();
    let config = config();

    for result in [
        ManifoldPropertyTester::test_retraction_zero(&ball, &config),
        ManifoldPropertyTester::test_metric_properties(&ball, &config),
        ManifoldPropertyTester::test_projection_idempotent(&ball, &config),
        ManifoldPropertyTester::test_exp_log_inverse(&ball, &round_trip_config()),
        ManifoldPropertyTester::test_distance_axioms(&ball, &config),
    ] {
        assert!(result.passed, "{:?}", result.errors);
        assert!(result.num_tests > 0);
    }
}

#[test]
fn test_contract_properties_product() {
    let ball = PoincareBall::<f64>::new(5, 4).unwrap();
    let config = config();

    for result in [
        ManifoldPropertyTester::test_retraction_zero(&ball, &config),
        ManifoldPropertyTester::test_metric_properties(&ball, &config),
        ManifoldPropertyTester::test_projection_idempotent(&ball, &config),
        ManifoldPropertyTester::test_exp_log_inverse(&ball, &round_trip_config()),
        ManifoldPropertyTester::test_distance_axioms(&ball, &config),
    ] {
        assert!(result.passed, "{:?}", result.errors);
    }
}

#[test]
fn test_gradient_conversion_matches_finite_differences() {
    let ball = PoincareBall::<f64>::new(3, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let x = ball.random_point(&mut rng) * 0.7;

    // f(x) = Σ x³ + <c, x>
    let c = DMatrix::from_column_slice(3, 2, &[0.3, -0.2, 0.5, 1.0, 0.0, -0.4]);
    let f = |p: &DMatrix<f64>| p.iter().map(|v| v * v * v).sum::<f64>() + c.dot(p);
    let egrad = |p: &DMatrix<f64>| p.map(|v| 3.0 * v * v) + &c;

    let result = NumericalValidator::check_gradient(
        &ball,
        &x,
        f,
        egrad,
        &NumericalValidationConfig::default(),
        &mut rng,
    )
    .unwrap();

    assert!(result.passed, "{:?}", result);
}

#[test]
fn test_hessian_conversion_matches_geodesic_second_difference() {
    let ball = PoincareBall::<f64>::new(3, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(19);
    let x = ball.random_point(&mut rng) * 0.7;

    // f(x) = Σ x³ + x₀₀ x₁₀
    let f = |p: &DMatrix<f64>| p.iter().map(|v| v * v * v).sum::<f64>() + p[(0, 0)] * p[(1, 0)];
    let egrad = |p: &DMatrix<f64>| {
        let mut g = p.map(|v| 3.0 * v * v);
        g[(0, 0)] += p[(1, 0)];
        g[(1, 0)] += p[(0, 0)];
        g
    };
    let ehvp = |p: &DMatrix<f64>, v: &DMatrix<f64>| {
        let mut h = p.component_mul(v) * 6.0;
        h[(0, 0)] += v[(1, 0)];
        h[(1, 0)] += v[(0, 0)];
        h
    };

    let result = NumericalValidator::check_hessian(
        &ball,
        &x,
        f,
        egrad,
        ehvp,
        &NumericalValidationConfig::default(),
        &mut rng,
    )
    .unwrap();

    assert!(result.passed, "{:?}", result);
}

#[test]
fn test_naive_hessian_is_detected() {
    // A plain rescaling H/λ² misses the connection terms
    #[derive(Debug)]
    struct NaiveHessian(PoincareBall<f64>);

    impl Manifold<f64> for NaiveHessian {
        type Point = DMatrix<f64>;
        type TangentVector = DMatrix<f64>;

        fn name(&self) -> &str {
            "naive"
        }
        fn dimension(&self) -> usize {
            self.0.dimension()
        }
        fn typical_dist(&self) -> f64 {
            self.0.typical_dist()
        }
        fn is_point_on_manifold(&self, point: &Self::Point, tol: f64) -> bool {
            self.0.is_point_on_manifold(point, tol)
        }
        fn is_vector_in_tangent_space(
            &self,
            point: &Self::Point,
            vector: &Self::TangentVector,
            tol: f64,
        ) -> bool {
            self.0.is_vector_in_tangent_space(point, vector, tol)
        }
        fn project_tangent(
            &self,
            point: &Self::Point,
            vector: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.project_tangent(point, vector)
        }
        fn inner_product(
            &self,
            point: &Self::Point,
            u: &Self::TangentVector,
            v: &Self::TangentVector,
        ) -> riemannball_core::Result<f64> {
            self.0.inner_product(point, u, v)
        }
        fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector {
            self.0.zero_vector(point)
        }
        fn scale_tangent(
            &self,
            point: &Self::Point,
            scalar: f64,
            tangent: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.scale_tangent(point, scalar, tangent)
        }
        fn add_tangents(
            &self,
            point: &Self::Point,
            u: &Self::TangentVector,
            v: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.add_tangents(point, u, v)
        }
        fn random_point<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Self::Point {
            self.0.random_point(rng)
        }
        fn random_tangent<R: rand::Rng + ?Sized>(
            &self,
            point: &Self::Point,
            rng: &mut R,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.random_tangent(point, rng)
        }
        fn exp(
            &self,
            point: &Self::Point,
            tangent: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::Point> {
            self.0.exp(point, tangent)
        }
        fn log(
            &self,
            point: &Self::Point,
            other: &Self::Point,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.log(point, other)
        }
        fn retraction_order(&self) -> riemannball_core::manifold::RetractionOrder {
            self.0.retraction_order()
        }
        fn euclidean_to_riemannian_gradient(
            &self,
            point: &Self::Point,
            euclidean_grad: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.euclidean_to_riemannian_gradient(point, euclidean_grad)
        }
        fn euclidean_to_riemannian_hessian(
            &self,
            point: &Self::Point,
            _euclidean_grad: &Self::TangentVector,
            euclidean_hvp: &Self::TangentVector,
            _tangent: &Self::TangentVector,
        ) -> riemannball_core::Result<Self::TangentVector> {
            self.0.euclidean_to_riemannian_gradient(point, euclidean_hvp)
        }
    }

    let naive = NaiveHessian(PoincareBall::<f64>::new(2, 1).unwrap());
    let x = DMatrix::from_column_slice(2, 1, &[0.4, -0.3]);
    let mut rng = StdRng::seed_from_u64(23);

    // f(x) = <c, x> has zero Euclidean Hessian but a non-zero Riemannian one
    let c = DMatrix::from_column_slice(2, 1, &[1.0, 2.0]);
    let f = |p: &DMatrix<f64>| c.dot(p);
    let egrad = |_: &DMatrix<f64>| c.clone();
    let ehvp = |_: &DMatrix<f64>, _: &DMatrix<f64>| DMatrix::zeros(2, 1);

    let result = NumericalValidator::check_hessian(
        &naive,
        &x,
        f,
        egrad,
        ehvp,
        &NumericalValidationConfig::default(),
        &mut rng,
    )
    .unwrap();
    assert!(!result.passed);
}

#[test]
fn test_strict_mode_through_the_trait() {
    let ball = PoincareBall::<f64>::with_validation(2, 2, ValidationMode::Strict).unwrap();
    let mut rng = StdRng::seed_from_u64(29);
    let x = ball.random_point(&mut rng);
    let mut outside = x.clone();
    outside[(0, 1)] = 1.5;

    assert!(ball.inner_product(&x, &x, &x).is_ok());
    for err in [
        ball.inner_product(&outside, &x, &x).map(|_| ()),
        ball.log(&x, &outside).map(|_| ()),
        ball.euclidean_to_riemannian_gradient(&outside, &x).map(|_| ()),
        ball.parallel_transport(&outside, &x, &x).map(|_| ()),
        ball.random_tangent(&outside, &mut rng).map(|_| ()),
    ] {
        assert!(matches!(err, Err(ManifoldError::InvalidPoint { .. })));
    }
}

#[test]
fn test_manifold_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PoincareBall<f64>>();
    assert_send_sync::<PoincareBall<f32>>();
}

#[test]
fn test_concurrent_use() {
    let ball = PoincareBall::<f64>::new(4, 3).unwrap();

    let distances: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let ball = &ball;
                scope.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let x = ball.random_point(&mut rng);
                    let y = ball.random_point(&mut rng);
                    ball.distance(&x, &y).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Each thread's result depends only on its own generator
    for (seed, d) in distances.into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let x = ball.random_point(&mut rng);
        let y = ball.random_point(&mut rng);
        assert_eq!(ball.distance(&x, &y).unwrap(), d);
    }
}
