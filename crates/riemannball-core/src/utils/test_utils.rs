//! Test utilities for property-based testing of manifolds.
//!
//! Each tester samples its own points and tangent vectors from a generator
//! seeded by [`PropertyTestConfig::seed`], so a failing report can be
//! reproduced exactly. Errors between points are measured with the
//! manifold's own distance and errors between tangent vectors with its own
//! norm, which keeps the testers independent of the point representation.

use crate::{error::Result, manifold::Manifold, types::Scalar};
use num_traits::Float;
use rand::{rngs::StdRng, SeedableRng};

pub use crate::test_manifolds::TestEuclideanManifold;

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropertyTestConfig<T> {
    /// Tolerance for numerical comparisons
    pub tolerance: T,
    /// Number of random points to test
    pub num_points: usize,
    /// Number of random tangent vectors per point
    pub num_tangents: usize,
    /// Scale factor for tangent vectors
    pub tangent_scale: T,
    /// Seed of the generator used for sampling
    pub seed: u64,
}

impl<T: Scalar> Default for PropertyTestConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: <T as Scalar>::from_f64(1e-8),
            num_points: 10,
            num_tangents: 5,
            tangent_scale: <T as Scalar>::from_f64(0.1),
            seed: 42,
        }
    }
}

/// Results from property tests.
#[derive(Debug)]
pub struct PropertyTestResult<T> {
    /// Whether all tests passed
    pub passed: bool,
    /// Maximum error observed
    pub max_error: T,
    /// Number of tests performed
    pub num_tests: usize,
    /// Detailed error messages
    pub errors: Vec<String>,
}

/// Accumulates errors while a property is checked.
struct Recorder<T> {
    tolerance: T,
    max_error: T,
    num_tests: usize,
    errors: Vec<String>,
}

impl<T: Scalar> Recorder<T> {
    fn new(tolerance: T) -> Self {
        Self {
            tolerance,
            max_error: T::zero(),
            num_tests: 0,
            errors: Vec::new(),
        }
    }

    fn check(&mut self, what: &str, error: T) {
        self.num_tests += 1;
        if <T as Float>::is_nan(error) || error > self.tolerance {
            self.errors.push(format!(
                "{what}: error = {error} > tolerance = {}",
                self.tolerance
            ));
        }
        self.max_error = <T as Float>::max(self.max_error, error);
    }

    fn record(&mut self, what: &str, outcome: Result<T>) {
        match outcome {
            Ok(error) => self.check(what, error),
            Err(e) => self.errors.push(format!("{what} failed: {e}")),
        }
    }

    fn finish(self) -> PropertyTestResult<T> {
        PropertyTestResult {
            passed: self.errors.is_empty(),
            max_error: self.max_error,
            num_tests: self.num_tests,
            errors: self.errors,
        }
    }
}

/// Norm of `u - v` in the tangent space at `point`.
fn tangent_difference<T, M>(
    manifold: &M,
    point: &M::Point,
    u: &M::TangentVector,
    v: &M::TangentVector,
) -> Result<T>
where
    T: Scalar,
    M: Manifold<T>,
{
    let neg_v = manifold.scale_tangent(point, -T::one(), v)?;
    let diff = manifold.add_tangents(point, u, &neg_v)?;
    manifold.norm(point, &diff)
}

/// Random tangent vector scaled to `config.tangent_scale` in the metric norm.
fn scaled_tangent<T, M>(
    manifold: &M,
    point: &M::Point,
    config: &PropertyTestConfig<T>,
    rng: &mut StdRng,
) -> Result<M::TangentVector>
where
    T: Scalar,
    M: Manifold<T>,
{
    let v = manifold.random_tangent(point, rng)?;
    let norm = manifold.norm(point, &v)?;
    if norm <= T::EPSILON {
        return Ok(v);
    }
    manifold.scale_tangent(point, config.tangent_scale / norm, &v)
}

/// Property-based tests for manifolds.
pub struct ManifoldPropertyTester;

impl ManifoldPropertyTester {
    /// Tests that retraction at zero gives the same point: R(x, 0) = x
    pub fn test_retraction_zero<T, M>(
        manifold: &M,
        config: &PropertyTestConfig<T>,
    ) -> PropertyTestResult<T>
    where
        T: Scalar,
        M: Manifold<T>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut recorder = Recorder::new(config.tolerance);

        for _ in 0..config.num_points {
            let point = manifold.random_point(&mut rng);
            let zero = manifold.zero_vector(&point);
            let outcome = manifold
                .retract(&point, &zero)
                .and_then(|retracted| manifold.distance(&point, &retracted));
            recorder.record("Retraction at zero", outcome);
        }

        recorder.finish()
    }

    /// Tests symmetry and positive definiteness of the metric, and that the
    /// norm is the square root of the inner product.
    pub fn test_metric_properties<T, M>(
        manifold: &M,
        config: &PropertyTestConfig<T>,
    ) -> PropertyTestResult<T>
    where
        T: Scalar,
        M: Manifold<T>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut recorder = Recorder::new(config.tolerance);

        for _ in 0..config.num_points {
            let point = manifold.random_point(&mut rng);

            for _ in 0..config.num_tangents {
                let outcome = (|| -> Result<T> {
                    let u = manifold.random_tangent(&point, &mut rng)?;
                    let v = manifold.random_tangent(&point, &mut rng)?;

                    let uv = manifold.inner_product(&point, &u, &v)?;
                    let vu = manifold.inner_product(&point, &v, &u)?;
                    let uu = manifold.inner_product(&point, &u, &u)?;
                    let norm_u = manifold.norm(&point, &u)?;

                    let scale = <T as Float>::max(<T as Float>::abs(uu), T::one());
                    let asymmetry = <T as Float>::abs(uv - vu) / scale;
                    let norm_mismatch = <T as Float>::abs(norm_u * norm_u - uu) / scale;
                    // A non-positive <u,u> is an unbounded failure
                    let definiteness = if uu > T::zero() {
                        T::zero()
                    } else {
                        <T as Float>::infinity()
                    };
                    Ok(<T as Float>::max(
                        <T as Float>::max(asymmetry, norm_mismatch),
                        definiteness,
                    ))
                })();
                recorder.record("Metric properties", outcome);
            }
        }

        recorder.finish()
    }

    /// Tests that projection is idempotent: P(P(v)) = P(v)
    pub fn test_projection_idempotent<T, M>(
        manifold: &M,
        config: &PropertyTestConfig<T>,
    ) -> PropertyTestResult<T>
    where
        T: Scalar,
        M: Manifold<T>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut recorder = Recorder::new(config.tolerance);

        for _ in 0..config.num_points {
            let point = manifold.random_point(&mut rng);

            for _ in 0..config.num_tangents {
                let outcome = (|| -> Result<T> {
                    let v = manifold.random_tangent(&point, &mut rng)?;
                    let once = manifold.project_tangent(&point, &v)?;
                    let twice = manifold.project_tangent(&point, &once)?;
                    let scale = <T as Float>::max(manifold.norm(&point, &once)?, T::one());
                    Ok(tangent_difference(manifold, &point, &once, &twice)? / scale)
                })();
                recorder.record("Projection idempotency", outcome);
            }
        }

        recorder.finish()
    }

    /// Tests the inverse relationship of exp and log:
    /// log_x(exp_x(v)) = v for short v, and log_x(x) = 0.
    pub fn test_exp_log_inverse<T, M>(
        manifold: &M,
        config: &PropertyTestConfig<T>,
    ) -> PropertyTestResult<T>
    where
        T: Scalar,
        M: Manifold<T>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut recorder = Recorder::new(config.tolerance);

        for _ in 0..config.num_points {
            let point = manifold.random_point(&mut rng);

            let self_log = manifold
                .log(&point, &point)
                .and_then(|v| manifold.norm(&point, &v));
            recorder.record("log_x(x) = 0", self_log);

            for _ in 0..config.num_tangents {
                let outcome = (|| -> Result<T> {
                    let v = scaled_tangent(manifold, &point, config, &mut rng)?;
                    let q = manifold.exp(&point, &v)?;
                    let back = manifold.log(&point, &q)?;
                    tangent_difference(manifold, &point, &back, &v)
                })();
                recorder.record("log_x(exp_x(v)) = v", outcome);
            }
        }

        recorder.finish()
    }

    /// Tests d(x, x) = 0, symmetry, non-negativity and the triangle
    /// inequality on random triples.
    pub fn test_distance_axioms<T, M>(
        manifold: &M,
        config: &PropertyTestConfig<T>,
    ) -> PropertyTestResult<T>
    where
        T: Scalar,
        M: Manifold<T>,
    {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut recorder = Recorder::new(config.tolerance);

        for _ in 0..config.num_points {
            let x = manifold.random_point(&mut rng);
            let y = manifold.random_point(&mut rng);
            let z = manifold.random_point(&mut rng);

            let outcome = (|| -> Result<T> {
                let dxx = manifold.distance(&x, &x)?;
                let dxy = manifold.distance(&x, &y)?;
                let dyx = manifold.distance(&y, &x)?;
                let dyz = manifold.distance(&y, &z)?;
                let dxz = manifold.distance(&x, &z)?;

                let scale = <T as Float>::max(dxy, T::one());
                let identity = <T as Float>::abs(dxx);
                let symmetry = <T as Float>::abs(dxy - dyx) / scale;
                let negativity = <T as Float>::max(-dxy, T::zero());
                let triangle = <T as Float>::max(dxz - (dxy + dyz), T::zero())
                    / <T as Float>::max(dxz, T::one());
                Ok([symmetry, negativity, triangle]
                    .into_iter()
                    .fold(identity, <T as Float>::max))
            })();
            recorder.record("Distance axioms", outcome);
        }

        recorder.finish()
    }
}
