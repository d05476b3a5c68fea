//! Numerical validation utilities for manifold operations.
//!
//! These checks compare the analytic Euclidean-to-Riemannian conversions of a
//! manifold against finite differences of the cost function taken along the
//! manifold itself. A manifold whose gradient conversion uses the wrong
//! conformal factor, or whose Hessian conversion misses a connection term,
//! fails them.

use crate::{
    error::{ManifoldError, Result},
    manifold::{Manifold, RetractionOrder},
    types::Scalar,
};
use num_traits::Float;
use rand::Rng;
use tracing::debug;

/// Configuration for numerical validation tests.
#[derive(Debug, Clone)]
pub struct NumericalValidationConfig<T> {
    /// Step size for first-order central differences
    pub gradient_step_size: T,
    /// Step size for second-order differences
    pub hessian_step_size: T,
    /// Number of random directions to probe
    pub num_directions: usize,
    /// Relative tolerance for gradient checking
    pub gradient_tolerance: T,
    /// Relative tolerance for Hessian checking
    pub hessian_tolerance: T,
}

impl<T: Scalar> Default for NumericalValidationConfig<T> {
    fn default() -> Self {
        Self {
            gradient_step_size: <T as Scalar>::from_f64(1e-6),
            hessian_step_size: <T as Scalar>::from_f64(1e-4),
            num_directions: 10,
            gradient_tolerance: T::DEFAULT_GRADIENT_TOLERANCE,
            hessian_tolerance: <T as Scalar>::from_f64(1e-5),
        }
    }
}

/// Results from a derivative check.
#[derive(Debug, Clone)]
pub struct GradientCheckResult<T> {
    /// Maximum relative error between analytical and numerical values
    pub max_relative_error: T,
    /// Average relative error
    pub avg_relative_error: T,
    /// Whether the check passed
    pub passed: bool,
    /// Relative error for each probed direction
    pub component_errors: Vec<T>,
}

impl<T: Scalar> GradientCheckResult<T> {
    fn from_errors(component_errors: Vec<T>, tolerance: T) -> Self {
        let sum = component_errors
            .iter()
            .fold(T::zero(), |acc, &e| acc + e);
        let avg_relative_error = if component_errors.is_empty() {
            T::zero()
        } else {
            sum / <T as Scalar>::from_usize(component_errors.len())
        };
        let max_relative_error = component_errors
            .iter()
            .fold(T::zero(), |a, &b| <T as Float>::max(a, b));

        Self {
            max_relative_error,
            avg_relative_error,
            passed: max_relative_error < tolerance,
            component_errors,
        }
    }
}

/// Numerical validation tools for manifolds.
pub struct NumericalValidator;

impl NumericalValidator {
    /// Check the Euclidean-to-Riemannian gradient conversion.
    ///
    /// For random unit tangent directions d at `point`, compares
    /// ⟨grad f(x), d⟩_x with the central difference
    /// (f(R_x(hd)) − f(R_x(−hd))) / 2h.
    pub fn check_gradient<T, M, F, G, R>(
        manifold: &M,
        point: &M::Point,
        f: F,
        euclidean_grad: G,
        config: &NumericalValidationConfig<T>,
        rng: &mut R,
    ) -> Result<GradientCheckResult<T>>
    where
        T: Scalar,
        M: Manifold<T>,
        F: Fn(&M::Point) -> T,
        G: Fn(&M::Point) -> M::TangentVector,
        R: Rng + ?Sized,
    {
        let grad = manifold.euclidean_to_riemannian_gradient(point, &euclidean_grad(point))?;
        let h = config.gradient_step_size;
        let two = <T as Scalar>::from_f64(2.0);

        let mut component_errors = Vec::with_capacity(config.num_directions);
        for _ in 0..config.num_directions {
            let Some(direction) = Self::unit_direction(manifold, point, rng)? else {
                continue;
            };

            let analytical = manifold.inner_product(point, &grad, &direction)?;

            let forward = manifold.scale_tangent(point, h, &direction)?;
            let backward = manifold.scale_tangent(point, -h, &direction)?;
            let f_plus = f(&manifold.retract(point, &forward)?);
            let f_minus = f(&manifold.retract(point, &backward)?);
            let numerical = (f_plus - f_minus) / (two * h);

            component_errors.push(finite_relative_error(analytical, numerical, "gradient")?);
        }

        let result = GradientCheckResult::from_errors(component_errors, config.gradient_tolerance);
        debug!(
            manifold = manifold.name(),
            directions = result.component_errors.len(),
            max_relative_error = <T as Scalar>::to_f64(result.max_relative_error),
            passed = result.passed,
            "gradient check finished"
        );
        Ok(result)
    }

    /// Check the Euclidean-to-Riemannian Hessian conversion.
    ///
    /// For random unit tangent directions d, compares ⟨Hess f(x)[d], d⟩_x
    /// with the geodesic second difference
    /// (f(exp_x(hd)) − 2f(x) + f(exp_x(−hd))) / h².
    ///
    /// Along a geodesic the second derivative of f equals the Riemannian
    /// Hessian quadratic form, so the comparison requires an exact exponential
    /// map; manifolds with an approximate retraction are rejected with
    /// [`ManifoldError::NotImplemented`].
    pub fn check_hessian<T, M, F, G, H, R>(
        manifold: &M,
        point: &M::Point,
        f: F,
        euclidean_grad: G,
        euclidean_hvp: H,
        config: &NumericalValidationConfig<T>,
        rng: &mut R,
    ) -> Result<GradientCheckResult<T>>
    where
        T: Scalar,
        M: Manifold<T>,
        F: Fn(&M::Point) -> T,
        G: Fn(&M::Point) -> M::TangentVector,
        H: Fn(&M::Point, &M::TangentVector) -> M::TangentVector,
        R: Rng + ?Sized,
    {
        if manifold.retraction_order() != RetractionOrder::Exact {
            return Err(ManifoldError::not_implemented(format!(
                "Hessian check for {} with {} retraction",
                manifold.name(),
                manifold.retraction_order()
            )));
        }

        let egrad = euclidean_grad(point);
        let h = config.hessian_step_size;
        let two = <T as Scalar>::from_f64(2.0);
        let f_center = f(point);

        let mut component_errors = Vec::with_capacity(config.num_directions);
        for _ in 0..config.num_directions {
            let Some(direction) = Self::unit_direction(manifold, point, rng)? else {
                continue;
            };

            let hvp = euclidean_hvp(point, &direction);
            let hess = manifold.euclidean_to_riemannian_hessian(point, &egrad, &hvp, &direction)?;
            let analytical = manifold.inner_product(point, &hess, &direction)?;

            let forward = manifold.scale_tangent(point, h, &direction)?;
            let backward = manifold.scale_tangent(point, -h, &direction)?;
            let f_plus = f(&manifold.exp(point, &forward)?);
            let f_minus = f(&manifold.exp(point, &backward)?);
            let numerical = (f_plus - two * f_center + f_minus) / (h * h);

            component_errors.push(finite_relative_error(analytical, numerical, "hessian")?);
        }

        let result = GradientCheckResult::from_errors(component_errors, config.hessian_tolerance);
        debug!(
            manifold = manifold.name(),
            directions = result.component_errors.len(),
            max_relative_error = <T as Scalar>::to_f64(result.max_relative_error),
            passed = result.passed,
            "hessian check finished"
        );
        Ok(result)
    }

    /// Draws a random tangent direction normalized in the Riemannian metric.
    /// Returns `None` for a degenerate draw.
    fn unit_direction<T, M, R>(
        manifold: &M,
        point: &M::Point,
        rng: &mut R,
    ) -> Result<Option<M::TangentVector>>
    where
        T: Scalar,
        M: Manifold<T>,
        R: Rng + ?Sized,
    {
        let direction = manifold.random_tangent(point, rng)?;
        let norm = manifold.norm(point, &direction)?;
        if norm <= T::EPSILON {
            return Ok(None);
        }
        manifold
            .scale_tangent(point, T::one() / norm, &direction)
            .map(Some)
    }
}

/// Relative error of a finite pair.
///
/// A NaN error would be skipped by the max fold and let the check pass, so
/// non-finite values fail with `NumericalError` instead.
fn finite_relative_error<T: Scalar>(analytical: T, numerical: T, check: &str) -> Result<T> {
    if !<T as Float>::is_finite(analytical) || !<T as Float>::is_finite(numerical) {
        return Err(ManifoldError::numerical_error(format!(
            "{check} check produced analytical = {analytical}, numerical = {numerical}"
        )));
    }
    Ok(relative_error(analytical, numerical))
}

/// Relative error, with the scale floored at one so values near zero are
/// compared absolutely.
fn relative_error<T: Scalar>(analytical: T, numerical: T) -> T {
    let error = <T as Float>::abs(analytical - numerical);
    let scale = <T as Float>::max(
        <T as Float>::max(<T as Float>::abs(analytical), <T as Float>::abs(numerical)),
        T::one(),
    );
    error / scale
}
