//! Core manifold trait and associated types.
//!
//! This module defines the fundamental `Manifold` trait that every Riemannian
//! manifold implements. A manifold is a topological space that locally
//! resembles Euclidean space and is equipped with a Riemannian metric.
//!
//! # Mathematical Background
//!
//! A Riemannian manifold (M, g) consists of:
//! - A smooth manifold M
//! - A Riemannian metric g that assigns an inner product to each tangent space
//!
//! Key concepts:
//! - **Tangent space**: T_p M is the linear approximation of M at point p
//! - **Exponential map**: exp_p: T_p M → M follows the geodesic with initial velocity v
//! - **Retraction**: A smooth map R_p: T_p M → M that approximates the exponential map
//! - **Riemannian gradient**: The unique vector in T_p M representing the derivative
//! - **Parallel transport**: Moving vectors along curves while preserving angles
//!
//! # Consumers
//!
//! Optimizers treat a manifold purely as a geometry oracle: they initialize
//! with [`Manifold::random_point`], convert ambient derivatives supplied by an
//! automatic-differentiation engine with
//! [`Manifold::euclidean_to_riemannian_gradient`] /
//! [`Manifold::euclidean_to_riemannian_hessian`], step with
//! [`Manifold::retract`], and monitor progress with [`Manifold::distance`] and
//! [`Manifold::norm`]. Every operation is a pure function of its arguments and
//! the immutable manifold configuration.

use crate::{error::Result, types::Scalar};
use num_traits::Float;
use rand::Rng;
use std::fmt::{self, Debug};

/// How closely a manifold's retraction follows the exponential map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetractionOrder {
    /// First-order retraction (satisfies basic requirements)
    First,
    /// Second-order retraction (matches exponential map to second order)
    Second,
    /// Exact exponential map
    Exact,
}

impl fmt::Display for RetractionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first-order"),
            Self::Second => write!(f, "second-order"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// Trait for Riemannian manifolds.
///
/// A Riemannian manifold (ℳ, g) is a smooth manifold ℳ equipped with a Riemannian
/// metric g that provides an inner product structure on each tangent space T_p ℳ.
///
/// ## Mathematical Properties
///
/// Implementations must guarantee:
///
/// 1. **Metric properties**: ⟨·,·⟩_p is symmetric, bilinear, and positive definite
/// 2. **Retraction constraints**: R_p(0) = p and dR_p(0) = id_{T_p ℳ}
/// 3. **Exp/log inverse**: log_p(exp_p(v)) = v for small v, log_p(p) = 0
/// 4. **Distance axioms**: d(p, p) = 0 and d(p, q) = d(q, p)
///
/// # Type Parameters
///
/// - `T`: The scalar type (f32 or f64)
///
/// # Randomness
///
/// Sampling methods take the random generator explicitly, so results are
/// reproducible under a seeded generator and concurrent callers never share
/// hidden state.
pub trait Manifold<T: Scalar>: Debug + Send + Sync {
    /// Representation of a point on the manifold.
    type Point: Clone + Debug + Send + Sync;

    /// Representation of a tangent vector.
    type TangentVector: Clone + Debug + Send + Sync;

    /// Returns a human-readable name for the manifold.
    fn name(&self) -> &str;

    /// Returns the intrinsic dimension of the manifold.
    fn dimension(&self) -> usize;

    /// Characteristic distance scale.
    ///
    /// Optimizers use it as a default trust-region radius or step-size
    /// reference.
    fn typical_dist(&self) -> T;

    /// Checks if a point lies on the manifold within a given tolerance.
    fn is_point_on_manifold(&self, point: &Self::Point, tol: T) -> bool;

    /// Checks if a vector is in the tangent space at a given point.
    fn is_vector_in_tangent_space(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
        tol: T,
    ) -> bool;

    /// Projects an ambient vector onto the tangent space at `point`.
    ///
    /// The projection is idempotent and linear. On open manifolds the
    /// tangent space is the whole ambient space and this is the identity.
    fn project_tangent(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
    ) -> Result<Self::TangentVector>;

    /// Computes the Riemannian inner product ⟨u,v⟩_p between two tangent vectors.
    ///
    /// Symmetric, bilinear, and positive definite: ⟨u,u⟩_p > 0 for all u ≠ 0.
    fn inner_product(
        &self,
        point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T>;

    /// Computes the norm of a tangent vector.
    ///
    /// This is equivalent to sqrt(inner_product(point, v, v)).
    fn norm(&self, point: &Self::Point, vector: &Self::TangentVector) -> Result<T> {
        self.inner_product(point, vector, vector)
            .map(|ip| <T as Float>::sqrt(ip))
    }

    /// Returns the additive identity of the tangent space at `point`.
    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector;

    /// Scales a tangent vector: `scalar * tangent`.
    fn scale_tangent(
        &self,
        point: &Self::Point,
        scalar: T,
        tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector>;

    /// Adds two tangent vectors living in the same tangent space.
    fn add_tangents(
        &self,
        point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<Self::TangentVector>;

    /// Draws a random point, uniformly distributed in the manifold's own sense.
    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Point;

    /// Draws a random tangent vector at `point`.
    ///
    /// The distribution is implementation defined; it need not be normalized
    /// with respect to the metric.
    fn random_tangent<R: Rng + ?Sized>(
        &self,
        point: &Self::Point,
        rng: &mut R,
    ) -> Result<Self::TangentVector>;

    /// Riemannian exponential map: follows the geodesic from `point` with
    /// initial velocity `tangent` for unit time.
    fn exp(&self, point: &Self::Point, tangent: &Self::TangentVector) -> Result<Self::Point>;

    /// Riemannian logarithm: the tangent vector at `point` whose exponential
    /// reaches `other`.
    fn log(&self, point: &Self::Point, other: &Self::Point) -> Result<Self::TangentVector>;

    /// States whether [`Manifold::retract`] is the exact exponential map or an
    /// approximation of a given order.
    ///
    /// Implementations returning anything but [`RetractionOrder::Exact`] must
    /// override [`Manifold::retract`].
    fn retraction_order(&self) -> RetractionOrder;

    /// Performs a retraction from the tangent space to the manifold.
    ///
    /// A retraction R_p must satisfy R_p(0) = p and dR_p(0) = id. The default
    /// is the exponential map itself.
    fn retract(&self, point: &Self::Point, tangent: &Self::TangentVector) -> Result<Self::Point> {
        self.exp(point, tangent)
    }

    /// Computes the geodesic distance between two points.
    ///
    /// # Default Implementation
    ///
    /// Uses the norm of the logarithmic map.
    fn distance(&self, x: &Self::Point, y: &Self::Point) -> Result<T> {
        let log = self.log(x, y)?;
        self.norm(x, &log)
    }

    /// Geodesic midpoint of two points: exp_x(log_x(y) / 2).
    fn pair_mean(&self, x: &Self::Point, y: &Self::Point) -> Result<Self::Point> {
        let log = self.log(x, y)?;
        let half = self.scale_tangent(x, <T as Scalar>::from_f64(0.5), &log)?;
        self.exp(x, &half)
    }

    /// Converts the Euclidean gradient to the Riemannian gradient.
    ///
    /// Given the Euclidean gradient ∇f of a function f: M → R, this computes
    /// the Riemannian gradient grad f, which is the unique tangent vector
    /// satisfying g(grad f, v) = df(v) for all v in T_p M.
    fn euclidean_to_riemannian_gradient(
        &self,
        point: &Self::Point,
        euclidean_grad: &Self::TangentVector,
    ) -> Result<Self::TangentVector>;

    /// Converts a Euclidean Hessian-vector product to the Riemannian one.
    ///
    /// `euclidean_hvp` is the ambient Hessian applied to `tangent`; the result
    /// is Hess f(p)[tangent], including the connection's correction terms.
    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Self::Point,
        euclidean_grad: &Self::TangentVector,
        euclidean_hvp: &Self::TangentVector,
        tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector>;

    /// Transports a tangent vector from `from` to `to`.
    ///
    /// # Default Implementation
    ///
    /// Vector transport by projection onto the tangent space at `to`,
    /// which is not true parallel transport but is often sufficient.
    fn parallel_transport(
        &self,
        _from: &Self::Point,
        to: &Self::Point,
        vector: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.project_tangent(to, vector)
    }

    /// Checks if the manifold has closed-form exponential and logarithm maps.
    fn has_exact_exp_log(&self) -> bool {
        false
    }

    /// Checks if the manifold is flat (zero curvature).
    fn is_flat(&self) -> bool {
        false
    }
}
