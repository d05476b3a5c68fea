//! # Poincaré Ball 𝔹ᵏ and its Products (𝔹ᵏ)ⁿ
//!
//! The Poincaré ball is the open unit ball
//! ```text
//! 𝔹ᵏ = {x ∈ ℝᵏ : ‖x‖ < 1}
//! ```
//! equipped with the conformal hyperbolic metric of constant sectional
//! curvature −1. This module implements the product of `n` independent
//! copies, stored as a `k × n` matrix whose j-th column is a point of the
//! j-th ball.
//!
//! ## Geometric Structure
//!
//! ### Conformal factor
//! ```text
//! λ(x) = 2 / (1 − ‖x‖²)
//! ```
//! computed per column. λ(x) ≥ 2 with equality only at the origin.
//!
//! ### Riemannian metric
//! ```text
//! ⟨u, v⟩_x = Σⱼ λ(xⱼ)² ⟨uⱼ, vⱼ⟩
//! ```
//! The ball is open in ℝᵏ, so T_x 𝔹ᵏ ≅ ℝᵏ and projection is the identity.
//!
//! ### Distance
//! ```text
//! d(xⱼ, yⱼ) = arcosh(1 + 2‖xⱼ − yⱼ‖² / ((1 − ‖xⱼ‖²)(1 − ‖yⱼ‖²)))
//! d(x, y)   = sqrt(Σⱼ d(xⱼ, yⱼ)²)
//! ```
//! The factors are orthogonal, so the product distance is the Euclidean
//! norm of the per-ball distances.
//!
//! ## Maps and Operations
//!
//! ### Exponential map
//! ```text
//! exp_x(v) = x ⊕ tanh(‖v‖ / (1 − ‖x‖²)) v / ‖v‖
//! ```
//! with ⊕ the Möbius addition. A zero tangent vector is a zero
//! displacement. The retraction is this exact exponential map.
//!
//! ### Logarithmic map
//! ```text
//! log_x(y) = (1 − ‖x‖²) artanh(‖w‖) w / ‖w‖,    w = (−x) ⊕ y
//! ```
//!
//! ### Gradient and Hessian conversion
//! ```text
//! grad f(x)    = ∇f(x) / λ(x)²
//! Hess f(x)[v] = (⟨g,x⟩ v − ⟨x,v⟩ g − ⟨g,v⟩ x + H[v] / λ(x)) / λ(x)
//! ```
//! where g = ∇f(x) and H[v] is the Euclidean Hessian-vector product. The
//! three inner-product terms are the Levi-Civita correction of the
//! conformal metric.
//!
//! ### Parallel transport
//! ```text
//! P_{x→y}(v) = (λ(x) / λ(y)) gyr[y, −x] v
//! ```
//!
//! ## Numerical Considerations
//!
//! Points must stay strictly inside the ball. By default no operation checks
//! this: on the boundary the conformal factor is infinite, and outside it
//! every formula above returns garbage or NaN without raising. Construct the
//! manifold with [`ValidationMode::Strict`] to reject such points with
//! [`ManifoldError::InvalidPoint`] instead. Array shapes are always checked.
//!
//! Unchecked points on the unit sphere give an infinite conformal factor and
//! an infinite distance to interior points, without error.
//!
//! Every formula divides by 1 − ‖xⱼ‖², which loses relative precision as a
//! column approaches the sphere. For ‖xⱼ‖ ≤ 0.9 the exp/log round trip is
//! accurate to better than 1e-10. Uniform sampling in high dimension puts
//! columns within ~1e-5 of the sphere, where round-trip errors around 1e-4
//! in ambient coordinates have been measured.
//!
//! ## Example Usage
//!
//! ```rust
//! use riemannball_core::manifold::Manifold;
//! use riemannball_manifolds::PoincareBall;
//! use nalgebra::DMatrix;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Product of three Poincaré disks
//! let ball = PoincareBall::<f64>::new(2, 3)?;
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! let x = ball.random_point(&mut rng);
//! let v = DMatrix::from_element(2, 3, 0.1);
//! let y = ball.exp(&x, &v)?;
//!
//! assert!(ball.is_point_on_manifold(&y, 1e-12));
//! let d = ball.distance(&x, &y)?;
//! assert!((d - ball.norm(&x, &v)?).abs() < 1e-8 * d.max(1.0));
//! # Ok::<(), riemannball_core::error::ManifoldError>(())
//! ```

use crate::{
    mobius::{gyration_column, mobius_add_column, mobius_addition},
    utils::{collect_columns, column_norms_squared, map_columns, sum_columns},
};
use nalgebra::DVector;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use riemannball_core::{
    config::ValidationMode,
    error::{ManifoldError, Result},
    manifold::{Manifold, RetractionOrder},
    types::{DMatrix, Scalar},
};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// The product manifold (𝔹ᵏ)ⁿ of `n` Poincaré balls of dimension `k`.
///
/// # Type Parameters
///
/// * `T` - Scalar type (f32 or f64) for numerical computations
///
/// # Invariants
///
/// - `k ≥ 1` and `n ≥ 1`
/// - Points and tangent vectors are `k × n` matrices
/// - Every column of a point has Euclidean norm < 1
#[derive(Clone)]
pub struct PoincareBall<T = f64> {
    /// Dimension of each ball
    k: usize,
    /// Number of balls in the product
    n: usize,
    /// Display name, fixed at construction
    name: String,
    /// Whether point arguments are checked for ball membership
    validation: ValidationMode,
    _marker: PhantomData<T>,
}

impl<T: Scalar> Debug for PoincareBall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} validation)", self.name, self.validation)
    }
}

impl<T: Scalar> PoincareBall<T> {
    /// Creates the product of `n` Poincaré balls of dimension `k` without
    /// membership checks.
    ///
    /// # Errors
    ///
    /// Returns `ManifoldError::InvalidParameter` naming the offending value
    /// if `k = 0` or `n = 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use riemannball_manifolds::PoincareBall;
    /// use riemannball_core::manifold::Manifold;
    ///
    /// let disk = PoincareBall::<f64>::new(2, 1)?;
    /// assert_eq!(disk.name(), "Poincare ball B(2)");
    ///
    /// let product = PoincareBall::<f64>::new(5, 3)?;
    /// assert_eq!(product.name(), "Poincare ball B(5)^3");
    /// assert_eq!(product.dimension(), 15);
    ///
    /// assert!(PoincareBall::<f64>::new(0, 1).is_err());
    /// # Ok::<(), riemannball_core::error::ManifoldError>(())
    /// ```
    pub fn new(k: usize, n: usize) -> Result<Self> {
        Self::with_validation(k, n, ValidationMode::Unchecked)
    }

    /// Creates the manifold with an explicit [`ValidationMode`].
    pub fn with_validation(k: usize, n: usize, validation: ValidationMode) -> Result<Self> {
        if k < 1 {
            return Err(ManifoldError::invalid_parameter(
                "k",
                k,
                "need k >= 1",
            ));
        }
        if n < 1 {
            return Err(ManifoldError::invalid_parameter(
                "n",
                n,
                "need n >= 1",
            ));
        }

        let name = if n == 1 {
            format!("Poincare ball B({k})")
        } else {
            format!("Poincare ball B({k})^{n}")
        };
        debug!(k, n, dimension = k * n, validation = %validation, "created Poincare ball");

        Ok(Self {
            k,
            n,
            name,
            validation,
            _marker: PhantomData,
        })
    }

    /// Returns the dimension of each ball.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of balls in the product.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the validation mode.
    #[inline]
    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Wraps a vector of length `k` as a `k × 1` point of a single ball.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the manifold is a product (`n > 1`) or the
    /// vector length is not `k`.
    pub fn point_from_vector(&self, vector: DVector<T>) -> Result<DMatrix<T>> {
        if self.n != 1 || vector.len() != self.k {
            return Err(ManifoldError::dimension_mismatch(
                self.shape_label(),
                format!("{}x1", vector.len()),
            ));
        }
        Ok(DMatrix::from_column_slice(self.k, 1, vector.as_slice()))
    }

    /// Validates that a point lies in the product of open balls.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch`: if `x` is not `k × n`
    /// - `InvalidPoint`: if an entry is not finite or a column has norm ≥ 1
    pub fn check_point(&self, x: &DMatrix<T>) -> Result<()> {
        self.check_shape(x)?;

        for (j, column) in x.column_iter().enumerate() {
            if !column.iter().all(|&v| <T as Float>::is_finite(v)) {
                return Err(ManifoldError::invalid_point(format!(
                    "column {j} has non-finite entries"
                )));
            }
            let norm_squared = column.norm_squared();
            if norm_squared >= T::one() {
                return Err(ManifoldError::invalid_point(format!(
                    "column {j} is outside the unit ball: ‖x‖² = {norm_squared}"
                )));
            }
        }

        Ok(())
    }

    /// Conformal factor λ(xⱼ) = 2 / (1 − ‖xⱼ‖²) of every column.
    pub fn conformal_factor(&self, x: &DMatrix<T>) -> Result<Vec<T>> {
        self.guard_point(x)?;
        Ok(self.lambdas(x))
    }

    /// Column-wise Möbius addition `a ⊕ b`.
    pub fn mobius_addition(&self, a: &DMatrix<T>, b: &DMatrix<T>) -> Result<DMatrix<T>> {
        self.guard_point(a)?;
        self.guard_point(b)?;
        mobius_addition(a, b)
    }

    fn shape_label(&self) -> String {
        format!("{}x{}", self.k, self.n)
    }

    fn check_shape(&self, m: &DMatrix<T>) -> Result<()> {
        if m.shape() == (self.k, self.n) {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(
                self.shape_label(),
                format!("{}x{}", m.nrows(), m.ncols()),
            ))
        }
    }

    /// Shape check, plus membership check in strict mode.
    fn guard_point(&self, x: &DMatrix<T>) -> Result<()> {
        self.check_shape(x)?;
        if self.validation.is_strict() {
            if let Err(err) = self.check_point(x) {
                warn!(manifold = %self.name, error = %err, "rejected point");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Shape check, plus a finiteness check in strict mode.
    fn guard_tangent(&self, v: &DMatrix<T>) -> Result<()> {
        self.check_shape(v)?;
        if self.validation.is_strict() && !v.iter().all(|&e| <T as Float>::is_finite(e)) {
            let err = ManifoldError::invalid_tangent("vector has non-finite entries");
            warn!(manifold = %self.name, error = %err, "rejected tangent vector");
            return Err(err);
        }
        Ok(())
    }

    fn lambdas(&self, x: &DMatrix<T>) -> Vec<T> {
        let two = <T as Scalar>::from_f64(2.0);
        column_norms_squared(x)
            .into_iter()
            .map(|sq| two / (T::one() - sq))
            .collect()
    }

    /// One column uniformly distributed in the unit ball of ℝᵏ.
    fn random_column<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<T> {
        let inv_k = 1.0 / self.k as f64;
        loop {
            let direction = DVector::<T>::from_fn(self.k, |_, _| {
                let val: f64 = StandardNormal.sample(&mut *rng);
                <T as Scalar>::from_f64(val)
            });
            let norm = direction.norm();
            if norm <= T::EPSILON {
                continue;
            }

            // r = U^(1/k) gives a density proportional to r^(k-1)
            let u: f64 = rng.gen();
            let radius = <T as Scalar>::from_f64(u.powf(inv_k));
            let column = direction * (radius / norm);

            // Rounding can land on the sphere for large k or low precision
            if column.norm_squared() < T::one() {
                return column;
            }
        }
    }
}

impl<T: Scalar> Manifold<T> for PoincareBall<T> {
    type Point = DMatrix<T>;
    type TangentVector = DMatrix<T>;

    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.k * self.n
    }

    fn typical_dist(&self) -> T {
        <T as Scalar>::from_usize(self.k * self.n) / <T as Scalar>::from_f64(8.0)
    }

    fn is_point_on_manifold(&self, point: &Self::Point, tol: T) -> bool {
        point.shape() == (self.k, self.n)
            && point
                .column_iter()
                .all(|column| column.norm_squared() < T::one() - tol)
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
        _tol: T,
    ) -> bool {
        point.shape() == (self.k, self.n) && vector.shape() == (self.k, self.n)
    }

    fn project_tangent(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_point(point)?;
        self.guard_tangent(vector)?;
        Ok(vector.clone())
    }

    fn inner_product(
        &self,
        point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T> {
        self.guard_point(point)?;
        self.guard_tangent(u)?;
        self.guard_tangent(v)?;

        let lambdas = self.lambdas(point);
        Ok(sum_columns(self.k, self.n, |j| {
            lambdas[j] * lambdas[j] * u.column(j).dot(&v.column(j))
        }))
    }

    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector {
        DMatrix::zeros(point.nrows(), point.ncols())
    }

    fn scale_tangent(
        &self,
        _point: &Self::Point,
        scalar: T,
        tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_tangent(tangent)?;
        Ok(tangent * scalar)
    }

    fn add_tangents(
        &self,
        _point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_tangent(u)?;
        self.guard_tangent(v)?;
        Ok(u + v)
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Point {
        let mut point = DMatrix::zeros(self.k, self.n);
        for j in 0..self.n {
            point.set_column(j, &self.random_column(rng));
        }
        point
    }

    fn random_tangent<R: Rng + ?Sized>(
        &self,
        point: &Self::Point,
        rng: &mut R,
    ) -> Result<Self::TangentVector> {
        self.guard_point(point)?;
        Ok(DMatrix::from_fn(self.k, self.n, |_, _| {
            let val: f64 = StandardNormal.sample(&mut *rng);
            <T as Scalar>::from_f64(val)
        }))
    }

    fn exp(&self, point: &Self::Point, tangent: &Self::TangentVector) -> Result<Self::Point> {
        self.guard_point(point)?;
        self.guard_tangent(tangent)?;

        Ok(map_columns(self.k, self.n, |j| {
            let x = point.column(j);
            let v = tangent.column(j);
            let v_norm = v.norm();

            let displacement = if v_norm > T::zero() {
                let scale = <T as Float>::tanh(v_norm / (T::one() - x.norm_squared())) / v_norm;
                v * scale
            } else {
                DVector::zeros(self.k)
            };
            mobius_add_column(&x, &displacement)
        }))
    }

    fn log(&self, point: &Self::Point, other: &Self::Point) -> Result<Self::TangentVector> {
        self.guard_point(point)?;
        self.guard_point(other)?;

        Ok(map_columns(self.k, self.n, |j| {
            let x = point.column(j);
            let w = mobius_add_column(&(-x), &other.column(j));
            let w_norm = w.norm();

            if w_norm > T::zero() {
                let scale =
                    (T::one() - x.norm_squared()) * <T as Float>::atanh(w_norm) / w_norm;
                w * scale
            } else {
                DVector::zeros(self.k)
            }
        }))
    }

    fn retraction_order(&self) -> RetractionOrder {
        RetractionOrder::Exact
    }

    fn distance(&self, x: &Self::Point, y: &Self::Point) -> Result<T> {
        self.guard_point(x)?;
        self.guard_point(y)?;

        let two = <T as Scalar>::from_f64(2.0);
        let squared = sum_columns(self.k, self.n, |j| {
            let xj = x.column(j);
            let yj = y.column(j);
            let diff_sq = (xj - yj).norm_squared();
            let denominator = (T::one() - xj.norm_squared()) * (T::one() - yj.norm_squared());
            // No clamping: invalid points surface as NaN
            let d = <T as Float>::acosh(T::one() + two * diff_sq / denominator);
            d * d
        });
        Ok(<T as Float>::sqrt(squared))
    }

    fn euclidean_to_riemannian_gradient(
        &self,
        point: &Self::Point,
        euclidean_grad: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_point(point)?;
        self.guard_tangent(euclidean_grad)?;

        let lambdas = self.lambdas(point);
        Ok(map_columns(self.k, self.n, |j| {
            euclidean_grad.column(j) / (lambdas[j] * lambdas[j])
        }))
    }

    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Self::Point,
        euclidean_grad: &Self::TangentVector,
        euclidean_hvp: &Self::TangentVector,
        tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_point(point)?;
        self.guard_tangent(euclidean_grad)?;
        self.guard_tangent(euclidean_hvp)?;
        self.guard_tangent(tangent)?;

        let lambdas = self.lambdas(point);
        Ok(map_columns(self.k, self.n, |j| {
            let x = point.column(j);
            let g = euclidean_grad.column(j);
            let v = tangent.column(j);
            let lambda = lambdas[j];

            let gx = g.dot(&x);
            let xv = x.dot(&v);
            let gv = g.dot(&v);

            (v * gx - g * xv - x * gv + euclidean_hvp.column(j) / lambda) / lambda
        }))
    }

    fn parallel_transport(
        &self,
        from: &Self::Point,
        to: &Self::Point,
        vector: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.guard_point(from)?;
        self.guard_point(to)?;
        self.guard_tangent(vector)?;

        let lambda_from = self.lambdas(from);
        let lambda_to = self.lambdas(to);
        Ok(map_columns(self.k, self.n, |j| {
            gyration_column(&to.column(j), &(-from.column(j)), &vector.column(j))
                * (lambda_from[j] / lambda_to[j])
        }))
    }

    fn has_exact_exp_log(&self) -> bool {
        true
    }
}

impl<T: Scalar> PoincareBall<T> {
    /// Geodesic distance of every ball separately.
    ///
    /// [`Manifold::distance`] is the Euclidean norm of this vector.
    pub fn distances_per_ball(&self, x: &DMatrix<T>, y: &DMatrix<T>) -> Result<Vec<T>> {
        self.guard_point(x)?;
        self.guard_point(y)?;

        let two = <T as Scalar>::from_f64(2.0);
        Ok(collect_columns(self.k, self.n, |j| {
            let xj = x.column(j);
            let yj = y.column(j);
            let denominator = (T::one() - xj.norm_squared()) * (T::one() - yj.norm_squared());
            <T as Float>::acosh(T::one() + two * (xj - yj).norm_squared() / denominator)
        }))
    }
}
