//! Common test manifolds for use in unit tests.
//!
//! This module provides reusable implementations of simple manifolds
//! that can be used across different test modules and crates.

#![cfg(any(test, feature = "test-utils"))]

use crate::{
    error::{ManifoldError, Result},
    manifold::{Manifold, RetractionOrder},
    types::{DVector, Scalar},
};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::marker::PhantomData;

/// Flat Euclidean space R^d.
///
/// Every operation is trivial (projection is the identity, exp is addition),
/// which makes it a reference for the contract's default methods.
#[derive(Debug, Clone)]
pub struct TestEuclideanManifold<T = f64> {
    dim: usize,
    _marker: PhantomData<T>,
}

impl<T: Scalar> TestEuclideanManifold<T> {
    /// Creates R^dim.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            _marker: PhantomData,
        }
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len == self.dim {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(self.dim, len))
        }
    }
}

impl<T: Scalar> Manifold<T> for TestEuclideanManifold<T> {
    type Point = DVector<T>;
    type TangentVector = DVector<T>;

    fn name(&self) -> &str {
        "TestEuclidean"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn typical_dist(&self) -> T {
        <T as Float>::sqrt(<T as Scalar>::from_usize(self.dim))
    }

    fn is_point_on_manifold(&self, point: &Self::Point, _tol: T) -> bool {
        point.len() == self.dim
    }

    fn is_vector_in_tangent_space(
        &self,
        _point: &Self::Point,
        vector: &Self::TangentVector,
        _tol: T,
    ) -> bool {
        vector.len() == self.dim
    }

    fn project_tangent(
        &self,
        point: &Self::Point,
        vector: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.check_len(point.len())?;
        self.check_len(vector.len())?;
        Ok(vector.clone())
    }

    fn inner_product(
        &self,
        point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<T> {
        self.check_len(point.len())?;
        self.check_len(u.len())?;
        self.check_len(v.len())?;
        Ok(u.dot(v))
    }

    fn zero_vector(&self, point: &Self::Point) -> Self::TangentVector {
        DVector::zeros(point.len())
    }

    fn scale_tangent(
        &self,
        _point: &Self::Point,
        scalar: T,
        tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        Ok(tangent * scalar)
    }

    fn add_tangents(
        &self,
        _point: &Self::Point,
        u: &Self::TangentVector,
        v: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.check_len(u.len())?;
        self.check_len(v.len())?;
        Ok(u + v)
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Point {
        DVector::from_fn(self.dim, |_, _| {
            let val: f64 = StandardNormal.sample(&mut *rng);
            <T as Scalar>::from_f64(val)
        })
    }

    fn random_tangent<R: Rng + ?Sized>(
        &self,
        point: &Self::Point,
        rng: &mut R,
    ) -> Result<Self::TangentVector> {
        self.check_len(point.len())?;
        Ok(self.random_point(rng))
    }

    fn exp(&self, point: &Self::Point, tangent: &Self::TangentVector) -> Result<Self::Point> {
        self.check_len(point.len())?;
        self.check_len(tangent.len())?;
        Ok(point + tangent)
    }

    fn log(&self, point: &Self::Point, other: &Self::Point) -> Result<Self::TangentVector> {
        self.check_len(point.len())?;
        self.check_len(other.len())?;
        Ok(other - point)
    }

    fn retraction_order(&self) -> RetractionOrder {
        RetractionOrder::Exact
    }

    fn euclidean_to_riemannian_gradient(
        &self,
        point: &Self::Point,
        euclidean_grad: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.project_tangent(point, euclidean_grad)
    }

    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Self::Point,
        _euclidean_grad: &Self::TangentVector,
        euclidean_hvp: &Self::TangentVector,
        _tangent: &Self::TangentVector,
    ) -> Result<Self::TangentVector> {
        self.project_tangent(point, euclidean_hvp)
    }

    fn has_exact_exp_log(&self) -> bool {
        true
    }

    fn is_flat(&self) -> bool {
        true
    }
}
