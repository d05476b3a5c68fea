//! # Möbius Gyrovector Operations
//!
//! The open unit ball 𝔹ᵏ = {x ∈ ℝᵏ : ‖x‖ < 1} is closed under Möbius
//! addition
//! ```text
//! a ⊕ b = ((1 + 2⟨a,b⟩ + ‖b‖²) a + (1 − ‖a‖²) b) / (1 + 2⟨a,b⟩ + ‖a‖²‖b‖²)
//! ```
//! which is neither commutative nor associative. The defect of
//! associativity is measured by the gyration
//! ```text
//! gyr[a,b] c = ⊖(a ⊕ b) ⊕ (a ⊕ (b ⊕ c))
//! ```
//! a Euclidean rotation of ℝᵏ. The exponential and logarithm maps of the
//! Poincaré ball are built from ⊕, and its parallel transport from gyr.
//!
//! All functions here act column by column on `k × n` matrices, one
//! independent ball per column, and perform no domain checks. Arguments of
//! different shapes fail with [`ManifoldError::DimensionMismatch`].

use crate::utils::map_columns;
use nalgebra::{storage::Storage, DVector, Dyn, Vector};
use riemannball_core::{
    error::{ManifoldError, Result},
    types::{DMatrix, Scalar},
};

/// Möbius addition of two single-ball vectors.
#[inline]
pub(crate) fn mobius_add_column<T, SA, SB>(a: &Vector<T, Dyn, SA>, b: &Vector<T, Dyn, SB>) -> DVector<T>
where
    T: Scalar,
    SA: Storage<T, Dyn>,
    SB: Storage<T, Dyn>,
{
    let two = <T as Scalar>::from_f64(2.0);
    let ab = a.dot(b);
    let a_sq = a.norm_squared();
    let b_sq = b.norm_squared();

    let numerator = a * (T::one() + two * ab + b_sq) + b * (T::one() - a_sq);
    let denominator = T::one() + two * ab + a_sq * b_sq;
    numerator / denominator
}

/// Closed-form gyration gyr[u,v] w of single-ball vectors.
///
/// ```text
/// gyr[u,v] w = w + 2 (A u + B v) / D
/// A = −⟨u,w⟩‖v‖² + ⟨v,w⟩ + 2⟨u,v⟩⟨v,w⟩
/// B = −⟨v,w⟩‖u‖² − ⟨u,w⟩
/// D = 1 + 2⟨u,v⟩ + ‖u‖²‖v‖²
/// ```
/// Linear in `w`, so it applies to tangent vectors as well as points.
#[inline]
pub(crate) fn gyration_column<T, SU, SV, SW>(
    u: &Vector<T, Dyn, SU>,
    v: &Vector<T, Dyn, SV>,
    w: &Vector<T, Dyn, SW>,
) -> DVector<T>
where
    T: Scalar,
    SU: Storage<T, Dyn>,
    SV: Storage<T, Dyn>,
    SW: Storage<T, Dyn>,
{
    let two = <T as Scalar>::from_f64(2.0);
    let uw = u.dot(w);
    let vw = v.dot(w);
    let uv = u.dot(v);
    let u_sq = u.norm_squared();
    let v_sq = v.norm_squared();

    let a = -uw * v_sq + vw + two * uv * vw;
    let b = -vw * u_sq - uw;
    let d = T::one() + two * uv + u_sq * v_sq;

    w.clone_owned() + (u * a + v * b) * (two / d)
}

/// Column-wise Möbius addition `a ⊕ b`.
///
/// The zero vector is a two-sided identity and `(−a) ⊕ a = 0`.
pub fn mobius_addition<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>) -> Result<DMatrix<T>> {
    same_shape(a, b)?;
    Ok(map_columns(a.nrows(), a.ncols(), |j| {
        mobius_add_column(&a.column(j), &b.column(j))
    }))
}

/// Column-wise gyration `gyr[a,b] c`.
pub fn gyration<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>, c: &DMatrix<T>) -> Result<DMatrix<T>> {
    same_shape(a, b)?;
    same_shape(a, c)?;
    Ok(map_columns(a.nrows(), a.ncols(), |j| {
        gyration_column(&a.column(j), &b.column(j), &c.column(j))
    }))
}

fn same_shape<T: Scalar>(expected: &DMatrix<T>, actual: &DMatrix<T>) -> Result<()> {
    if expected.shape() == actual.shape() {
        Ok(())
    } else {
        Err(ManifoldError::dimension_mismatch(
            format!("{}x{}", expected.nrows(), expected.ncols()),
            format!("{}x{}", actual.nrows(), actual.ncols()),
        ))
    }
}
