//! Error types for Riemannian manifold operations.
//!
//! This module defines the error type shared by every manifold
//! implementation: configuration failures at construction time, shape
//! mismatches between arrays, and the optional strict-mode membership
//! checks.

use thiserror::Error;

/// Errors that can occur during manifold construction or manifold operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifoldError {
    /// Point is not on the manifold.
    ///
    /// Only raised by validating entry points (e.g. strict validation mode);
    /// the unchecked hot path never inspects membership.
    #[error("Point is not on the manifold: {reason}")]
    InvalidPoint {
        /// Description of why the point is invalid
        reason: String,
    },

    /// Vector is not in the tangent space.
    #[error("Vector is not in the tangent space: {reason}")]
    InvalidTangent {
        /// Description of why the tangent vector is invalid
        reason: String,
    },

    /// Dimension mismatch between arrays.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical instability detected.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Method or feature not implemented.
    ///
    /// Used by generic tooling when a manifold lacks a capability it needs.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Name of the unimplemented feature
        feature: String,
    },

    /// Invalid construction parameter.
    ///
    /// Raised when a manifold is configured with an out-of-range value.
    /// No partially built manifold is ever returned alongside it.
    #[error("Invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        parameter: String,
        /// The rejected value, rendered as text
        value: String,
        /// Constraint the value violated
        reason: String,
    },
}

impl ManifoldError {
    /// Create an InvalidPoint error with a custom reason.
    pub fn invalid_point<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPoint {
            reason: reason.into(),
        }
    }

    /// Create an InvalidTangent error with a custom reason.
    pub fn invalid_tangent<S: Into<String>>(reason: S) -> Self {
        Self::InvalidTangent {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error for a specific feature.
    pub fn not_implemented<S: Into<String>>(feature: S) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Create an InvalidParameter error naming the parameter and its value.
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: std::fmt::Display,
        R: Into<String>,
    {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;
