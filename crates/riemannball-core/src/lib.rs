//! Core traits and types for Riemannian optimization on hyperbolic spaces.
//!
//! This crate defines the contract a manifold exposes to an optimizer: metric
//! operations, tangent-space operations, exponential and logarithm maps, and
//! the conversion of Euclidean derivatives into Riemannian ones. Concrete
//! manifolds live in `riemannball-manifolds`.
//!
//! # Modules
//!
//! - [`config`]: Per-manifold validation settings
//! - [`error`]: Error types for manifold operations
//! - [`manifold`]: Core manifold trait and associated types
//! - [`types`]: Scalar abstraction, array aliases and tolerances
//! - [`validation`]: Finite-difference checks of gradient and Hessian conversions
//! - [`utils`]: Parallel execution thresholds and test helpers

pub mod config;
pub mod error;
pub mod manifold;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub use utils::{test_manifolds, test_utils};

// Re-export commonly used items at the crate root
pub use error::{ManifoldError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use riemannball_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ValidationMode;
    pub use crate::error::{ManifoldError, Result};
    pub use crate::manifold::{Manifold, RetractionOrder};
    pub use crate::types::{DMatrix, DVector, Scalar};
    pub use crate::utils::parallel_thresholds::{
        get_parallel_config, set_parallel_config, ParallelDecision, ParallelThresholdsBuilder,
        ParallelThresholdsConfig,
    };
    pub use crate::validation::{
        GradientCheckResult, NumericalValidationConfig, NumericalValidator,
    };
}
