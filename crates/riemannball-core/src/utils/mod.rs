//! Utility modules for riemannball-core.

pub mod parallel_thresholds;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_manifolds;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
