//! Per-manifold runtime configuration.

use std::fmt;

/// How strictly a manifold checks its point arguments.
///
/// Validating every call costs a pass over the data on the hot path, so
/// manifolds default to [`ValidationMode::Unchecked`]: points outside the
/// domain are the caller's responsibility and may produce NaN or infinite
/// results instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationMode {
    /// Only array shapes are checked. Numerical behaviour on invalid points
    /// is left untouched.
    #[default]
    Unchecked,
    /// Every point argument is checked for domain membership before any
    /// computation; violations fail with `ManifoldError::InvalidPoint`.
    Strict,
}

impl ValidationMode {
    /// Returns `true` for [`ValidationMode::Strict`].
    #[inline]
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchecked => write!(f, "unchecked"),
            Self::Strict => write!(f, "strict"),
        }
    }
}
