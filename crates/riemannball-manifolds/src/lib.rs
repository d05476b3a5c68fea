//! RiemannBall Manifolds - hyperbolic geometry for Riemannian optimization.
//!
//! This crate provides the Poincaré ball model of hyperbolic space, as a
//! product of `n` independent `k`-dimensional balls, together with the
//! Möbius gyrovector operations it is built from.
//!
//! Every manifold here implements [`riemannball_core::manifold::Manifold`],
//! so any optimizer written against that trait can drive it.

pub mod mobius;
pub mod poincare_ball;
pub mod utils;

// Re-export main items for convenience
pub use mobius::{gyration, mobius_addition};
pub use poincare_ball::PoincareBall;
