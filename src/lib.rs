#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Shared numerical primitives anchored on `nalgebra`.
pub mod math;
/// Panel and grid geometry consumed by the influence computations.
pub mod geometry;
/// Approximations of the kernel integrals I1 and I2.
pub mod integrals;
/// The unsteady kernel function evaluator.
pub mod kernel;
/// Assembly of the unsteady influence matrix.
pub mod influence;
/// Combination with the steady part, inversion, and batch evaluation.
pub mod aic;
/// Mach and reduced-frequency sweep helpers.
pub mod sweep;
/// Error types shared across modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
