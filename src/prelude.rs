//! Convenience re-exports for building aeroelastic analyses.

pub use crate::aic::{calc_qjj, calc_qjjs, QjjBatch, SteadyAerodynamics};
pub use crate::errors::DlmError;
pub use crate::geometry::{AeroGrid, DoubletLine, Panel};
pub use crate::influence::{build_unsteady_ajj, Method, Regime};
pub use crate::integrals::{integrals12, ApproximationScheme};
pub use crate::kernel::{kernel, PairOffsets};
pub use crate::math::{CMatrix, CScalar, R3, Scalar};
pub use crate::sweep::{linspace, logspace, reduced_frequencies, reduced_frequency};
