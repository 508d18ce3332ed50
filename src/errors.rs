//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum DlmError {
    /// Raised when an integral approximation scheme name is not recognised.
    #[error("unknown integral approximation scheme: '{0}'")]
    UnknownScheme(String),
    /// Raised when an interpolation method name is not recognised.
    #[error("unknown interpolation method: '{0}' (expected 'parabolic' or 'quartic')")]
    UnknownMethod(String),
    /// Raised for Mach numbers outside the subsonic range of the kernel.
    #[error("Mach number must satisfy 0 <= Ma < 1, got {0}")]
    MachOutOfRange(Scalar),
    /// Raised for negative or non-finite reduced frequencies.
    #[error("reduced frequency must be finite and >= 0, got {0}")]
    ReducedFrequencyOutOfRange(Scalar),
    /// Raised when a panel has a vanishing semi-width or chord.
    #[error("panel {id} is degenerate: {reason}")]
    DegeneratePanel {
        /// Identifier of the offending panel.
        id: u32,
        /// Which geometric quantity collapsed.
        reason: String,
    },
    /// Raised when the summed influence matrix cannot be inverted.
    #[error("influence matrix is singular at Ma={ma}, k={k}")]
    SingularMatrix {
        /// Mach number of the failing pair.
        ma: Scalar,
        /// Reduced frequency of the failing pair.
        k: Scalar,
    },
    /// Wraps failures reported by the steady aerodynamics collaborator.
    #[error("steady aerodynamics failure: {0}")]
    Steady(String),
}
