//! Combination of the steady and unsteady parts into the aerodynamic
//! transfer matrix `Qjj = -(Ajj)^-1`, plus batched evaluation over Mach and
//! reduced-frequency lists.
//!
//! The steady part comes from an external vortex lattice collaborator
//! expressed as the [`SteadyAerodynamics`] trait; this module owns only the
//! combination, the inversion, and the optional XZ mirror-symmetry folding.

use nalgebra::DVector;

use crate::errors::DlmError;
use crate::geometry::AeroGrid;
use crate::influence::{build_unsteady_ajj, Method};
use crate::math::{CMatrix, CScalar, Scalar};

/// Steady aerodynamics collaborator (vortex lattice method).
pub trait SteadyAerodynamics {
    /// Returns the steady downwash-to-pressure influence matrix for `grid`
    /// at Mach number `ma`, dimension n x n in the grid's panel order.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures as [`DlmError::Steady`].
    fn calc_ajj(&self, grid: &AeroGrid, ma: Scalar) -> Result<CMatrix, DlmError>;

    /// Doubles the grid by mirroring it across the XZ plane; the mirrored
    /// panels follow the originals in index order.
    fn mirror_xz(&self, grid: &AeroGrid) -> AeroGrid;
}

/// Result of a batched evaluation: one n x n transfer matrix per
/// (Mach, reduced frequency) pair.
#[derive(Debug, Clone)]
pub struct QjjBatch {
    machs: Vec<Scalar>,
    ks: Vec<Scalar>,
    n: usize,
    matrices: Vec<CMatrix>,
}

impl QjjBatch {
    /// Transfer matrix for Mach index `im` and frequency index `ik`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, im: usize, ik: usize) -> &CMatrix {
        assert!(im < self.machs.len() && ik < self.ks.len(), "batch index out of range");
        &self.matrices[im * self.ks.len() + ik]
    }

    /// Applies the transfer matrix to a downwash vector, yielding the panel
    /// pressure coefficients.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range or the vector length is not n.
    #[must_use]
    pub fn apply(&self, im: usize, ik: usize, downwash: &DVector<CScalar>) -> DVector<CScalar> {
        self.get(im, ik) * downwash
    }

    /// Mach numbers of the batch, in evaluation order.
    #[must_use]
    pub fn machs(&self) -> &[Scalar] {
        &self.machs
    }

    /// Reduced frequencies of the batch, in evaluation order.
    #[must_use]
    pub fn ks(&self) -> &[Scalar] {
        &self.ks
    }

    /// Panel count (matrix dimension).
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }
}

/// Computes the aerodynamic transfer matrix `Qjj = -(Ajj_VLM + Ajj_DLM)^-1`
/// for one Mach number and reduced frequency.
///
/// At `k = 0` the unsteady contribution is the exact zero matrix and only
/// the steady collaborator's part enters.
///
/// # Errors
///
/// Flow parameters outside `0 <= Ma < 1` or `k >= 0` are configuration
/// errors; a singular summed matrix is fatal and reported with the failing
/// (Ma, k) pair.
pub fn calc_qjj<V: SteadyAerodynamics + ?Sized>(
    grid: &AeroGrid,
    vlm: &V,
    ma: Scalar,
    k: Scalar,
    method: Method,
) -> Result<CMatrix, DlmError> {
    validate_flow(ma, k)?;
    let steady = vlm.calc_ajj(grid, ma)?;
    let ajj = if k == 0.0 {
        steady
    } else {
        steady + build_unsteady_ajj(grid, ma, k, method)
    };
    neg_inverse(ajj, ma, k)
}

/// Batched evaluation over Mach and reduced-frequency lists.
///
/// The steady matrix is computed once per Mach number and reused across all
/// frequencies. With `xz_symmetry` the grid is doubled via the
/// collaborator's mirroring utility and the result folded back to n x n as
/// `Q = Ainv[0..n, 0..n] - Ainv[n..2n, 0..n]`. The batch path uses the
/// parabolic interpolation throughout, like the single-call default.
///
/// # Errors
///
/// The first failing (Ma, k) pair aborts the batch; the singular-matrix
/// error names the pair.
pub fn calc_qjjs<V: SteadyAerodynamics + ?Sized>(
    grid: &AeroGrid,
    vlm: &V,
    machs: &[Scalar],
    ks: &[Scalar],
    xz_symmetry: bool,
) -> Result<QjjBatch, DlmError> {
    for &ma in machs {
        validate_flow(ma, 0.0)?;
    }
    for &k in ks {
        validate_flow(0.0, k)?;
    }

    let n = grid.n();
    let mirrored;
    let working = if xz_symmetry {
        mirrored = vlm.mirror_xz(grid);
        &mirrored
    } else {
        grid
    };

    let mut matrices = Vec::with_capacity(machs.len() * ks.len());
    for &ma in machs {
        let steady = vlm.calc_ajj(working, ma)?;
        for &k in ks {
            let ajj = if k == 0.0 {
                steady.clone()
            } else {
                &steady + build_unsteady_ajj(working, ma, k, Method::Parabolic)
            };
            let inv = neg_inverse(ajj, ma, k)?;
            if xz_symmetry {
                let folded = inv.view((0, 0), (n, n)) - inv.view((n, 0), (n, n));
                matrices.push(folded);
            } else {
                matrices.push(inv);
            }
        }
    }

    Ok(QjjBatch { machs: machs.to_vec(), ks: ks.to_vec(), n, matrices })
}

fn validate_flow(ma: Scalar, k: Scalar) -> Result<(), DlmError> {
    if !(0.0..1.0).contains(&ma) {
        return Err(DlmError::MachOutOfRange(ma));
    }
    if !k.is_finite() || k < 0.0 {
        return Err(DlmError::ReducedFrequencyOutOfRange(k));
    }
    Ok(())
}

/// Inverts and negates the summed influence matrix, rejecting singular and
/// numerically singular systems instead of returning a NaN-filled result.
fn neg_inverse(ajj: CMatrix, ma: Scalar, k: Scalar) -> Result<CMatrix, DlmError> {
    let dim = ajj.nrows();
    let lu = ajj.lu();
    let u = lu.u();
    let min_diag = (0..dim).map(|i| u[(i, i)].norm()).fold(Scalar::INFINITY, Scalar::min);
    if !(min_diag > 1.0e-14) {
        return Err(DlmError::SingularMatrix { ma, k });
    }
    let inv = lu.try_inverse().ok_or(DlmError::SingularMatrix { ma, k })?;
    Ok(inv.map(|c| -c))
}
