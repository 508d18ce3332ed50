//! The unsteady kernel function of the DLM.
//!
//! K1 and K2 follow Landahl's formulation as rearranged in Rodden 1971,
//! eqs 7 and 8, while keeping the sign convention of Rodden 1968 so that the
//! steady part matches the VLM contribution added later. The analytic steady
//! kernels K10 and K20 (eqs 15 and 16) are subtracted here, so the outputs
//! P1 and P2 carry only the oscillatory increment.

use crate::integrals::{integrals12, ApproximationScheme};
use crate::math::{cexp_neg, CScalar, Scalar};

/// Position of a receiving point relative to a sending doublet line, in the
/// sending line's rotated frame.
#[derive(Debug, Clone, Copy)]
pub struct PairOffsets {
    /// Streamwise offset of the receiving point.
    pub xbar: Scalar,
    /// Spanwise offset in the sending line's frame.
    pub ybar: Scalar,
    /// Out-of-plane offset in the sending line's frame.
    pub zbar: Scalar,
    /// Relative dihedral angle between the sending and receiving panels.
    pub gamma_sr: Scalar,
    /// Sweep tangent of the sending doublet line.
    pub tan_lambda: Scalar,
}

/// Evaluates the steady-subtracted kernel pair (P1, P2) at the spanwise
/// integration offset `ebar` along the sending doublet line.
///
/// The assembly calls this at `ebar = 0`, `±e` (parabolic) or additionally
/// `±e/2` (quartic). The `r1 = 0` singularity (receiving point on the
/// extension of the doublet line) is resolved by the exact limits of K1 and
/// K2: (-2, +4) for points behind the sending line, (0, 0) ahead of it.
#[must_use]
pub fn kernel(
    p: &PairOffsets,
    ebar: Scalar,
    k: Scalar,
    mach: Scalar,
    scheme: ApproximationScheme,
) -> (CScalar, CScalar) {
    // Rodden 1971, eqs 4 and 9-12.
    let r1 = (p.ybar - ebar).hypot(p.zbar);
    let beta2 = 1.0 - mach * mach;
    let x0 = p.xbar - ebar * p.tan_lambda;
    let r_compr = (x0 * x0 + beta2 * r1 * r1).sqrt();

    // Direction cosines; T2 is premultiplied by r1^2 (Rodden 1971, eq 21a).
    let t1 = p.gamma_sr.cos();
    let t2 = p.zbar * (p.zbar * p.gamma_sr.cos() + (p.ybar - ebar) * p.gamma_sr.sin());

    let (k1_landahl, k2_landahl) = if r1 == 0.0 {
        if p.xbar >= 0.0 {
            (CScalar::new(-2.0, 0.0), CScalar::new(4.0, 0.0))
        } else {
            (CScalar::new(0.0, 0.0), CScalar::new(0.0, 0.0))
        }
    } else {
        let u1 = (mach * r_compr - x0) / (beta2 * r1);
        let k1 = k * r1;
        let ejku = cexp_neg(k1 * u1);
        let root = (1.0 + u1 * u1).sqrt();
        let (i1, i2) = integrals12(u1, k1, scheme);

        // Rodden 1971, eqs 7 and 8.
        let kern1 = -i1 - ejku * mach * r1 / r_compr / root;
        let kern2 = 3.0 * i2
            + CScalar::new(0.0, k1) * ejku * (mach * mach) * (r1 * r1)
                / (r_compr * r_compr)
                / root
            + ejku * mach * r1
                * ((1.0 + u1 * u1) * beta2 * r1 * r1 / (r_compr * r_compr)
                    + 2.0
                    + mach * r1 * u1 / r_compr)
                / r_compr
                / (root * root * root);
        (kern1, kern2)
    };

    // Analytic k = 0 kernels, Rodden 1971, eqs 15 and 16.
    let k10 = -1.0 - x0 / r_compr;
    let k20 = 2.0 + x0 * (2.0 + beta2 * r1 * r1 / (r_compr * r_compr)) / r_compr;

    // Rodden 1971, eqs 27b and 36b.
    let phase = cexp_neg(k * x0);
    let p1 = -(k1_landahl * phase - k10) * t1;
    let p2 = -(k2_landahl * phase - k20) * t2;
    (p1, p2)
}
