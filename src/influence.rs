//! Assembly of the unsteady influence matrix.
//!
//! Each receiving/sending panel pair gets the kernel evaluated at a few
//! offsets along the sending doublet line, and the spanwise integral of the
//! kernel is replaced by the closed-form integral of a parabola (Rodden
//! 1971/72) or a quartic (Rodden 1998) through those samples. The closed
//! forms change shape near the panel plane, so every pair is first sorted
//! into one of three disjoint geometric regimes.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::errors::DlmError;
use crate::geometry::{AeroGrid, DoubletLine};
use crate::integrals::ApproximationScheme;
use crate::kernel::{kernel, PairOffsets};
use crate::math::{CMatrix, CScalar, Scalar};

/// Spanwise interpolation of the kernel across each sending panel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Three-point parabolic fit (Rodden et al. 1971/72); the default.
    #[default]
    Parabolic,
    /// Five-point quartic fit (Rodden et al. 1998).
    Quartic,
}

impl Method {
    /// The integral approximation scheme paired with this interpolation.
    #[must_use]
    pub const fn scheme(self) -> ApproximationScheme {
        match self {
            Self::Parabolic => ApproximationScheme::Laschka,
            Self::Quartic => ApproximationScheme::Desmarais,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parabolic => write!(f, "parabolic"),
            Self::Quartic => write!(f, "quartic"),
        }
    }
}

impl FromStr for Method {
    type Err = DlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parabolic" => Ok(Self::Parabolic),
            "quartic" => Ok(Self::Quartic),
            _ => Err(DlmError::UnknownMethod(s.to_string())),
        }
    }
}

/// Geometric regime of a receiving point relative to a sending doublet line.
///
/// The three variants partition all pairs; the planar bound of 0.001 matches
/// Nastran's, the ratio bound of 0.3 is Rodden 1971's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// In the sending panel's plane: |z̄| / e <= 0.001.
    Planar,
    /// Off-plane but close to the co-planar singularity: |ratio| <= 0.3.
    CloseBy,
    /// Everything further away: |ratio| > 0.3.
    Distant,
}

impl Regime {
    /// Classifies a pair from its local coordinates and the semi-width, with
    /// ratio = 2e|z̄| / (ȳ² + z̄² − e²).
    #[must_use]
    pub fn classify(ybar: Scalar, zbar: Scalar, e: Scalar) -> Self {
        if zbar.abs() / e <= 0.001 {
            Self::Planar
        } else if Self::ratio(ybar, zbar, e).abs() <= 0.3 {
            Self::CloseBy
        } else {
            Self::Distant
        }
    }

    fn ratio(ybar: Scalar, zbar: Scalar, e: Scalar) -> Scalar {
        2.0 * e * zbar.abs() / (ybar * ybar + zbar * zbar - e * e)
    }
}

/// Builds the unsteady (oscillatory) influence matrix for one (Ma, k) pair.
///
/// The steady part has already been subtracted inside the kernel, so the
/// result is purely the oscillatory increment that gets added to the steady
/// VLM matrix. Upside-down panels are reported as a warning and left as-is.
#[must_use]
pub fn build_unsteady_ajj(grid: &AeroGrid, ma: Scalar, k: Scalar, method: Method) -> CMatrix {
    let n = grid.n();
    let scheme = method.scheme();
    log::debug!("building unsteady AIC with {method} interpolation and {scheme} integrals");
    if scheme == ApproximationScheme::Watkins {
        log::warn!("using the Watkins (not preferred!) integral approximation");
    }
    if grid.has_flipped_panels() {
        log::warn!(
            "detected upside down / flipped aerodynamic panels; \
             always define panels from left to right"
        );
    }

    let lines: Vec<DoubletLine> = (0..n).map(|i| grid.doublet_line(i)).collect();

    let rows: Vec<Vec<CScalar>> = (0..n)
        .into_par_iter()
        .map(|r| {
            (0..n)
                .map(|s| {
                    let pair = pair_offsets(grid, &lines, r, s);
                    match method {
                        Method::Parabolic => parabolic_influence(&pair, &lines[s], ma, k),
                        Method::Quartic => quartic_influence(&pair, &lines[s], ma, k),
                    }
                })
                .collect()
        })
        .collect();

    CMatrix::from_row_iterator(n, n, rows.into_iter().flatten())
}

/// Relative position of receiving panel `r` against sending panel `s`,
/// rotated into the sending line's frame.
fn pair_offsets(grid: &AeroGrid, lines: &[DoubletLine], r: usize, s: usize) -> PairOffsets {
    let recv = grid.panels()[r].receiving;
    let send = grid.panels()[s].sending;
    let xsr = recv.x - send.x;
    let ysr = recv.y - send.y;
    let zsr = recv.z - send.z;
    let ls = &lines[s];
    PairOffsets {
        xbar: xsr,
        ybar: ysr * ls.cos_gamma + zsr * ls.sin_gamma,
        zbar: zsr * ls.cos_gamma - ysr * ls.sin_gamma,
        gamma_sr: ls.gamma - lines[r].gamma,
        tan_lambda: ls.tan_lambda,
    }
}

/// Series expansion of alpha near the co-planar singularity (Rodden 1971
/// eq 33, Rodden 1972 eq 31b, Rodden 1998 eq 25).
fn alpha_series(ratio: Scalar, e: Scalar, denom: Scalar) -> Scalar {
    let mut series = 0.0;
    for n in 2..8 {
        let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
        series += sign / (2.0 * Scalar::from(n) - 1.0) * ratio.powi(2 * n - 4);
    }
    4.0 * e.powi(4) / (denom * denom) * series
}

/// One entry of the parabolic influence matrix (Rodden 1971, eqs 28-41).
fn parabolic_influence(pair: &PairOffsets, line: &DoubletLine, ma: Scalar, k: Scalar) -> CScalar {
    let e = line.e;
    let e2 = e * e;
    let ybar = pair.ybar;
    let zbar = pair.zbar;
    let y2 = ybar * ybar;
    let z2 = zbar * zbar;
    let denom = y2 + z2 - e2;
    let ratio = 2.0 * e * zbar.abs() / denom;
    let l_log = (((ybar - e).powi(2) + z2) / ((ybar + e).powi(2) + z2)).ln();
    let regime = Regime::classify(ybar, zbar, e);

    // Spanwise downwash factor F (Rodden 1971, eqs 31b and 32).
    let f = match regime {
        Regime::Planar => 2.0 * e / (y2 - e2),
        Regime::CloseBy => {
            2.0 * e / denom * (1.0 - alpha_series(ratio, e, denom) * z2 / e2)
        }
        Regime::Distant => (2.0 * e * zbar.abs()).atan2(denom) / zbar.abs(),
    };

    let (p1m, p2m) = kernel(pair, -e, k, ma, ApproximationScheme::Laschka);
    let (p1p, p2p) = kernel(pair, e, k, ma, ApproximationScheme::Laschka);
    let (p1s, p2s) = kernel(pair, 0.0, k, ma, ApproximationScheme::Laschka);

    // Rodden 1971, eqs 28-30 and 37-39.
    let a1 = (p1m - 2.0 * p1s + p1p) / (2.0 * e2);
    let b1 = (p1p - p1m) / (2.0 * e);
    let c1 = p1s;
    let a2 = (p2m - 2.0 * p2s + p2p) / (2.0 * e2);
    let b2 = (p2p - p2m) / (2.0 * e);
    let c2 = p2s;

    // The "planar" part, Rodden 1971, eq 34.
    let d1rs = line.chord / (8.0 * PI)
        * (((y2 - z2) * a1 + ybar * b1 + c1) * f
            + (0.5 * b1 + ybar * a1) * l_log
            + 2.0 * e * a1);

    // The "nonplanar" part.
    let d2rs = match regime {
        Regime::Planar => CScalar::new(0.0, 0.0),
        _ if (1.0 / ratio).abs() <= 0.1 => {
            // Rodden 1971, eq 40.
            line.chord / (16.0 * PI * z2)
                * (((y2 + z2) * a2 + ybar * b2 + c2) * f
                    + 1.0 / ((ybar + e).powi(2) + z2)
                        * (((y2 + z2) * ybar + (y2 - z2) * e) * a2
                            + (y2 + z2 + ybar * e) * b2
                            + (ybar + e) * c2)
                    - 1.0 / ((ybar - e).powi(2) + z2)
                        * (((y2 + z2) * ybar - (y2 - z2) * e) * a2
                            + (y2 + z2 - ybar * e) * b2
                            + (ybar - e) * c2))
        }
        _ => {
            // Rodden 1971, eq 41; alpha is reconstructed from eq 32, not the
            // series of eq 33, for pairs further away.
            let alpha = match regime {
                Regime::CloseBy => alpha_series(ratio, e, denom),
                _ => (1.0 - f * denom / (2.0 * e)) / z2 * e2,
            };
            line.chord * e / (8.0 * PI * denom)
                * ((2.0 * (y2 + z2 + e2) * (e2 * a2 + c2) + 4.0 * ybar * e2 * b2)
                    / (((ybar + e).powi(2) + z2) * ((ybar - e).powi(2) + z2))
                    - alpha / e2 * ((y2 + z2) * a2 + ybar * b2 + c2))
        }
    };

    d1rs + d2rs
}

/// One entry of the quartic influence matrix (Rodden 1998, eqs 15-34).
fn quartic_influence(pair: &PairOffsets, line: &DoubletLine, ma: Scalar, k: Scalar) -> CScalar {
    let e = line.e;
    let e2 = e * e;
    let e3 = e2 * e;
    let e4 = e2 * e2;
    let ybar = pair.ybar;
    let zbar = pair.zbar;
    let y2 = ybar * ybar;
    let y4 = y2 * y2;
    let y6 = y4 * y2;
    let z2 = zbar * zbar;
    let z4 = z2 * z2;
    let z6 = z4 * z2;
    let denom = y2 + z2 - e2;
    let ratio = 2.0 * e * zbar.abs() / denom;
    let l_log = (((ybar - e).powi(2) + z2) / ((ybar + e).powi(2) + z2)).ln();
    let regime = Regime::classify(ybar, zbar, e);

    // Step-function pair over the sign of (ȳ² + z̄² − e²); the values follow
    // Rodden 1972 eq 30b, which differs from the (apparently mistaken)
    // eq 23 of Rodden 1998.
    let (d1, d2) = if denom > 0.0 {
        (1.0, 0.0)
    } else if denom == 0.0 {
        (0.0, 0.5)
    } else {
        (1.0, 1.0)
    };

    // Rodden 1998, eqs 24 and 25.
    let epsilon = match regime {
        Regime::Planar => 2.0 * e / (y2 - e2),
        Regime::CloseBy => alpha_series(ratio, e, denom),
        Regime::Distant => e2 / z2 * (1.0 - ratio.atan() / ratio),
    };

    // Rodden 1998, eq 22; the z terms drop in the planar regime.
    let f = match regime {
        Regime::Planar => d1 * 2.0 * e / (y2 - e2),
        _ => d1 * 2.0 * e / denom * (1.0 - epsilon * z2 / e2) + d2 * PI / zbar.abs(),
    };

    let (p1m, p2m) = kernel(pair, -e, k, ma, ApproximationScheme::Desmarais);
    let (p1mh, p2mh) = kernel(pair, -e / 2.0, k, ma, ApproximationScheme::Desmarais);
    let (p1p, p2p) = kernel(pair, e, k, ma, ApproximationScheme::Desmarais);
    let (p1ph, p2ph) = kernel(pair, e / 2.0, k, ma, ApproximationScheme::Desmarais);
    let (p1s, p2s) = kernel(pair, 0.0, k, ma, ApproximationScheme::Desmarais);

    // Quartic fit coefficients, Rodden 1998, eqs 15-19 and 28-32.
    let a1 = -(p1m - 16.0 * p1mh + 30.0 * p1s - 16.0 * p1ph + p1p) / (6.0 * e2);
    let b1 = (p1m - 8.0 * p1mh + 8.0 * p1ph - p1p) / (6.0 * e);
    let c1 = p1s;
    let dd1 = -2.0 * (p1m - 2.0 * p1mh + 2.0 * p1ph - p1p) / (3.0 * e3);
    let ee1 = 2.0 * (p1m - 4.0 * p1mh + 6.0 * p1s - 4.0 * p1ph + p1p) / (3.0 * e4);

    let a2 = -(p2m - 16.0 * p2mh + 30.0 * p2s - 16.0 * p2ph + p2p) / (6.0 * e2);
    let b2 = (p2m - 8.0 * p2mh + 8.0 * p2ph - p2p) / (6.0 * e);
    let c2 = p2s;
    let dd2 = -2.0 * (p2m - 2.0 * p2mh + 2.0 * p2ph - p2p) / (3.0 * e3);
    let ee2 = 2.0 * (p2m - 4.0 * p2mh + 6.0 * p2s - 4.0 * p2ph + p2p) / (3.0 * e4);

    // The "planar" part, Rodden 1998, eq 20.
    let d1rs = line.chord / (8.0 * PI)
        * (((y2 - z2) * a1
            + ybar * b1
            + c1
            + ybar * (y2 - 3.0 * z2) * dd1
            + (y4 - 6.0 * y2 * z2 + z4) * ee1)
            * f
            + (0.5 * b1
                + ybar * a1
                + 0.5 * (3.0 * y2 - z2) * dd1
                + 2.0 * ybar * (y2 - z2) * ee1)
                * l_log
            + 2.0 * e * (a1 + 2.0 * ybar * dd1 + (3.0 * y2 - z2 + e2 / 3.0) * ee1));

    // The "nonplanar" part.
    let d2rs = match regime {
        Regime::Planar => CScalar::new(0.0, 0.0),
        _ if (1.0 / ratio).abs() <= 0.1 => {
            // Rodden 1998, eq 33.
            line.chord / (16.0 * PI * z2)
                * (f * ((y2 + z2) * a2
                    + ybar * b2
                    + c2
                    + ybar * (y2 + 3.0 * z2) * dd2
                    + (y4 + 6.0 * y2 * z2 - 3.0 * z4) * ee2)
                    + 1.0 / ((ybar + e).powi(2) + z2)
                        * (((y2 + z2) * ybar + (y2 - z2) * e) * a2
                            + (y2 + z2 + ybar * e) * b2
                            + (ybar + e) * c2
                            + (y4 - z4 + (y2 - 3.0 * z2) * ybar * e) * dd2
                            + ((y4 - 2.0 * y2 * z2 - 3.0 * z4) * ybar
                                + (y4 - 6.0 * y2 * z2 + z4) * e)
                                * ee2)
                    - 1.0 / ((ybar - e).powi(2) + z2)
                        * (((y2 + z2) * ybar - (y2 - z2) * e) * a2
                            + (y2 + z2 - ybar * e) * b2
                            + (ybar - e) * c2
                            + (y4 - z4 - (y2 - 3.0 * z2) * ybar * e) * dd2
                            + ((y4 - 2.0 * y2 * z2 - 3.0 * z4) * ybar
                                - (y4 - 6.0 * y2 * z2 + z4) * e)
                                * ee2)
                    + (z2 * l_log) * dd2
                    + 4.0 * z2 * (e + ybar * l_log) * ee2)
        }
        _ => {
            // Rodden 1998, eq 34; the d1/d2/epsilon combination rebuilds the
            // arctangent contribution in the right quadrant.
            line.chord * e / (8.0 * PI * denom)
                * (1.0 / (((ybar + e).powi(2) + z2) * ((ybar - e).powi(2) + z2))
                    * (2.0 * (y2 + z2 + e2) * (e2 * a2 + c2)
                        + 4.0 * ybar * e2 * b2
                        + 2.0 * ybar
                            * (y4 - 2.0 * e2 * y2 + 2.0 * y2 * z2 + 3.0 * e4 + 2.0 * e2 * z2
                                + z4)
                            * dd2
                        + 2.0 * (3.0 * y6 - 7.0 * e2 * y4 + 5.0 * y4 * z2
                            + 6.0 * e4 * y2
                            + 6.0 * e2 * y2 * z2
                            - 3.0 * e2 * z4
                            - z6
                            + y2 * z4
                            - 2.0 * e4 * z2)
                            * ee2)
                    - (d1 * epsilon + e2 / z2 * (1.0 - d1 - d2 * PI / ratio)) / e2
                        * ((y2 + z2) * a2
                            + ybar * b2
                            + c2
                            + ybar * (y2 + 3.0 * z2) * dd2
                            + (y4 + 6.0 * y2 * z2 - 3.0 * z4) * ee2))
                + line.chord / (8.0 * PI)
                    * (dd2 / 2.0 * l_log + 2.0 * (e + ybar * l_log) * ee2)
        }
    };

    d1rs + d2rs
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::geometry::Panel;

    /// Flat rectangular wing, `nx` chordwise by `ny` spanwise boxes.
    fn rect_wing(nx: usize, ny: usize) -> AeroGrid {
        let chord = 1.0 / nx as Scalar;
        let width = 4.0 / ny as Scalar;
        let mut panels = Vec::new();
        for i in 0..nx {
            for j in 0..ny {
                let x0 = i as Scalar * chord;
                let y0 = -2.0 + j as Scalar * width;
                panels.push(Panel::from_corners(
                    (i * ny + j) as u32,
                    [
                        Vector3::new(x0, y0, 0.0),
                        Vector3::new(x0 + chord, y0, 0.0),
                        Vector3::new(x0 + chord, y0 + width, 0.0),
                        Vector3::new(x0, y0 + width, 0.0),
                    ],
                ));
            }
        }
        AeroGrid::new(panels).unwrap()
    }

    #[test]
    fn method_names_parse_and_reject() {
        assert_eq!("parabolic".parse::<Method>().unwrap(), Method::Parabolic);
        assert_eq!("Quartic".parse::<Method>().unwrap(), Method::Quartic);
        assert!(matches!(
            "cubic".parse::<Method>(),
            Err(DlmError::UnknownMethod(name)) if name == "cubic"
        ));
    }

    #[test]
    fn regimes_partition_all_samples() {
        // Raw predicates from the closed forms; exactly one must hold per
        // sample, and the classifier must pick that one.
        let samples = [
            (0.5, 0.0, 1.0),
            (0.5, 0.0005, 1.0),
            (0.5, 0.002, 1.0),
            (1.5, 0.01, 1.0),
            (0.0, 1.0, 1.0),
            (3.0, 0.5, 1.0),
            (1.0, 0.0011, 1.0), // denom ~ 0, ratio huge
            (10.0, 5.0, 0.2),
            (0.1, 0.1, 1.0), // denom < 0
        ];
        for &(ybar, zbar, e) in &samples {
            let planar = Scalar::abs(zbar) / e <= 0.001;
            let ratio = 2.0 * e * Scalar::abs(zbar) / (ybar * ybar + zbar * zbar - e * e);
            let close = ratio.abs() <= 0.3 && !planar;
            let distant = ratio.abs() > 0.3 && !planar;
            let hits = [planar, close, distant].iter().filter(|&&b| b).count();
            assert_eq!(hits, 1, "sample ({ybar}, {zbar}, {e}) not uniquely classified");
            let expected = if planar {
                Regime::Planar
            } else if close {
                Regime::CloseBy
            } else {
                Regime::Distant
            };
            assert_eq!(Regime::classify(ybar, zbar, e), expected);
        }
    }

    #[test]
    fn unsteady_matrix_vanishes_as_k_goes_to_zero() {
        let grid = rect_wing(2, 4);
        let ajj = build_unsteady_ajj(&grid, 0.3, 1.0e-8, Method::Parabolic);
        let max = ajj.iter().map(|c| c.norm()).fold(0.0, Scalar::max);
        assert!(max < 1.0e-6, "residual unsteady part {max}");
    }

    #[test]
    fn unsteady_matrix_is_finite_on_a_flat_wing() {
        let grid = rect_wing(2, 4);
        for method in [Method::Parabolic, Method::Quartic] {
            let ajj = build_unsteady_ajj(&grid, 0.0, 0.5, method);
            assert_eq!(ajj.nrows(), grid.n());
            assert!(ajj.iter().all(|c| c.re.is_finite() && c.im.is_finite()));
            // Self influence carries a genuine oscillatory increment.
            assert!(ajj[(0, 0)].norm() > 0.0);
        }
    }

    #[test]
    fn parabolic_and_quartic_agree_on_a_flat_wing() {
        // The two fits use different spanwise orders and different integral
        // schemes, so each entry is bounded relative to its own magnitude,
        // with a floor tied to the matrix scale for the near-zero entries.
        let grid = rect_wing(2, 4);
        let para = build_unsteady_ajj(&grid, 0.0, 0.2, Method::Parabolic);
        let quart = build_unsteady_ajj(&grid, 0.0, 0.2, Method::Quartic);
        let scale = para.iter().map(|c| c.norm()).fold(0.0, Scalar::max);
        for (p, q) in para.iter().zip(quart.iter()) {
            let tol = 0.1 * p.norm() + 0.02 * scale;
            assert_abs_diff_eq!(p.re, q.re, epsilon = tol);
            assert_abs_diff_eq!(p.im, q.im, epsilon = tol);
        }
    }

    #[test]
    fn dihedral_wing_exercises_the_nonplanar_regimes() {
        // A folded wing: one flat panel and one with 45 degrees dihedral,
        // plus an offset receiving row above the plane.
        let flat = Panel::from_corners(
            0,
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
        );
        let folded = Panel::from_corners(
            1,
            [
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(1.0, 2.0, 1.0),
                Vector3::new(0.0, 2.0, 1.0),
            ],
        );
        let high = Panel::from_corners(
            2,
            [
                Vector3::new(0.0, 0.0, 2.0),
                Vector3::new(1.0, 0.0, 2.0),
                Vector3::new(1.0, 1.0, 2.0),
                Vector3::new(0.0, 1.0, 2.0),
            ],
        );
        let grid = AeroGrid::new(vec![flat, folded, high]).unwrap();
        for method in [Method::Parabolic, Method::Quartic] {
            let ajj = build_unsteady_ajj(&grid, 0.2, 0.7, method);
            assert!(ajj.iter().all(|c| c.re.is_finite() && c.im.is_finite()));
        }
    }
}
