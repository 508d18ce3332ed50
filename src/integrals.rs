//! Closed-form approximations of the kernel integrals I1 and I2.
//!
//! The unsteady kernel contains two integrals over the doublet wake that have
//! no closed form. Rodden 1971 (appendix A) replaces the troublesome factor
//! `u / (1 + u^2)^0.5` by an exponential series, which makes I1 and I2
//! integrable term by term. Three coefficient sets are carried: Laschka's
//! 11-term series (the default, paired with the parabolic assembly),
//! Desmarais' 12-term series with octave-spaced exponents (paired with the
//! quartic assembly), and the legacy 3-term Watkins approximation retained
//! only for regression comparison.

use std::fmt;
use std::str::FromStr;

use crate::errors::DlmError;
use crate::math::{cexp_neg, CScalar, Scalar};

/// Laschka's exponential-series coefficients; values per Blair 1992, p. 89.
const LASCHKA_A: [Scalar; 11] = [
    0.241_861_98,
    -2.791_802_7,
    24.991_079,
    -111.591_96,
    271.435_49,
    -305.752_88,
    -41.183_630,
    545.985_37,
    -644.781_55,
    328.727_55,
    -64.279_511,
];
/// Laschka's decay constant.
const LASCHKA_C: Scalar = 0.372;

/// Desmarais' D12.1 coefficients (Rodden 1998).
const DESMARAIS_A: [Scalar; 12] = [
    0.000_319_759_140,
    -0.000_055_461_471,
    0.002_726_074_362,
    0.005_749_551_566,
    0.031_455_895_072,
    0.106_031_126_212,
    0.406_838_011_567,
    0.798_112_357_155,
    -0.417_749_229_098,
    0.077_480_713_894,
    -0.012_677_284_771,
    0.001_787_032_960,
];
/// Desmarais' base decay constant; the n-th term decays with `2^n * b`.
const DESMARAIS_B: Scalar = 0.009_054_814_793;

/// Named approximation scheme for the kernel integrals.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApproximationScheme {
    /// 11-term exponential series (Laschka); the default.
    #[default]
    Laschka,
    /// 12-term exponential series with extra precision (Desmarais).
    Desmarais,
    /// Legacy 3-term exponential/sinusoidal approximation (Watkins 1968);
    /// not preferred.
    Watkins,
}

impl fmt::Display for ApproximationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laschka => write!(f, "Laschka"),
            Self::Desmarais => write!(f, "Desmarais"),
            Self::Watkins => write!(f, "Watkins"),
        }
    }
}

impl FromStr for ApproximationScheme {
    type Err = DlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "laschka" => Ok(Self::Laschka),
            "desmarais" => Ok(Self::Desmarais),
            "watkins" => Ok(Self::Watkins),
            _ => Err(DlmError::UnknownScheme(s.to_string())),
        }
    }
}

/// Approximates (I1, I2) for a real auxiliary variable `u1` and the scaled
/// reduced frequency `k1 = k * r1`.
///
/// Negative `u1` is handled by the exact reflection identity
/// `I(-u1) = 2 Re I(0) - Re I(u1) + j Im I(u1)` (Rodden 1971, eq A.5/A.9),
/// applied uniformly for every scheme.
#[must_use]
pub fn integrals12(u1: Scalar, k1: Scalar, scheme: ApproximationScheme) -> (CScalar, CScalar) {
    if u1 >= 0.0 {
        approximate(u1, k1, scheme)
    } else {
        let (i1_0, i2_0) = approximate(0.0, k1, scheme);
        let (i1_n, i2_n) = approximate(-u1, k1, scheme);
        (
            CScalar::new(2.0 * i1_0.re - i1_n.re, i1_n.im),
            CScalar::new(2.0 * i2_0.re - i2_n.re, i2_n.im),
        )
    }
}

/// Dispatches to the scheme's coefficient set; `u1` must be non-negative.
fn approximate(u1: Scalar, k1: Scalar, scheme: ApproximationScheme) -> (CScalar, CScalar) {
    match scheme {
        ApproximationScheme::Laschka => {
            exponential_series(u1, k1, LASCHKA_A.iter().zip(1..).map(|(&a, n)| (a, n as Scalar * LASCHKA_C)))
        }
        ApproximationScheme::Desmarais => exponential_series(
            u1,
            k1,
            DESMARAIS_A
                .iter()
                .zip(1..)
                .map(|(&a, n)| (a, Scalar::powi(2.0, n) * DESMARAIS_B)),
        ),
        ApproximationScheme::Watkins => watkins(u1, k1),
    }
}

/// Shared evaluation routine for the exponential-series schemes.
///
/// Each term contributes `a * exp(-p * u1)` to the series replacing
/// `u / (1 + u^2)^0.5`; the resulting partial integrals I0 and J0 are
/// Rodden 1971, eqs A.4 and A.8, and (I1, I2) follow from eqs A.1 and A.6
/// (I2 divided by 3 for compatibility with the kernel combination).
fn exponential_series(
    u1: Scalar,
    k1: Scalar,
    terms: impl Iterator<Item = (Scalar, Scalar)>,
) -> (CScalar, CScalar) {
    let ejku = cexp_neg(k1 * u1);
    let mut i0 = CScalar::new(0.0, 0.0);
    let mut j0 = CScalar::new(0.0, 0.0);
    for (a, p) in terms {
        let pk = p * p + k1 * k1;
        let decay = a * (-p * u1).exp();
        i0 += decay / pk * CScalar::new(p, -k1);
        j0 += decay / (pk * pk)
            * CScalar::new(p * p - k1 * k1 + p * u1 * pk, -k1 * (2.0 * p + u1 * pk));
    }
    let root = (1.0 + u1 * u1).sqrt();
    let jk1 = CScalar::new(0.0, k1);
    let i1 = (CScalar::new(1.0 - u1 / root, 0.0) - jk1 * i0) * ejku;
    let i2 = ((CScalar::new(2.0, k1 * u1)) * (1.0 - u1 / root) - u1 / (root * root * root)
        - jk1 * i0
        + k1 * k1 * j0)
        * ejku
        / 3.0;
    (i1, i2)
}

/// Watkins' original approximation (Rodden 1968, p. 3), transcribed from the
/// earlier Matlab implementation and kept for comparison only.
fn watkins(u1: Scalar, k1: Scalar) -> (CScalar, CScalar) {
    const A1: Scalar = 0.101;
    const A2: Scalar = 0.899;
    const A3: Scalar = 0.094_809_33;
    const B1: Scalar = 0.329;
    const B2: Scalar = 1.4067;
    const B3: Scalar = 2.90;
    let pi = std::f64::consts::PI;
    let jk1 = CScalar::new(0.0, k1);
    let ejku = cexp_neg(k1 * u1);
    let root = (1.0 + u1 * u1).sqrt();

    let i1_temp = A1 * ((CScalar::new(-B1, 0.0) - jk1) * u1).exp() / (B1 + jk1)
        + A2 * ((CScalar::new(-B2, 0.0) - jk1) * u1).exp() / (B2 + jk1);
    let i2_temp = (A3 / ((B3 + jk1).powi(2) + pi * pi))
        * ((B3 + jk1) * (pi * u1).sin() + pi * (pi * u1).cos())
        * ((CScalar::new(-B3, 0.0) - jk1) * u1).exp();
    let i1 = (1.0 - u1 / root) * ejku - jk1 * (i1_temp + i2_temp);

    let i2_1 = i1;
    let i2_2_1 = A1 * (-(B1 + jk1) * u1).exp() / (B1 + jk1).powi(2)
        + A2 * (-(B2 + jk1) * u1).exp() / (B2 + jk1).powi(2)
        + (A3 * (-(B3 + jk1) * u1).exp() / ((B3 + jk1).powi(2) + pi * pi).powi(2))
            * (pi * (pi * (pi * u1).sin() - (B3 + jk1) * (pi * u1).cos())
                - (B3 + jk1) * (pi * (pi * u1).cos() + (B3 + jk1) * (pi * u1).sin()));
    let i2_2 = (ejku * u1.powi(3) / (root * root * root) - i2_1 - ejku * u1 / root) / 3.0
        - k1 * k1 * i2_2_1 / 3.0;
    (i1, i2_1 + i2_2)
}
