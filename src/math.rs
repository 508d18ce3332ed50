//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::{DMatrix, Vector3};

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors.
pub type R3 = Vector3<Scalar>;
/// Primary complex scalar type used for oscillatory quantities.
pub type CScalar = num_complex::Complex<Scalar>;
/// Dense complex matrix, the shape of every influence coefficient matrix.
pub type CMatrix = DMatrix<CScalar>;

/// Returns the complex exponential `e^(-j * theta)` for real `theta`.
///
/// The DLM phase factors all carry a negative exponent, so the sign is baked
/// in here.
#[must_use]
pub fn cexp_neg(theta: Scalar) -> CScalar {
    CScalar::from_polar(1.0, -theta)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cexp_neg_lies_on_unit_circle() {
        let z = cexp_neg(0.73);
        assert_relative_eq!(z.norm(), 1.0, epsilon = 1.0e-14);
        assert_relative_eq!(z.arg(), -0.73, epsilon = 1.0e-14);
    }

    #[test]
    fn cexp_neg_of_zero_is_one() {
        assert_eq!(cexp_neg(0.0), CScalar::new(1.0, 0.0));
    }
}
