//! Mach and reduced-frequency sweep helpers.

use crate::math::Scalar;

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Generates `n` logarithmically spaced samples between `start` and `stop`.
/// Requires start > 0 and stop > 0.
#[must_use]
pub fn logspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    assert!(start > 0.0 && stop > 0.0);
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let log_start = start.log10();
            let log_stop = stop.log10();
            let step = (log_stop - log_start) / (n as Scalar - 1.0);
            (0..n)
                .map(|i| 10f64.powf(log_start + step * i as Scalar))
                .collect()
        }
    }
}

/// Reduced frequency k = omega / U for one angular frequency.
#[must_use]
pub fn reduced_frequency(omega: Scalar, airspeed: Scalar) -> Scalar {
    omega / airspeed
}

/// Maps a sweep of angular frequencies to reduced frequencies at the given
/// true airspeed.
#[must_use]
pub fn reduced_frequencies(
    omegas: impl IntoIterator<Item = Scalar>,
    airspeed: Scalar,
) -> Vec<Scalar> {
    omegas
        .into_iter()
        .map(|w| reduced_frequency(w, airspeed))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn linspace_basic() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn logspace_endpoints() {
        let v = logspace(0.01, 1.0, 3);
        assert_relative_eq!(v[0], 0.01, epsilon = 1.0e-12);
        assert_relative_eq!(v[1], 0.1, epsilon = 1.0e-12);
        assert_relative_eq!(v[2], 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn reduced_frequency_scales_with_airspeed() {
        let ks = reduced_frequencies([10.0, 20.0], 50.0);
        assert_eq!(ks, vec![0.2, 0.4]);
    }
}
