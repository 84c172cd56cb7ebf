//! Spherical geometry on the stellar surface.

/// Returns the great-circle angle between two points on a unit sphere.
///
/// The points are given by their colatitudes and the difference of their azimuths.
pub fn angular_separation(colatitude_a: f64, azimuth: f64, colatitude_b: f64) -> f64 {
    let cos_psi = colatitude_a.cos() * colatitude_b.cos()
        + colatitude_a.sin() * colatitude_b.sin() * azimuth.cos();

    // Rounding may push the cosine slightly out of range.
    cos_psi.max(-1.0).min(1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angular_separation_works() {
        assert!(angular_separation(1.0, 0.0, 1.0) < 1e-7);
        assert!((angular_separation(0.0, 0.3, PI) - PI).abs() < 1e-12);
        assert!((angular_separation(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((angular_separation(1.0, 0.0, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn angular_separation_is_symmetric() {
        let a = angular_separation(2.1, -3.3, 1.0);
        let b = angular_separation(1.0, 3.3, 2.1);
        assert!((a - b).abs() < 1e-12);
        assert!(0.0 <= a && a <= PI);
    }
}
