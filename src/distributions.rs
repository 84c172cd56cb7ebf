//! Univariate distributions used by the prior.
use crate::{Error, ErrorKind, Result};
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

/// Normal distribution truncated to `[loc + a * scale, loc + b * scale]`.
///
/// The truncation points `a` and `b` are expressed in standard deviations of the
/// untruncated normal, not in the units of the variate.
#[derive(Debug, Clone, PartialEq)]
pub struct TruncatedNormal {
    loc: f64,
    scale: f64,
    a: f64,
    b: f64,
    cdf_a: f64,
    cdf_b: f64,
}
impl TruncatedNormal {
    /// Makes a new `TruncatedNormal` instance.
    ///
    /// # Errors
    ///
    /// If one of the following conditions is satisfied, this function returns an `ErrorKind::InvalidInput` error:
    ///
    /// - `loc` or `scale` is not a finite number
    /// - `scale <= 0`
    /// - `a` or `b` is NaN
    /// - `a >= b`
    pub fn new(a: f64, b: f64, loc: f64, scale: f64) -> Result<Self> {
        track_assert!(loc.is_finite(), ErrorKind::InvalidInput; loc);
        track_assert!(scale.is_finite() && scale > 0.0, ErrorKind::InvalidInput; scale);
        track_assert!(!a.is_nan() && !b.is_nan(), ErrorKind::InvalidInput; a, b);
        track_assert!(a < b, ErrorKind::InvalidInput; a, b);

        let standard = track!(standard_normal())?;
        let cdf_a = standard.cdf(a);
        let cdf_b = standard.cdf(b);
        track_assert!(cdf_a < cdf_b, ErrorKind::InvalidInput; a, b, cdf_a, cdf_b);
        Ok(Self {
            loc,
            scale,
            a,
            b,
            cdf_a,
            cdf_b,
        })
    }

    /// Returns the lower end of the support.
    pub fn low(&self) -> f64 {
        self.loc + self.a * self.scale
    }

    /// Returns the upper end of the support.
    pub fn high(&self) -> f64 {
        self.loc + self.b * self.scale
    }

    /// Percent point function (inverse of the CDF).
    ///
    /// # Errors
    ///
    /// If `q` lies outside of `[0, 1]`, an `ErrorKind::InvalidInput` error is returned.
    pub fn inverse_cdf(&self, q: f64) -> Result<f64> {
        track_assert!(0.0 <= q && q <= 1.0, ErrorKind::InvalidInput; q);
        if q == 0.0 {
            return Ok(self.low());
        }
        if q == 1.0 {
            return Ok(self.high());
        }

        let standard = track!(standard_normal())?;
        let z = standard.inverse_cdf(self.cdf_a + q * (self.cdf_b - self.cdf_a));
        let z = z.max(self.a).min(self.b);
        Ok(self.loc + self.scale * z)
    }
}
impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let q = rng.gen::<f64>();
        self.inverse_cdf(q).unwrap_or_else(|_| unreachable!())
    }
}

fn standard_normal() -> Result<Normal> {
    track!(Normal::new(0.0, 1.0).map_err(Error::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use trackable::result::TestResult;

    #[test]
    fn distance_median_works() -> TestResult {
        let d = track!(TruncatedNormal::new(-2.0, 7.0, 0.3, 0.1))?;
        let median = track!(d.inverse_cdf(0.5))?;
        assert!((median - 0.302_851_7).abs() < 1e-5, "median={}", median);
        Ok(())
    }

    #[test]
    fn support_ends_work() -> TestResult {
        let d = track!(TruncatedNormal::new(-2.0, 7.0, 0.3, 0.1))?;
        assert!((track!(d.inverse_cdf(0.0))? - 0.1).abs() < 1e-12);
        assert!((track!(d.inverse_cdf(1.0))? - 1.0).abs() < 1e-12);
        assert!(d.inverse_cdf(-0.1).is_err());
        assert!(d.inverse_cdf(1.1).is_err());
        Ok(())
    }

    #[test]
    fn inverse_cdf_is_monotone() -> TestResult {
        let d = track!(TruncatedNormal::new(-2.0, 7.0, 0.3, 0.1))?;
        let mut prev = track!(d.inverse_cdf(0.0))?;
        for i in 1..=100 {
            let x = track!(d.inverse_cdf(f64::from(i) / 100.0))?;
            assert!(prev <= x, "prev={}, x={}", prev, x);
            prev = x;
        }
        Ok(())
    }

    #[test]
    fn samples_lie_in_support() -> TestResult {
        let d = track!(TruncatedNormal::new(-2.0, 7.0, 0.3, 0.1))?;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = d.sample(&mut rng);
            assert!(d.low() <= x && x <= d.high(), "x={}", x);
        }
        Ok(())
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(TruncatedNormal::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(TruncatedNormal::new(-1.0, 1.0, 0.0, 0.0).is_err());
        assert!(TruncatedNormal::new(-1.0, 1.0, f64::NAN, 1.0).is_err());
        assert!(TruncatedNormal::new(40.0, 50.0, 0.0, 1.0).is_err());
    }
}
