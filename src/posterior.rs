//! Combination of a prior with an external likelihood.
use crate::prior::Prior;
use crate::Result;
use log::debug;

/// Log-likelihood returned for points outside of the prior support by default.
pub const DEFAULT_LLZERO: f64 = -1.0e90;

/// This trait allows for evaluating the logarithm of a likelihood function.
///
/// Typical implementations forward to a background-marginalized likelihood computed
/// outside of this crate.
pub trait Likelihood {
    /// Returns the log-likelihood of `params`.
    fn log_likelihood(&mut self, params: &[f64]) -> Result<f64>;
}
impl<F> Likelihood for F
where
    F: FnMut(&[f64]) -> Result<f64>,
{
    fn log_likelihood(&mut self, params: &[f64]) -> Result<f64> {
        self(params)
    }
}

/// Unnormalized posterior.
///
/// The likelihood is only evaluated inside of the support of the prior.
#[derive(Debug)]
pub struct Posterior<P, L> {
    prior: P,
    likelihood: L,
    llzero: f64,
}
impl<P: Prior, L: Likelihood> Posterior<P, L> {
    /// Makes a new `Posterior` instance.
    pub fn new(prior: P, likelihood: L) -> Self {
        Self {
            prior,
            likelihood,
            llzero: DEFAULT_LLZERO,
        }
    }

    /// Sets the value returned for points outside of the prior support.
    pub fn llzero(mut self, llzero: f64) -> Self {
        self.llzero = llzero;
        self
    }

    /// Returns a reference to the prior.
    pub fn prior(&self) -> &P {
        &self.prior
    }

    /// Returns a mutable reference to the likelihood.
    pub fn likelihood_mut(&mut self) -> &mut L {
        &mut self.likelihood
    }

    /// Returns the logarithm of the unnormalized posterior density at `params`.
    pub fn log_posterior(&mut self, params: &[f64]) -> Result<f64> {
        let log_prior = self.prior.evaluate(params);
        if !log_prior.is_finite() {
            debug!("Outside of the prior support: {:?}", params);
            return Ok(self.llzero);
        }
        let log_likelihood = track!(self.likelihood.log_likelihood(params))?;
        Ok(log_prior + log_likelihood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{Bounds, NUM_PARAMS, RADIUS};
    use crate::prior::TwoHotRegionPrior;
    use crate::spacetime::RotatingSpacetime;
    use crate::ErrorKind;
    use std::f64::consts::PI;
    use trackable::error::ErrorKindExt;
    use trackable::result::TestResult;

    fn params() -> Vec<f64> {
        vec![
            0.2,
            1.4,
            12.5,
            1.25,
            1.0,
            0.075,
            6.2,
            PI - 1.0,
            0.2,
            6.0,
            0.0,
            0.025,
        ]
    }

    fn prior() -> Result<TwoHotRegionPrior<RotatingSpacetime>> {
        let bounds = track!(Bounds::two_hot_regions())?;
        let spacetime = track!(RotatingSpacetime::new(300.0))?;
        track!(TwoHotRegionPrior::new(bounds, spacetime))
    }

    #[test]
    fn posterior_works() -> TestResult {
        let mut calls = 0;
        let likelihood = |p: &[f64]| -> Result<f64> {
            calls += 1;
            Ok(-0.5 * p[RADIUS])
        };
        let mut posterior = Posterior::new(track!(prior())?, likelihood);

        let lp = track!(posterior.log_posterior(&params()))?;
        assert_eq!(lp, -6.25);

        let mut p = params();
        p[RADIUS] = 20.0;
        let lp = track!(posterior.log_posterior(&p))?;
        assert_eq!(lp, DEFAULT_LLZERO);

        drop(posterior);
        assert_eq!(calls, 1);
        Ok(())
    }

    #[test]
    fn llzero_works() -> TestResult {
        let likelihood = |_: &[f64]| -> Result<f64> { Ok(0.0) };
        let mut posterior = Posterior::new(track!(prior())?, likelihood).llzero(f64::NEG_INFINITY);
        let lp = track!(posterior.log_posterior(&[0.0; NUM_PARAMS]))?;
        assert_eq!(lp, f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn likelihood_error_is_propagated() -> TestResult {
        let likelihood = |_: &[f64]| -> Result<f64> { Err(ErrorKind::Other.error().into()) };
        let mut posterior = Posterior::new(track!(prior())?, likelihood);
        assert!(posterior.log_posterior(&params()).is_err());
        Ok(())
    }
}
