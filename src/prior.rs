//! Joint prior distributions over pulse-profile model parameters.
use crate::constants::{grav_radius, KM, TWO_PI};
use crate::distributions::TruncatedNormal;
use crate::parameters::{
    Bounds, DISTANCE, INCLINATION, MASS, NUM_DERIVED, NUM_PARAMS, PRIMARY_COLATITUDE,
    PRIMARY_PHASE, PRIMARY_RADIUS, RADIUS, SECONDARY_COLATITUDE, SECONDARY_PHASE,
    SECONDARY_RADIUS,
};
use crate::spacetime::Spacetime;
use crate::sphere::angular_separation;
use crate::{ErrorKind, Result};
use log::trace;
use rand::Rng;
use std::fmt;

/// Largest equatorial radius admitted by contemporary equation-of-state theory [m].
const MAX_RADIUS: f64 = 16.0 * KM;

/// The equatorial radius must lie outside the photon sphere (in Schwarzschild radii).
const MIN_R_R_S: f64 = 1.5;

/// Polar radius limit (in units of `1/R_r_s`) excluding deflections of at least `π` radians.
const MIN_POLAR_RADIUS: f64 = 1.76;

/// Coefficients of the oblate surface fit `1 + epsilon * (A + B * zeta)`.
const OBLATENESS_A: f64 = -0.788;
const OBLATENESS_B: f64 = 1.030;

/// This trait allows for defining a joint prior over a parameter vector.
pub trait Prior {
    /// Returns the bounds of the parameters.
    fn bounds(&self) -> &Bounds;

    /// Returns the logarithm of the (unnormalized) density at `params`.
    ///
    /// Points outside of the support yield `f64::NEG_INFINITY`.
    fn evaluate(&self, params: &[f64]) -> f64;

    /// Maps a point of the unit hypercube onto the parameter space.
    fn inverse_sample(&self, hypercube: &[f64]) -> Result<Vec<f64>>;

    /// Appends quantities derived from `params` for post-processing.
    ///
    /// The default implementation appends nothing.
    fn transform(&self, params: &[f64]) -> Result<Vec<f64>> {
        Ok(params.to_owned())
    }

    /// Equivalent to `self.transform(&self.inverse_sample(hypercube)?)`.
    fn inverse_sample_and_transform(&self, hypercube: &[f64]) -> Result<Vec<f64>> {
        let params = track!(self.inverse_sample(hypercube))?;
        track!(self.transform(&params))
    }

    /// Returns `true` for each parameter that is periodic.
    fn wrapped_params(&self) -> Vec<bool> {
        vec![false; self.bounds().len()]
    }

    /// Draws a parameter vector by inverse sampling a uniformly random point of the unit hypercube.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>>
    where
        Self: Sized,
    {
        let hypercube = (0..self.bounds().len())
            .map(|_| rng.gen::<f64>())
            .collect::<Vec<_>>();
        track!(self.inverse_sample(&hypercube))
    }
}

/// Reason why a parameter vector lies outside of the support of a prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The parameter at `index` violates its rectangular bound.
    OutOfBounds { index: usize },

    /// The equatorial radius exceeds 16 km.
    RadiusTooLarge,

    /// The equatorial radius does not lie outside of the photon sphere.
    InsidePhotonSphere,

    /// The oblate surface has no single maximum in `|z|` (or its shape factor is undefined).
    NonEllipticalSurface,

    /// The polar radius admits light deflections of `π` radians or more.
    PolarRadiusTooSmall,

    /// The primary hot region lies south of the secondary.
    UnorderedColatitudes,

    /// The hot regions overlap on the stellar surface.
    OverlappingHotRegions,
}
impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Rejection::OutOfBounds { index } => write!(f, "parameter #{} is out of bounds", index),
            Rejection::RadiusTooLarge => write!(f, "equatorial radius exceeds 16 km"),
            Rejection::InsidePhotonSphere => write!(f, "surface inside the photon sphere"),
            Rejection::NonEllipticalSurface => write!(f, "surface is not elliptical"),
            Rejection::PolarRadiusTooSmall => write!(f, "polar radius is too small"),
            Rejection::UnorderedColatitudes => write!(f, "hot region colatitudes are unordered"),
            Rejection::OverlappingHotRegions => write!(f, "hot regions overlap"),
        }
    }
}

/// Joint prior of the ST-U model: two single-temperature, simply-connected circular hot
/// regions with unshared parameters.
///
/// The density is uniform within an irregular support (see [`check`](#method.check)), except
/// for the distance whose marginal is a truncated normal.
#[derive(Debug, Clone)]
pub struct TwoHotRegionPrior<S> {
    bounds: Bounds,
    spacetime: S,
    distance: TruncatedNormal,
}
impl<S: Spacetime> TwoHotRegionPrior<S> {
    /// Makes a new `TwoHotRegionPrior` instance.
    ///
    /// # Errors
    ///
    /// If `bounds` does not have an entry for each of the twelve parameters or if
    /// `spacetime` consumes more than the astrophysical (leading) parameters,
    /// an `ErrorKind::InvalidInput` error is returned.
    pub fn new(bounds: Bounds, spacetime: S) -> Result<Self> {
        track_assert_eq!(bounds.len(), NUM_PARAMS, ErrorKind::InvalidInput);
        track_assert!(spacetime.num_params() <= PRIMARY_COLATITUDE, ErrorKind::InvalidInput;
                      spacetime.num_params());
        let distance = track!(TruncatedNormal::new(-2.0, 7.0, 0.3, 0.1))?;
        Ok(Self {
            bounds,
            spacetime,
            distance,
        })
    }

    /// Returns a reference to the spacetime model.
    pub fn spacetime(&self) -> &S {
        &self.spacetime
    }

    /// Returns the marginal distribution of the distance.
    pub fn distance(&self) -> &TruncatedNormal {
        &self.distance
    }

    /// Checks whether `params` lies inside of the support of this prior.
    ///
    /// The cuts are applied in a fixed order and the first failing one is reported.
    ///
    /// # Panics
    ///
    /// Panics if `params` does not have exactly twelve entries.
    pub fn check(&self, params: &[f64]) -> std::result::Result<(), Rejection> {
        assert_eq!(params.len(), NUM_PARAMS, "params={:?}", params);

        if let Some(index) = self.bounds.first_violation(params) {
            return Err(Rejection::OutOfBounds { index });
        }

        let geometry = self
            .spacetime
            .geometry(&params[..self.spacetime.num_params()]);

        if !(geometry.radius <= MAX_RADIUS) {
            return Err(Rejection::RadiusTooLarge);
        }

        let r_r_s = geometry.r_r_s();
        if !(MIN_R_R_S < r_r_s) {
            return Err(Rejection::InsidePhotonSphere);
        }

        let oblateness = geometry.epsilon() * (OBLATENESS_A + OBLATENESS_B * geometry.zeta());

        // NaN (negative radicand) and infinity are both outside the support.
        let mu = (-1.0 / (3.0 * oblateness)).sqrt();
        if !(mu.is_finite() && mu >= 1.0) {
            return Err(Rejection::NonEllipticalSurface);
        }

        let polar_radius = 1.0 + oblateness;
        if !(polar_radius >= MIN_POLAR_RADIUS / r_r_s) {
            return Err(Rejection::PolarRadiusTooSmall);
        }

        if params[PRIMARY_COLATITUDE] > params[SECONDARY_COLATITUDE] {
            return Err(Rejection::UnorderedColatitudes);
        }

        let phi = (params[PRIMARY_PHASE] - 0.5 - params[SECONDARY_PHASE]) * TWO_PI;
        let separation = angular_separation(
            params[SECONDARY_COLATITUDE],
            phi,
            params[PRIMARY_COLATITUDE],
        );
        if separation < params[PRIMARY_RADIUS] + params[SECONDARY_RADIUS] {
            return Err(Rejection::OverlappingHotRegions);
        }

        Ok(())
    }
}
impl<S: Spacetime> Prior for TwoHotRegionPrior<S> {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn evaluate(&self, params: &[f64]) -> f64 {
        match self.check(params) {
            Ok(()) => 0.0,
            Err(reason) => {
                trace!("Rejected {:?}: {}", params, reason);
                f64::NEG_INFINITY
            }
        }
    }

    fn inverse_sample(&self, hypercube: &[f64]) -> Result<Vec<f64>> {
        let mut params = track!(self.bounds.inverse_sample(hypercube))?;

        params[DISTANCE] = track!(self.distance.inverse_cdf(hypercube[DISTANCE]))?;

        for &i in &[PRIMARY_PHASE, SECONDARY_PHASE] {
            if params[i] > 0.5 {
                params[i] -= 1.0;
            }
        }
        Ok(params)
    }

    fn transform(&self, params: &[f64]) -> Result<Vec<f64>> {
        track_assert_eq!(params.len(), NUM_PARAMS, ErrorKind::InvalidInput);

        let mut extended = Vec::with_capacity(NUM_PARAMS + NUM_DERIVED);
        extended.extend_from_slice(params);

        // compactness ratio M/R_eq
        extended.push(grav_radius(params[MASS]) / params[RADIUS]);

        let primary = if params[PRIMARY_PHASE] < 0.0 {
            params[PRIMARY_PHASE] + 1.0
        } else {
            params[PRIMARY_PHASE]
        };
        let secondary = 0.5 + params[SECONDARY_PHASE];
        if secondary >= primary {
            extended.push(secondary - primary);
        } else {
            extended.push(1.0 - primary + secondary);
        }

        extended.push(params[INCLINATION] - params[PRIMARY_COLATITUDE]);
        extended.push(params[INCLINATION] + params[PRIMARY_COLATITUDE]);
        extended.push(params[INCLINATION] - params[SECONDARY_COLATITUDE]);
        Ok(extended)
    }

    fn wrapped_params(&self) -> Vec<bool> {
        let mut wrapped = vec![false; NUM_PARAMS];
        wrapped[PRIMARY_PHASE] = true;
        wrapped[SECONDARY_PHASE] = true;
        wrapped
    }
}
