//! Ambient spacetime of a rotating neutron star.
use crate::constants::{C_SQ, G, KM, KPC, SOLAR_MASS, TWO_PI};
use crate::parameters::{DISTANCE, INCLINATION, MASS, RADIUS};
use crate::{ErrorKind, Result};

/// This trait allows for deriving spacetime quantities from the leading parameters of a vector.
pub trait Spacetime {
    /// Returns the number of leading parameters consumed by `geometry`.
    fn num_params(&self) -> usize;

    /// Derives the spacetime quantities for the given leading parameters.
    ///
    /// `params` has exactly `self.num_params()` entries.
    fn geometry(&self, params: &[f64]) -> SpacetimeGeometry;
}
impl<'a, T: Spacetime + ?Sized> Spacetime for &'a T {
    fn num_params(&self) -> usize {
        (**self).num_params()
    }

    fn geometry(&self, params: &[f64]) -> SpacetimeGeometry {
        (**self).geometry(params)
    }
}

/// Quantities derived from a spacetime for a single candidate vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacetimeGeometry {
    /// Coordinate equatorial radius [m].
    pub radius: f64,

    /// Gravitational mass [kg].
    pub mass: f64,

    /// Earth distance [m].
    pub distance: f64,

    /// Inclination of Earth to the rotational axis [rad].
    pub inclination: f64,

    /// Coordinate angular rotation frequency [rad/s].
    pub omega: f64,
}
impl SpacetimeGeometry {
    /// Gravitational radius `GM/c^2` [m].
    pub fn r_g(&self) -> f64 {
        G * self.mass / C_SQ
    }

    /// Schwarzschild radius [m].
    pub fn r_s(&self) -> f64 {
        2.0 * self.r_g()
    }

    /// Ratio of the equatorial radius to the Schwarzschild radius.
    pub fn r_r_s(&self) -> f64 {
        self.radius / self.r_s()
    }

    /// Dimensionless spin parameter `Omega^2 R^3 / (GM)`.
    pub fn epsilon(&self) -> f64 {
        self.omega * self.omega * self.radius.powi(3) / (G * self.mass)
    }

    /// Compactness `GM / (R c^2)`.
    pub fn zeta(&self) -> f64 {
        self.r_g() / self.radius
    }
}

/// Spacetime of a star rotating at a fixed coordinate frequency.
///
/// Consumes `(distance [kpc], mass [solar masses], equatorial radius [km], inclination [rad])`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingSpacetime {
    frequency: f64,
}
impl RotatingSpacetime {
    /// Makes a new `RotatingSpacetime` instance spinning at `frequency` Hz.
    ///
    /// # Errors
    ///
    /// If `frequency` is not a finite positive number, an `ErrorKind::InvalidInput` error is returned.
    pub fn new(frequency: f64) -> Result<Self> {
        track_assert!(frequency.is_finite(), ErrorKind::InvalidInput; frequency);
        track_assert!(frequency > 0.0, ErrorKind::InvalidInput; frequency);
        Ok(Self { frequency })
    }

    /// Returns the coordinate rotation frequency [Hz].
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}
impl Spacetime for RotatingSpacetime {
    fn num_params(&self) -> usize {
        4
    }

    fn geometry(&self, params: &[f64]) -> SpacetimeGeometry {
        debug_assert_eq!(params.len(), self.num_params());
        SpacetimeGeometry {
            radius: params[RADIUS] * KM,
            mass: params[MASS] * SOLAR_MASS,
            distance: params[DISTANCE] * KPC,
            inclination: params[INCLINATION],
            omega: TWO_PI * self.frequency,
        }
    }
}
