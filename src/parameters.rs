//! Parameter vector layout and rectangular bounds.
//!
//! The ST-U parameter vector is positional:
//!
//! | index | parameter |
//! |-------|-----------|
//! | 0 | distance (kpc) |
//! | 1 | gravitational mass (solar masses) |
//! | 2 | coordinate equatorial radius (km) |
//! | 3 | inclination of Earth to the rotational axis (radians) |
//! | 4 | primary hot region centre colatitude (radians) |
//! | 5 | primary hot region angular radius (radians) |
//! | 6 | primary hot region log10 comoving temperature (K) |
//! | 7 | secondary hot region centre colatitude (radians) |
//! | 8 | secondary hot region angular radius (radians) |
//! | 9 | secondary hot region log10 comoving temperature (K) |
//! | 10 | primary hot region phase shift (cycles) |
//! | 11 | secondary hot region phase shift (cycles) |
use crate::constants::grav_radius;
use crate::{ErrorKind, Result};
use ordered_float::NotNan;
use std::f64::consts::{FRAC_PI_2, PI};
use std::slice;

pub const DISTANCE: usize = 0;
pub const MASS: usize = 1;
pub const RADIUS: usize = 2;
pub const INCLINATION: usize = 3;
pub const PRIMARY_COLATITUDE: usize = 4;
pub const PRIMARY_RADIUS: usize = 5;
pub const PRIMARY_TEMPERATURE: usize = 6;
pub const SECONDARY_COLATITUDE: usize = 7;
pub const SECONDARY_RADIUS: usize = 8;
pub const SECONDARY_TEMPERATURE: usize = 9;
pub const PRIMARY_PHASE: usize = 10;
pub const SECONDARY_PHASE: usize = 11;

/// Number of sampled parameters.
pub const NUM_PARAMS: usize = 12;

/// Number of quantities appended by a post-processing transform.
pub const NUM_DERIVED: usize = 5;

/// Lower and upper bound of a single parameter.
///
/// Either side may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    low: Option<NotNan<f64>>,
    high: Option<NotNan<f64>>,
}
impl Bound {
    /// Makes a new `Bound` instance.
    ///
    /// # Errors
    ///
    /// If one of the following conditions is satisfied, this function returns an `ErrorKind::InvalidInput` error:
    ///
    /// - `low` or `high` is NaN
    /// - both sides are set and `low > high`
    pub fn new(low: Option<f64>, high: Option<f64>) -> Result<Self> {
        let low = track!(not_nan(low); low, high)?;
        let high = track!(not_nan(high); low, high)?;
        if let (Some(l), Some(h)) = (low, high) {
            track_assert!(l <= h, ErrorKind::InvalidInput; l, h);
        }
        Ok(Self { low, high })
    }

    /// Makes a `Bound` with both sides set.
    pub fn closed(low: f64, high: f64) -> Result<Self> {
        track!(Self::new(Some(low), Some(high)))
    }

    /// Makes a `Bound` without any side set.
    pub const fn unbounded() -> Self {
        Self {
            low: None,
            high: None,
        }
    }

    /// Returns the lower bound.
    pub fn low(&self) -> Option<f64> {
        self.low.map(NotNan::into_inner)
    }

    /// Returns the upper bound.
    pub fn high(&self) -> Option<f64> {
        self.high.map(NotNan::into_inner)
    }

    /// Returns `true` if both sides are set.
    pub fn is_closed(&self) -> bool {
        self.low.is_some() && self.high.is_some()
    }

    /// Returns `false` only if both sides are set and `x` lies outside of `[low, high]`.
    ///
    /// A half-open bound never constrains `x`.
    pub fn contains(&self, x: f64) -> bool {
        match (self.low(), self.high()) {
            (Some(low), Some(high)) => low <= x && x <= high,
            _ => true,
        }
    }

    /// Maps a unit hypercube coordinate onto `[low, high]` (uniform inverse CDF).
    ///
    /// # Errors
    ///
    /// Returns an `ErrorKind::InvalidInput` error if either side is unset or if `u` lies outside of `[0, 1]`.
    pub fn inverse_cdf(&self, u: f64) -> Result<f64> {
        track_assert!(0.0 <= u && u <= 1.0, ErrorKind::InvalidInput; u);
        let low = track_assert_some!(self.low(), ErrorKind::InvalidInput);
        let high = track_assert_some!(self.high(), ErrorKind::InvalidInput);
        Ok(low + (high - low) * u)
    }
}

fn not_nan(x: Option<f64>) -> Result<Option<NotNan<f64>>> {
    match x {
        None => Ok(None),
        Some(x) => {
            track_assert!(!x.is_nan(), ErrorKind::InvalidInput);
            Ok(Some(NotNan::new(x).unwrap_or_else(|_| unreachable!())))
        }
    }
}

/// Ordered bounds, one per parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds(Vec<Bound>);
impl Bounds {
    /// Makes a new `Bounds` instance.
    pub fn new(bounds: Vec<Bound>) -> Self {
        Self(bounds)
    }

    /// Makes `n` unbounded entries.
    pub fn unbounded(n: usize) -> Self {
        Self(vec![Bound::unbounded(); n])
    }

    /// Bounds of the ST-U model used by the NICER tutorial run.
    pub fn two_hot_regions() -> Result<Self> {
        let colatitude = track!(Bound::closed(0.001, PI - 0.001))?;
        let angular_radius = track!(Bound::closed(0.001, FRAC_PI_2 - 0.001))?;
        let temperature = track!(Bound::closed(5.5, 6.5))?;
        let phase = track!(Bound::closed(-0.25, 0.75))?;
        Ok(Self(vec![
            track!(Bound::closed(0.1, 1.0))?,
            track!(Bound::closed(1.0, 3.0))?,
            track!(Bound::closed(3.0 * grav_radius(1.0), 16.0))?,
            track!(Bound::closed(0.001, FRAC_PI_2))?,
            colatitude,
            angular_radius,
            temperature,
            colatitude,
            angular_radius,
            temperature,
            phase,
            phase,
        ]))
    }

    /// Returns the number of bounded parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bound of the `i`-th parameter.
    pub fn get(&self, i: usize) -> Option<&Bound> {
        self.0.get(i)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> slice::Iter<Bound> {
        self.0.iter()
    }

    /// Returns the index of the first parameter of `params` that violates its bound.
    pub fn first_violation(&self, params: &[f64]) -> Option<usize> {
        self.0
            .iter()
            .zip(params.iter())
            .position(|(b, &x)| !b.contains(x))
    }

    /// Maps a unit hypercube vector onto the bounds, one uniform inverse CDF per parameter.
    pub fn inverse_sample(&self, hypercube: &[f64]) -> Result<Vec<f64>> {
        track_assert_eq!(hypercube.len(), self.len(), ErrorKind::InvalidInput);
        self.0
            .iter()
            .zip(hypercube.iter())
            .enumerate()
            .map(|(i, (b, &u))| track!(b.inverse_cdf(u); i))
            .collect()
    }
}
impl From<Vec<Bound>> for Bounds {
    fn from(f: Vec<Bound>) -> Self {
        Self(f)
    }
}
impl<'a> IntoIterator for &'a Bounds {
    type Item = &'a Bound;
    type IntoIter = slice::Iter<'a, Bound>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
