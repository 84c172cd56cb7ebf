//! Physical constants (SI units).
use std::f64::consts::PI;

/// Speed of light in vacuum [m/s].
pub const C: f64 = 2.997_924_58e8;

/// Square of the speed of light [m^2/s^2].
pub const C_SQ: f64 = C * C;

/// Gravitational constant [m^3/(kg s^2)].
pub const G: f64 = 6.673_083_1e-11;

/// Solar mass [kg].
pub const SOLAR_MASS: f64 = 1.988_772_476_704_700_2e30;

/// One kilometre [m].
pub const KM: f64 = 1.0e3;

/// One kiloparsec [m].
pub const KPC: f64 = 3.085_677_580_7e19;

/// `2π`.
pub const TWO_PI: f64 = 2.0 * PI;

/// Returns the gravitational radius `GM/c^2` in kilometres of a body whose mass is `mass` solar masses.
pub fn grav_radius(mass: f64) -> f64 {
    mass * G * SOLAR_MASS / (C_SQ * KM)
}
