//! Joint prior and model plumbing for X-ray pulse-profile inference of rotating neutron stars.
//!
//! The prior targets the ST-U model: two single-temperature, simply-connected circular
//! hot regions with unshared parameters. Likelihood marginalization and the nested
//! sampler itself live outside this crate and are reached through [`Likelihood`] and
//! [`NestedSamplingSettings`].
#[macro_use]
extern crate trackable;

pub use self::error::{Error, ErrorKind};
pub use self::parameters::{Bound, Bounds};
pub use self::posterior::{Likelihood, Posterior};
pub use self::prior::{Prior, Rejection, TwoHotRegionPrior};
pub use self::sampler::{NestedSamplingSettings, NestedSamplingSettingsBuilder};
pub use self::spacetime::{RotatingSpacetime, Spacetime, SpacetimeGeometry};

pub mod constants;
pub mod distributions;
pub mod instrument;
pub mod parameters;
pub mod posterior;
pub mod prior;
pub mod sampler;
pub mod spacetime;
pub mod sphere;

mod error;

/// This crate specific `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
