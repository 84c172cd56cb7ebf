//! Run settings of an external nested sampler.
use crate::prior::Prior;
use crate::{ErrorKind, Result};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Settings handed to a nested sampler (MultiNest style).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedSamplingSettings {
    pub resume: bool,
    pub importance_nested_sampling: bool,
    pub multimodal: bool,
    pub n_clustering_params: Option<usize>,
    pub outputfiles_basename: PathBuf,
    pub n_iter_before_update: usize,
    pub n_live_points: NonZeroUsize,
    pub sampling_efficiency: f64,
    pub const_efficiency_mode: bool,
    pub wrapped_params: Vec<bool>,
    pub evidence_tolerance: f64,

    /// Maximum number of iterations (`None` means unlimited).
    pub max_iter: Option<usize>,
    pub verbose: bool,
}
impl NestedSamplingSettings {
    /// Returns the settings with the given periodic-parameter mask and defaults elsewhere.
    pub fn new(wrapped_params: Vec<bool>) -> Self {
        Self {
            resume: false,
            importance_nested_sampling: false,
            multimodal: false,
            n_clustering_params: None,
            outputfiles_basename: PathBuf::from("./run/run_"),
            n_iter_before_update: 50,
            n_live_points: unsafe { NonZeroUsize::new_unchecked(100) },
            sampling_efficiency: 0.8,
            const_efficiency_mode: false,
            wrapped_params,
            evidence_tolerance: 0.1,
            max_iter: None,
            verbose: true,
        }
    }

    /// Returns the number of sampled dimensions.
    pub fn num_dims(&self) -> usize {
        self.wrapped_params.len()
    }
}

/// Builder of `NestedSamplingSettings`.
#[derive(Debug, Clone)]
pub struct NestedSamplingSettingsBuilder {
    settings: NestedSamplingSettings,
}
impl NestedSamplingSettingsBuilder {
    /// Makes a new builder whose wrapped parameters are taken from `prior`.
    pub fn new<P: Prior>(prior: &P) -> Self {
        Self {
            settings: NestedSamplingSettings::new(prior.wrapped_params()),
        }
    }

    /// Resumes a previous run from its output files.
    pub fn resume(&mut self, b: bool) -> &mut Self {
        self.settings.resume = b;
        self
    }

    pub fn importance_nested_sampling(&mut self, b: bool) -> &mut Self {
        self.settings.importance_nested_sampling = b;
        self
    }

    /// Enables mode separation, clustering on the first `n_clustering_params` parameters
    /// (all of them if `None`).
    ///
    /// # Errors
    ///
    /// If `n_clustering_params` exceeds the number of dimensions, an `ErrorKind::InvalidInput` error is returned.
    pub fn multimodal(&mut self, n_clustering_params: Option<usize>) -> Result<&mut Self> {
        if let Some(n) = n_clustering_params {
            track_assert!(n <= self.settings.num_dims(), ErrorKind::InvalidInput; n);
        }
        self.settings.multimodal = true;
        self.settings.n_clustering_params = n_clustering_params;
        Ok(self)
    }

    pub fn outputfiles_basename<P: Into<PathBuf>>(&mut self, basename: P) -> &mut Self {
        self.settings.outputfiles_basename = basename.into();
        self
    }

    pub fn n_iter_before_update(&mut self, n: usize) -> &mut Self {
        self.settings.n_iter_before_update = n;
        self
    }

    pub fn n_live_points(&mut self, n: NonZeroUsize) -> &mut Self {
        self.settings.n_live_points = n;
        self
    }

    /// Sets the target sampling efficiency.
    ///
    /// # Errors
    ///
    /// If `efficiency` does not lie in `(0, 1]`, an `ErrorKind::InvalidInput` error is returned.
    pub fn sampling_efficiency(&mut self, efficiency: f64) -> Result<&mut Self> {
        track_assert!(0.0 < efficiency && efficiency <= 1.0, ErrorKind::InvalidInput; efficiency);
        self.settings.sampling_efficiency = efficiency;
        Ok(self)
    }

    pub fn const_efficiency_mode(&mut self, b: bool) -> &mut Self {
        self.settings.const_efficiency_mode = b;
        self
    }

    /// Sets the tolerance on the log-evidence used as termination criterion.
    ///
    /// # Errors
    ///
    /// If `tolerance` is not a finite positive number, an `ErrorKind::InvalidInput` error is returned.
    pub fn evidence_tolerance(&mut self, tolerance: f64) -> Result<&mut Self> {
        track_assert!(tolerance.is_finite(), ErrorKind::InvalidInput; tolerance);
        track_assert!(tolerance > 0.0, ErrorKind::InvalidInput; tolerance);
        self.settings.evidence_tolerance = tolerance;
        Ok(self)
    }

    pub fn max_iter(&mut self, n: Option<usize>) -> &mut Self {
        self.settings.max_iter = n;
        self
    }

    pub fn verbose(&mut self, b: bool) -> &mut Self {
        self.settings.verbose = b;
        self
    }

    /// Builds the settings.
    pub fn finish(&self) -> NestedSamplingSettings {
        self.settings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{Bounds, NUM_PARAMS, PRIMARY_PHASE, SECONDARY_PHASE};
    use crate::prior::TwoHotRegionPrior;
    use crate::spacetime::RotatingSpacetime;
    use trackable::result::TestResult;

    fn prior() -> Result<TwoHotRegionPrior<RotatingSpacetime>> {
        let bounds = track!(Bounds::two_hot_regions())?;
        let spacetime = track!(RotatingSpacetime::new(300.0))?;
        track!(TwoHotRegionPrior::new(bounds, spacetime))
    }

    #[test]
    fn default_settings_work() -> TestResult {
        let settings = NestedSamplingSettingsBuilder::new(&track!(prior())?).finish();
        assert_eq!(settings.num_dims(), NUM_PARAMS);
        assert_eq!(settings.n_live_points.get(), 100);
        assert_eq!(settings.sampling_efficiency, 0.8);
        assert_eq!(settings.evidence_tolerance, 0.1);
        assert_eq!(settings.n_iter_before_update, 50);
        assert_eq!(settings.max_iter, None);
        assert!(settings.verbose);
        assert!(!settings.resume);
        assert!(settings.wrapped_params[PRIMARY_PHASE]);
        assert!(settings.wrapped_params[SECONDARY_PHASE]);
        assert!(!settings.wrapped_params[0]);
        Ok(())
    }

    #[test]
    fn builder_works() -> TestResult {
        let mut builder = NestedSamplingSettingsBuilder::new(&track!(prior())?);
        track!(builder.sampling_efficiency(0.3))?;
        track!(builder.evidence_tolerance(0.5))?;
        track!(builder.multimodal(Some(4)))?;
        builder
            .resume(true)
            .max_iter(Some(1000))
            .outputfiles_basename("./out/stu_");
        let settings = builder.finish();
        assert_eq!(settings.sampling_efficiency, 0.3);
        assert_eq!(settings.evidence_tolerance, 0.5);
        assert_eq!(settings.n_clustering_params, Some(4));
        assert!(settings.multimodal);
        assert!(settings.resume);
        assert_eq!(settings.max_iter, Some(1000));
        assert_eq!(settings.outputfiles_basename, PathBuf::from("./out/stu_"));
        Ok(())
    }

    #[test]
    fn invalid_settings_are_rejected() -> TestResult {
        let mut builder = NestedSamplingSettingsBuilder::new(&track!(prior())?);
        assert!(builder.sampling_efficiency(0.0).is_err());
        assert!(builder.sampling_efficiency(1.5).is_err());
        assert!(builder.evidence_tolerance(-0.1).is_err());
        assert!(builder.evidence_tolerance(f64::NAN).is_err());
        assert!(builder.multimodal(Some(13)).is_err());
        assert_eq!(builder.finish().sampling_efficiency, 0.8);
        Ok(())
    }
}
