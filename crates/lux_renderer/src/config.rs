//! Render settings, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use crate::{Accelerator, DirectLightMethod, GatherSettings, Kernel, RenderError};
use serde::{Deserialize, Serialize};

/// Settings shared by both integrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel; the camera's own count is used when unset
    pub samples_per_pixel: Option<usize>,
    /// Bounces traced after the camera ray
    pub max_bounces: u32,
    /// Worker threads, 0 for one per hardware thread
    pub threads: usize,
    /// Base seed; worker `i` seeds its generator with `seed + i`
    pub seed: u64,
    pub accelerator: Accelerator,
    pub photon: PhotonConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: None,
            max_bounces: 6,
            threads: 0,
            seed: 0,
            accelerator: Accelerator::default(),
            photon: PhotonConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel == Some(0) {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        self.photon.validate()
    }

    /// Gathering parameters for the photon mapper.
    pub fn gather_settings(&self) -> GatherSettings {
        GatherSettings {
            kernel: self.photon.kernel,
            nearest_photons: self.photon.nearest_photons,
            direct_light: self.photon.direct_light,
            max_bounces: self.max_bounces,
        }
    }
}

/// Settings of the photon mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    /// Photon walks started from the lights
    pub max_walks: usize,
    /// Soft ceiling on stored photons; workers stop walking once it is reached
    pub max_photons: usize,
    /// Neighbours used for each density estimate
    pub nearest_photons: usize,
    pub kernel: Kernel,
    pub direct_light: DirectLightMethod,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            max_walks: 1_000_000,
            max_photons: 500_000,
            nearest_photons: 25,
            kernel: Kernel::default(),
            direct_light: DirectLightMethod::default(),
        }
    }
}

impl PhotonConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.max_walks == 0 {
            return Err(RenderError::InvalidConfig("photon.max_walks must be at least 1".into()));
        }
        if self.max_photons == 0 {
            return Err(RenderError::InvalidConfig("photon.max_photons must be at least 1".into()));
        }
        if self.nearest_photons == 0 {
            return Err(RenderError::InvalidConfig(
                "photon.nearest_photons must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::SplitMethod;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_bounces, 6);
        assert_eq!(config.photon.max_walks, 1_000_000);
        assert_eq!(config.photon.max_photons, 500_000);
        assert_eq!(config.photon.nearest_photons, 25);
        assert_eq!(config.photon.kernel, Kernel::Cone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "samples_per_pixel": 16,
            "accelerator": { "concurrent_bvh": "sort" },
            "photon": { "kernel": "normalized_gaussian", "direct_light": "store_all_photons" }
        }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.samples_per_pixel, Some(16));
        assert_eq!(config.max_bounces, 6);
        assert_eq!(config.accelerator, Accelerator::ConcurrentBvh(SplitMethod::Sort));
        assert_eq!(config.photon.kernel, Kernel::NormalizedGaussian);
        assert_eq!(config.photon.direct_light, DirectLightMethod::StoreAllPhotons);
        assert_eq!(config.photon.max_walks, 1_000_000);
    }

    #[test]
    fn test_validate_rejects_zeros() {
        let config = RenderConfig {
            samples_per_pixel: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let mut config = RenderConfig::default();
        config.photon.nearest_photons = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gather_settings() {
        let mut config = RenderConfig::default();
        config.max_bounces = 3;
        config.photon.kernel = Kernel::Box;

        let settings = config.gather_settings();
        assert_eq!(settings.max_bounces, 3);
        assert_eq!(settings.kernel, Kernel::Box);
        assert_eq!(settings.nearest_photons, 25);
    }
}
