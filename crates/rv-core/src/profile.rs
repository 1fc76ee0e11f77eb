//! Profile builder: raw height/radius samples to axis-ready points

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{AXIAL_DIRECTION, MIN_PROFILE_SAMPLES, RADIAL_DIRECTION};
use crate::error::{RevolverError, RevolverResult};

/// One profile sample in config units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    /// Height along the axis
    pub z: f64,
    /// Distance from the axis
    pub r: f64,
}

impl ProfileSample {
    pub fn new(z: f64, r: f64) -> Self {
        Self { z, r }
    }
}

/// Transform applied to every sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Length units per config unit
    pub scale: f64,
    /// Height origin, in length units
    pub z0: f64,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self { scale: 1.0, z0: 0.0 }
    }
}

/// Samples after scaling and offsetting, in their original order
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledProfile {
    samples: Vec<ProfileSample>,
}

impl ScaledProfile {
    pub fn samples(&self) -> &[ProfileSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples as 3D points in the profile plane: radius along X, height along Z
    pub fn points(&self) -> Vec<DVec3> {
        self.samples
            .iter()
            .map(|s| RADIAL_DIRECTION * s.r + AXIAL_DIRECTION * s.z)
            .collect()
    }
}

/// Scale and offset raw samples.
///
/// Each sample maps to `height' = z0 - height * scale` and
/// `radius' = radius * scale`. Count and order are preserved. Radii are not
/// checked for sign here.
pub fn build_profile(samples: &[ProfileSample], params: &ProfileParams) -> RevolverResult<ScaledProfile> {
    if samples.len() < MIN_PROFILE_SAMPLES {
        return Err(RevolverError::InvalidInput(format!(
            "profile needs at least {} samples, got {}",
            MIN_PROFILE_SAMPLES,
            samples.len()
        )));
    }
    if !(params.scale.is_finite() && params.scale > 0.0) {
        return Err(RevolverError::InvalidInput(format!(
            "scale must be a positive number, got {}",
            params.scale
        )));
    }
    if !params.z0.is_finite() {
        return Err(RevolverError::InvalidInput(format!(
            "z0 must be finite, got {}",
            params.z0
        )));
    }
    if let Some(index) = samples
        .iter()
        .position(|s| !(s.z.is_finite() && s.r.is_finite()))
    {
        return Err(RevolverError::InvalidInput(format!(
            "sample {index} is not finite"
        )));
    }

    let samples: Vec<ProfileSample> = samples
        .iter()
        .map(|s| ProfileSample {
            z: params.z0 - s.z * params.scale,
            r: s.r * params.scale,
        })
        .collect();

    debug!(
        samples = samples.len(),
        scale = params.scale,
        z0 = params.z0,
        "Built profile"
    );
    Ok(ScaledProfile { samples })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_transform_is_exact() {
        let params = ProfileParams { scale: 2.5, z0: 3.0 };
        let raw = [ProfileSample::new(0.0, 5.0), ProfileSample::new(10.0, 4.0)];
        let profile = build_profile(&raw, &params).unwrap();
        assert_eq!(profile.samples()[0], ProfileSample::new(3.0 - 0.0 * 2.5, 5.0 * 2.5));
        assert_eq!(profile.samples()[1], ProfileSample::new(3.0 - 10.0 * 2.5, 4.0 * 2.5));
    }

    #[test]
    fn test_order_and_count_preserved() {
        let raw: Vec<_> = (0..7)
            .map(|i| ProfileSample::new(i as f64, (7 - i) as f64))
            .collect();
        let profile = build_profile(&raw, &ProfileParams::default()).unwrap();
        assert_eq!(profile.len(), raw.len());
        for (scaled, original) in profile.samples().iter().zip(&raw) {
            assert_eq!(scaled.z, -original.z);
            assert_eq!(scaled.r, original.r);
        }
    }

    #[test]
    fn test_single_sample_rejected() {
        let result = build_profile(&[ProfileSample::new(0.0, 1.0)], &ProfileParams::default());
        assert!(matches!(result, Err(RevolverError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_scale_rejected() {
        let raw = [ProfileSample::new(0.0, 1.0), ProfileSample::new(1.0, 1.0)];
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = ProfileParams { scale, z0: 0.0 };
            assert!(matches!(
                build_profile(&raw, &params),
                Err(RevolverError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let raw = [ProfileSample::new(0.0, 1.0), ProfileSample::new(f64::NAN, 1.0)];
        assert!(matches!(
            build_profile(&raw, &ProfileParams::default()),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_radius_passes_through() {
        let raw = [ProfileSample::new(0.0, -1.0), ProfileSample::new(1.0, -2.0)];
        let profile = build_profile(&raw, &ProfileParams::default()).unwrap();
        assert_eq!(profile.samples()[1].r, -2.0);
    }

    #[test]
    fn test_points_in_profile_plane() {
        let raw = [ProfileSample::new(1.0, 5.0), ProfileSample::new(2.0, 6.0)];
        let profile = build_profile(&raw, &ProfileParams::default()).unwrap();
        assert_eq!(
            profile.points(),
            vec![DVec3::new(5.0, 0.0, -1.0), DVec3::new(6.0, 0.0, -2.0)]
        );
    }
}
