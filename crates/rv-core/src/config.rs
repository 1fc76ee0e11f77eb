//! Run configuration
//!
//! TOML is the primary format and keeps the historical key names:
//!
//! ```toml
//! [Model]
//! Scale = 1.0
//! z0 = 0.0
//! UseBSpline = false
//! r_z = [[0.0, 5.0], [10.0, 5.0], [10.0, 0.0]]
//!
//! [[Output]]
//! Type = "STL"
//! Filename = "out/part.stl"
//! LinearDeflection = 0.1
//! IsRelative = false
//! AngularDeflection = 5.0
//! ```
//!
//! Files with a `.ron` extension are read as RON with the same field names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{MIN_PROFILE_SAMPLES, RON_EXTENSION};
use crate::error::{RevolverError, RevolverResult};
use crate::export::{ExactTarget, MeshTarget, OutputFormat, OutputTarget};
use crate::generatrix::FitMode;
use crate::profile::{ProfileParams, ProfileSample};

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevolverConfig {
    #[serde(rename = "Model")]
    pub model: ModelConfig,
    #[serde(rename = "Output", default)]
    pub outputs: Vec<OutputConfig>,
}

/// Profile and fitting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Length units (mm) per config unit
    #[serde(rename = "Scale")]
    pub scale: f64,
    /// Height origin, in config units
    #[serde(default)]
    pub z0: f64,
    /// Fit a smooth B-spline instead of a polyline
    #[serde(rename = "UseBSpline", default)]
    pub use_bspline: bool,
    /// `[height, radius]` rows
    pub r_z: Vec<Vec<f64>>,
}

/// One `[[Output]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `STL` or `STEP`
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Filename")]
    pub filename: PathBuf,
    #[serde(
        rename = "LinearDeflection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub linear_deflection: Option<f64>,
    #[serde(rename = "IsRelative", default)]
    pub is_relative: bool,
    /// Degrees
    #[serde(
        rename = "AngularDeflection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub angular_deflection: Option<f64>,
}

impl ModelConfig {
    /// Rows as profile samples, checking each row is a `[height, radius]` pair
    pub fn samples(&self) -> RevolverResult<Vec<ProfileSample>> {
        self.r_z
            .iter()
            .enumerate()
            .map(|(i, row)| match row.as_slice() {
                [z, r] => Ok(ProfileSample::new(*z, *r)),
                _ => Err(RevolverError::InvalidInput(format!(
                    "r_z row {} must be a [height, radius] pair, got {} values",
                    i,
                    row.len()
                ))),
            })
            .collect()
    }

    /// Transform for the profile builder; `z0` is converted to length units
    pub fn profile_params(&self) -> ProfileParams {
        ProfileParams {
            scale: self.scale,
            z0: self.z0 * self.scale,
        }
    }

    pub fn fit_mode(&self) -> FitMode {
        FitMode::from_use_bspline(self.use_bspline)
    }

    fn validate(&self) -> RevolverResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(RevolverError::InvalidInput(format!(
                "Scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !self.z0.is_finite() {
            return Err(RevolverError::InvalidInput(format!(
                "z0 must be finite, got {}",
                self.z0
            )));
        }
        let samples = self.samples()?;
        if samples.len() < MIN_PROFILE_SAMPLES {
            return Err(RevolverError::InvalidInput(format!(
                "r_z needs at least {} rows, got {}",
                MIN_PROFILE_SAMPLES,
                samples.len()
            )));
        }
        if let Some(i) = samples
            .iter()
            .position(|s| !(s.z.is_finite() && s.r.is_finite()))
        {
            return Err(RevolverError::InvalidInput(format!(
                "r_z row {i} is not finite"
            )));
        }
        Ok(())
    }
}

fn positive(value: Option<f64>, key: &str, index: usize) -> RevolverResult<f64> {
    match value {
        None => Err(RevolverError::InvalidInput(format!(
            "output {index}: STL targets need {key}"
        ))),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(RevolverError::InvalidInput(format!(
            "output {index}: {key} must be positive, got {v}"
        ))),
    }
}

impl OutputConfig {
    fn to_target(&self, index: usize) -> RevolverResult<OutputTarget> {
        if self.filename.as_os_str().is_empty() {
            return Err(RevolverError::InvalidInput(format!(
                "output {index}: Filename is empty"
            )));
        }
        match OutputFormat::from_tag(&self.kind)? {
            OutputFormat::Stl => Ok(OutputTarget::Mesh(MeshTarget {
                path: self.filename.clone(),
                linear_deflection: positive(self.linear_deflection, "LinearDeflection", index)?,
                is_relative: self.is_relative,
                angular_deflection: positive(self.angular_deflection, "AngularDeflection", index)?,
            })),
            OutputFormat::Step => Ok(OutputTarget::Exact(ExactTarget {
                path: self.filename.clone(),
            })),
        }
    }
}

impl RevolverConfig {
    /// Load a config file; `.ron` files are RON, anything else TOML
    pub fn load(path: impl AsRef<Path>) -> RevolverResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RevolverError::Config(format!("{}: {}", path.display(), e)))?;
        let is_ron = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RON_EXTENSION));
        debug!(path = %path.display(), ron = is_ron, "Loading config");
        if is_ron {
            Self::from_ron_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> RevolverResult<Self> {
        toml::from_str(content).map_err(|e| RevolverError::Config(e.to_string()))
    }

    /// Parse RON; `Option` fields may be written without `Some(...)`
    pub fn from_ron_str(content: &str) -> RevolverResult<Self> {
        ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| RevolverError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> RevolverResult<String> {
        toml::to_string_pretty(self).map_err(|e| RevolverError::Config(e.to_string()))
    }

    /// Check every value the pipeline relies on
    pub fn validate(&self) -> RevolverResult<()> {
        self.model.validate()?;
        self.output_targets().map(|_| ())
    }

    /// Output entries as pipeline targets, in file order
    pub fn output_targets(&self) -> RevolverResult<Vec<OutputTarget>> {
        self.outputs
            .iter()
            .enumerate()
            .map(|(i, output)| output.to_target(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[Model]
Scale = 2.0
z0 = 1.5
UseBSpline = true
r_z = [[0.0, 5.0], [10.0, 5.0], [10.0, 0.0]]

[[Output]]
Type = "STL"
Filename = "out/part.stl"
LinearDeflection = 0.1
IsRelative = false
AngularDeflection = 5.0

[[Output]]
Type = "STEP"
Filename = "out/part.step"
"#;

    #[test]
    fn test_parse_toml() {
        let config = RevolverConfig::from_toml_str(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.model.scale, 2.0);
        assert_eq!(config.model.fit_mode(), FitMode::Smooth);
        assert_eq!(config.model.samples().unwrap()[1], ProfileSample::new(10.0, 5.0));
        assert_eq!(config.model.profile_params().z0, 3.0);

        let targets = config.output_targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(
            targets[0],
            OutputTarget::Mesh(MeshTarget {
                path: "out/part.stl".into(),
                linear_deflection: 0.1,
                is_relative: false,
                angular_deflection: 5.0,
            })
        );
        assert_eq!(targets[1].format(), OutputFormat::Step);
    }

    #[test]
    fn test_parse_ron() {
        let ron = r#"(
            Model: (Scale: 1.0, z0: 0.0, UseBSpline: false, r_z: [[0.0, 5.0], [10.0, 5.0]]),
            Output: [(Type: "STL", Filename: "a.stl", LinearDeflection: 0.5, IsRelative: true, AngularDeflection: 10.0)],
        )"#;
        let config = RevolverConfig::from_ron_str(ron).unwrap();
        config.validate().unwrap();
        assert_eq!(config.outputs[0].linear_deflection, Some(0.5));
        assert!(config.outputs[0].is_relative);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RevolverConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(RevolverConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = RevolverConfig::load(&path).unwrap();
        assert_eq!(config.outputs.len(), 2);

        let missing = RevolverConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(RevolverError::Config(_))));
    }

    #[test]
    fn test_single_row_rejected() {
        let config = RevolverConfig::from_toml_str(
            "[Model]\nScale = 1.0\nz0 = 0.0\nUseBSpline = false\nr_z = [[0.0, 5.0]]\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_malformed_row_rejected() {
        let config = RevolverConfig::from_toml_str(
            "[Model]\nScale = 1.0\nr_z = [[0.0, 5.0], [1.0, 2.0, 3.0]]\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_stl_without_deflection_rejected() {
        let config = RevolverConfig::from_toml_str(
            "[Model]\nScale = 1.0\nr_z = [[0.0, 5.0], [1.0, 5.0]]\n\n[[Output]]\nType = \"STL\"\nFilename = \"a.stl\"\nAngularDeflection = 5.0\n",
        )
        .unwrap();
        assert!(matches!(
            config.output_targets(),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_deflection_rejected() {
        let config = RevolverConfig::from_toml_str(
            "[Model]\nScale = 1.0\nr_z = [[0.0, 5.0], [1.0, 5.0]]\n\n[[Output]]\nType = \"stl\"\nFilename = \"a.stl\"\nLinearDeflection = -0.1\nAngularDeflection = 5.0\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let config = RevolverConfig::from_toml_str(
            "[Model]\nScale = 0.0\nr_z = [[0.0, 5.0], [1.0, 5.0]]\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RevolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_syntax_error_is_config_error() {
        let result = RevolverConfig::from_toml_str("[Model\nScale = ");
        assert!(matches!(result, Err(RevolverError::Config(_))));
    }
}
