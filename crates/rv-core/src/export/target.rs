//! Output target descriptions

use std::fmt;
use std::path::{Path, PathBuf};

use rv_cad::{MeshParams, RevolvedShape};

use crate::error::{ExportStage, RevolverError, RevolverResult};

/// File format of an output target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Binary STL triangle mesh
    Stl,
    /// STEP AP214 boundary representation
    Step,
}

impl OutputFormat {
    /// Parse a config type tag (case-insensitive; `STP` is accepted for STEP)
    pub fn from_tag(tag: &str) -> RevolverResult<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "STL" => Ok(OutputFormat::Stl),
            "STEP" | "STP" => Ok(OutputFormat::Step),
            other => Err(RevolverError::InvalidInput(format!(
                "unknown output type '{other}' (expected STL or STEP)"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Stl => "STL",
            OutputFormat::Step => "STEP",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triangulated mesh output
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTarget {
    pub path: PathBuf,
    /// Chord deviation bound; absolute length, or a fraction of the shape size
    pub linear_deflection: f64,
    /// Whether `linear_deflection` is relative to the shape size
    pub is_relative: bool,
    /// Facet angle bound in degrees
    pub angular_deflection: f64,
}

impl MeshTarget {
    /// Absolute tessellation controls for this target on `shape`.
    ///
    /// A relative deflection is scaled by the largest bounding-box extent.
    pub fn resolve(&self, shape: &RevolvedShape) -> RevolverResult<MeshParams> {
        let linear = if self.is_relative {
            self.linear_deflection * shape.bounding_box().max_extent()
        } else {
            self.linear_deflection
        };
        MeshParams::new(linear, self.angular_deflection.to_radians())
            .map_err(|e| RevolverError::export(&self.path, ExportStage::Tessellate, e))
    }
}

/// Exact boundary-representation output
#[derive(Debug, Clone, PartialEq)]
pub struct ExactTarget {
    pub path: PathBuf,
}

/// One requested output file
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Mesh(MeshTarget),
    Exact(ExactTarget),
}

impl OutputTarget {
    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::Mesh(target) => &target.path,
            OutputTarget::Exact(target) => &target.path,
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            OutputTarget::Mesh(_) => OutputFormat::Stl,
            OutputTarget::Exact(_) => OutputFormat::Step,
        }
    }
}
