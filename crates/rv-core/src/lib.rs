//! Revolver core: profile-to-solid revolution pipeline
//!
//! This crate provides:
//! - Profile building from height/radius samples
//! - Generatrix construction (polyline or interpolating B-spline)
//! - Full revolution about the fixed Z axis
//! - Export of the solid to STL and STEP targets
//! - TOML/RON run configuration

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod generatrix;
pub mod pipeline;
pub mod profile;
pub mod revolution;

pub use config::{ModelConfig, OutputConfig, RevolverConfig};
pub use error::{ExportStage, RevolverError, RevolverResult};
pub use export::{
    ExactTarget, ExportOptions, ExportReport, MeshTarget, OutputFormat, OutputTarget,
    TargetOutcome, TargetSummary, export_all, export_target,
};
pub use generatrix::{FitMode, GeneratrixCurve, build_face, close_along_axis, construct_generatrix};
pub use pipeline::{Revolver, RunOptions, RunReport};
pub use profile::{ProfileParams, ProfileSample, ScaledProfile, build_profile};
pub use revolution::revolve_face;
