//! End-to-end revolution pipeline
//!
//! Profile → generatrix → face → revolved solid → export targets. The first
//! stages run once, in order; any error there aborts the run. Export errors
//! are collected per target.

use std::sync::Arc;

use rv_cad::{GeometryKernel, RevolvedShape, StepExportOptions, default_kernel};
use tracing::info;

use crate::config::{ModelConfig, RevolverConfig};
use crate::error::{RevolverError, RevolverResult};
use crate::export::{ExportOptions, TargetOutcome, TargetSummary, export_all};
use crate::generatrix::{build_face, construct_generatrix};
use crate::profile::build_profile;
use crate::revolution::revolve_face;

/// Options for a full run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Export targets concurrently
    pub parallel: bool,
    /// Build the shape and tessellate, but write no files
    pub dry_run: bool,
    /// Header data for STEP targets
    pub step: StepExportOptions,
}

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Volume of the revolved solid
    pub shape_volume: f64,
    /// Number of faces of the revolved solid
    pub shape_faces: usize,
    /// One outcome per output target, in config order
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    /// True if every target succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    pub fn successes(&self) -> impl Iterator<Item = &TargetSummary> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RevolverError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }
}

/// Pipeline driver bound to a geometry kernel
pub struct Revolver {
    kernel: Arc<dyn GeometryKernel>,
}

impl Default for Revolver {
    fn default() -> Self {
        Self::new(default_kernel())
    }
}

impl Revolver {
    pub fn new(kernel: Arc<dyn GeometryKernel>) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &dyn GeometryKernel {
        self.kernel.as_ref()
    }

    /// Run the profile, generatrix and revolution stages
    pub fn build_shape(&self, model: &ModelConfig) -> RevolverResult<RevolvedShape> {
        let kernel = self.kernel();
        let samples = model.samples()?;
        let profile = build_profile(&samples, &model.profile_params())?;
        let generatrix = construct_generatrix(kernel, &profile, model.fit_mode())?;
        let face = build_face(kernel, &generatrix)?;
        revolve_face(kernel, &face)
    }

    /// Validate the config, build the shape and export every target
    pub fn run(&self, config: &RevolverConfig, options: &RunOptions) -> RevolverResult<RunReport> {
        config.validate()?;
        let targets = config.output_targets()?;
        info!(
            kernel = self.kernel.name(),
            samples = config.model.r_z.len(),
            targets = targets.len(),
            "Starting revolution run"
        );

        let shape = self.build_shape(&config.model)?;
        let export_options = ExportOptions {
            parallel: options.parallel,
            dry_run: options.dry_run,
            step: options.step.clone(),
        };
        let report = export_all(self.kernel(), &shape, &targets, &export_options);
        self.kernel.release(&shape);

        let report = RunReport {
            shape_volume: shape.volume(),
            shape_faces: shape.face_count(),
            outcomes: report.outcomes,
        };
        info!(
            succeeded = report.successes().count(),
            failed = report.failures().count(),
            "Run finished"
        );
        Ok(report)
    }
}
