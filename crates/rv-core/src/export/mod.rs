//! Export pipeline: fan a finished shape out to its output targets
//!
//! Targets are independent. Each one resolves its own tessellation
//! parameters, and a failing target never aborts its siblings. With
//! `parallel` set the targets run on the rayon pool; the only data they share
//! is the immutable shape.

mod exact;
mod mesh;
mod target;

pub use exact::export_exact;
pub use mesh::export_mesh;
pub use target::{ExactTarget, MeshTarget, OutputFormat, OutputTarget};

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rv_cad::{GeometryKernel, RevolvedShape, StepExportOptions};
use tracing::{info, info_span, warn};

use crate::error::{ExportStage, RevolverError, RevolverResult};

/// Options for a batch of exports
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Run targets concurrently
    pub parallel: bool,
    /// Resolve and tessellate but write nothing
    pub dry_run: bool,
    /// Header data for STEP targets
    pub step: StepExportOptions,
}

/// What a successful target produced
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSummary {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Triangles in the written mesh (mesh targets only)
    pub triangle_count: Option<usize>,
    /// False for dry runs
    pub written: bool,
}

/// Result of one target
pub type TargetOutcome = RevolverResult<TargetSummary>;

/// Per-target results, in target order
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl ExportReport {
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

/// Create the parent directories of an output path
pub(crate) fn create_parent_dirs(path: &Path) -> RevolverResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| RevolverError::export(path, ExportStage::CreateDirectory, e))?;
    }
    Ok(())
}

/// Export one target
pub fn export_target(
    kernel: &dyn GeometryKernel,
    shape: &RevolvedShape,
    target: &OutputTarget,
    options: &ExportOptions,
) -> TargetOutcome {
    let span = info_span!("export", path = %target.path().display(), format = %target.format());
    let _guard = span.enter();

    let outcome = match target {
        OutputTarget::Mesh(mesh) => export_mesh(kernel, shape, mesh, options.dry_run),
        OutputTarget::Exact(exact) => {
            export_exact(kernel, shape, exact, &options.step, options.dry_run)
        }
    };

    match &outcome {
        Ok(summary) if summary.written => info!("Export complete"),
        Ok(_) => info!("Dry run, nothing written"),
        Err(e) => warn!("Export failed: {e}"),
    }
    outcome
}

/// Export `shape` to every target; one outcome per target, in target order
pub fn export_all(
    kernel: &dyn GeometryKernel,
    shape: &RevolvedShape,
    targets: &[OutputTarget],
    options: &ExportOptions,
) -> ExportReport {
    let outcomes = if options.parallel {
        targets
            .par_iter()
            .map(|target| export_target(kernel, shape, target, options))
            .collect()
    } else {
        targets
            .iter()
            .map(|target| export_target(kernel, shape, target, options))
            .collect()
    };
    ExportReport { outcomes }
}
