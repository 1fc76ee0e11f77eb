//! Exact (STEP) targets

use rv_cad::{GeometryKernel, RevolvedShape, StepExportOptions};

use super::target::{ExactTarget, OutputFormat};
use super::{TargetSummary, create_parent_dirs};
use crate::error::{ExportStage, RevolverError, RevolverResult};

/// Write `shape` as a STEP boundary representation
pub fn export_exact(
    kernel: &dyn GeometryKernel,
    shape: &RevolvedShape,
    target: &ExactTarget,
    options: &StepExportOptions,
    dry_run: bool,
) -> RevolverResult<TargetSummary> {
    let path = &target.path;
    if !dry_run {
        create_parent_dirs(path)?;
        kernel
            .write_step(shape, path, options)
            .map_err(|e| RevolverError::export(path, ExportStage::WriteStep, e))?;
    }

    Ok(TargetSummary {
        path: path.clone(),
        format: OutputFormat::Step,
        triangle_count: None,
        written: !dry_run,
    })
}
