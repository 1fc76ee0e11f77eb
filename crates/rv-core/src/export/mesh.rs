//! Mesh (STL) targets

use rv_cad::{GeometryKernel, RevolvedShape};
use tracing::debug;

use super::target::{MeshTarget, OutputFormat};
use super::{TargetSummary, create_parent_dirs};
use crate::error::{ExportStage, RevolverError, RevolverResult};

/// Tessellate `shape` under the target's own tolerances and write binary STL
pub fn export_mesh(
    kernel: &dyn GeometryKernel,
    shape: &RevolvedShape,
    target: &MeshTarget,
    dry_run: bool,
) -> RevolverResult<TargetSummary> {
    let path = &target.path;
    let params = target.resolve(shape)?;
    debug!(
        linear = params.linear_deflection,
        angular = params.angular_deflection,
        "Resolved mesh parameters"
    );

    let mesh = kernel
        .tessellate(shape, &params)
        .map_err(|e| RevolverError::export(path, ExportStage::Tessellate, e))?;
    if mesh.is_empty() {
        return Err(RevolverError::export(
            path,
            ExportStage::Tessellate,
            "tessellation produced no triangles",
        ));
    }

    if !dry_run {
        create_parent_dirs(path)?;
        kernel
            .write_stl(&mesh, path)
            .map_err(|e| RevolverError::export(path, ExportStage::WriteMesh, e))?;
    }

    Ok(TargetSummary {
        path: path.clone(),
        format: OutputFormat::Stl,
        triangle_count: Some(mesh.triangle_count()),
        written: !dry_run,
    })
}
