//! Meshing of Truck solids
//!
//! Truck meshes to a single chord tolerance; [`MeshParams::chord_tolerance`]
//! folds the angular deflection into it at the largest radius.

use glam::DVec3;
use tracing::debug;
use truck_meshalgo::prelude::*;
use truck_modeling::Solid as TruckSolid;
use truck_polymesh::PolygonMesh;

use super::convert::dvec3;
use crate::kernel::{KernelError, KernelResult};
use crate::mesh::{MeshParams, TessellatedMesh};
use crate::solid::RevolvedShape;

/// Triangles of a polygon mesh with area-weighted vertex normals.
///
/// Zero-area triangles, such as those Truck leaves at the poles, are dropped.
fn to_tessellated(polygon: &PolygonMesh) -> TessellatedMesh {
    let positions = polygon.positions();
    let mut normals = vec![DVec3::ZERO; positions.len()];
    let mut indices: Vec<u32> = Vec::new();

    for [a, b, c] in polygon.faces().triangle_iter() {
        let p0 = dvec3(positions[a.pos]);
        let cross = (dvec3(positions[b.pos]) - p0).cross(dvec3(positions[c.pos]) - p0);
        if cross.length_squared() == 0.0 {
            continue;
        }
        for corner in [a.pos, b.pos, c.pos] {
            normals[corner] += cross;
            indices.push(corner as u32);
        }
    }

    TessellatedMesh {
        vertices: positions
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect(),
        normals: normals
            .iter()
            .map(|n| n.try_normalize().unwrap_or(DVec3::Z).as_vec3().to_array())
            .collect(),
        indices,
    }
}

/// Tessellate a solid under one set of deflection controls
pub(super) fn tessellate(
    solid: &TruckSolid,
    shape: &RevolvedShape,
    params: &MeshParams,
) -> KernelResult<TessellatedMesh> {
    let tolerance = params.chord_tolerance(shape.max_radius())?;
    let polygon = solid.triangulation(tolerance).to_polygon();
    let mesh = to_tessellated(&polygon);
    if mesh.is_empty() {
        return Err(KernelError::TessellationFailed(
            "triangulation produced no triangles".to_string(),
        ));
    }

    debug!(
        shape = %shape.id(),
        tolerance,
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "Tessellated shape"
    );
    Ok(mesh)
}
