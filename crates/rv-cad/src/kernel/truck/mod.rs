//! Truck Geometry Kernel Backend
//!
//! Pure Rust B-Rep kernel using the Truck library. Curves are evaluated as
//! Truck B-splines, faces are attached to their plane, solids come from
//! `builder::cone`/`builder::rsweep`, meshes from `truck-meshalgo` and STEP
//! files from `truck-stepio`.

mod convert;
mod revolve;
mod step;
mod tessellate;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use glam::DVec3;
use parking_lot::Mutex;
use tracing::{debug, info};
use truck_modeling::{Solid as TruckSolid, builder};
use uuid::Uuid;

use super::{Axis3D, GeometryKernel, KernelError, KernelResult, StepExportOptions};
use crate::geometry::{BSplineCurve, Curve, Edge, Face, Wire, ensure_simple, polygon_plane};
use crate::mesh::{self, MeshParams, TessellatedMesh, TessellationCache, TessellationKey};
use crate::solid::RevolvedShape;
use convert::{bspline, sample_wire, truck_wire};

/// Truck-based geometry kernel
pub struct TruckKernel {
    /// Storage for solid data (keyed by shape id)
    solids: Mutex<HashMap<Uuid, TruckSolid>>,
    /// Finished tessellations keyed by shape and parameters
    tessellations: TessellationCache,
}

impl TruckKernel {
    /// Create a new Truck kernel
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
            tessellations: TessellationCache::new(),
        }
    }

    /// Get a stored solid by shape id
    fn get_solid(&self, id: Uuid) -> KernelResult<TruckSolid> {
        self.solids
            .lock()
            .get(&id)
            .cloned()
            .ok_or(KernelError::UnknownShape(id))
    }

    /// Number of solids currently held
    pub fn solid_count(&self) -> usize {
        self.solids.lock().len()
    }

    /// Number of cached tessellations
    pub fn cached_tessellations(&self) -> usize {
        self.tessellations.len()
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
    }

    fn interpolate(&self, points: &[DVec3]) -> KernelResult<Curve> {
        let curve = Curve::BSpline(BSplineCurve::interpolate(points)?);
        // Truck checks the knot vector against the control points
        bspline(&curve)?;
        debug!(points = points.len(), "Interpolated B-spline");
        Ok(curve)
    }

    fn make_line(&self, start: DVec3, end: DVec3) -> KernelResult<Edge> {
        Edge::new(Curve::line(start, end))
    }

    fn make_edge(&self, curve: Curve) -> KernelResult<Edge> {
        Edge::new(curve)
    }

    fn make_wire(&self, edges: Vec<Edge>) -> KernelResult<Wire> {
        Wire::new(edges)
    }

    fn make_face(&self, boundary: Wire) -> KernelResult<Face> {
        if !boundary.is_closed() {
            return Err(KernelError::InvalidProfile(
                "face boundary is not closed".to_string(),
            ));
        }

        let samples = sample_wire(&boundary)?;
        let (origin, normal, area) = polygon_plane(&samples)?;

        let curves: Vec<&Curve> = boundary.edges().iter().map(Edge::curve).collect();
        let wire = truck_wire(&curves, true)?;
        builder::try_attach_plane(&[wire]).map_err(|e| {
            KernelError::InvalidProfile(format!("Failed to create face: {e:?}"))
        })?;

        // Truck only checks the wire topologically
        ensure_simple(&samples, origin, normal)?;

        debug!(edges = boundary.edge_count(), area, "Built planar face");
        Ok(Face::new(boundary, origin, normal, area))
    }

    fn revolve(&self, face: &Face, axis: &Axis3D, angle: f64) -> KernelResult<RevolvedShape> {
        let (shape, solid) = revolve::revolve(face, axis, angle)?;
        self.solids.lock().insert(shape.id(), solid);
        debug!(
            faces = shape.face_count(),
            volume = shape.volume(),
            "Revolved face into shape {}",
            shape.id()
        );
        Ok(shape)
    }

    fn tessellate(
        &self,
        shape: &RevolvedShape,
        params: &MeshParams,
    ) -> KernelResult<Arc<TessellatedMesh>> {
        let key = TessellationKey::new(shape.id(), params);
        self.tessellations.get_or_try_insert_with(key, || {
            let solid = self.get_solid(shape.id())?;
            tessellate::tessellate(&solid, shape, params)
        })
    }

    fn release(&self, shape: &RevolvedShape) {
        self.solids.lock().remove(&shape.id());
        self.tessellations.clear_shape(shape.id());
    }

    fn write_stl(&self, mesh: &TessellatedMesh, path: &Path) -> KernelResult<()> {
        mesh::write_binary_stl(mesh, path)?;
        info!(
            "Wrote STL {} ({} triangles)",
            path.display(),
            mesh.triangle_count()
        );
        Ok(())
    }

    fn write_step(
        &self,
        shape: &RevolvedShape,
        path: &Path,
        options: &StepExportOptions,
    ) -> KernelResult<()> {
        let solid = self.get_solid(shape.id())?;
        step::write_step(&solid, path, options)?;
        info!("Wrote STEP {}", path.display());
        Ok(())
    }
}
