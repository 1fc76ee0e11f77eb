//! Geometry kernel trait definitions
//!
//! These traits define the interface the revolution pipeline needs from a
//! geometry kernel.

use std::path::Path;
use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::{Curve, Edge, Face, Wire};
use crate::mesh::{MeshParams, TessellatedMesh};
use crate::solid::RevolvedShape;

/// Error type for geometry kernel operations
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Revolution failed: {0}")]
    RevolutionFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("STEP export failed: {0}")]
    StepExport(String),

    #[error("STL export failed: {0}")]
    StlExport(String),

    #[error("Shape {0} is not held by this kernel")]
    UnknownShape(Uuid),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

/// Axis definition for revolve operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3D {
    /// Origin point of the axis
    pub origin: DVec3,
    /// Direction of the axis (normalized)
    pub direction: DVec3,
}

impl Axis3D {
    /// Z axis at origin
    pub const Z: Self = Self {
        origin: DVec3::ZERO,
        direction: DVec3::Z,
    };

    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Distance of a point from the axis line
    pub fn distance_to(&self, point: DVec3) -> f64 {
        let offset = point - self.origin;
        (offset - self.direction * offset.dot(self.direction)).length()
    }

    /// Orthogonal projection of a point onto the axis line
    pub fn project(&self, point: DVec3) -> DVec3 {
        self.origin + self.direction * (point - self.origin).dot(self.direction)
    }
}

/// Options for STEP file export
#[derive(Debug, Clone, Default)]
pub struct StepExportOptions {
    /// Author name in STEP header
    pub author: Option<String>,
    /// Organization name in STEP header
    pub organization: Option<String>,
    /// Header timestamp; defaults to the current UTC time
    pub timestamp: Option<String>,
}

/// The geometry kernel trait
///
/// Implementations provide curve fitting, topology construction, the
/// revolution sweep, tessellation and file serialization.
pub trait GeometryKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Interpolating curve through the points, in order
    fn interpolate(&self, points: &[DVec3]) -> KernelResult<Curve>;

    /// Straight edge between two points
    fn make_line(&self, start: DVec3, end: DVec3) -> KernelResult<Edge>;

    /// Wrap a curve as an edge
    fn make_edge(&self, curve: Curve) -> KernelResult<Edge>;

    /// Chain connected edges into a wire
    fn make_wire(&self, edges: Vec<Edge>) -> KernelResult<Wire>;

    /// Planar face bounded by a closed wire
    fn make_face(&self, boundary: Wire) -> KernelResult<Face>;

    /// Revolve a planar face around an axis
    ///
    /// # Arguments
    /// * `face` - The face to sweep; its plane must contain the axis
    /// * `axis` - The rotation axis
    /// * `angle` - The rotation angle in radians
    fn revolve(&self, face: &Face, axis: &Axis3D, angle: f64) -> KernelResult<RevolvedShape>;

    /// Tessellate a shape into triangles.
    ///
    /// The returned mesh belongs to exactly this `(shape, params)` pair and
    /// is never shared with a request made under other parameters.
    fn tessellate(
        &self,
        shape: &RevolvedShape,
        params: &MeshParams,
    ) -> KernelResult<Arc<TessellatedMesh>>;

    /// Drop the kernel's solid for a shape and every tessellation of it
    fn release(&self, shape: &RevolvedShape);

    /// Write a mesh as binary STL
    fn write_stl(&self, mesh: &TessellatedMesh, path: &Path) -> KernelResult<()>;

    /// Write a shape as a STEP file
    fn write_step(
        &self,
        shape: &RevolvedShape,
        path: &Path,
        options: &StepExportOptions,
    ) -> KernelResult<()>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>(operation: &str) -> KernelResult<T> {
        Err(KernelError::KernelNotAvailable(format!(
            "No geometry kernel available for {operation}"
        )))
    }
}

impl GeometryKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn interpolate(&self, _points: &[DVec3]) -> KernelResult<Curve> {
        Self::unavailable("interpolation")
    }

    fn make_line(&self, _start: DVec3, _end: DVec3) -> KernelResult<Edge> {
        Self::unavailable("edges")
    }

    fn make_edge(&self, _curve: Curve) -> KernelResult<Edge> {
        Self::unavailable("edges")
    }

    fn make_wire(&self, _edges: Vec<Edge>) -> KernelResult<Wire> {
        Self::unavailable("wires")
    }

    fn make_face(&self, _boundary: Wire) -> KernelResult<Face> {
        Self::unavailable("faces")
    }

    fn revolve(&self, _face: &Face, _axis: &Axis3D, _angle: f64) -> KernelResult<RevolvedShape> {
        Self::unavailable("revolution")
    }

    fn tessellate(
        &self,
        _shape: &RevolvedShape,
        _params: &MeshParams,
    ) -> KernelResult<Arc<TessellatedMesh>> {
        Self::unavailable("tessellation")
    }

    fn release(&self, _shape: &RevolvedShape) {}

    fn write_stl(&self, _mesh: &TessellatedMesh, _path: &Path) -> KernelResult<()> {
        Self::unavailable("STL export")
    }

    fn write_step(
        &self,
        _shape: &RevolvedShape,
        _path: &Path,
        _options: &StepExportOptions,
    ) -> KernelResult<()> {
        Self::unavailable("STEP export")
    }
}

/// Get the default geometry kernel based on available features
pub fn default_kernel() -> Arc<dyn GeometryKernel> {
    #[cfg(feature = "truck")]
    {
        Arc::new(super::TruckKernel::new())
    }

    #[cfg(not(feature = "truck"))]
    {
        Arc::new(NullKernel)
    }
}
