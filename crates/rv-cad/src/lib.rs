//! Revolution Geometry Kernel
//!
//! This crate provides:
//! - An abstract geometry kernel trait for the revolution pipeline
//! - Line and interpolating B-spline curve descriptions, edges and wires
//! - A Truck backend: planar faces, full 360° revolutions, deflection-bound
//!   tessellation with a per-shape cache and exact STEP output
//! - Binary STL serialization

pub mod constants;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod solid;

// Re-exports for convenience
pub use constants::{FULL_TURN, LINEAR_TOLERANCE};
pub use geometry::{BSplineCurve, BoundingBox, Curve, Edge, Face, LineSegment, Wire};
#[cfg(feature = "truck")]
pub use kernel::TruckKernel;
pub use kernel::{
    Axis3D, GeometryKernel, KernelError, KernelResult, NullKernel, StepExportOptions,
    default_kernel,
};
pub use mesh::{MeshParams, TessellatedMesh, TessellationCache};
pub use solid::{AxisFrame, RevolvedFace, RevolvedShape};
