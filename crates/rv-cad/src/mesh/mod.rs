//! Triangle meshes of revolved shapes

mod cache;
mod stl;

pub use cache::{TessellationCache, TessellationKey};
pub use stl::write_binary_stl;

use crate::constants::{MAX_ANGULAR_SEGMENTS, MIN_CHORD_TOLERANCE};
use crate::kernel::{KernelError, KernelResult};

/// Resolved tessellation controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    /// Maximum chord deviation from the exact surface (length units)
    pub linear_deflection: f64,
    /// Maximum angle between adjacent facets (radians)
    pub angular_deflection: f64,
}

impl MeshParams {
    pub fn new(linear_deflection: f64, angular_deflection: f64) -> KernelResult<Self> {
        if !(linear_deflection.is_finite() && linear_deflection > 0.0) {
            return Err(KernelError::TessellationFailed(format!(
                "linear deflection must be positive, got {linear_deflection}"
            )));
        }
        if !(angular_deflection.is_finite() && angular_deflection > 0.0) {
            return Err(KernelError::TessellationFailed(format!(
                "angular deflection must be positive, got {angular_deflection}"
            )));
        }
        Ok(Self {
            linear_deflection,
            angular_deflection,
        })
    }

    /// Chord tolerance holding both deflections on a shape of `max_radius`.
    ///
    /// A segment spanning `a` radians deviates `2R sin²(a/4)` from a circle
    /// of radius `R`, so the angular deflection becomes that sagitta at the
    /// largest radius. Fails when the tolerance is finer than the mesher
    /// resolves or needs more than [`MAX_ANGULAR_SEGMENTS`] around the axis.
    pub fn chord_tolerance(&self, max_radius: f64) -> KernelResult<f64> {
        let angle = self.angular_deflection.min(std::f64::consts::PI);
        let angular_sagitta = 2.0 * max_radius * (angle / 4.0).sin().powi(2);
        let tolerance = if max_radius > 0.0 {
            self.linear_deflection.min(angular_sagitta)
        } else {
            self.linear_deflection
        };

        if tolerance < MIN_CHORD_TOLERANCE {
            return Err(KernelError::TessellationFailed(format!(
                "chord tolerance {tolerance:.3e} is below the mesher limit {MIN_CHORD_TOLERANCE:.0e}"
            )));
        }
        let segments = angular_segments(max_radius, tolerance);
        if segments > MAX_ANGULAR_SEGMENTS as f64 {
            return Err(KernelError::TessellationFailed(format!(
                "deflection ({}, {} rad) needs {:.0} segments around radius {}, limit is {}",
                self.linear_deflection,
                self.angular_deflection,
                segments.ceil(),
                max_radius,
                MAX_ANGULAR_SEGMENTS
            )));
        }
        Ok(tolerance)
    }
}

/// Segments around a circle of `radius` keeping the sagitta within `tolerance`
pub fn angular_segments(radius: f64, tolerance: f64) -> f64 {
    if tolerance >= radius {
        return 1.0;
    }
    let half_angle = 2.0 * (0.5 * tolerance / radius).sqrt().asin();
    std::f64::consts::PI / half_angle
}

/// A tessellated mesh output from the geometry kernel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Unit normal of a triangle, +Z for degenerate triangles
pub fn triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    let cross = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];

    let len = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
    if len > 0.0 {
        [cross[0] / len, cross[1] / len, cross[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_params_reject_non_positive() {
        assert!(MeshParams::new(0.0, 0.5).is_err());
        assert!(MeshParams::new(0.1, -1.0).is_err());
        assert!(MeshParams::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_linear_deflection_binds() {
        let params = MeshParams::new(0.01, 0.5).unwrap();
        assert_eq!(params.chord_tolerance(5.0).unwrap(), 0.01);
    }

    #[test]
    fn test_angular_deflection_becomes_sagitta() {
        let params = MeshParams::new(10.0, 30f64.to_radians()).unwrap();
        let expected = 5.0 * (1.0 - 15f64.to_radians().cos());
        assert_relative_eq!(params.chord_tolerance(5.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sagitta_segment_count() {
        // 12 segments at 30 degrees each
        let tolerance = 5.0 * (1.0 - 15f64.to_radians().cos());
        assert_relative_eq!(angular_segments(5.0, tolerance), 12.0, epsilon = 1e-9);
        assert_eq!(angular_segments(1.0, 2.0), 1.0);
    }

    #[test]
    fn test_unreachable_resolution_fails() {
        // Would need about 22000 segments around a radius of 100
        let params = MeshParams::new(1e-6, 3.0).unwrap();
        assert!(matches!(
            params.chord_tolerance(100.0),
            Err(KernelError::TessellationFailed(_))
        ));
        let params = MeshParams::new(1e-5, 3.0).unwrap();
        assert!(matches!(
            params.chord_tolerance(100.0),
            Err(KernelError::TessellationFailed(_))
        ));
    }

    #[test]
    fn test_tiny_angle_fails() {
        let params = MeshParams::new(1.0, 1e-4).unwrap();
        assert!(params.chord_tolerance(10.0).is_err());
    }

    #[test]
    fn test_triangle_normal() {
        let n = triangle_normal([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
        assert_eq!(triangle_normal([0.0; 3], [0.0; 3], [0.0; 3]), [0.0, 0.0, 1.0]);
    }
}
