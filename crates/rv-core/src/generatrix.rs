//! Generatrix curve constructor
//!
//! Fits the profile points with a polyline or an interpolating B-spline and
//! closes the result along the revolution axis into a planar face. All
//! geometric validation is left to the kernel.

use rv_cad::{Edge, Face, GeometryKernel, LINEAR_TOLERANCE, Wire};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::REVOLUTION_AXIS;
use crate::error::{RevolverError, RevolverResult};
use crate::profile::ScaledProfile;

/// How profile points are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMode {
    /// One straight edge per consecutive pair of points
    #[default]
    Linear,
    /// One interpolating B-spline through all points
    Smooth,
}

impl FitMode {
    pub fn from_use_bspline(use_bspline: bool) -> Self {
        if use_bspline {
            FitMode::Smooth
        } else {
            FitMode::Linear
        }
    }
}

/// The open profile wire, before closing along the axis
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratrixCurve {
    mode: FitMode,
    wire: Wire,
}

impl GeneratrixCurve {
    pub fn mode(&self) -> FitMode {
        self.mode
    }

    pub fn wire(&self) -> &Wire {
        &self.wire
    }

    pub fn edge_count(&self) -> usize {
        self.wire.edge_count()
    }
}

/// Build the generatrix wire through the profile points, in order
pub fn construct_generatrix(
    kernel: &dyn GeometryKernel,
    profile: &ScaledProfile,
    mode: FitMode,
) -> RevolverResult<GeneratrixCurve> {
    let points = profile.points();

    let edges: Vec<Edge> = match mode {
        FitMode::Smooth => {
            let curve = kernel
                .interpolate(&points)
                .map_err(RevolverError::from_construction)?;
            vec![kernel
                .make_edge(curve)
                .map_err(RevolverError::from_construction)?]
        }
        FitMode::Linear => points
            .windows(2)
            .map(|pair| kernel.make_line(pair[0], pair[1]))
            .collect::<Result<_, _>>()
            .map_err(RevolverError::from_construction)?,
    };

    let wire = kernel
        .make_wire(edges)
        .map_err(RevolverError::from_construction)?;
    debug!(?mode, edges = wire.edge_count(), "Constructed generatrix");
    Ok(GeneratrixCurve { mode, wire })
}

/// Close the generatrix back to its start through the axis.
///
/// Appends `end → axis(end) → axis(start) → start`, skipping zero-length
/// segments. A generatrix that is already closed is returned unchanged.
pub fn close_along_axis(
    kernel: &dyn GeometryKernel,
    generatrix: &GeneratrixCurve,
) -> RevolverResult<Wire> {
    let wire = generatrix.wire();
    if wire.is_closed() {
        return Ok(wire.clone());
    }

    let start = wire.start();
    let end = wire.end();
    let corners = [
        end,
        REVOLUTION_AXIS.project(end),
        REVOLUTION_AXIS.project(start),
        start,
    ];

    let mut edges = wire.edges().to_vec();
    for pair in corners.windows(2) {
        if pair[0].distance(pair[1]) > LINEAR_TOLERANCE {
            edges.push(
                kernel
                    .make_line(pair[0], pair[1])
                    .map_err(RevolverError::from_construction)?,
            );
        }
    }

    kernel
        .make_wire(edges)
        .map_err(RevolverError::from_construction)
}

/// Planar face bounded by the generatrix and the axis
pub fn build_face(kernel: &dyn GeometryKernel, generatrix: &GeneratrixCurve) -> RevolverResult<Face> {
    let boundary = close_along_axis(kernel, generatrix)?;
    let closing_edges = boundary.edge_count() - generatrix.edge_count();
    let face = kernel
        .make_face(boundary)
        .map_err(RevolverError::from_construction)?;
    debug!(closing_edges, area = face.area(), "Built profile face");
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileParams, ProfileSample, build_profile};
    use rv_cad::TruckKernel;

    fn profile(pairs: &[(f64, f64)]) -> ScaledProfile {
        let samples: Vec<_> = pairs
            .iter()
            .map(|(z, r)| ProfileSample::new(*z, *r))
            .collect();
        build_profile(&samples, &ProfileParams::default()).unwrap()
    }

    #[test]
    fn test_linear_mode_has_one_edge_per_pair() {
        let kernel = TruckKernel::new();
        for n in 2..8 {
            let pairs: Vec<_> = (0..n).map(|i| (i as f64, 3.0 + (i % 2) as f64)).collect();
            let curve = construct_generatrix(&kernel, &profile(&pairs), FitMode::Linear).unwrap();
            assert_eq!(curve.edge_count(), n - 1);
        }
    }

    #[test]
    fn test_smooth_mode_is_single_edge() {
        let kernel = TruckKernel::new();
        let pairs = [(0.0, 5.0), (3.0, 6.0), (6.0, 4.0), (10.0, 5.0)];
        let curve = construct_generatrix(&kernel, &profile(&pairs), FitMode::Smooth).unwrap();
        assert_eq!(curve.edge_count(), 1);
        assert_eq!(curve.mode(), FitMode::Smooth);
    }

    #[test]
    fn test_duplicate_points_are_degenerate() {
        let kernel = TruckKernel::new();
        let pairs = [(0.0, 5.0), (0.0, 5.0), (10.0, 5.0)];
        for mode in [FitMode::Linear, FitMode::Smooth] {
            let result = construct_generatrix(&kernel, &profile(&pairs), mode);
            assert!(matches!(result, Err(RevolverError::DegenerateGeometry(_))));
        }
    }

    #[test]
    fn test_closing_skips_segments_on_axis() {
        let kernel = TruckKernel::new();
        // Ends on the axis: only the axis segment and the top segment are added
        let curve =
            construct_generatrix(&kernel, &profile(&[(0.0, 5.0), (10.0, 5.0), (10.0, 0.0)]), FitMode::Linear)
                .unwrap();
        let wire = close_along_axis(&kernel, &curve).unwrap();
        assert_eq!(wire.edge_count(), 2 + 2);
        assert!(wire.is_closed());
    }

    #[test]
    fn test_closing_adds_three_segments_off_axis() {
        let kernel = TruckKernel::new();
        let curve =
            construct_generatrix(&kernel, &profile(&[(0.0, 5.0), (10.0, 4.0)]), FitMode::Linear).unwrap();
        let wire = close_along_axis(&kernel, &curve).unwrap();
        assert_eq!(wire.edge_count(), 1 + 3);
    }

    #[test]
    fn test_closed_profile_not_reclosed() {
        let kernel = TruckKernel::new();
        let pairs = [(0.0, 2.0), (0.0, 4.0), (2.0, 4.0), (2.0, 2.0), (0.0, 2.0)];
        let curve = construct_generatrix(&kernel, &profile(&pairs), FitMode::Linear).unwrap();
        let wire = close_along_axis(&kernel, &curve).unwrap();
        assert_eq!(wire.edge_count(), 4);
        assert!(build_face(&kernel, &curve).is_ok());
    }

    #[test]
    fn test_self_intersecting_profile_is_degenerate() {
        let kernel = TruckKernel::new();
        // Last edge climbs back through the closing segment at the start height
        let pairs = [(0.0, 4.0), (3.0, 2.0), (-2.0, 1.0)];
        let curve = construct_generatrix(&kernel, &profile(&pairs), FitMode::Linear).unwrap();
        assert!(matches!(
            build_face(&kernel, &curve),
            Err(RevolverError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_profile_on_axis_has_no_area() {
        let kernel = TruckKernel::new();
        let curve =
            construct_generatrix(&kernel, &profile(&[(0.0, 0.0), (10.0, 0.0)]), FitMode::Linear).unwrap();
        assert!(matches!(
            build_face(&kernel, &curve),
            Err(RevolverError::DegenerateGeometry(_))
        ));
    }
}
