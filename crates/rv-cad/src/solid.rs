//! Solids of revolution
//!
//! A [`RevolvedShape`] is a handle on a solid owned by the kernel that built
//! it. Alongside the id it keeps the generatrix of every face in the local
//! `(radius, 0, height)` coordinates of its [`AxisFrame`], with the measures
//! the kernel computed for it. Faces are ordered along the boundary, which
//! runs counter-clockwise in the radius/height plane.

use glam::DVec3;
use uuid::Uuid;

use crate::constants::{FULL_TURN, LINEAR_TOLERANCE};
use crate::geometry::{BoundingBox, Curve, Face};
use crate::kernel::{Axis3D, KernelError, KernelResult};

/// Orthonormal frame attached to the revolution axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    /// Point on the axis
    pub origin: DVec3,
    /// Axis direction (height grows along it)
    pub axial: DVec3,
    /// Direction of the profile half-plane (radius grows along it)
    pub radial: DVec3,
    /// `axial × radial`, the direction of increasing sweep angle at 0
    pub tangential: DVec3,
}

impl AxisFrame {
    pub fn new(origin: DVec3, axial: DVec3, radial: DVec3) -> Self {
        Self {
            origin,
            axial,
            radial,
            tangential: axial.cross(radial),
        }
    }

    /// `(radius, out-of-plane, height)` coordinates of a world point
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        let offset = point - self.origin;
        DVec3::new(
            offset.dot(self.radial),
            offset.dot(self.tangential),
            offset.dot(self.axial),
        )
    }
}

/// One face of a revolved shape: a boundary edge swept about the axis
#[derive(Debug, Clone, PartialEq)]
pub struct RevolvedFace {
    generatrix: Curve,
    area: f64,
    swept_volume: f64,
}

impl RevolvedFace {
    pub(crate) fn new(generatrix: Curve, area: f64, swept_volume: f64) -> Self {
        Self {
            generatrix,
            area,
            swept_volume,
        }
    }

    /// Generatrix in local `(radius, 0, height)` coordinates
    pub fn generatrix(&self) -> &Curve {
        &self.generatrix
    }

    /// Area of the swept surface
    pub fn area(&self) -> f64 {
        self.area
    }

    /// `π ∫ r² dh` along the generatrix; summed over a closed boundary this
    /// is the enclosed volume
    pub fn swept_volume(&self) -> f64 {
        self.swept_volume
    }

    /// True if the surface degenerates to a disc or annulus
    pub fn is_planar(&self) -> bool {
        self.generatrix
            .control_points()
            .iter()
            .all(|p| (p.z - self.generatrix.start().z).abs() <= LINEAR_TOLERANCE)
    }
}

/// An immutable solid produced by a full revolution
#[derive(Debug, Clone, PartialEq)]
pub struct RevolvedShape {
    id: Uuid,
    frame: AxisFrame,
    faces: Vec<RevolvedFace>,
    max_radius: f64,
    height_range: (f64, f64),
}

impl RevolvedShape {
    pub(crate) fn new(
        id: Uuid,
        frame: AxisFrame,
        faces: Vec<RevolvedFace>,
        max_radius: f64,
        height_range: (f64, f64),
    ) -> Self {
        Self {
            id,
            frame,
            faces,
            max_radius,
            height_range,
        }
    }

    /// Unique identity of this shape
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn frame(&self) -> &AxisFrame {
        &self.frame
    }

    pub fn faces(&self) -> &[RevolvedFace] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Largest distance of the shape from its axis
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Enclosed volume (Pappus); exact for straight generatrices
    pub fn volume(&self) -> f64 {
        self.faces.iter().map(RevolvedFace::swept_volume).sum()
    }

    /// Total area of all faces
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(RevolvedFace::area).sum()
    }

    /// World-space bounds
    pub fn bounding_box(&self) -> BoundingBox {
        let (lo, hi) = self.height_range;
        let at = |h: f64| {
            BoundingBox::from_circle(
                self.frame.origin + self.frame.axial * h,
                self.frame.axial,
                self.max_radius,
            )
        };
        at(lo).union(&at(hi))
    }

    /// True if consecutive faces meet, directly or through the axis
    pub fn is_closed(&self) -> bool {
        let n = self.faces.len();
        (0..n).all(|i| {
            let end = self.faces[i].generatrix.end();
            let next = self.faces[(i + 1) % n].generatrix.start();
            end.distance(next) <= LINEAR_TOLERANCE
                || (end.x.abs() <= LINEAR_TOLERANCE && next.x.abs() <= LINEAR_TOLERANCE)
        })
    }
}

/// A face boundary placed in the frame of the revolution axis
#[derive(Debug, Clone)]
pub(crate) struct Meridian {
    pub frame: AxisFrame,
    /// Boundary curves in world space, counter-clockwise in the
    /// radius/height plane
    pub world: Vec<Curve>,
    /// The same curves in local `(radius, 0, height)` coordinates
    pub local: Vec<Curve>,
}

impl Meridian {
    /// Place a face boundary around `axis`.
    ///
    /// `samples` is the boundary polyline without its closing point. The
    /// face plane must contain the axis and the face must lie on one side
    /// of it.
    pub fn new(face: &Face, axis: &Axis3D, angle: f64, samples: &[DVec3]) -> KernelResult<Self> {
        if (angle - FULL_TURN).abs() > 1e-9 {
            return Err(KernelError::RevolutionFailed(format!(
                "only full revolutions are supported, got {angle} rad"
            )));
        }

        let axial = axis.direction.normalize();
        let normal = face.normal();
        if normal.dot(axial).abs() > 1e-9
            || (axis.origin - face.origin()).dot(normal).abs() > LINEAR_TOLERANCE
        {
            return Err(KernelError::RevolutionFailed(
                "revolution axis does not lie in the face plane".to_string(),
            ));
        }

        // Radial direction: pick the side of the axis the face lies on
        let mut radial = axial.cross(normal).normalize();
        let radius_of = |p: &DVec3| (*p - axis.origin).dot(radial);
        let max_r = samples.iter().map(radius_of).fold(f64::NEG_INFINITY, f64::max);
        let min_r = samples.iter().map(radius_of).fold(f64::INFINITY, f64::min);
        if max_r > LINEAR_TOLERANCE && min_r < -LINEAR_TOLERANCE {
            return Err(KernelError::RevolutionFailed(format!(
                "profile crosses the revolution axis (radius spans {min_r:.6} to {max_r:.6})"
            )));
        }
        if max_r <= LINEAR_TOLERANCE {
            if min_r >= -LINEAR_TOLERANCE {
                return Err(KernelError::RevolutionFailed(
                    "profile lies on the revolution axis".to_string(),
                ));
            }
            radial = -radial;
        }

        let frame = AxisFrame::new(axis.origin, axial, radial);
        let to_local = |p: DVec3| {
            let local = frame.to_local(p);
            DVec3::new(local.x, 0.0, local.z)
        };

        // Counter-clockwise in the (radius, height) plane
        let local_points: Vec<DVec3> = samples.iter().map(|p| to_local(*p)).collect();
        let signed_area: f64 = local_points
            .iter()
            .zip(local_points.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.z - b.x * a.z)
            .sum::<f64>()
            * 0.5;

        let edges = face.boundary().edges();
        let world: Vec<Curve> = if signed_area < 0.0 {
            edges.iter().rev().map(|e| e.curve().reversed()).collect()
        } else {
            edges.iter().map(|e| e.curve().clone()).collect()
        };
        let local = world.iter().map(|c| c.map_points(to_local)).collect();

        Ok(Self {
            frame,
            world,
            local,
        })
    }

    /// True if the local curve at `index` runs along the axis
    pub fn on_axis(&self, index: usize) -> bool {
        self.local[index]
            .control_points()
            .iter()
            .all(|p| p.x.abs() <= LINEAR_TOLERANCE)
    }

    /// Curves to sweep, in boundary order.
    ///
    /// With no curve on the axis every curve is swept. Otherwise the result
    /// is the single run of off-axis curves, starting and ending on the axis.
    pub fn swept_curves(&self) -> KernelResult<Vec<usize>> {
        let n = self.local.len();
        let Some(last_axis) = (0..n).rev().find(|&i| self.on_axis(i)) else {
            return Ok((0..n).collect());
        };

        let rotated: Vec<usize> = (1..=n).map(|k| (last_axis + k) % n).collect();
        let run: Vec<usize> = rotated
            .iter()
            .copied()
            .take_while(|&i| !self.on_axis(i))
            .collect();
        if run.is_empty() {
            return Err(KernelError::RevolutionFailed(
                "every boundary edge lies on the axis".to_string(),
            ));
        }
        if rotated[run.len()..].iter().any(|&i| !self.on_axis(i)) {
            return Err(KernelError::RevolutionFailed(
                "profile meets the axis between its ends".to_string(),
            ));
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Edge, Wire, polygon_plane};

    fn xz(r: f64, z: f64) -> DVec3 {
        DVec3::new(r, 0.0, z)
    }

    fn polygon_face(points: &[DVec3]) -> Face {
        let edges = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| Edge::new(Curve::line(*a, *b)).unwrap())
            .collect();
        let (origin, normal, area) = polygon_plane(points).unwrap();
        Face::new(Wire::new(edges).unwrap(), origin, normal, area)
    }

    fn meridian(points: &[DVec3]) -> KernelResult<Meridian> {
        Meridian::new(&polygon_face(points), &Axis3D::Z, FULL_TURN, points)
    }

    #[test]
    fn test_cylinder_meridian_skips_axis_edge() {
        let m = meridian(&[xz(5.0, 0.0), xz(5.0, -10.0), xz(0.0, -10.0), xz(0.0, 0.0)]).unwrap();
        let swept = m.swept_curves().unwrap();
        assert_eq!(swept.len(), 3);
        assert!(m.local[swept[0]].start().x.abs() <= LINEAR_TOLERANCE);
        assert!(m.local[swept[2]].end().x.abs() <= LINEAR_TOLERANCE);
    }

    #[test]
    fn test_meridian_is_counter_clockwise() {
        let ccw = meridian(&[xz(0.0, 0.0), xz(3.0, 0.0), xz(3.0, 4.0), xz(0.0, 4.0)]).unwrap();
        let cw = meridian(&[xz(0.0, 0.0), xz(0.0, 4.0), xz(3.0, 4.0), xz(3.0, 0.0)]).unwrap();
        for m in [ccw, cw] {
            let swept = m.swept_curves().unwrap();
            let first = &m.local[swept[0]];
            // Leaves the axis along the bottom, moving outwards
            assert!(first.end().x > first.start().x);
            assert_eq!(first.start().z, 0.0);
        }
    }

    #[test]
    fn test_annulus_sweeps_every_edge() {
        let m = meridian(&[xz(2.0, 0.0), xz(4.0, 0.0), xz(4.0, 1.0), xz(2.0, 1.0)]).unwrap();
        assert_eq!(m.swept_curves().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_negative_radius_profile_is_mirrored() {
        let m = meridian(&[xz(0.0, 0.0), xz(-5.0, 0.0), xz(-5.0, -10.0), xz(0.0, -10.0)]).unwrap();
        assert_eq!(m.frame.radial, -DVec3::X);
        assert!(m.local.iter().all(|c| c.control_points().iter().all(|p| p.x >= 0.0)));
    }

    #[test]
    fn test_axis_crossing_profile_fails() {
        let result = meridian(&[xz(-2.0, 0.0), xz(3.0, 0.0), xz(3.0, 2.0), xz(-2.0, 2.0)]);
        assert!(matches!(result, Err(KernelError::RevolutionFailed(_))));
    }

    #[test]
    fn test_partial_revolution_rejected() {
        let points = [xz(0.0, 0.0), xz(3.0, 0.0), xz(0.0, 4.0)];
        let result = Meridian::new(&polygon_face(&points), &Axis3D::Z, std::f64::consts::PI, &points);
        assert!(matches!(result, Err(KernelError::RevolutionFailed(_))));
    }

    #[test]
    fn test_axis_outside_face_plane_rejected() {
        let points = [xz(0.0, 0.0), xz(3.0, 0.0), xz(0.0, 4.0)];
        let axis = Axis3D::new(DVec3::ZERO, DVec3::X + DVec3::Y);
        let result = Meridian::new(&polygon_face(&points), &axis, FULL_TURN, &points);
        assert!(matches!(result, Err(KernelError::RevolutionFailed(_))));
    }

    #[test]
    fn test_bounding_box_about_z() {
        let frame = AxisFrame::new(DVec3::ZERO, DVec3::Z, DVec3::X);
        let shape = RevolvedShape::new(Uuid::new_v4(), frame, Vec::new(), 5.0, (-10.0, 0.0));
        let bbox = shape.bounding_box();
        assert!(bbox.min.abs_diff_eq(DVec3::new(-5.0, -5.0, -10.0), 1e-12));
        assert!(bbox.max.abs_diff_eq(DVec3::new(5.0, 5.0, 0.0), 1e-12));
    }

    #[test]
    fn test_planar_face_detection() {
        let disc = RevolvedFace::new(Curve::line(xz(0.0, 1.0), xz(3.0, 1.0)), 0.0, 0.0);
        let wall = RevolvedFace::new(Curve::line(xz(3.0, 1.0), xz(3.0, 4.0)), 0.0, 0.0);
        assert!(disc.is_planar());
        assert!(!wall.is_planar());
    }
}
