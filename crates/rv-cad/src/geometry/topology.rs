//! Edges, wires and planar faces

use glam::{DVec2, DVec3};

use super::curve::Curve;
use crate::constants::LINEAR_TOLERANCE;
use crate::kernel::{KernelError, KernelResult};

/// A bounded curve with a non-zero length
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    curve: Curve,
}

impl Edge {
    /// Wrap a curve as an edge, rejecting zero-length curves
    pub fn new(curve: Curve) -> KernelResult<Self> {
        if curve.control_points().iter().any(|p| !p.is_finite()) {
            return Err(KernelError::InvalidProfile(
                "edge geometry must be finite".to_string(),
            ));
        }
        if curve.is_point(LINEAR_TOLERANCE) {
            let start = curve.start();
            return Err(KernelError::DegenerateGeometry(format!(
                "zero-length edge at ({:.6}, {:.6}, {:.6})",
                start.x, start.y, start.z
            )));
        }
        Ok(Self { curve })
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn start(&self) -> DVec3 {
        self.curve.start()
    }

    pub fn end(&self) -> DVec3 {
        self.curve.end()
    }
}

/// An ordered chain of connected edges
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    edges: Vec<Edge>,
}

impl Wire {
    /// Chain edges into a wire. Each edge must start where the previous one ends.
    pub fn new(edges: Vec<Edge>) -> KernelResult<Self> {
        if edges.is_empty() {
            return Err(KernelError::InvalidProfile("wire has no edges".to_string()));
        }
        for (i, pair) in edges.windows(2).enumerate() {
            let gap = pair[0].end().distance(pair[1].start());
            if gap > LINEAR_TOLERANCE {
                return Err(KernelError::InvalidProfile(format!(
                    "edges {} and {} are not connected (gap {:.3e})",
                    i,
                    i + 1,
                    gap
                )));
            }
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn start(&self) -> DVec3 {
        self.edges[0].start()
    }

    pub fn end(&self) -> DVec3 {
        self.edges[self.edges.len() - 1].end()
    }

    pub fn is_closed(&self) -> bool {
        self.start().distance(self.end()) <= LINEAR_TOLERANCE
    }
}

/// A planar region bounded by a closed wire
///
/// Faces are built by a kernel backend, which validates the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    boundary: Wire,
    origin: DVec3,
    normal: DVec3,
    area: f64,
}

impl Face {
    pub(crate) fn new(boundary: Wire, origin: DVec3, normal: DVec3, area: f64) -> Self {
        Self {
            boundary,
            origin,
            normal,
            area,
        }
    }

    pub fn boundary(&self) -> &Wire {
        &self.boundary
    }

    /// A point on the face plane
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Unit normal; the boundary runs counter-clockwise around it
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Enclosed area of the boundary polyline
    pub fn area(&self) -> f64 {
        self.area
    }
}

/// Plane of a closed polyline: `(centroid, unit normal, enclosed area)`.
///
/// The closing point must not be repeated.
pub(crate) fn polygon_plane(points: &[DVec3]) -> KernelResult<(DVec3, DVec3, f64)> {
    if points.len() < 3 {
        return Err(KernelError::DegenerateGeometry(
            "face boundary encloses no area".to_string(),
        ));
    }

    // Newell's method: robust normal for any simple polygon
    let newell = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(DVec3::ZERO, |acc, (a, b)| {
            acc + DVec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            )
        });
    let area = 0.5 * newell.length();
    if area <= LINEAR_TOLERANCE * LINEAR_TOLERANCE {
        return Err(KernelError::DegenerateGeometry(
            "face boundary encloses zero area".to_string(),
        ));
    }
    let origin = points.iter().copied().sum::<DVec3>() / points.len() as f64;
    Ok((origin, newell / newell.length(), area))
}

/// Reject a closed polyline whose segments cross, touch or fold back
pub(crate) fn ensure_simple(points: &[DVec3], origin: DVec3, normal: DVec3) -> KernelResult<()> {
    let (u_axis, v_axis) = plane_basis(normal);
    let flat: Vec<DVec2> = points
        .iter()
        .map(|p| DVec2::new((*p - origin).dot(u_axis), (*p - origin).dot(v_axis)))
        .collect();
    match find_self_intersection(&flat) {
        Some((i, j)) => Err(KernelError::DegenerateGeometry(format!(
            "face boundary self-intersects near ({:.6}, {:.6}, {:.6}) and ({:.6}, {:.6}, {:.6})",
            points[i].x, points[i].y, points[i].z, points[j].x, points[j].y, points[j].z
        ))),
        None => Ok(()),
    }
}

fn plane_basis(normal: DVec3) -> (DVec3, DVec3) {
    let helper = if normal.x.abs() < 0.9 {
        DVec3::X
    } else {
        DVec3::Y
    };
    let u = normal.cross(helper).normalize();
    let v = normal.cross(u);
    (u, v)
}

/// Signed distance of `c` from the line through `a` and `b`
fn side(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    let ab = b - a;
    let len = ab.length();
    if len == 0.0 {
        return (c - a).length();
    }
    ab.perp_dot(c - a) / len
}

fn within_bounds(a: DVec2, b: DVec2, p: DVec2, eps: f64) -> bool {
    p.x >= a.x.min(b.x) - eps
        && p.x <= a.x.max(b.x) + eps
        && p.y >= a.y.min(b.y) - eps
        && p.y <= a.y.max(b.y) + eps
}

/// True if closed segments `p1p2` and `q1q2` share any point (within `eps`)
fn segments_touch(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2, eps: f64) -> bool {
    let d1 = side(q1, q2, p1);
    let d2 = side(q1, q2, p2);
    let d3 = side(p1, p2, q1);
    let d4 = side(p1, p2, q2);

    let straddles = |a: f64, b: f64| (a > eps && b < -eps) || (a < -eps && b > eps);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= eps && within_bounds(q1, q2, p1, eps))
        || (d2.abs() <= eps && within_bounds(q1, q2, p2, eps))
        || (d3.abs() <= eps && within_bounds(p1, p2, q1, eps))
        || (d4.abs() <= eps && within_bounds(p1, p2, q2, eps))
}

/// Find two boundary vertices whose segments cross or overlap
fn find_self_intersection(points: &[DVec2]) -> Option<(usize, usize)> {
    let n = points.len();
    let eps = LINEAR_TOLERANCE;
    let segment = |i: usize| (points[i], points[(i + 1) % n]);

    for i in 0..n {
        let (a0, a1) = segment(i);

        // Adjacent segment folding back onto this one
        let (b0, b1) = segment((i + 1) % n);
        let u = a1 - a0;
        let v = b1 - b0;
        let (lu, lv) = (u.length(), v.length());
        if lu > 0.0 && lv > 0.0 {
            let cross = u.perp_dot(v) / (lu * lv);
            if cross.abs() <= 1e-12 && u.dot(v) < 0.0 {
                return Some((i, (i + 1) % n));
            }
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b0, b1) = segment(j);
            if segments_touch(a0, a1, b0, b1, eps) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_edge(a: DVec3, b: DVec3) -> Edge {
        Edge::new(Curve::line(a, b)).unwrap()
    }

    fn xz(r: f64, z: f64) -> DVec3 {
        DVec3::new(r, 0.0, z)
    }

    fn check_simple(points: &[DVec3]) -> KernelResult<()> {
        let (origin, normal, _) = polygon_plane(points)?;
        ensure_simple(points, origin, normal)
    }

    #[test]
    fn test_edge_rejects_zero_length() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let result = Edge::new(Curve::line(p, p));
        assert!(matches!(result, Err(KernelError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_edge_rejects_non_finite() {
        let result = Edge::new(Curve::line(DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 1.0)));
        assert!(matches!(result, Err(KernelError::InvalidProfile(_))));
    }

    #[test]
    fn test_wire_rejects_gap() {
        let a = line_edge(xz(0.0, 0.0), xz(1.0, 0.0));
        let b = line_edge(xz(2.0, 0.0), xz(2.0, 1.0));
        assert!(matches!(
            Wire::new(vec![a, b]),
            Err(KernelError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_open_wire_ends() {
        let wire = Wire::new(vec![
            line_edge(xz(5.0, 0.0), xz(5.0, -10.0)),
            line_edge(xz(5.0, -10.0), xz(0.0, -10.0)),
        ])
        .unwrap();
        assert!(!wire.is_closed());
        assert_eq!(wire.edge_count(), 2);
        assert_eq!(wire.start(), xz(5.0, 0.0));
        assert_eq!(wire.end(), xz(0.0, -10.0));
    }

    #[test]
    fn test_rectangle_plane() {
        let points = [xz(0.0, 0.0), xz(5.0, 0.0), xz(5.0, -10.0), xz(0.0, -10.0)];
        let (origin, normal, area) = polygon_plane(&points).unwrap();
        assert!((area - 50.0).abs() < 1e-9);
        assert!((normal.y.abs() - 1.0).abs() < 1e-12);
        assert!(origin.abs_diff_eq(xz(2.5, -5.0), 1e-12));
        assert!(check_simple(&points).is_ok());
    }

    #[test]
    fn test_bow_tie_is_not_simple() {
        let points = [xz(0.0, 0.0), xz(4.0, 4.0), xz(4.0, 0.0), xz(0.0, 4.0)];
        assert!(matches!(
            check_simple(&points),
            Err(KernelError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_collinear_boundary_has_no_plane() {
        let points = [xz(0.0, 0.0), xz(0.0, -5.0), xz(0.0, -10.0)];
        assert!(matches!(
            polygon_plane(&points),
            Err(KernelError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_touching_vertex_is_not_simple() {
        // Fourth vertex lands on the first edge
        let points = [
            xz(0.0, 0.0),
            xz(4.0, 0.0),
            xz(4.0, 4.0),
            xz(2.0, 0.0),
            xz(0.0, 4.0),
        ];
        assert!(matches!(
            check_simple(&points),
            Err(KernelError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_fold_back_is_not_simple() {
        let points = [xz(0.0, 0.0), xz(4.0, 0.0), xz(2.0, 0.0), xz(2.0, 3.0)];
        assert!(check_simple(&points).is_err());
    }
}
