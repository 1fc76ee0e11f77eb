//! Conversions between the neutral geometry and Truck

use glam::DVec3;
use truck_modeling::{
    BSplineCurve, Curve as TruckCurve, Edge as TruckEdge, KnotVec, ParametricCurve, Point3,
    Vector3, Vertex, Wire as TruckWire, builder,
};

use crate::constants::{GAUSS_NODES, GAUSS_WEIGHTS, SPLINE_SAMPLES_PER_SPAN};
use crate::geometry::{Curve, Wire};
use crate::kernel::{KernelError, KernelResult};

pub(super) fn point3(p: DVec3) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

pub(super) fn vector3(v: DVec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

pub(super) fn dvec3(p: Point3) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

/// Truck B-spline carrying the same geometry; lines become degree 1
pub(super) fn bspline(curve: &Curve) -> KernelResult<BSplineCurve<Point3>> {
    let (knots, points) = match curve {
        Curve::Line(line) => (vec![0.0, 0.0, 1.0, 1.0], vec![line.start, line.end]),
        Curve::BSpline(spline) => (spline.knots().to_vec(), spline.control_points().to_vec()),
    };
    BSplineCurve::try_new(KnotVec::from(knots), points.into_iter().map(point3).collect())
        .map_err(|e| KernelError::DegenerateGeometry(format!("invalid B-spline: {e:?}")))
}

/// A neutral curve evaluated through Truck
pub(super) struct Evaluated {
    curve: BSplineCurve<Point3>,
    breakpoints: Vec<f64>,
    is_line: bool,
}

impl Evaluated {
    pub fn new(curve: &Curve) -> KernelResult<Self> {
        Ok(Self {
            curve: bspline(curve)?,
            breakpoints: curve.breakpoints(),
            is_line: curve.is_line(),
        })
    }

    pub fn point(&self, t: f64) -> DVec3 {
        dvec3(self.curve.subs(t))
    }

    pub fn derivative(&self, t: f64) -> DVec3 {
        let d = self.curve.der(t);
        DVec3::new(d.x, d.y, d.z)
    }

    /// Polyline approximation, endpoints included
    pub fn sample(&self) -> Vec<DVec3> {
        if self.is_line {
            return self.breakpoints.iter().map(|t| self.point(*t)).collect();
        }
        let mut points = vec![self.point(self.breakpoints[0])];
        for w in self.breakpoints.windows(2) {
            for i in 1..=SPLINE_SAMPLES_PER_SPAN {
                let t = i as f64 / SPLINE_SAMPLES_PER_SPAN as f64;
                points.push(self.point(w[0] + (w[1] - w[0]) * t));
            }
        }
        points
    }

    /// Integrate `f(point, derivative)` over the domain, span by span
    pub fn integrate(&self, f: impl Fn(DVec3, DVec3) -> f64) -> f64 {
        self.breakpoints
            .windows(2)
            .map(|w| {
                let (a, b) = (w[0], w[1]);
                let half = 0.5 * (b - a);
                let mid = 0.5 * (a + b);
                GAUSS_NODES
                    .iter()
                    .zip(GAUSS_WEIGHTS.iter())
                    .map(|(x, w)| {
                        let t = mid + half * x;
                        w * f(self.point(t), self.derivative(t))
                    })
                    .sum::<f64>()
                    * half
            })
            .sum()
    }
}

/// Boundary polyline of a wire without repeated joints.
///
/// For a closed wire the closing point is not repeated.
pub(super) fn sample_wire(wire: &Wire) -> KernelResult<Vec<DVec3>> {
    let mut points: Vec<DVec3> = Vec::new();
    for edge in wire.edges() {
        let samples = Evaluated::new(edge.curve())?.sample();
        let skip = usize::from(!points.is_empty());
        points.extend(samples.into_iter().skip(skip));
    }
    if wire.is_closed() && points.len() > 1 {
        points.pop();
    }
    Ok(points)
}

/// Truck edge between two shared vertices
fn edge_between(front: &Vertex, back: &Vertex, curve: &Curve) -> KernelResult<TruckEdge> {
    match curve {
        Curve::Line(_) => Ok(builder::line(front, back)),
        Curve::BSpline(_) => {
            TruckEdge::try_new(front, back, TruckCurve::BSplineCurve(bspline(curve)?))
                .map_err(|e| KernelError::DegenerateGeometry(format!("invalid edge: {e:?}")))
        }
    }
}

/// Truck wire through consecutive curves.
///
/// Neighbouring edges share their vertex. A closed chain ends on the vertex
/// it started from.
pub(super) fn truck_wire(curves: &[&Curve], closed: bool) -> KernelResult<TruckWire> {
    let Some(first) = curves.first() else {
        return Err(KernelError::InvalidProfile("wire has no edges".to_string()));
    };
    let mut vertices: Vec<Vertex> = vec![builder::vertex(point3(first.start()))];
    let open_ends = if closed { curves.len() - 1 } else { curves.len() };
    vertices.extend(
        curves[..open_ends]
            .iter()
            .map(|curve| builder::vertex(point3(curve.end()))),
    );
    if closed {
        vertices.push(vertices[0].clone());
    }

    let edges = curves
        .iter()
        .zip(vertices.windows(2))
        .map(|(curve, pair)| edge_between(&pair[0], &pair[1], curve))
        .collect::<KernelResult<Vec<TruckEdge>>>()?;
    Ok(edges.into())
}
