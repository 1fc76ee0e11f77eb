//! Curves: straight segments and clamped B-splines
//!
//! These are kernel-neutral descriptions. Evaluation belongs to the kernel
//! backend. Interpolation uses chord-length parameters with averaged knots
//! and solves the collocation system with nalgebra; the basis recurrences
//! here only fill that system.

use glam::DVec3;
use nalgebra::DMatrix;

use crate::constants::{LINEAR_TOLERANCE, MAX_INTERPOLATION_DEGREE};
use crate::kernel::{KernelError, KernelResult};

/// A straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: DVec3,
    pub end: DVec3,
}

impl LineSegment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Non-rational clamped B-spline curve
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineCurve {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<DVec3>,
}

impl BSplineCurve {
    /// Create a B-spline from its degree, knot vector and control points.
    ///
    /// The knot vector must hold `control_points.len() + degree + 1`
    /// non-decreasing values.
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<DVec3>) -> KernelResult<Self> {
        if control_points.len() <= degree {
            return Err(KernelError::InvalidProfile(format!(
                "degree {} B-spline needs more than {} control points, got {}",
                degree,
                degree,
                control_points.len()
            )));
        }
        if knots.len() != control_points.len() + degree + 1 {
            return Err(KernelError::InvalidProfile(format!(
                "expected {} knots, got {}",
                control_points.len() + degree + 1,
                knots.len()
            )));
        }
        if knots.windows(2).any(|w| w[1] < w[0] || !w[0].is_finite()) {
            return Err(KernelError::InvalidProfile(
                "knot vector must be finite and non-decreasing".to_string(),
            ));
        }
        if knots[knots.len() - degree - 1] - knots[degree] <= 0.0 {
            return Err(KernelError::DegenerateGeometry(
                "B-spline parameter domain is empty".to_string(),
            ));
        }
        Ok(Self {
            degree,
            knots,
            control_points,
        })
    }

    /// Interpolate the given points in order.
    ///
    /// The curve passes through every point. Degree is `min(3, n - 1)`,
    /// parameters are chord-length normalized to [0, 1].
    pub fn interpolate(points: &[DVec3]) -> KernelResult<Self> {
        if points.len() < 2 {
            return Err(KernelError::InvalidProfile(format!(
                "interpolation needs at least 2 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(KernelError::InvalidProfile(
                "interpolation points must be finite".to_string(),
            ));
        }

        let count = points.len();
        let degree = MAX_INTERPOLATION_DEGREE.min(count - 1);
        let params = chord_length_parameters(points)?;

        // Averaged interior knots, clamped ends
        let mut knots = vec![0.0; degree + 1];
        for j in 1..count - degree {
            let sum: f64 = params[j..j + degree].iter().sum();
            knots.push(sum / degree as f64);
        }
        knots.extend(std::iter::repeat_n(1.0, degree + 1));

        let mut matrix = DMatrix::<f64>::zeros(count, count);
        for (row, &u) in params.iter().enumerate() {
            let span = find_span(&knots, degree, count, u);
            let basis = basis_functions(&knots, degree, span, u);
            for (i, value) in basis.iter().enumerate() {
                matrix[(row, span - degree + i)] = *value;
            }
        }

        let rhs = DMatrix::<f64>::from_fn(count, 3, |row, col| points[row][col]);
        let solution = matrix.lu().solve(&rhs).ok_or_else(|| {
            KernelError::DegenerateGeometry("interpolation system is singular".to_string())
        })?;

        let control_points: Vec<DVec3> = (0..count)
            .map(|row| {
                DVec3::new(
                    solution[(row, 0)],
                    solution[(row, 1)],
                    solution[(row, 2)],
                )
            })
            .collect();
        if control_points.iter().any(|p| !p.is_finite()) {
            return Err(KernelError::DegenerateGeometry(
                "interpolation produced non-finite control points".to_string(),
            ));
        }

        // Pin the ends exactly; clamped splines interpolate them anyway
        let mut control_points = control_points;
        control_points[0] = points[0];
        control_points[count - 1] = points[count - 1];

        Self::new(degree, knots, control_points)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.control_points
    }

    /// Parameter domain `(u_min, u_max)`
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.knots.len() - self.degree - 1],
        )
    }

    /// Distinct knot values inside the domain, including both ends
    pub fn breakpoints(&self) -> Vec<f64> {
        let (lo, hi) = self.domain();
        let mut out: Vec<f64> = Vec::new();
        for &k in &self.knots {
            if k < lo || k > hi {
                continue;
            }
            if out.last().is_none_or(|&last| k > last) {
                out.push(k);
            }
        }
        out
    }

    /// Same curve traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        let (lo, hi) = self.domain();
        let knots = self.knots.iter().rev().map(|k| lo + hi - k).collect();
        let control_points = self.control_points.iter().rev().copied().collect();
        Self {
            degree: self.degree,
            knots,
            control_points,
        }
    }

    /// Apply a point map to the control points.
    ///
    /// Only valid for affine maps, under which B-splines are invariant.
    pub fn map_points(&self, f: impl Fn(DVec3) -> DVec3) -> Self {
        Self {
            degree: self.degree,
            knots: self.knots.clone(),
            control_points: self.control_points.iter().map(|p| f(*p)).collect(),
        }
    }
}

/// Chord-length parameters normalized to [0, 1]
pub fn chord_length_parameters(points: &[DVec3]) -> KernelResult<Vec<f64>> {
    let chords: Vec<f64> = points.windows(2).map(|w| w[0].distance(w[1])).collect();
    if let Some(index) = chords.iter().position(|c| *c <= LINEAR_TOLERANCE) {
        return Err(KernelError::DegenerateGeometry(format!(
            "points {} and {} coincide",
            index,
            index + 1
        )));
    }
    let total: f64 = chords.iter().sum();
    let mut params = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    params.push(0.0);
    for chord in &chords[..chords.len() - 1] {
        acc += chord;
        params.push(acc / total);
    }
    params.push(1.0);
    Ok(params)
}

/// Knot span index containing `u`
fn find_span(knots: &[f64], degree: usize, control_count: usize, u: f64) -> usize {
    let n = control_count - 1;
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[degree] {
        return degree;
    }
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-vanishing basis functions `N[span-degree..=span]` at `u`
fn basis_functions(knots: &[f64], degree: usize, span: usize, u: f64) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    values[0] = 1.0;
    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { values[r] / denom };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }
    values
}

/// A curve usable as an edge geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line(LineSegment),
    BSpline(BSplineCurve),
}

impl Curve {
    pub fn line(start: DVec3, end: DVec3) -> Self {
        Curve::Line(LineSegment::new(start, end))
    }

    /// Parameter range of the curve
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Curve::Line(_) => (0.0, 1.0),
            Curve::BSpline(spline) => spline.domain(),
        }
    }

    /// First point; clamped splines start on their first control point
    pub fn start(&self) -> DVec3 {
        match self {
            Curve::Line(line) => line.start,
            Curve::BSpline(spline) => spline.control_points[0],
        }
    }

    /// Last point; clamped splines end on their last control point
    pub fn end(&self) -> DVec3 {
        match self {
            Curve::Line(line) => line.end,
            Curve::BSpline(spline) => spline.control_points[spline.control_points.len() - 1],
        }
    }

    /// Control polygon: the end points of a line, the control points of a spline
    pub fn control_points(&self) -> Vec<DVec3> {
        match self {
            Curve::Line(line) => vec![line.start, line.end],
            Curve::BSpline(spline) => spline.control_points.clone(),
        }
    }

    /// Parameters at which the curve is only piecewise smooth
    pub fn breakpoints(&self) -> Vec<f64> {
        match self {
            Curve::Line(_) => vec![0.0, 1.0],
            Curve::BSpline(spline) => spline.breakpoints(),
        }
    }

    /// True if the whole curve stays within `tolerance` of its start.
    ///
    /// A B-spline lies in the convex hull of its control points, so checking
    /// the control polygon is enough.
    pub fn is_point(&self, tolerance: f64) -> bool {
        let start = self.start();
        self.control_points()
            .iter()
            .all(|p| p.distance(start) <= tolerance)
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve::Line(line) => Curve::line(line.end, line.start),
            Curve::BSpline(spline) => Curve::BSpline(spline.reversed()),
        }
    }

    /// Apply an affine point map
    pub fn map_points(&self, f: impl Fn(DVec3) -> DVec3) -> Self {
        match self {
            Curve::Line(line) => Curve::line(f(line.start), f(line.end)),
            Curve::BSpline(spline) => Curve::BSpline(spline.map_points(f)),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Curve::Line(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<DVec3> {
        vec![
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(6.0, 0.0, -2.0),
            DVec3::new(4.0, 0.0, -5.0),
            DVec3::new(7.0, 0.0, -7.0),
            DVec3::new(3.0, 0.0, -10.0),
        ]
    }

    #[test]
    fn test_interpolate_cubic_layout() {
        let points = sample_points();
        let spline = BSplineCurve::interpolate(&points).unwrap();
        assert_eq!(spline.degree(), 3);
        assert_eq!(spline.control_points().len(), points.len());
        assert_eq!(spline.knots().len(), points.len() + 4);
        assert_eq!(spline.domain(), (0.0, 1.0));
        assert_eq!(spline.control_points()[0], points[0]);
        assert_eq!(spline.control_points()[4], points[4]);
    }

    #[test]
    fn test_interior_knots_average_parameters() {
        let points = sample_points();
        let spline = BSplineCurve::interpolate(&points).unwrap();
        let params = chord_length_parameters(&points).unwrap();
        let expected = (params[1] + params[2] + params[3]) / 3.0;
        assert!((spline.knots()[4] - expected).abs() < 1e-15);
        assert_eq!(spline.breakpoints(), vec![0.0, expected, 1.0]);
    }

    #[test]
    fn test_interpolate_two_points_is_linear() {
        let a = DVec3::new(1.0, 0.0, 0.0);
        let b = DVec3::new(3.0, 0.0, -4.0);
        let spline = BSplineCurve::interpolate(&[a, b]).unwrap();
        assert_eq!(spline.degree(), 1);
        assert_eq!(spline.knots(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(spline.control_points(), &[a, b]);
    }

    #[test]
    fn test_interpolate_three_points_is_quadratic() {
        let spline = BSplineCurve::interpolate(&sample_points()[..3]).unwrap();
        assert_eq!(spline.degree(), 2);
        assert_eq!(spline.knots().len(), 6);
    }

    #[test]
    fn test_interpolate_rejects_duplicate_points() {
        let p = DVec3::new(1.0, 0.0, 1.0);
        let result = BSplineCurve::interpolate(&[p, p, DVec3::ZERO]);
        assert!(matches!(result, Err(KernelError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_interpolate_rejects_single_point() {
        let result = BSplineCurve::interpolate(&[DVec3::ONE]);
        assert!(matches!(result, Err(KernelError::InvalidProfile(_))));
    }

    #[test]
    fn test_straight_points_give_collinear_control_points() {
        let points = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
        ];
        let spline = BSplineCurve::interpolate(&points).unwrap();
        for p in spline.control_points() {
            assert!(p.y.abs() < 1e-12 && p.z.abs() < 1e-12);
            assert!((-1e-9..=3.0 + 1e-9).contains(&p.x));
        }
    }

    #[test]
    fn test_reversed_spline_swaps_ends() {
        let curve = Curve::BSpline(BSplineCurve::interpolate(&sample_points()).unwrap());
        let rev = curve.reversed();
        assert_eq!(rev.start(), curve.end());
        assert_eq!(rev.end(), curve.start());
        assert_eq!(rev.reversed(), curve);
    }

    #[test]
    fn test_is_point() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert!(Curve::line(p, p).is_point(LINEAR_TOLERANCE));
        assert!(!Curve::line(p, DVec3::ZERO).is_point(LINEAR_TOLERANCE));
        // Closed spline loop: ends coincide but the curve has extent
        let spline = BSplineCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![p, DVec3::ZERO, p],
        )
        .unwrap();
        assert!(!Curve::BSpline(spline).is_point(LINEAR_TOLERANCE));
    }

    #[test]
    fn test_new_rejects_bad_knot_count() {
        let result = BSplineCurve::new(1, vec![0.0, 1.0], vec![DVec3::ZERO, DVec3::X]);
        assert!(matches!(result, Err(KernelError::InvalidProfile(_))));
    }
}
