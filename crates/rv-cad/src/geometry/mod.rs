//! Curve, topology and bounds primitives

mod bounds;
mod curve;
mod topology;

pub use bounds::BoundingBox;
pub use curve::{BSplineCurve, Curve, LineSegment, chord_length_parameters};
pub use topology::{Edge, Face, Wire};

pub(crate) use topology::{ensure_simple, polygon_plane};
