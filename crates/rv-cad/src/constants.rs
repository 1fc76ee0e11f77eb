//! Global constants for rv-cad

/// Distance below which two points are considered coincident (length units)
pub const LINEAR_TOLERANCE: f64 = 1e-7;

/// Angle of a full revolution in radians
pub const FULL_TURN: f64 = std::f64::consts::TAU;

/// Highest degree used when interpolating points with a B-spline
pub const MAX_INTERPOLATION_DEGREE: usize = 3;

/// Most segments a tessellation may place around the revolution axis
pub const MAX_ANGULAR_SEGMENTS: u32 = 4096;

/// Smallest chord tolerance handed to the mesher (length units)
pub const MIN_CHORD_TOLERANCE: f64 = 1e-5;

/// Samples per knot span when a B-spline is approximated by a polyline
/// for validation and bounds
pub const SPLINE_SAMPLES_PER_SPAN: usize = 16;

/// Gauss-Legendre nodes on [-1, 1] (5-point rule)
pub(crate) const GAUSS_NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683,
    0.0,
    0.538_469_310_105_683,
    0.906_179_845_938_664,
];

/// Gauss-Legendre weights matching [`GAUSS_NODES`]
pub(crate) const GAUSS_WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189,
    0.478_628_670_499_366,
    0.568_888_888_888_889,
    0.478_628_670_499_366,
    0.236_926_885_056_189,
];
