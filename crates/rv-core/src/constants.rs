//! Global constants for rv-core

use glam::DVec3;
use rv_cad::Axis3D;

/// Direction in which profile radii are laid out
pub const RADIAL_DIRECTION: DVec3 = DVec3::X;

/// Direction in which profile heights are laid out; also the revolution axis
pub const AXIAL_DIRECTION: DVec3 = DVec3::Z;

/// Normal of the plane holding the profile (the X–Z plane)
pub const PROFILE_PLANE_NORMAL: DVec3 = DVec3::Y;

/// The fixed axis every profile is revolved about
pub const REVOLUTION_AXIS: Axis3D = Axis3D {
    origin: DVec3::ZERO,
    direction: AXIAL_DIRECTION,
};

/// Fewest samples a profile may have
pub const MIN_PROFILE_SAMPLES: usize = 2;

/// Config file extension selecting the RON format
pub const RON_EXTENSION: &str = "ron";
