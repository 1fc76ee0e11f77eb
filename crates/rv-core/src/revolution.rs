//! Revolution solid builder

use rv_cad::{FULL_TURN, Face, GeometryKernel, RevolvedShape};
use tracing::info;

use crate::constants::REVOLUTION_AXIS;
use crate::error::{RevolverError, RevolverResult};

/// Sweep the profile face a full turn about [`REVOLUTION_AXIS`]
pub fn revolve_face(kernel: &dyn GeometryKernel, face: &Face) -> RevolverResult<RevolvedShape> {
    let shape = kernel
        .revolve(face, &REVOLUTION_AXIS, FULL_TURN)
        .map_err(RevolverError::from_revolution)?;
    info!(
        faces = shape.face_count(),
        volume = shape.volume(),
        "Revolved profile into solid"
    );
    Ok(shape)
}
