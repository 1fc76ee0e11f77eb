//! Full revolutions with Truck
//!
//! A boundary that runs along the axis is swept as an open meridian with
//! `builder::cone`, which closes the poles. A boundary clear of the axis is
//! attached to its plane and swept whole with `builder::rsweep`.

use glam::DVec3;
use truck_meshalgo::prelude::*;
use truck_modeling::{Rad, Solid as TruckSolid, builder};
use truck_polymesh::PolygonMesh;
use uuid::Uuid;

use super::convert::{Evaluated, dvec3, point3, sample_wire, truck_wire, vector3};
use crate::constants::FULL_TURN;
use crate::geometry::{Curve, Face};
use crate::kernel::{Axis3D, KernelError, KernelResult};
use crate::solid::{Meridian, RevolvedFace, RevolvedShape};

/// Area and swept volume of the surface a local generatrix sweeps
fn measured_face(generatrix: &Curve) -> KernelResult<RevolvedFace> {
    let curve = Evaluated::new(generatrix)?;
    let area = FULL_TURN * curve.integrate(|p, d| p.x.abs() * d.length());
    let swept_volume = std::f64::consts::PI * curve.integrate(|p, d| p.x * p.x * d.z);
    Ok(RevolvedFace::new(generatrix.clone(), area, swept_volume))
}

/// Signed volume enclosed by a triangle mesh; positive when facets face out
pub(super) fn signed_volume(mesh: &PolygonMesh) -> f64 {
    let positions = mesh.positions();
    mesh.faces()
        .triangle_iter()
        .map(|[a, b, c]| {
            let p0 = dvec3(positions[a.pos]);
            let p1 = dvec3(positions[b.pos]);
            let p2 = dvec3(positions[c.pos]);
            p0.dot(p1.cross(p2))
        })
        .sum::<f64>()
        / 6.0
}

/// Flip the solid if a coarse mesh of it encloses negative volume
fn orient_outward(mut solid: TruckSolid, tolerance: f64) -> KernelResult<TruckSolid> {
    let volume = signed_volume(&solid.triangulation(tolerance).to_polygon());
    if !volume.is_finite() || volume == 0.0 {
        return Err(KernelError::RevolutionFailed(format!(
            "revolved solid encloses no volume ({volume})"
        )));
    }
    if volume < 0.0 {
        solid.not();
    }
    Ok(solid)
}

/// Sweep a planar face a full turn about `axis`
pub(super) fn revolve(
    face: &Face,
    axis: &Axis3D,
    angle: f64,
) -> KernelResult<(RevolvedShape, TruckSolid)> {
    let samples = sample_wire(face.boundary())?;
    let meridian = Meridian::new(face, axis, angle, &samples)?;
    let swept = meridian.swept_curves()?;
    let touches_axis = swept.len() < meridian.local.len();

    let faces = swept
        .iter()
        .map(|&i| measured_face(&meridian.local[i]))
        .collect::<KernelResult<Vec<_>>>()?;

    let mut local_samples: Vec<DVec3> = Vec::new();
    for &i in &swept {
        local_samples.extend(Evaluated::new(&meridian.local[i])?.sample());
    }
    let max_radius = local_samples.iter().map(|p| p.x).fold(0.0, f64::max);
    let height_range = local_samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });

    let solid = if touches_axis {
        let curves: Vec<&Curve> = swept.iter().map(|&i| &meridian.world[i]).collect();
        let wire = truck_wire(&curves, false)?;
        let shell = builder::cone(&wire, vector3(meridian.frame.axial), Rad(FULL_TURN));
        TruckSolid::try_new(vec![shell])
            .map_err(|e| KernelError::RevolutionFailed(format!("swept shell is not a solid: {e:?}")))?
    } else {
        let curves: Vec<&Curve> = meridian.world.iter().collect();
        let wire = truck_wire(&curves, true)?;
        let plane = builder::try_attach_plane(&[wire])
            .map_err(|e| KernelError::RevolutionFailed(format!("Failed to create face: {e:?}")))?;
        builder::rsweep(
            &plane,
            point3(axis.origin),
            vector3(meridian.frame.axial),
            Rad(FULL_TURN),
        )
    };

    let extent = max_radius.max(height_range.1 - height_range.0);
    let solid = orient_outward(solid, 0.05 * extent)?;

    let shape = RevolvedShape::new(
        Uuid::new_v4(),
        meridian.frame,
        faces,
        max_radius,
        height_range,
    );
    Ok((shape, solid))
}
