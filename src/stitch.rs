//! Cap triangulation and stitching: turns the assembled cut-boundary loops
//! into triangles and hands each half-mesh the copy it needs, wound so the
//! cap's outward normal faces away from the half-mesh's own material.
//!
//! Grounded on `clip.cpp`'s post-`Triangulation` step, which appends the
//! capping triangles to both `pc`/`nc` fragments with opposite winding. This
//! module makes that winding relationship explicit instead of emergent: the
//! planar frame is built so that a CCW triangle in its 2D (u, v) coordinates
//! has 3D normal equal to the plane normal (`u x v == normal`, see
//! `remap::PlanarFrame`), so the triangulator's native winding is exactly
//! the cap the positive half-mesh needs (normal along `+plane.normal`, per
//! the orientation invariant), and its reverse is exactly the cap the
//! negative half-mesh needs (`-plane.normal`).

use crate::boundary::BoundaryState;
use crate::cdt::{CdtResult, ConstrainedTriangulator};
use crate::error::Result;
use crate::geometry::{Plane, Vec3};
use crate::mesh::{Mesh, TriIndex};
use crate::remap::PlanarFrame;

pub struct CapResult {
    pub positive_triangles: Vec<[TriIndex; 3]>,
    pub negative_triangles: Vec<[TriIndex; 3]>,
}

fn resolve_position(idx: TriIndex, mesh: &Mesh, state: &BoundaryState) -> Vec3 {
    match idx {
        TriIndex::Original(i) => mesh.vertices[i as usize],
        TriIndex::Boundary(i) => state.border_vertices()[i as usize],
    }
}

/// Triangulate the assembled boundary loops and produce oppositely-wound
/// cap triangles for both half-meshes.
///
/// `loops` is the output of [`crate::boundary::assemble_loops`]: each a
/// closed cycle of boundary vertex identities, outer loop(s) and hole
/// loop(s) alike (the point-in-polygon filter in `cdt` treats them
/// uniformly via an even-odd rule).
pub fn build_cap(
    loops: &[Vec<TriIndex>],
    mesh: &Mesh,
    plane: &Plane,
    state: &mut BoundaryState,
    triangulator: &dyn ConstrainedTriangulator,
    prune_outliers: bool,
) -> Result<CapResult> {
    if loops.is_empty() {
        return Ok(CapResult {
            positive_triangles: Vec::new(),
            negative_triangles: Vec::new(),
        });
    }

    let frame = PlanarFrame::new(plane.point, plane.normal);

    let mut flat_refs: Vec<TriIndex> = Vec::new();
    let mut loop_points_2d: Vec<Vec<[f64; 2]>> = Vec::new();
    for lp in loops {
        let mut pts_2d = Vec::with_capacity(lp.len());
        for &idx in lp {
            let pos = resolve_position(idx, mesh, state);
            pts_2d.push(frame.project(pos));
            flat_refs.push(idx);
        }
        loop_points_2d.push(pts_2d);
    }

    let CdtResult {
        triangles,
        extra_points,
        points,
    } = triangulator.triangulate(&loop_points_2d)?;

    let triangles = if prune_outliers {
        crate::pruning::remove_outlier_triangles(&points, &triangles)
    } else {
        triangles
    };

    // Any point beyond the flattened loop input is a Steiner point the
    // triangulator introduced; give it a real 3D position and a boundary
    // vertex slot so both half-meshes can reference it.
    let mut point_refs = flat_refs.clone();
    for &extra_idx in &extra_points {
        let pos = frame.unproject(points[extra_idx]);
        let new_idx = TriIndex::Boundary(state.push_vertex(pos));
        point_refs.push(new_idx);
    }

    let mut negative_triangles = Vec::with_capacity(triangles.len());
    let mut positive_triangles = Vec::with_capacity(triangles.len());
    for tri in &triangles {
        let refs = tri.map(|i| point_refs[i as usize]);
        positive_triangles.push(refs);
        negative_triangles.push([refs[0], refs[2], refs[1]]);
    }

    Ok(CapResult {
        positive_triangles,
        negative_triangles,
    })
}
