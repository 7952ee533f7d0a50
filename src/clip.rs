//! Top-level clipping operations: single-plane `clip`, the multi-plane
//! fixpoint driver `multiclip`, its `rayon`-backed parallel twin, and the
//! `process` entry point that resolves cut points into planes.
//!
//! Grounded on `clip.cpp`'s `clip()`/`multiclip()` pair and
//! `process.hpp`'s `process()` signature. `clip`/`multiclip`/`process`
//! return `MeshList` directly (infallible): the four recoverable defect
//! kinds are folded into a [`ClipReport`] logged via `tracing::warn!`
//! rather than returned as an error, matching `Pipeline::run`'s own pattern
//! of logging recoverable per-stage issues and continuing.

use std::collections::HashMap;

use crate::boundary::{assemble_loops, BoundaryState};
use crate::cdt::SpadeTriangulator;
use crate::config::{ClipConfig, Tolerances};
use crate::geometry::{face_normal, Plane};
use crate::mesh::{Mesh, MeshList, TriIndex};
use crate::preprocess::ManifoldPreprocessor;
use crate::stats::StatsSink;
use crate::stitch::build_cap;

/// Outcome of the capping step for a single clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapOutcome {
    /// The cut boundary closed into one or more loops and triangulated.
    Sealed,
    /// The plane touched the mesh but no closed boundary loop formed (an
    /// open or collinear cut), so no cap was added.
    Open,
    /// The plane did not intersect the mesh's interior at all.
    Empty,
}

/// Recoverable-defect counters for one `clip` call, corresponding to the
/// four recoverable defect kinds (collinear boundary, triangulation
/// failure, degenerate triangle, empty result).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipReport {
    pub collinear_boundary_loops: u32,
    pub triangulation_failures: u32,
    pub degenerate_triangles: u32,
    pub cap_loops: u32,
}

impl ClipReport {
    pub fn cap_outcome(&self, had_segments: bool) -> CapOutcome {
        if !had_segments {
            CapOutcome::Empty
        } else if self.cap_loops == 0 {
            CapOutcome::Open
        } else {
            CapOutcome::Sealed
        }
    }
}

fn compact_side(
    triangles: &[[TriIndex; 3]],
    mesh: &Mesh,
    state: &BoundaryState,
) -> (Mesh, u32) {
    let mut remap: HashMap<TriIndex, u32> = HashMap::new();
    let mut vertices = Vec::new();
    let mut degenerate = 0u32;
    let mut out_tris = Vec::with_capacity(triangles.len());

    for tri in triangles {
        let mut local = [0u32; 3];
        for (slot, idx) in local.iter_mut().zip(tri.iter()) {
            *slot = *remap.entry(*idx).or_insert_with(|| {
                let pos = match idx {
                    TriIndex::Original(i) => mesh.vertices[*i as usize],
                    TriIndex::Boundary(i) => state.border_vertices()[*i as usize],
                };
                vertices.push(pos);
                (vertices.len() - 1) as u32
            });
        }
        let [a, b, c] = local;
        let positions = [vertices[a as usize], vertices[b as usize], vertices[c as usize]];
        if face_normal(positions[0], positions[1], positions[2]).length_squared() < 1e-18 {
            degenerate += 1;
            continue;
        }
        out_tris.push(local);
    }

    (Mesh::new(vertices, out_tris), degenerate)
}

/// Clip `mesh` by `plane`, returning exactly two fragments: the part on the
/// plane's positive side first, the negative side second (the "positive
/// first" convention). Either may be empty.
pub fn clip_with(
    mesh: &Mesh,
    plane: &Plane,
    tol: &Tolerances,
    prune_outliers: bool,
) -> (MeshList, ClipReport) {
    let mut state = BoundaryState::new();
    let mut pos_tris = Vec::new();
    let mut neg_tris = Vec::new();

    for tri in &mesh.triangles {
        let (p, n) = state.process_triangle(*tri, mesh, plane, tol);
        pos_tris.extend(p);
        neg_tris.extend(n);
    }

    let had_segments = !state.segments.is_empty();
    let loops = assemble_loops(&state.segments);
    let mut report = ClipReport {
        cap_loops: loops.len() as u32,
        ..Default::default()
    };
    if had_segments && loops.is_empty() {
        report.collinear_boundary_loops = 1;
    }

    if !loops.is_empty() {
        match build_cap(
            &loops,
            mesh,
            plane,
            &mut state,
            &SpadeTriangulator,
            prune_outliers,
        ) {
            Ok(cap) => {
                if cap.positive_triangles.is_empty() && cap.negative_triangles.is_empty() {
                    report.triangulation_failures = 1;
                } else {
                    pos_tris.extend(cap.positive_triangles);
                    neg_tris.extend(cap.negative_triangles);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cap triangulation failed, leaving cut unsealed");
                report.triangulation_failures = 1;
            }
        }
    }

    let (pos_mesh, pos_degen) = compact_side(&pos_tris, mesh, &state);
    let (neg_mesh, neg_degen) = compact_side(&neg_tris, mesh, &state);
    report.degenerate_triangles = pos_degen + neg_degen;

    if report.collinear_boundary_loops > 0
        || report.triangulation_failures > 0
        || report.degenerate_triangles > 0
    {
        tracing::warn!(?report, "clip recovered from defects");
    }

    (MeshList::new(vec![pos_mesh, neg_mesh]), report)
}

/// Clip `mesh` by `plane` using default tolerances and no outlier pruning.
pub fn clip(mesh: &Mesh, plane: &Plane) -> MeshList {
    clip_with(mesh, plane, &Tolerances::default(), false).0
}

/// Clip `mesh` against every plane in turn, subdividing fragments as each
/// plane is applied and eliding any fragment left empty, matching
/// `clip.cpp::multiclip`'s `if (c.triangles.empty() || c.vertices.empty())
/// continue;`.
pub fn multiclip(
    mesh: &Mesh,
    planes: &[Plane],
    config: &ClipConfig,
    preprocessor: Option<&dyn ManifoldPreprocessor>,
) -> MeshList {
    let mut fragments = vec![mesh.clone()];
    for plane in planes {
        let mut next = Vec::new();
        for fragment in &fragments {
            let (parts, _report) =
                clip_with(fragment, plane, &config.tolerances, config.prune_outliers);
            for mut part in parts.into_inner() {
                if part.is_empty() {
                    continue;
                }
                if let Some(pp) = preprocessor {
                    pp.process(&mut part);
                }
                next.push(part);
            }
        }
        fragments = next;
    }
    MeshList::new(fragments)
}

/// Parallel twin of [`multiclip`]: each pass clips all current fragments
/// against the next plane concurrently via `rayon`, matching
/// `tiling::octree::build_octree_recursive`'s own use of
/// `rayon::prelude::*` for independent subtree work.
pub fn multiclip_parallel(
    mesh: &Mesh,
    planes: &[Plane],
    config: &ClipConfig,
    preprocessor: Option<&dyn ManifoldPreprocessor>,
) -> MeshList {
    use rayon::prelude::*;

    let mut fragments = vec![mesh.clone()];
    for plane in planes {
        let next: Vec<Mesh> = fragments
            .par_iter()
            .flat_map_iter(|fragment| {
                let (parts, _report) =
                    clip_with(fragment, plane, &config.tolerances, config.prune_outliers);
                parts.into_inner().into_iter().filter(|m| !m.is_empty())
            })
            .collect();
        fragments = match preprocessor {
            Some(pp) => next
                .into_iter()
                .map(|mut m| {
                    pp.process(&mut m);
                    m
                })
                .collect(),
            None => next,
        };
    }
    MeshList::new(fragments)
}

/// Default `cut_points -> planes` conversion: points are consumed three at
/// a time, each triple defining one plane via [`Plane::from_points`]. A
/// placeholder for a real plane-search collaborator, not a claim that this
/// grouping is meaningful for arbitrary input.
pub fn planes_from_cut_points(cut_points: &[crate::geometry::Vec3]) -> Vec<Plane> {
    cut_points
        .chunks_exact(3)
        .filter_map(|c| Plane::from_points(c[0], c[1], c[2]))
        .collect()
}

/// Entry point mirroring `neural_acd::process`: clip `mesh` by the planes
/// implied by `cut_points`, optionally recording one JSON-lines stats
/// record per plane to `sink`.
pub fn process(
    mesh: &Mesh,
    cut_points: &[crate::geometry::Vec3],
    config: &ClipConfig,
    sink: Option<&mut dyn StatsSink>,
) -> MeshList {
    let planes = planes_from_cut_points(cut_points);
    if let Some(sink) = sink {
        let mut fragments = vec![mesh.clone()];
        for (i, plane) in planes.iter().enumerate() {
            let mut next = Vec::new();
            for fragment in &fragments {
                let start = std::time::Instant::now();
                let (parts, report) =
                    clip_with(fragment, plane, &config.tolerances, config.prune_outliers);
                let elapsed = start.elapsed();
                sink.record(crate::stats::ClipStats {
                    plane_index: i,
                    input_triangles: fragment.triangle_count(),
                    output_triangles: parts.iter().map(|m| m.triangle_count()).sum(),
                    cap_loops: report.cap_loops,
                    degenerate_triangles: report.degenerate_triangles,
                    elapsed_secs: elapsed.as_secs_f64(),
                });
                for part in parts.into_inner() {
                    if !part.is_empty() {
                        next.push(part);
                    }
                }
            }
            fragments = next;
        }
        MeshList::new(fragments)
    } else {
        multiclip(mesh, &planes, config, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;

    fn unit_cube() -> Mesh {
        let v = |x: f64, y: f64, z: f64| Vec3::new(x, y, z);
        let vertices = vec![
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(1.0, 0.0, 1.0),
            v(1.0, 1.0, 1.0),
            v(0.0, 1.0, 1.0),
        ];
        let triangles = vec![
            [0, 1, 2], [0, 2, 3], // bottom
            [4, 6, 5], [4, 7, 6], // top
            [0, 4, 5], [0, 5, 1], // front
            [1, 5, 6], [1, 6, 2], // right
            [2, 6, 7], [2, 7, 3], // back
            [3, 7, 4], [3, 4, 0], // left
        ];
        Mesh::new(vertices, triangles)
    }

    #[test]
    fn clip_cube_through_middle_produces_two_closed_halves() {
        let cube = unit_cube();
        let plane = Plane::new(Vec3::new(0.0, 0.0, 0.5), Vec3::Z);
        let parts = clip(&cube, &plane);
        assert_eq!(parts.len(), 2);
        for mesh in parts.iter() {
            assert!(!mesh.is_empty());
            assert!(mesh.indices_in_bounds());
        }
    }

    #[test]
    fn clip_plane_missing_mesh_entirely() {
        let cube = unit_cube();
        let plane = Plane::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let parts = clip(&cube, &plane);
        assert_eq!(parts.len(), 2);
        let nonempty = parts.iter().filter(|m| !m.is_empty()).count();
        assert_eq!(nonempty, 1);
    }

    #[test]
    fn multiclip_three_orthogonal_planes_through_cube_center() {
        let cube = unit_cube();
        let planes = vec![
            Plane::new(Vec3::new(0.5, 0.0, 0.0), Vec3::X),
            Plane::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
            Plane::new(Vec3::new(0.0, 0.0, 0.5), Vec3::Z),
        ];
        let config = ClipConfig::default();
        let result = multiclip(&cube, &planes, &config, None);
        assert_eq!(result.len(), 8);
        for mesh in result.iter() {
            assert!(!mesh.is_empty());
        }
    }

    #[test]
    fn planes_from_cut_points_groups_in_triples() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let planes = planes_from_cut_points(&pts);
        assert_eq!(planes.len(), 1);
    }
}
