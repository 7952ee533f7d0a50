//! Single-plane triangle clipping and cut-boundary bookkeeping.
//!
//! The per-triangle clip is a direct generalization of
//! `tiling::triangle_clipper::clip_polygon_by_plane` /
//! `fan_triangulate`: Sutherland-Hodgman against one
//! half-space, then a triangle fan from the first surviving vertex. That
//! routine only ever clips against axis-aligned octant planes; here
//! the same loop runs against an arbitrary [`Plane`], and vertex payloads
//! carry enough identity (original mesh index, or the original-edge pair a
//! cut point was born from) to let [`BoundaryState`] deduplicate cut points
//! shared by adjacent triangles instead of reinserting a new vertex per
//! triangle.
//!
//! Orientation rule: both the positive- and negative-side polygons are
//! produced by walking the *same* triangle cyclic order and
//! fan-triangulating from vertex 0. This keeps the emitted triangles'
//! winding identical to the source triangle's on whichever side they end
//! up, with no per-case branching on which corner happens to sit on the
//! plane — unlike the source C++ it's adapted from, which special-cased the
//! "vertex exactly on the plane" straddle by rotation index and ended up
//! checking a different neighbor's sign depending on that index.

use std::collections::HashMap;

use crate::config::Tolerances;
use crate::geometry::{same_point, Plane, Side};
use crate::mesh::{Mesh, TriIndex};

/// A polygon vertex reference during the clip of a single triangle: either
/// one of its three original corners, or a not-yet-materialized cut point
/// on the original edge `(a, b)` (`a < b`), where the plane crosses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VRef {
    Corner(u32),
    Cut(u32, u32),
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Clip a single triangle's polygon (initially its 3 corners) against one
/// half of `plane`. Returns the surviving polygon in original cyclic order,
/// each vertex tagged with its plane side (`On` for every newly introduced
/// cut point, since it lies on the plane by construction).
fn clip_triangle_half(
    corners: [u32; 3],
    positions: [crate::geometry::Vec3; 3],
    sides: [Side; 3],
    plane: &Plane,
    keep_positive: bool,
) -> Vec<(VRef, Side)> {
    let is_inside = |side: Side| match side {
        Side::On => true,
        Side::Positive => keep_positive,
        Side::Negative => !keep_positive,
    };

    let poly: Vec<(VRef, crate::geometry::Vec3, Side)> = (0..3)
        .map(|i| (VRef::Corner(corners[i]), positions[i], sides[i]))
        .collect();

    let mut out = Vec::new();
    let n = poly.len();
    for i in 0..n {
        let (cur_ref, cur_pos, cur_side) = poly[i];
        let (next_ref, next_pos, next_side) = poly[(i + 1) % n];
        let cur_in = is_inside(cur_side);
        let next_in = is_inside(next_side);

        if cur_in {
            out.push((cur_ref, cur_side));
        }
        // Only a genuine Positive/Negative crossing materializes a new cut
        // point. An edge touching a corner that already sits On the plane
        // never needs one: that corner is already in the polygon (pushed
        // above, or about to be pushed as `next` on the following
        // iteration) and serves as the boundary vertex there. Treating such
        // an edge as a crossing would ask `intersect_segment` for a point
        // that lands back on the On corner itself, producing a
        // near-duplicate vertex at the same position.
        if cur_in != next_in && cur_side != Side::On && next_side != Side::On {
            let (a, b) = match (cur_ref, next_ref) {
                (VRef::Corner(a), VRef::Corner(b)) => (a, b),
                _ => unreachable!("triangle corners are always VRef::Corner"),
            };
            if plane.intersect_segment(cur_pos, next_pos).is_some() {
                out.push((VRef::Cut(edge_key(a, b)), Side::On));
            }
        }
    }
    out
}

/// The 3D position a `VRef` resolves to, without interning it as a boundary
/// vertex. Used to compare two candidate cut points before deciding whether
/// they should collapse into the same boundary vertex.
fn vref_position(vref: VRef, mesh: &Mesh, plane: &Plane) -> crate::geometry::Vec3 {
    match vref {
        VRef::Corner(i) => mesh.vertices[i as usize],
        VRef::Cut(a, b) => {
            plane
                .intersect_segment(mesh.vertices[a as usize], mesh.vertices[b as usize])
                .expect("edge was classified as crossing")
                .0
        }
    }
}

fn fan_triangulate(poly: &[VRef]) -> Vec<[VRef; 3]> {
    if poly.len() < 3 {
        return Vec::new();
    }
    (1..poly.len() - 1)
        .map(|i| [poly[0], poly[i], poly[i + 1]])
        .collect()
}

/// Owned cut-boundary state for a single plane's clip over a whole mesh:
/// the deduplicated new vertices it introduces, plus the loop of segments
/// those vertices (and any original on-plane vertices) form.
///
/// Replaces the original's pair of parallel scratch hashmaps
/// (`vertex_map`/`edge_map`) with one struct that owns both the new vertex
/// buffer and the lookup into it.
#[derive(Debug, Default)]
pub struct BoundaryState {
    border_vertices: Vec<crate::geometry::Vec3>,
    border_index: HashMap<(u32, u32), u32>,
    /// Original-mesh edges already recorded as an on-plane boundary edge
    /// (the "two corners On the plane" shortcut). Such an edge is shared
    /// by exactly two adjacent triangles, each of which independently
    /// detects it; this keeps it in `segments` exactly once.
    on_plane_edges_seen: std::collections::HashSet<(u32, u32)>,
    /// Cut segments in discovery order: each straddling triangle contributes
    /// exactly one, connecting the two points where the plane crosses its
    /// boundary.
    pub segments: Vec<[TriIndex; 2]>,
}

impl BoundaryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn border_vertices(&self) -> &[crate::geometry::Vec3] {
        &self.border_vertices
    }

    /// Append a vertex with no originating edge (a Steiner point introduced
    /// by the cap triangulator) and return its boundary index.
    pub fn push_vertex(&mut self, pos: crate::geometry::Vec3) -> u32 {
        let idx = self.border_vertices.len() as u32;
        self.border_vertices.push(pos);
        idx
    }

    fn resolve(&mut self, vref: VRef, mesh: &Mesh, plane: &Plane) -> TriIndex {
        match vref {
            VRef::Corner(i) => TriIndex::Original(i),
            VRef::Cut(a, b) => {
                let key = edge_key(a, b);
                if let Some(&idx) = self.border_index.get(&key) {
                    return TriIndex::Boundary(idx);
                }
                let (pos, _t) = plane
                    .intersect_segment(mesh.vertices[a as usize], mesh.vertices[b as usize])
                    .expect("edge was classified as crossing");
                let idx = self.border_vertices.len() as u32;
                self.border_vertices.push(pos);
                self.border_index.insert(key, idx);
                TriIndex::Boundary(idx)
            }
        }
    }

    /// Record the boundary edge between two on-plane corners of a triangle
    /// that was otherwise emitted whole to a single half (the third corner
    /// strictly off-plane). No-op when fewer or more than two corners are
    /// On, and deduplicated per original mesh edge since both triangles
    /// sharing that edge detect it independently.
    fn record_on_plane_edge(&mut self, corners: &[u32; 3], on_corners: &[usize]) {
        if on_corners.len() != 2 {
            return;
        }
        let a = corners[on_corners[0]];
        let b = corners[on_corners[1]];
        if self.on_plane_edges_seen.insert(edge_key(a, b)) {
            self.segments
                .push([TriIndex::Original(a), TriIndex::Original(b)]);
        }
    }

    /// Resolve the pair of boundary-polygon vertices bounding a straddling
    /// triangle's cut and record the segment between them. If both are
    /// not-yet-seen cut points whose intersections coincide within
    /// tolerance — a one-side-wide sliver where two different edges cross
    /// the plane at the same spot — the second is aliased onto the first's
    /// boundary index instead of interning a near-duplicate vertex, and no
    /// degenerate zero-length segment is recorded.
    fn record_boundary_edge(
        &mut self,
        first: VRef,
        second: VRef,
        mesh: &Mesh,
        plane: &Plane,
        tol: &Tolerances,
    ) {
        if let (VRef::Cut(a0, b0), VRef::Cut(a1, b1)) = (first, second) {
            let k0 = edge_key(a0, b0);
            let k1 = edge_key(a1, b1);
            if k0 != k1 && !self.border_index.contains_key(&k1) {
                let p0 = vref_position(first, mesh, plane);
                let p1 = vref_position(second, mesh, plane);
                if same_point(p0, p1, tol) {
                    if let TriIndex::Boundary(idx) = self.resolve(first, mesh, plane) {
                        self.border_index.insert(k1, idx);
                    }
                    return;
                }
            }
        }
        let a = self.resolve(first, mesh, plane);
        let b = self.resolve(second, mesh, plane);
        self.segments.push([a, b]);
    }

    /// Clip one source triangle against `plane`, accumulating any resulting
    /// cut segment, and return the triangles it contributes to the positive
    /// and negative half-meshes (each referencing original or newly
    /// resolved boundary vertices).
    pub fn process_triangle(
        &mut self,
        corners: [u32; 3],
        mesh: &Mesh,
        plane: &Plane,
        tol: &Tolerances,
    ) -> (Vec<[TriIndex; 3]>, Vec<[TriIndex; 3]>) {
        let positions = [
            mesh.vertices[corners[0] as usize],
            mesh.vertices[corners[1] as usize],
            mesh.vertices[corners[2] as usize],
        ];
        let sides = [
            plane.side(positions[0], tol),
            plane.side(positions[1], tol),
            plane.side(positions[2], tol),
        ];

        let has_pos = sides.iter().any(|s| *s == Side::Positive);
        let has_neg = sides.iter().any(|s| *s == Side::Negative);
        let on_corners: Vec<usize> = (0..3).filter(|&i| sides[i] == Side::On).collect();

        // A triangle with no strict vertex on one side never contributes
        // new boundary geometry on that side, even if one or more corners
        // lie exactly on the plane: the whole triangle (a flat sliver lying
        // in the plane, in the all-on-plane case) is assigned to the
        // positive fragment by convention, never duplicated into both.
        // Running the generic polygon clip on a non-straddling triangle
        // would otherwise re-derive the same on-plane edge from both
        // sides and hand a zero-thickness cap fragment to whichever side
        // is not supposed to own it.
        //
        // Two corners exactly on the plane with the third strictly to one
        // side still trace a real boundary edge along that on-plane pair,
        // even though the whole triangle is emitted unsplit to a single
        // half; three on-plane corners (the fully coplanar sliver) trace no
        // boundary edge at all.
        if !has_neg {
            self.record_on_plane_edge(&corners, &on_corners);
            let whole = corners.map(TriIndex::Original);
            return (vec![whole], Vec::new());
        }
        if !has_pos {
            self.record_on_plane_edge(&corners, &on_corners);
            let whole = corners.map(TriIndex::Original);
            return (Vec::new(), vec![whole]);
        }

        let pos_poly = clip_triangle_half(corners, positions, sides, plane, true);
        let neg_poly = clip_triangle_half(corners, positions, sides, plane, false);

        let on_refs: Vec<VRef> = pos_poly
            .iter()
            .filter(|(_, side)| *side == Side::On)
            .map(|(r, _)| *r)
            .collect();
        if on_refs.len() == 2 {
            self.record_boundary_edge(on_refs[0], on_refs[1], mesh, plane, tol);
        }

        let pos_refs: Vec<VRef> = pos_poly.iter().map(|(r, _)| *r).collect();
        let neg_refs: Vec<VRef> = neg_poly.iter().map(|(r, _)| *r).collect();

        let pos_tris = fan_triangulate(&pos_refs)
            .into_iter()
            .map(|t| t.map(|r| self.resolve(r, mesh, plane)))
            .collect();
        let neg_tris = fan_triangulate(&neg_refs)
            .into_iter()
            .map(|t| t.map(|r| self.resolve(r, mesh, plane)))
            .collect();

        (pos_tris, neg_tris)
    }
}

/// Walk a set of undirected segments into closed loops. Each boundary
/// vertex must have degree exactly 2 for a clean planar cut; any vertex
/// violating that is dropped from its loop rather than causing a panic,
/// since a degenerate or open cut (clip plane grazing the mesh's silhouette)
/// is a recoverable defect, not a crate-level error.
pub fn assemble_loops(segments: &[[TriIndex; 2]]) -> Vec<Vec<TriIndex>> {
    let mut adjacency: HashMap<TriIndex, Vec<TriIndex>> = HashMap::new();
    for [a, b] in segments {
        if a == b {
            continue;
        }
        adjacency.entry(*a).or_default().push(*b);
        adjacency.entry(*b).or_default().push(*a);
    }

    let mut visited_edges: std::collections::HashSet<(TriIndex, TriIndex)> =
        std::collections::HashSet::new();
    let mut loops = Vec::new();

    for [start, _] in segments {
        if adjacency.get(start).map(|n| n.len()) != Some(2) {
            continue;
        }
        let mut loop_vertices = Vec::new();
        let mut current = *start;
        let mut prev: Option<TriIndex> = None;
        loop {
            if loop_vertices.contains(&current) {
                break;
            }
            loop_vertices.push(current);
            let neighbors = match adjacency.get(&current) {
                Some(n) if n.len() == 2 => n,
                _ => break,
            };
            let next = neighbors
                .iter()
                .find(|&&n| Some(n) != prev)
                .copied()
                .unwrap_or(neighbors[0]);
            let edge = if current < next {
                (current, next)
            } else {
                (next, current)
            };
            if !visited_edges.insert(edge) {
                break;
            }
            prev = Some(current);
            current = next;
            if current == *start {
                break;
            }
        }
        if loop_vertices.len() >= 3 {
            loops.push(loop_vertices);
        }
    }
    loops
}

impl PartialOrd for TriIndex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TriIndex {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(t: &TriIndex) -> (u8, u32) {
            match *t {
                TriIndex::Original(i) => (0, i),
                TriIndex::Boundary(i) => (1, i),
            }
        }
        rank(self).cmp(&rank(other))
    }
}
