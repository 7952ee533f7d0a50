//! Constrained triangulation of the (possibly multi-loop) cut boundary.
//!
//! The original links against the C++ `CDT` library and calls its
//! `eraseOuterTriangles` after inserting the boundary as constraint edges.
//! `spade`'s constrained Delaunay triangulation (already a dependency in two
//! repos of the reference pack, `geolis` and `truck`) fills the convex hull
//! of the inserted points rather than stopping at the constraint boundary,
//! so there is no direct equivalent; [`SpadeTriangulator`] reimplements the
//! "erase outer triangles" step as an even-odd point-in-polygon filter over
//! the triangulation's inner faces.

use std::collections::HashMap;

use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

use crate::error::{ClipError, Result};

/// Output of triangulating a cap polygon: a point buffer (loop vertices
/// first, in input order, any Steiner points the triangulator introduced
/// appended after) and the triangles indexing into it.
#[derive(Debug, Clone, Default)]
pub struct CdtResult {
    pub points: Vec<[f64; 2]>,
    pub triangles: Vec<[u32; 3]>,
    /// Points introduced by the triangulator beyond the input loops, as
    /// offsets into `points`. `spade`'s CDT does not add these for
    /// non-self-intersecting constraint sets, but the field exists so a
    /// future collaborator that does insert Steiner points fits the same
    /// interface.
    pub extra_points: Vec<usize>,
}

/// A 2D constrained triangulator: fills the region bounded by `loops`
/// (outer boundary plus any holes, each a closed polygon of points) with
/// triangles, honoring the loop edges as constraints.
pub trait ConstrainedTriangulator {
    fn triangulate(&self, loops: &[Vec<[f64; 2]>]) -> Result<CdtResult>;
}

pub struct SpadeTriangulator;

impl ConstrainedTriangulator for SpadeTriangulator {
    fn triangulate(&self, loops: &[Vec<[f64; 2]>]) -> Result<CdtResult> {
        let points: Vec<[f64; 2]> = loops.iter().flatten().copied().collect();
        if points.len() < 3 {
            return Ok(CdtResult::default());
        }

        let mut cdt: ConstrainedDelaunayTriangulation<Point2<f64>> =
            ConstrainedDelaunayTriangulation::new();
        let mut handles = Vec::with_capacity(points.len());
        for p in &points {
            let h = cdt
                .insert(Point2::new(p[0], p[1]))
                .map_err(|e| ClipError::Triangulation(format!("{e:?}")))?;
            handles.push(h);
        }

        let mut offset = 0usize;
        for loop_points in loops {
            let n = loop_points.len();
            if n >= 2 {
                for i in 0..n {
                    let a = handles[offset + i];
                    let b = handles[offset + (i + 1) % n];
                    if a != b {
                        cdt.add_constraint(a, b);
                    }
                }
            }
            offset += n;
        }

        let index_of: HashMap<_, _> = handles
            .iter()
            .enumerate()
            .map(|(i, h)| (*h, i as u32))
            .collect();

        let mut triangles = Vec::new();
        for face in cdt.inner_faces() {
            let verts = face.vertices();
            let tri_pts: Vec<[f64; 2]> = verts
                .iter()
                .map(|v| {
                    let p = v.position();
                    [p.x, p.y]
                })
                .collect();
            let centroid = [
                (tri_pts[0][0] + tri_pts[1][0] + tri_pts[2][0]) / 3.0,
                (tri_pts[0][1] + tri_pts[1][1] + tri_pts[2][1]) / 3.0,
            ];
            if !point_in_loops(centroid, loops) {
                continue;
            }
            let idx = [
                index_of[&verts[0].fix()],
                index_of[&verts[1].fix()],
                index_of[&verts[2].fix()],
            ];
            triangles.push(idx);
        }

        Ok(CdtResult {
            points,
            triangles,
            extra_points: Vec::new(),
        })
    }
}

/// Even-odd crossing test over a set of (possibly nested, for holes)
/// polygon loops, standing in for `CDT::eraseOuterTriangles`.
fn point_in_loops(p: [f64; 2], loops: &[Vec<[f64; 2]>]) -> bool {
    let mut inside = false;
    for lp in loops {
        let n = lp.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let a = lp[i];
            let b = lp[(i + 1) % n];
            let crosses = (a[1] > p[1]) != (b[1] > p[1]);
            if crosses {
                let x_at_y = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
                if p[0] < x_at_y {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangulates_a_square() {
        let square = vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]];
        let result = SpadeTriangulator.triangulate(&square).unwrap();
        assert_eq!(result.points.len(), 4);
        assert_eq!(result.triangles.len(), 2);
        for tri in &result.triangles {
            assert!(tri.iter().all(|&i| (i as usize) < result.points.len()));
        }
    }

    #[test]
    fn triangulates_an_l_shape_respecting_concavity() {
        // L-shaped hexagon; a convex-hull triangulation would fill the
        // missing quadrant, the constrained one must not.
        let l_shape = vec![vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ]];
        let result = SpadeTriangulator.triangulate(&l_shape).unwrap();
        let area: f64 = result
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| result.points[i as usize]);
                0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs()
            })
            .sum();
        assert!((area - 3.0).abs() < 1e-6, "L-shape area should be 3.0, got {area}");
    }

    #[test]
    fn degenerate_input_returns_empty() {
        let result = SpadeTriangulator.triangulate(&[vec![[0.0, 0.0], [1.0, 0.0]]]).unwrap();
        assert!(result.triangles.is_empty());
    }

    #[test]
    fn point_in_loops_basic() {
        let square = vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]];
        assert!(point_in_loops([0.5, 0.5], &square));
        assert!(!point_in_loops([1.5, 0.5], &square));
    }
}
