//! Plane/point geometric primitives, the innermost layer the rest of the
//! crate is built on.
//!
//! Grounded on `triangle_clipper.rs`'s `ClipPlane`/`intersect_edge` pair, but
//! generalized from axis-aligned octant planes to arbitrary plane equations,
//! since clipping here happens against caller-supplied cut planes rather
//! than fixed bounding-box splits.

use glam::DVec3;

use crate::config::Tolerances;

/// 3D point/vector type used throughout the crate.
pub type Vec3 = DVec3;

/// Which side of a plane a point lies on, at a given tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Positive,
    Negative,
    On,
}

/// A cutting plane in point-normal form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Build a plane through three non-collinear points, normal by the
    /// right-hand rule of (b - a) x (c - a). Mirrors `clip.cpp`'s own use of
    /// three points to seed `CreatePlaneRotationMatrix`.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() < 1e-20 {
            return None;
        }
        Some(Self::new(a, normal))
    }

    /// Signed distance from `p` to the plane (positive on the normal side).
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        self.normal.dot(p - self.point)
    }

    pub fn side(&self, p: Vec3, tol: &Tolerances) -> Side {
        let d = self.signed_distance(p);
        if d > tol.eps_side {
            Side::Positive
        } else if d < -tol.eps_side {
            Side::Negative
        } else {
            Side::On
        }
    }

    /// Intersect the segment `a`-`b` with this plane, returning the
    /// intersection point and the parametric `t` along `a -> b`, clamped to
    /// `[0, 1]` since floating point can push exact-zero denominators
    /// slightly out of range.
    ///
    /// Returns `None` if the segment is parallel to the plane.
    pub fn intersect_segment(&self, a: Vec3, b: Vec3) -> Option<(Vec3, f64)> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        let denom = da - db;
        if denom.abs() < 1e-15 {
            return None;
        }
        let t = (da / denom).clamp(0.0, 1.0);
        Some((a + t * (b - a), t))
    }
}

/// Unnormalized face normal for a CCW triangle `(a, b, c)`.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Whether two points coincide within `tol.eps_point`, using Chebyshev
/// (L-infinity) distance: the largest single-axis offset, not the
/// Euclidean norm.
pub fn same_point(a: Vec3, b: Vec3, tol: &Tolerances) -> bool {
    let d = (a - b).abs();
    d.x.max(d.y).max(d.z) <= tol.eps_point
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    #[test]
    fn plane_from_points_normal_direction() {
        let plane = Plane::from_points(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((plane.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-9);
    }

    #[test]
    fn plane_from_collinear_points_is_none() {
        let plane = Plane::from_points(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        assert!(plane.is_none());
    }

    #[test]
    fn side_classification() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(plane.side(Vec3::new(0.0, 0.0, 1.0), &tol()), Side::Positive);
        assert_eq!(plane.side(Vec3::new(0.0, 0.0, -1.0), &tol()), Side::Negative);
        assert_eq!(plane.side(Vec3::new(0.0, 0.0, 0.0), &tol()), Side::On);
        assert_eq!(plane.side(Vec3::new(5.0, -3.0, 1e-9), &tol()), Side::On);
    }

    #[test]
    fn intersect_segment_midpoint() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Z);
        let (p, t) = plane
            .intersect_segment(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert!((t - 0.5).abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn intersect_segment_parallel_returns_none() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Z);
        let hit = plane.intersect_segment(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(hit.is_none());
    }

    #[test]
    fn same_point_tolerance() {
        let t = tol();
        assert!(same_point(Vec3::ZERO, Vec3::new(1e-9, 0.0, 0.0), &t));
        assert!(!same_point(Vec3::ZERO, Vec3::new(1e-3, 0.0, 0.0), &t));
    }

    #[test]
    fn face_normal_right_hand_rule() {
        let n = face_normal(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!((n.normalize() - Vec3::Z).length() < 1e-9);
    }
}
