//! Planar projection for the cut boundary, so it can be handed to a 2D
//! constrained triangulator.
//!
//! The original establishes a rotation matrix from the plane normal via
//! `CreatePlaneRotationMatrix` and rotates every boundary point into the
//! plane's local frame. This module does the same thing with an explicit,
//! named orthonormal basis instead of a dense rotation matrix, since only
//! the two in-plane axes are ever used.

use crate::geometry::Vec3;

/// An orthonormal basis for a plane: an origin and two axes spanning it.
#[derive(Debug, Clone, Copy)]
pub struct PlanarFrame {
    pub origin: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

impl PlanarFrame {
    /// Build a frame for the plane through `origin` with unit `normal`.
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        // Pick whichever world axis is least parallel to the normal to seed
        // the first in-plane axis, avoiding near-degenerate cross products.
        let seed = if normal.x.abs() < normal.y.abs() && normal.x.abs() < normal.z.abs() {
            Vec3::X
        } else if normal.y.abs() < normal.z.abs() {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let u = normal.cross(seed).normalize();
        let v = normal.cross(u);
        Self { origin, u, v }
    }

    pub fn project(&self, p: Vec3) -> [f64; 2] {
        let d = p - self.origin;
        [d.dot(self.u), d.dot(self.v)]
    }

    pub fn unproject(&self, p: [f64; 2]) -> Vec3 {
        self.origin + p[0] * self.u + p[1] * self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_unproject_round_trips() {
        let frame = PlanarFrame::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        let p = Vec3::new(4.0, 5.0, 3.0);
        let uv = frame.project(p);
        let back = frame.unproject(uv);
        assert!((back - p).length() < 1e-9);
    }

    #[test]
    fn frame_axes_are_orthonormal_and_perpendicular_to_normal() {
        let normal = Vec3::new(1.0, 1.0, 1.0).normalize();
        let frame = PlanarFrame::new(Vec3::ZERO, normal);
        assert!((frame.u.length() - 1.0).abs() < 1e-9);
        assert!((frame.v.length() - 1.0).abs() < 1e-9);
        assert!(frame.u.dot(frame.v).abs() < 1e-9);
        assert!(frame.u.dot(normal).abs() < 1e-9);
        assert!(frame.v.dot(normal).abs() < 1e-9);
    }

    #[test]
    fn handles_axis_aligned_normals() {
        for normal in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
            let frame = PlanarFrame::new(Vec3::ZERO, normal);
            assert!(frame.u.dot(normal).abs() < 1e-9);
            assert!(frame.v.dot(normal).abs() < 1e-9);
        }
    }
}
