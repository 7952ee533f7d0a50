//! The fundamental geometry container and the index types built on top of it.
//!
//! Grounded on `types::mesh::IndexedMesh`: a plain data struct plus small
//! query helpers, generalized from flat `f32` attribute buffers (chosen there
//! for zero-copy interop with meshoptimizer/glTF) to owned `Vec3` vertices,
//! since this crate's vertices are produced and consumed by clipping math
//! rather than streamed through a GPU-facing pipeline.

use crate::geometry::Vec3;

/// A triangulated surface mesh: positions plus triangle index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self { vertices, triangles }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The three corner positions of triangle `i`.
    pub fn triangle_positions(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Every triangle index stays within `vertices` (the index validity
    /// invariant).
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.triangles
            .iter()
            .all(|t| t.iter().all(|&i| i < n))
    }
}

/// The result of clipping a mesh against one or more planes: one fragment
/// per surviving region, in the order the driver produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshList(pub Vec<Mesh>);

impl MeshList {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self(meshes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mesh> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Mesh> {
        self.0
    }
}

impl IntoIterator for MeshList {
    type Item = Mesh;
    type IntoIter = std::vec::IntoIter<Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Mesh> for MeshList {
    fn from_iter<T: IntoIterator<Item = Mesh>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A triangle corner during a single-plane clip: either a vertex carried
/// over from the source mesh, or a vertex introduced on the cut boundary.
///
/// Replaces the original's signed `-k-1` index encoding (a negative index
/// meant "boundary vertex k"), which silently breaks once `k` can exceed
/// `i32::MAX / 2` and reads as an off-by-one trap at every call site. A
/// tagged enum makes "which array does this index into" part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriIndex {
    /// Index into the source mesh's vertex buffer.
    Original(u32),
    /// Index into the boundary's newly created vertex buffer.
    Boundary(u32),
}

impl TriIndex {
    pub fn is_boundary(self) -> bool {
        matches!(self, TriIndex::Boundary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn empty_mesh() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn single_triangle() {
        let mesh = unit_triangle();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.indices_in_bounds());
        let [a, b, c] = mesh.triangle_positions(0);
        assert_eq!(a, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn detects_out_of_bounds_index() {
        let mut mesh = unit_triangle();
        mesh.triangles.push([0, 1, 9]);
        assert!(!mesh.indices_in_bounds());
    }

    #[test]
    fn mesh_list_collects_and_iterates() {
        let list: MeshList = vec![unit_triangle(), Mesh::default()].into_iter().collect();
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.iter().filter(|m| !m.is_empty()).count(), 1);
    }

    #[test]
    fn tri_index_tags() {
        let o = TriIndex::Original(3);
        let b = TriIndex::Boundary(3);
        assert_ne!(o, b);
        assert!(!o.is_boundary());
        assert!(b.is_boundary());
    }
}
