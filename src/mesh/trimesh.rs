//! Face-vertex triangle mesh.

use nalgebra::{Point3, Vector3};

/// A triangle mesh stored as a vertex table and a triangle index table.
///
/// Instances are created through [`build_from_triangles`](super::build_from_triangles)
/// and friends, which validate the index table. Once built, a mesh is never
/// modified.
#[derive(Debug, Clone)]
pub struct TriMesh {
    /// Vertex positions, one row per vertex.
    pub(super) vertices: Vec<Point3<f64>>,
    /// Triangles as vertex index triples.
    pub(super) faces: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the vertex position table.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Get the triangle index table.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: usize) -> &Point3<f64> {
        &self.vertices[v]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: usize) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.faces[f];
        [self.vertices[v0], self.vertices[v1], self.vertices[v2]]
    }

    /// Compute the (unnormalized) normal of a face. Its length is twice the face area.
    pub fn face_normal_scaled(&self, f: usize) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: usize) -> f64 {
        0.5 * self.face_normal_scaled(f).norm()
    }

    /// Compute the total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// Iterate over face indices.
    pub fn face_ids(&self) -> std::ops::Range<usize> {
        0..self.faces.len()
    }
}
