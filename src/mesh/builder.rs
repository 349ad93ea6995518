//! Mesh construction utilities.
//!
//! This module provides functions for building validated triangle meshes
//! from face-vertex lists, either as `nalgebra` points, plain coordinate
//! rows, or dense n×3 / m×3 matrices.

use std::collections::HashMap;

use nalgebra::{DMatrix, Point3};

use super::trimesh::TriMesh;
use crate::error::{ParamError, Result};

/// Build a triangle mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A validated mesh, or an error if the input is invalid.
///
/// # Errors
///
/// - [`ParamError::EmptyMesh`] if there are no vertices or no faces
/// - [`ParamError::InvalidVertexIndex`] if a face indexes past the vertex table
/// - [`ParamError::DegenerateFace`] if a face repeats a vertex
/// - [`ParamError::NonManifoldEdge`] if an edge is shared by more than two faces
///
/// # Example
/// ```
/// use conformap::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<TriMesh> {
    if vertices.is_empty() || faces.is_empty() {
        return Err(ParamError::EmptyMesh);
    }

    // Validate vertex indices
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(ParamError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        // Check for degenerate faces
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(ParamError::DegenerateFace { face: fi });
        }
    }

    // Count edge occurrences
    let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
    for face in faces {
        for i in 0..3 {
            let v0 = face[i];
            let v1 = face[(i + 1) % 3];
            let edge = if v0 < v1 { (v0, v1) } else { (v1, v0) };
            let count = edge_count.entry(edge).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Err(ParamError::NonManifoldEdge {
                    v0: edge.0,
                    v1: edge.1,
                });
            }
        }
    }

    Ok(TriMesh {
        vertices: vertices.to_vec(),
        faces: faces.to_vec(),
    })
}

/// Build a triangle mesh from plain coordinate rows.
///
/// Equivalent to [`build_from_triangles`] for callers that keep positions as
/// `[x, y, z]` arrays.
pub fn build_from_tables(vertices: &[[f64; 3]], faces: &[[usize; 3]]) -> Result<TriMesh> {
    let points: Vec<Point3<f64>> = vertices.iter().map(|&p| Point3::from(p)).collect();
    build_from_triangles(&points, faces)
}

/// Build a triangle mesh from an n×3 vertex matrix and an m×3 face matrix.
///
/// # Errors
///
/// Returns [`ParamError::DimensionMismatch`] if either matrix does not have
/// exactly three columns, plus every error of [`build_from_triangles`].
pub fn build_from_matrices(vertices: &DMatrix<f64>, faces: &DMatrix<usize>) -> Result<TriMesh> {
    if vertices.ncols() != 3 {
        return Err(ParamError::DimensionMismatch {
            what: "vertex table columns",
            expected: 3,
            actual: vertices.ncols(),
        });
    }
    if faces.ncols() != 3 {
        return Err(ParamError::DimensionMismatch {
            what: "face table columns",
            expected: 3,
            actual: faces.ncols(),
        });
    }

    let points: Vec<Point3<f64>> = vertices
        .row_iter()
        .map(|row| Point3::new(row[0], row[1], row[2]))
        .collect();
    let triangles: Vec<[usize; 3]> = faces
        .row_iter()
        .map(|row| [row[0], row[1], row[2]])
        .collect();

    build_from_triangles(&points, &triangles)
}
