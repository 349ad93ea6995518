//! Core mesh data structures.
//!
//! This module provides the face-vertex triangle mesh consumed by the
//! parameterization algorithms, together with the boundary queries they need.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`]: an immutable vertex position table
//! (n rows of 3 coordinates) and a triangle index table (m rows of 3 vertex
//! indices). Vertex `i` of every output table corresponds to row `i` of the
//! input vertex table.
//!
//! # Construction
//!
//! Meshes are validated on construction:
//!
//! ```
//! use conformap::mesh::{build_from_triangles, TriMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 3);
//! ```

mod boundary;
mod builder;
mod trimesh;

pub use boundary::{boundary_edges, boundary_loop, boundary_loops};
pub use builder::{build_from_matrices, build_from_tables, build_from_triangles};
pub use trimesh::TriMesh;
