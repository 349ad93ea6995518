//! # conformap
//!
//! Least Squares Conformal Map (LSCM) parameterization of triangle meshes.
//!
//! Given a triangulated surface, conformap computes a 2D (u, v) coordinate for
//! every vertex that minimizes angular distortion, optionally pinning some
//! vertices to fixed coordinates.
//!
//! ## Features
//!
//! - **Validated meshes**: vertex and triangle tables checked on construction
//! - **Sparse operators**: cotangent Laplacian, vector area matrix, Kronecker products
//! - **Constrained solver**: quadratic minimization with fixed values, direct
//!   (sparse Cholesky) or iterative (conjugate gradient)
//! - **Explicit failures**: singular systems and bad pins are reported as errors
//!
//! ## Quick Start
//!
//! ```
//! use conformap::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit square made of two triangles
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // No pins: two boundary vertices are pinned automatically
//! let uv_map = lscm(&mesh, &LSCMOptions::default()).unwrap();
//! assert_eq!(uv_map.len(), 4);
//! assert_eq!(uv_map.ncols(), 2);
//! ```
//!
//! ## Pinning Vertices
//!
//! ```
//! use conformap::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let options = LSCMOptions::with_pins(vec![
//!     PinnedVertex::new(0, 0.0, 0.0),
//!     PinnedVertex::new(2, 1.0, 0.0),
//! ]);
//! let uv_map = lscm(&mesh, &options).unwrap();
//! assert_eq!(uv_map.get(2).x, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use conformap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::parameterize::{
        lscm, lscm_with_pins, lscm_with_stacked_pins, LSCMOptions, PinStrategy, PinnedVertex, SolverOptions, UVMap,
    };
    pub use crate::error::{ParamError, Result};
    pub use crate::mesh::{build_from_triangles, TriMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
pub use nalgebra_sparse;
