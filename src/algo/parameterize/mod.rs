//! UV parameterization algorithms.
//!
//! This module computes UV coordinates (a 2D parameterization) for triangle
//! meshes. Parameterization maps the 3D mesh surface to a 2D domain, which is
//! essential for texture mapping and many geometry processing operations.
//!
//! # Available Algorithms
//!
//! - [`lscm`]: Least Squares Conformal Maps - minimizes angle distortion
//!
//! # Building Blocks
//!
//! - [`cotangent_laplacian`], [`vector_area_matrix`], [`conformal_energy_matrix`]:
//!   sparse operators of the conformal energy
//! - [`FixedQuadratic`]: quadratic minimization with fixed values
//! - [`UvLayout`]: the `[u; v]` stacking of the unknown vector
//!
//! # Requirements
//!
//! Without explicit pins the mesh must have a boundary (disk topology).
//! Closed meshes must first be cut to create a boundary.
//!
//! # Example
//!
//! ```
//! use conformap::prelude::*;
//! use conformap::algo::parameterize::{lscm, LSCMOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.2),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! // Compute LSCM parameterization
//! let uv_map = lscm(&mesh, &LSCMOptions::default()).unwrap();
//!
//! // Access UV coordinates
//! for (v, uv) in uv_map.iter() {
//!     println!("Vertex {}: u={:.3}, v={:.3}", v, uv.x, uv.y);
//! }
//! ```
//!
//! # References
//!
//! - Lévy, B., Petitjean, S., Ray, N., & Maillot, J. (2002). "Least squares
//!   conformal maps for automatic texture atlas generation." ACM SIGGRAPH.

mod energy;
mod lscm;
mod pins;
mod quadratic;
pub mod sparse;
mod uv;

pub use energy::{conformal_energy_matrix, cotangent_laplacian, vector_area_matrix};
pub use lscm::{lscm, lscm_with_pins, lscm_with_stacked_pins, LSCMOptions, LscmSystem};
pub use pins::{
    boundary_pins, resolve_pins, PinStrategy, PinnedCoordinate, PinnedVertex, ResolvedPins,
};
pub use quadratic::{FixedQuadratic, SolverKind, SolverOptions};
pub use uv::{UVMap, UvAxis, UvLayout};
