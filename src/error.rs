//! Error types for conformap.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

use crate::algo::parameterize::UvAxis;

/// Result type alias using [`ParamError`].
pub type Result<T> = std::result::Result<T, ParamError>;

/// Errors that can occur while building a mesh or computing a parameterization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The mesh has no vertices or no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A boundary vertex starts more than one boundary edge, so the boundary
    /// cannot be walked as a simple loop.
    #[error("boundary vertex {vertex} is shared by more than one boundary loop segment")]
    NonManifoldBoundary {
        /// The offending vertex.
        vertex: usize,
    },

    /// The mesh has no boundary (closed mesh) and no pins were supplied.
    #[error("mesh has no boundary; supply at least two pinned vertices")]
    NoBoundary,

    /// The boundary loop is too short to choose two distinct pins.
    #[error("boundary loop has {len} vertices, at least 2 are required")]
    BoundaryTooSmall {
        /// Number of vertices on the longest boundary loop.
        len: usize,
    },

    /// A pin refers to a vertex that does not exist.
    #[error("pinned vertex {vertex} is out of range (mesh has {num_vertices} vertices)")]
    PinOutOfRange {
        /// The vertex index given by the caller.
        vertex: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },

    /// The same coordinate was pinned twice to different values.
    #[error("{axis} coordinate of vertex {vertex} is pinned to conflicting values")]
    ConflictingConstraints {
        /// The vertex index.
        vertex: usize,
        /// The coordinate pinned twice.
        axis: UvAxis,
    },

    /// The pins do not fix scale and position: every pinned coordinate agrees
    /// with one UV point, or an axis is left unpinned.
    #[error("pinned coordinates do not fix the map; it would collapse to a point")]
    DegenerateConstraints,

    /// Two tables that must agree in size do not.
    #[error("{what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        actual: usize,
    },

    /// The reduced linear system is singular or not positive definite.
    #[error("reduced system is singular or not positive definite")]
    SingularSystem,

    /// Algorithm failed to converge.
    #[error("algorithm failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl ParamError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ParamError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
