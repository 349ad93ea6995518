//! Mesh processing algorithms.
//!
//! - **Parameterization**: Least Squares Conformal Maps and the sparse
//!   operators and constrained solver it is built from

pub mod parameterize;
