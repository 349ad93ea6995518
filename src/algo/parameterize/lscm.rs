//! Least Squares Conformal Maps (LSCM) parameterization.
//!
//! LSCM computes a conformal (angle-preserving) parameterization of a triangle
//! mesh with boundary. The algorithm minimizes the conformal energy, which
//! measures deviation from a conformal (angle-preserving) map, subject to a
//! few pinned vertices.
//!
//! # References
//!
//! - Lévy, B., Petitjean, S., Ray, N., & Maillot, J. (2002). "Least squares
//!   conformal maps for automatic texture atlas generation." ACM SIGGRAPH.
//! - Mullen, P., Tong, Y., Alliez, P., & Desbrun, M. (2008). "Spectral
//!   conformal parameterization." SGP.

use nalgebra::{DVector, Point3};
use nalgebra_sparse::CsrMatrix;

use crate::error::Result;
use crate::mesh::{build_from_triangles, TriMesh};

use super::energy::conformal_energy_matrix;
use super::pins::{resolve_pins, PinStrategy, PinnedCoordinate, PinnedVertex};
use super::quadratic::{FixedQuadratic, SolverOptions};
use super::sparse::mul_vec;
use super::uv::{UVMap, UvLayout};

/// Options for LSCM parameterization.
#[derive(Debug, Clone, Default)]
pub struct LSCMOptions {
    /// Strategy for selecting pinned (fixed) vertices.
    pub pin_strategy: PinStrategy,

    /// Linear solver settings.
    pub solver: SolverOptions,

    /// Rescale the result into the unit square (keeps aspect ratio).
    /// Pinned vertices no longer sit at their pinned coordinates afterwards.
    pub normalize: bool,
}

impl LSCMOptions {
    /// Create options with automatic pin selection (boundary vertices).
    pub fn automatic() -> Self {
        Self::default()
    }

    /// Create options with manually specified pinned vertices.
    pub fn with_pins(pins: Vec<PinnedVertex>) -> Self {
        Self {
            pin_strategy: PinStrategy::Manual(pins),
            ..Default::default()
        }
    }

    /// Set the pin strategy.
    pub fn with_pin_strategy(mut self, strategy: PinStrategy) -> Self {
        self.pin_strategy = strategy;
        self
    }

    /// Set the linear solver options.
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    /// Normalize the result into [0, 1].
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }
}

/// The assembled LSCM energy of one mesh.
///
/// Assembly only depends on the mesh, so a system can be reused to solve for
/// several pin sets.
///
/// # Example
///
/// ```
/// use conformap::prelude::*;
/// use conformap::algo::parameterize::{LscmSystem, PinStrategy, PinnedVertex, SolverOptions};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// let system = LscmSystem::assemble(&mesh);
/// let pins = PinStrategy::Manual(vec![
///     PinnedVertex::new(0, 0.0, 0.0),
///     PinnedVertex::new(1, 1.0, 0.0),
/// ]);
/// let uv_map = system.solve(&pins, &SolverOptions::default()).unwrap();
/// assert_eq!(uv_map.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct LscmSystem<'a> {
    mesh: &'a TriMesh,
    layout: UvLayout,
    energy: CsrMatrix<f64>,
}

impl<'a> LscmSystem<'a> {
    /// Assemble `Q = A − ½ (I₂ ⊗ L)` for a mesh.
    pub fn assemble(mesh: &'a TriMesh) -> Self {
        let layout = UvLayout::new(mesh.num_vertices());
        let energy = conformal_energy_matrix(mesh);
        log::debug!(
            "lscm: assembled {}x{} energy with {} nonzeros",
            energy.nrows(),
            energy.ncols(),
            energy.nnz()
        );

        Self {
            mesh,
            layout,
            energy,
        }
    }

    /// The stacked unknown layout.
    pub fn layout(&self) -> UvLayout {
        self.layout
    }

    /// The assembled 2n×2n energy matrix.
    pub fn energy(&self) -> &CsrMatrix<f64> {
        &self.energy
    }

    /// Conformal energy `xᵀ Q x` of a UV table.
    pub fn energy_of(&self, uv_map: &UVMap) -> Result<f64> {
        let x = self.layout.stack(uv_map)?;
        Ok(x.dot(&mul_vec(&self.energy, &x, false)))
    }

    /// Minimize the energy for a pin strategy.
    ///
    /// # Errors
    ///
    /// Pin resolution errors (see [`resolve_pins`]) and solver errors
    /// ([`ParamError::SingularSystem`](crate::error::ParamError::SingularSystem),
    /// [`ParamError::ConvergenceFailed`](crate::error::ParamError::ConvergenceFailed)).
    pub fn solve(&self, strategy: &PinStrategy, solver: &SolverOptions) -> Result<UVMap> {
        let pins = resolve_pins(self.mesh, strategy)?;
        log::debug!("lscm: {} pinned coordinates", pins.indices.len());

        let data = FixedQuadratic::precompute(&self.energy, &pins.indices, solver)?;
        let linear = DVector::zeros(self.layout.len());
        let solution = data.solve(&linear, &pins.values)?;

        self.layout.split(&solution)
    }
}

/// Compute LSCM (Least Squares Conformal Maps) parameterization.
///
/// This algorithm computes UV coordinates that minimize angle (conformal)
/// distortion. Without at least two pins the mesh needs a boundary, from which
/// two pins are chosen.
///
/// # Arguments
///
/// * `mesh` - The input mesh
/// * `options` - Parameterization options
///
/// # Returns
///
/// UV coordinates for each vertex (n rows, 2 columns), or an error if
/// parameterization fails.
///
/// # Errors
///
/// Returns an error if:
/// - The mesh has no boundary and fewer than two pins are given
/// - A pin is out of range, conflicting, or all pins coincide
/// - The reduced linear system is singular (e.g. an unreferenced vertex)
/// - The iterative solver fails to converge
///
/// # Example
///
/// ```
/// use conformap::prelude::*;
/// use conformap::algo::parameterize::{lscm, LSCMOptions};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// let uv_map = lscm(&mesh, &LSCMOptions::default()).unwrap();
/// assert_eq!(uv_map.len(), 4);
/// ```
pub fn lscm(mesh: &TriMesh, options: &LSCMOptions) -> Result<UVMap> {
    log::debug!(
        "lscm: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    let system = LscmSystem::assemble(mesh);
    let mut uv_map = system.solve(&options.pin_strategy, &options.solver)?;

    if options.normalize {
        uv_map.normalize();
    }

    Ok(uv_map)
}

/// Compute LSCM from plain tables.
///
/// `vertices` is the n×3 position table, `faces` the m×3 triangle table,
/// `pin_indices` the k pinned vertices and `pin_values` their k×2 target
/// coordinates. With fewer than two pins, boundary pins are used.
///
/// # Errors
///
/// Mesh validation errors, a length mismatch between `pin_indices` and
/// `pin_values`, and every error of [`lscm`].
pub fn lscm_with_pins(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    pin_indices: &[usize],
    pin_values: &[[f64; 2]],
) -> Result<UVMap> {
    let mesh = build_from_triangles(vertices, faces)?;
    let pins = PinnedVertex::from_table(pin_indices, pin_values)?;
    lscm(&mesh, &LSCMOptions::with_pins(pins))
}

/// Compute LSCM with pins given as positions in the stacked `[u; v]` vector.
///
/// `pin_indices` are k positions in `0..2n` (`i` for `u_i`, `n + i` for
/// `v_i`) and `pin_values` the k×1 value column. With fewer than two pinned
/// coordinates, boundary pins are used.
///
/// # Errors
///
/// Mesh validation errors, a length mismatch or out-of-range position in the
/// pin tables, and every error of [`lscm`].
pub fn lscm_with_stacked_pins(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    pin_indices: &[usize],
    pin_values: &[f64],
) -> Result<UVMap> {
    let mesh = build_from_triangles(vertices, faces)?;
    let pins = PinnedCoordinate::from_stacked(pin_indices, pin_values, mesh.num_vertices())?;
    let options = LSCMOptions::default().with_pin_strategy(PinStrategy::Coordinates(pins));
    lscm(&mesh, &options)
}
