//! Quadratic minimization with fixed values.
//!
//! Minimizes `½ xᵀ Q x + xᵀ B` subject to `x[k] = y_k` for a set of known
//! indices `k`. Splitting the unknowns into free (`u`) and known (`k`) blocks,
//! the minimizer satisfies
//!
//! ```text
//! Q_uu x_u = −(B_u + Q_uk y)
//! ```
//!
//! The work is split the same way a caller uses it: [`FixedQuadratic::precompute`]
//! partitions `Q` and factors `Q_uu` once, and [`FixedQuadratic::solve`] can
//! then be called for any number of linear terms and known values.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix, CsrMatrix};

use crate::error::{ParamError, Result};

use super::sparse::{conjugate_gradient, mul_vec};

/// Linear solver used for the free block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// Sparse Cholesky factorization (direct).
    Cholesky,
    /// Conjugate gradient iterations (matrix-free apart from `Q_uu`).
    ConjugateGradient,
}

/// Options for the constrained quadratic solver.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Which linear solver handles the free block.
    pub kind: SolverKind,

    /// Maximum iterations for the conjugate gradient solver.
    pub max_iterations: usize,

    /// Convergence tolerance for the CG solver (relative residual).
    pub tolerance: f64,

    /// Whether CG matrix-vector products run on the rayon pool.
    pub parallel: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            kind: SolverKind::Cholesky,
            max_iterations: 1000,
            tolerance: 1e-10,
            parallel: false,
        }
    }
}

impl SolverOptions {
    /// Direct sparse Cholesky solver.
    pub fn cholesky() -> Self {
        Self::default()
    }

    /// Iterative conjugate gradient solver.
    pub fn conjugate_gradient() -> Self {
        Self {
            kind: SolverKind::ConjugateGradient,
            ..Default::default()
        }
    }

    /// Set the maximum CG iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Run CG matrix-vector products in parallel.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.kind == SolverKind::ConjugateGradient {
            if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
                return Err(ParamError::invalid_param(
                    "tolerance",
                    self.tolerance,
                    "must be positive and finite",
                ));
            }
            if self.max_iterations == 0 {
                return Err(ParamError::invalid_param(
                    "max_iterations",
                    self.max_iterations,
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }
}

/// How the free block is solved.
enum FreeBlockSolver {
    Cholesky(CscCholesky<f64>),
    Iterative(CsrMatrix<f64>),
    /// Every unknown is known; nothing to solve.
    Empty,
}

/// Precomputed data for repeated constrained quadratic solves.
pub struct FixedQuadratic {
    /// Total number of unknowns.
    n: usize,
    /// Known indices, in the order their values are supplied.
    known: Vec<usize>,
    /// Free indices, ascending.
    free: Vec<usize>,
    /// Coupling block between free rows and known columns.
    q_fk: CsrMatrix<f64>,
    solver: FreeBlockSolver,
    options: SolverOptions,
}

impl std::fmt::Debug for FixedQuadratic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedQuadratic")
            .field("n", &self.n)
            .field("known", &self.known.len())
            .field("free", &self.free.len())
            .field("kind", &self.options.kind)
            .finish_non_exhaustive()
    }
}

impl FixedQuadratic {
    /// Partition `q` by the `known` indices and prepare the free-block solver.
    ///
    /// `q` must be square and symmetric. With [`SolverKind::Cholesky`] the free
    /// block is factored here.
    ///
    /// # Errors
    ///
    /// - [`ParamError::DimensionMismatch`] if `q` is not square
    /// - [`ParamError::InvalidParameter`] if a known index is out of range or
    ///   repeated, or the solver options are invalid
    /// - [`ParamError::SingularSystem`] if the free block is not positive definite
    pub fn precompute(q: &CsrMatrix<f64>, known: &[usize], options: &SolverOptions) -> Result<Self> {
        options.validate()?;

        let n = q.nrows();
        if q.ncols() != n {
            return Err(ParamError::DimensionMismatch {
                what: "quadratic matrix columns",
                expected: n,
                actual: q.ncols(),
            });
        }

        // Position of each index in the known list, or in the free list
        let mut known_slot: Vec<Option<usize>> = vec![None; n];
        for (slot, &k) in known.iter().enumerate() {
            if k >= n {
                return Err(ParamError::invalid_param("known index", k, "out of range"));
            }
            if known_slot[k].is_some() {
                return Err(ParamError::invalid_param("known index", k, "listed twice"));
            }
            known_slot[k] = Some(slot);
        }

        let free: Vec<usize> = (0..n).filter(|&i| known_slot[i].is_none()).collect();
        let mut free_slot: Vec<Option<usize>> = vec![None; n];
        for (slot, &i) in free.iter().enumerate() {
            free_slot[i] = Some(slot);
        }

        let n_free = free.len();
        let mut q_ff = CooMatrix::new(n_free, n_free);
        let mut q_fk = CooMatrix::new(n_free, known.len());

        // Keep the diagonal in the sparsity pattern even where Q has no entry
        for slot in 0..n_free {
            q_ff.push(slot, slot, 0.0);
        }

        for (i, j, &v) in q.triplet_iter() {
            let Some(row) = free_slot[i] else { continue };
            match (free_slot[j], known_slot[j]) {
                (Some(col), _) => q_ff.push(row, col, v),
                (None, Some(col)) => q_fk.push(row, col, v),
                (None, None) => unreachable!("index is either free or known"),
            }
        }

        log::debug!(
            "fixed quadratic: {} unknowns, {} known, {} free, {:?}",
            n,
            known.len(),
            n_free,
            options.kind
        );

        let solver = if n_free == 0 {
            FreeBlockSolver::Empty
        } else {
            match options.kind {
                SolverKind::Cholesky => {
                    let csc = CscMatrix::from(&q_ff);
                    let factor = CscCholesky::factor(&csc).map_err(|e| {
                        log::debug!("cholesky factorization failed: {:?}", e);
                        ParamError::SingularSystem
                    })?;
                    FreeBlockSolver::Cholesky(factor)
                }
                SolverKind::ConjugateGradient => FreeBlockSolver::Iterative(CsrMatrix::from(&q_ff)),
            }
        };

        Ok(Self {
            n,
            known: known.to_vec(),
            free,
            q_fk: CsrMatrix::from(&q_fk),
            solver,
            options: options.clone(),
        })
    }

    /// Total number of unknowns.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Check if the problem has no unknowns.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Known indices, in the order their values are expected by [`solve`](Self::solve).
    pub fn known(&self) -> &[usize] {
        &self.known
    }

    /// Free indices, ascending.
    pub fn free(&self) -> &[usize] {
        &self.free
    }

    /// Minimize for linear term `linear` (length n) and known values
    /// `known_values` (one per known index). Returns the full length-n vector.
    ///
    /// # Errors
    ///
    /// - [`ParamError::DimensionMismatch`] for wrongly sized inputs
    /// - [`ParamError::SingularSystem`] if the solution is not finite or CG breaks down
    /// - [`ParamError::ConvergenceFailed`] if CG runs out of iterations
    pub fn solve(&self, linear: &DVector<f64>, known_values: &DVector<f64>) -> Result<DVector<f64>> {
        if linear.len() != self.n {
            return Err(ParamError::DimensionMismatch {
                what: "linear term length",
                expected: self.n,
                actual: linear.len(),
            });
        }
        if known_values.len() != self.known.len() {
            return Err(ParamError::DimensionMismatch {
                what: "known value count",
                expected: self.known.len(),
                actual: known_values.len(),
            });
        }

        let mut x = DVector::zeros(self.n);
        for (&k, &value) in self.known.iter().zip(known_values.iter()) {
            x[k] = value;
        }

        // rhs = -(B_f + Q_fk y)
        let coupling = mul_vec(&self.q_fk, known_values, false);
        let rhs = DVector::from_fn(self.free.len(), |slot, _| {
            -(linear[self.free[slot]] + coupling[slot])
        });

        let x_free = match &self.solver {
            FreeBlockSolver::Empty => return Ok(x),
            FreeBlockSolver::Cholesky(factor) => {
                let b = DMatrix::from_column_slice(rhs.len(), 1, rhs.as_slice());
                let solution = factor.solve(&b);
                DVector::from_column_slice(solution.as_slice())
            }
            FreeBlockSolver::Iterative(q_ff) => conjugate_gradient(
                q_ff,
                &rhs,
                None,
                self.options.max_iterations,
                self.options.tolerance,
                self.options.parallel,
            )?,
        };

        if x_free.iter().any(|v| !v.is_finite()) {
            return Err(ParamError::SingularSystem);
        }

        for (slot, &i) in self.free.iter().enumerate() {
            x[i] = x_free[slot];
        }
        Ok(x)
    }
}
