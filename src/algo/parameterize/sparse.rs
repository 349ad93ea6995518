//! Sparse matrix helpers and conjugate gradient solver.
//!
//! Matrices are stored as [`nalgebra_sparse::CsrMatrix`] and assembled from
//! `(row, col, value)` triplets through a [`CooMatrix`], which sums duplicate
//! entries. This module adds the few operations the parameterization needs on
//! top of that: Kronecker products, scaled sums, matrix-vector products, and
//! an iterative solver for symmetric positive definite systems.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;

use crate::error::{ParamError, Result};

/// Create a CSR matrix from triplets (row, col, value).
///
/// Duplicate entries at the same (row, col) are summed.
pub fn from_triplets<T>(rows: usize, cols: usize, triplets: T) -> CsrMatrix<f64>
where
    T: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut coo = CooMatrix::new(rows, cols);
    for (row, col, value) in triplets {
        coo.push(row, col, value);
    }
    CsrMatrix::from(&coo)
}

/// Kronecker product `a ⊗ b`.
///
/// The result has `a.nrows() * b.nrows()` rows and `a.ncols() * b.ncols()`
/// columns; block `(i, j)` is `a[i, j] * b`.
pub fn kronecker_product(a: &CsrMatrix<f64>, b: &CsrMatrix<f64>) -> CsrMatrix<f64> {
    let (rb, cb) = (b.nrows(), b.ncols());
    let mut triplets = Vec::with_capacity(a.nnz() * b.nnz());

    for (ia, ja, &va) in a.triplet_iter() {
        for (ib, jb, &vb) in b.triplet_iter() {
            triplets.push((ia * rb + ib, ja * cb + jb, va * vb));
        }
    }

    from_triplets(a.nrows() * rb, a.ncols() * cb, triplets)
}

/// Tile `a` `copies` times along the diagonal, i.e. `I_copies ⊗ a`.
pub fn kronecker_identity(copies: usize, a: &CsrMatrix<f64>) -> CsrMatrix<f64> {
    kronecker_product(&CsrMatrix::identity(copies), a)
}

/// Sum of scaled matrices `Σ scale_k * m_k`.
///
/// # Panics
///
/// Panics if the matrices do not all have the same shape.
pub fn linear_combination(terms: &[(f64, &CsrMatrix<f64>)]) -> CsrMatrix<f64> {
    let (rows, cols) = terms
        .first()
        .map(|(_, m)| (m.nrows(), m.ncols()))
        .unwrap_or((0, 0));

    let mut coo = CooMatrix::new(rows, cols);
    for &(scale, m) in terms {
        assert_eq!((m.nrows(), m.ncols()), (rows, cols), "Matrix shape mismatch");
        for (i, j, &v) in m.triplet_iter() {
            coo.push(i, j, scale * v);
        }
    }
    CsrMatrix::from(&coo)
}

/// Check whether a square matrix is symmetric up to `tolerance`.
pub fn is_symmetric(a: &CsrMatrix<f64>, tolerance: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    a.triplet_iter().all(|(i, j, &v)| {
        let vt = a
            .get_entry(j, i)
            .map(|entry| entry.into_value())
            .unwrap_or(0.0);
        (v - vt).abs() <= tolerance
    })
}

/// Multiply matrix by vector: y = A * x.
///
/// Rows are processed in parallel when `parallel` is set.
pub fn mul_vec(a: &CsrMatrix<f64>, x: &DVector<f64>, parallel: bool) -> DVector<f64> {
    assert_eq!(x.len(), a.ncols(), "Vector dimension mismatch");

    let row_dot = |i: usize| {
        let row = a.row(i);
        row.col_indices()
            .iter()
            .zip(row.values())
            .map(|(&j, &v)| v * x[j])
            .sum::<f64>()
    };

    let y: Vec<f64> = if parallel {
        (0..a.nrows()).into_par_iter().map(row_dot).collect()
    } else {
        (0..a.nrows()).map(row_dot).collect()
    };

    DVector::from_vec(y)
}

/// Solve A*x = b using the Conjugate Gradient method.
///
/// Requires A to be symmetric positive definite.
///
/// # Arguments
///
/// * `a` - The system matrix (must be symmetric positive definite)
/// * `b` - The right-hand side vector
/// * `x0` - Optional initial guess (zeros if None)
/// * `max_iter` - Maximum number of iterations
/// * `tolerance` - Convergence tolerance (relative residual norm)
/// * `parallel` - Run matrix-vector products on the rayon pool
///
/// # Returns
///
/// The solution vector x, or an error if convergence fails.
pub fn conjugate_gradient(
    a: &CsrMatrix<f64>,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    max_iter: usize,
    tolerance: f64,
    parallel: bool,
) -> Result<DVector<f64>> {
    let n = b.len();
    if a.nrows() != n || a.ncols() != n {
        return Err(ParamError::DimensionMismatch {
            what: "conjugate gradient system size",
            expected: n,
            actual: a.nrows().max(a.ncols()),
        });
    }

    // Initial guess
    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => DVector::zeros(n),
    };

    // r = b - A*x
    let mut r = b - mul_vec(a, &x, parallel);

    // Check if initial guess is already good enough
    let b_norm = b.norm();
    if b_norm < 1e-15 {
        return Ok(DVector::zeros(n));
    }

    let mut r_norm_sq = r.dot(&r);
    if r_norm_sq.sqrt() / b_norm < tolerance {
        return Ok(x);
    }

    // p = r
    let mut p = r.clone();

    for iter in 0..max_iter {
        let ap = mul_vec(a, &p, parallel);

        // alpha = (r · r) / (p · Ap)
        let p_ap = p.dot(&ap);
        if p_ap <= 1e-300 {
            // Not positive definite along p
            log::trace!("conjugate gradient breakdown at iteration {}", iter);
            return Err(ParamError::SingularSystem);
        }
        let alpha = r_norm_sq / p_ap;

        x += alpha * &p;
        r -= alpha * &ap;

        let new_r_norm_sq = r.dot(&r);
        if new_r_norm_sq.sqrt() / b_norm < tolerance {
            log::trace!("conjugate gradient converged after {} iterations", iter + 1);
            return Ok(x);
        }

        // beta = (r_new · r_new) / (r_old · r_old)
        let beta = new_r_norm_sq / r_norm_sq;
        p = &r + beta * &p;

        r_norm_sq = new_r_norm_sq;
    }

    Err(ParamError::ConvergenceFailed {
        iterations: max_iter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd_2x2() -> CsrMatrix<f64> {
        // [ 4  1 ]
        // [ 1  3 ]
        from_triplets(2, 2, vec![(0, 0, 4.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 3.0)])
    }

    fn entry(a: &CsrMatrix<f64>, i: usize, j: usize) -> f64 {
        a.get_entry(i, j).map(|e| e.into_value()).unwrap_or(0.0)
    }

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let triplets = vec![
            (0, 0, 2.0),
            (0, 0, 2.0), // Duplicate: should sum to 4.0
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 1, 3.0),
        ];
        let a = from_triplets(2, 2, triplets);

        let y = mul_vec(&a, &DVector::from_vec(vec![1.0, 0.0]), false);
        assert!((y[0] - 4.0).abs() < 1e-10);
        assert!((y[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_mul_vec_parallel_matches_sequential() {
        let a = spd_2x2();
        let x = DVector::from_vec(vec![1.0, 1.0]);

        let y = mul_vec(&a, &x, false);
        assert!((y[0] - 5.0).abs() < 1e-10);
        assert!((y[1] - 4.0).abs() < 1e-10);
        assert_eq!(mul_vec(&a, &x, true), y);
    }

    #[test]
    fn test_kronecker_identity_tiles_diagonal() {
        let a = spd_2x2();
        let k = kronecker_identity(2, &a);

        assert_eq!(k.nrows(), 4);
        assert_eq!(k.ncols(), 4);
        assert_eq!(k.nnz(), 8);

        // Upper-left and lower-right blocks are copies of a
        assert_eq!(entry(&k, 0, 1), 1.0);
        assert_eq!(entry(&k, 2, 2), 4.0);
        assert_eq!(entry(&k, 3, 2), 1.0);
        // Off-diagonal blocks are empty
        assert_eq!(entry(&k, 0, 2), 0.0);
        assert_eq!(entry(&k, 3, 1), 0.0);
    }

    #[test]
    fn test_kronecker_product_general() {
        // [1 2] ⊗ [0 1; 1 0]
        let a = from_triplets(1, 2, vec![(0, 0, 1.0), (0, 1, 2.0)]);
        let b = from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0)]);
        let k = kronecker_product(&a, &b);

        assert_eq!((k.nrows(), k.ncols()), (2, 4));
        assert_eq!(entry(&k, 0, 1), 1.0);
        assert_eq!(entry(&k, 1, 0), 1.0);
        assert_eq!(entry(&k, 0, 3), 2.0);
        assert_eq!(entry(&k, 1, 2), 2.0);
        assert_eq!(entry(&k, 0, 0), 0.0);
    }

    #[test]
    fn test_linear_combination() {
        let a = spd_2x2();
        let i = CsrMatrix::identity(2);
        let c = linear_combination(&[(1.0, &a), (-0.5, &i)]);

        assert_eq!(entry(&c, 0, 0), 3.5);
        assert_eq!(entry(&c, 0, 1), 1.0);
        assert_eq!(entry(&c, 1, 1), 2.5);
        assert!(is_symmetric(&c, 0.0));
    }

    #[test]
    fn test_is_symmetric() {
        assert!(is_symmetric(&spd_2x2(), 0.0));
        let skew = from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, -1.0)]);
        assert!(!is_symmetric(&skew, 1e-12));
        let rect = from_triplets(1, 2, vec![(0, 0, 1.0)]);
        assert!(!is_symmetric(&rect, 1e-12));
    }

    #[test]
    fn test_cg_simple() {
        // Solution: x = 1/11, y = 7/11
        let a = spd_2x2();
        let b = DVector::from_vec(vec![1.0, 2.0]);

        let x = conjugate_gradient(&a, &b, None, 100, 1e-12, false).unwrap();

        let residual = mul_vec(&a, &x, false) - &b;
        assert!(residual.norm() < 1e-8);
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-8);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-8);
    }

    #[test]
    fn test_cg_larger_system() {
        // 4x4 symmetric positive definite matrix (diagonally dominant)
        let triplets = vec![
            (0, 0, 10.0),
            (0, 1, 1.0),
            (0, 2, 2.0),
            (1, 0, 1.0),
            (1, 1, 10.0),
            (1, 2, 1.0),
            (2, 0, 2.0),
            (2, 1, 1.0),
            (2, 2, 10.0),
            (2, 3, 1.0),
            (3, 2, 1.0),
            (3, 3, 10.0),
        ];
        let a = from_triplets(4, 4, triplets);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

        let x = conjugate_gradient(&a, &b, None, 100, 1e-12, true).unwrap();

        let residual = mul_vec(&a, &x, false) - &b;
        assert!(residual.norm() < 1e-8);
    }

    #[test]
    fn test_cg_with_initial_guess() {
        let a = spd_2x2();
        let b = DVector::from_vec(vec![1.0, 2.0]);

        let x0 = DVector::from_vec(vec![0.1, 0.6]);
        let x = conjugate_gradient(&a, &b, Some(&x0), 100, 1e-12, false).unwrap();

        let residual = mul_vec(&a, &x, false) - b;
        assert!(residual.norm() < 1e-8);
    }

    #[test]
    fn test_cg_zero_rhs() {
        let a = spd_2x2();
        let x0 = DVector::from_vec(vec![3.0, -1.0]);
        let x = conjugate_gradient(&a, &DVector::zeros(2), Some(&x0), 10, 1e-12, false).unwrap();
        assert_eq!(x, DVector::zeros(2));
    }

    #[test]
    fn test_cg_singular_matrix() {
        // [ 1 1 ; 1 1 ] has a null space; b is outside the range
        let a = from_triplets(2, 2, vec![(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0)]);
        let b = DVector::from_vec(vec![1.0, -1.0]);

        let err = conjugate_gradient(&a, &b, None, 10, 1e-12, false).unwrap_err();
        assert_eq!(err, ParamError::SingularSystem);
    }
}
