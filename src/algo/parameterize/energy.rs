//! Conformal energy assembly.
//!
//! The LSCM energy of a piecewise-linear map `(u, v)` is the Dirichlet energy
//! minus the signed area of the image:
//!
//! ```text
//! E_C(u, v) = ½ ∫ |∇u|² + |∇v|²  −  Area(u, v)
//! ```
//!
//! Both terms are quadratic in the stacked unknowns `x = [u; v]`, so
//! `E_C = xᵀ Q x` with `Q = A − ½ (I₂ ⊗ L)`, where `L` is the cotangent
//! Laplacian and `A` the vector area matrix. `E_C ≥ 0`, with equality exactly
//! for orientation-preserving similarity maps of a planar patch.

use nalgebra::Point3;
use nalgebra_sparse::CsrMatrix;

use crate::mesh::{boundary_edges, TriMesh};

use super::sparse::{from_triplets, kronecker_identity, linear_combination};
use super::uv::{UvAxis, UvLayout};

/// Compute the cotangent of the angle at vertex `a` in triangle (a, b, c).
///
/// The degeneracy test is relative to the edge lengths, so the result does
/// not depend on the scale of the mesh.
fn cotangent_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;

    let dot = ab.dot(&ac);
    let cross_len = ab.cross(&ac).norm();

    if cross_len <= f64::EPSILON * ab.norm() * ac.norm() {
        0.0
    } else {
        dot / cross_len
    }
}

/// Build the n×n cotangent Laplacian.
///
/// Off-diagonal entry `(i, j)` is `½ (cot α + cot β)` for the two angles
/// opposite edge `(i, j)`; diagonal entries make every row sum to zero. The
/// matrix is symmetric and negative semidefinite, and `-uᵀLu` equals the
/// Dirichlet integral `∫ |∇u|²` of the piecewise-linear function `u`.
pub fn cotangent_laplacian(mesh: &TriMesh) -> CsrMatrix<f64> {
    let n = mesh.num_vertices();
    let mut triplets = Vec::with_capacity(mesh.num_faces() * 12);

    for f in mesh.face_ids() {
        let face = mesh.faces()[f];
        let positions = mesh.face_positions(f);

        // Corner k is opposite the edge (k + 1, k + 2)
        for k in 0..3 {
            let i = (k + 1) % 3;
            let j = (k + 2) % 3;
            let w = 0.5 * cotangent_angle(&positions[k], &positions[i], &positions[j]);

            let (vi, vj) = (face[i], face[j]);
            triplets.push((vi, vj, w));
            triplets.push((vj, vi, w));
            triplets.push((vi, vi, -w));
            triplets.push((vj, vj, -w));
        }
    }

    from_triplets(n, n, triplets)
}

/// Build the 2n×2n vector area matrix.
///
/// For a boundary running counter-clockwise, the signed area of the image
/// polygon is `½ Σ (u_i v_j − u_j v_i)` over boundary edges `i → j`. This
/// matrix is the symmetric form of the negated area, so `xᵀ A x = −Area(u, v)`.
pub fn vector_area_matrix(mesh: &TriMesh) -> CsrMatrix<f64> {
    let layout = UvLayout::new(mesh.num_vertices());
    let mut triplets = Vec::new();

    for (i, j) in boundary_edges(mesh) {
        let (ui, vi) = (layout.index(i, UvAxis::U), layout.index(i, UvAxis::V));
        let (uj, vj) = (layout.index(j, UvAxis::U), layout.index(j, UvAxis::V));

        triplets.push((ui, vj, -0.25));
        triplets.push((vj, ui, -0.25));
        triplets.push((uj, vi, 0.25));
        triplets.push((vi, uj, 0.25));
    }

    from_triplets(layout.len(), layout.len(), triplets)
}

/// Assemble the LSCM quadratic form `Q = A − ½ (I₂ ⊗ L)`.
pub fn conformal_energy_matrix(mesh: &TriMesh) -> CsrMatrix<f64> {
    let area = vector_area_matrix(mesh);
    let laplacian = cotangent_laplacian(mesh);
    let laplacian_flat = kronecker_identity(2, &laplacian);

    log::trace!(
        "conformal energy: laplacian nnz = {}, area nnz = {}",
        laplacian.nnz(),
        area.nnz()
    );

    linear_combination(&[(1.0, &area), (-0.5, &laplacian_flat)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::parameterize::sparse::{is_symmetric, mul_vec};
    use crate::mesh::build_from_triangles;
    use nalgebra::DVector;

    fn create_unit_square() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    fn create_disk_mesh() -> TriMesh {
        // Simple disk: center vertex + 6 boundary vertices
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0), // center
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 0.866, 0.0),
            Point3::new(-0.5, 0.866, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-0.5, -0.866, 0.0),
            Point3::new(0.5, -0.866, 0.0),
        ];
        let faces = vec![
            [0, 1, 2],
            [0, 2, 3],
            [0, 3, 4],
            [0, 4, 5],
            [0, 5, 6],
            [0, 6, 1],
        ];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn quadratic_form(q: &CsrMatrix<f64>, x: &DVector<f64>) -> f64 {
        x.dot(&mul_vec(q, x, false))
    }

    /// Stack the planar (x, y) positions of a mesh as `[u; v]`.
    fn planar_coordinates(mesh: &TriMesh) -> DVector<f64> {
        let n = mesh.num_vertices();
        DVector::from_fn(2 * n, |k, _| {
            if k < n {
                mesh.position(k).x
            } else {
                mesh.position(k - n).y
            }
        })
    }

    #[test]
    fn test_cotangent_angle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        // Right angle
        assert!(cotangent_angle(&a, &b, &c).abs() < 1e-12);
        // 45 degrees
        assert!((cotangent_angle(&b, &a, &c) - 1.0).abs() < 1e-12);
        // Degenerate corner
        assert_eq!(cotangent_angle(&a, &a, &c), 0.0);
        // Collinear corner
        assert_eq!(cotangent_angle(&a, &b, &Point3::new(2.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_cotangent_angle_tiny_triangle() {
        let s = 1e-9;
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(s, 0.0, 0.0);
        let c = Point3::new(s, s, 0.0);
        assert!((cotangent_angle(&a, &b, &c) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_laplacian_is_scale_invariant() {
        let mesh = create_disk_mesh();
        let tiny_vertices: Vec<_> = mesh.vertices().iter().map(|p| *p * 1e-8).collect();
        let tiny = build_from_triangles(&tiny_vertices, mesh.faces()).unwrap();

        let l = cotangent_laplacian(&mesh);
        let l_tiny = cotangent_laplacian(&tiny);
        for (i, j, &w) in l.triplet_iter() {
            let w_tiny = l_tiny.get_entry(i, j).map(|e| e.into_value()).unwrap_or(0.0);
            assert!((w - w_tiny).abs() < 1e-9, "({}, {}): {} vs {}", i, j, w, w_tiny);
        }
    }

    #[test]
    fn test_laplacian_rows_sum_to_zero() {
        let mesh = create_disk_mesh();
        let l = cotangent_laplacian(&mesh);

        assert_eq!(l.nrows(), 7);
        assert!(is_symmetric(&l, 1e-12));

        let ones = DVector::from_element(7, 1.0);
        let row_sums = mul_vec(&l, &ones, false);
        assert!(row_sums.norm() < 1e-12);
    }

    #[test]
    fn test_laplacian_unit_square_weights() {
        let mesh = create_unit_square();
        let l = cotangent_laplacian(&mesh);
        let entry = |i, j| l.get_entry(i, j).map(|e| e.into_value()).unwrap_or(0.0);

        // Diagonal 0-2 is opposite two right angles: weight 0
        assert!(entry(0, 2).abs() < 1e-12);
        // Side 0-1 is opposite one 45 degree angle: weight 0.5
        assert!((entry(0, 1) - 0.5).abs() < 1e-12);
        assert!((entry(0, 0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_laplacian_dirichlet_energy_of_linear_function() {
        // u(x, y) = x has |∇u|² = 1, so the Dirichlet integral is the area
        let mesh = create_disk_mesh();
        let l = cotangent_laplacian(&mesh);

        let u = DVector::from_fn(7, |i, _| mesh.position(i).x);
        let energy = -u.dot(&mul_vec(&l, &u, false));
        assert!((energy - mesh.surface_area()).abs() < 1e-9);
    }

    #[test]
    fn test_area_matrix_measures_signed_area() {
        let mesh = create_unit_square();
        let a = vector_area_matrix(&mesh);

        assert_eq!(a.nrows(), 8);
        assert!(is_symmetric(&a, 0.0));

        // Identity map: area 1, counter-clockwise
        let x = planar_coordinates(&mesh);
        assert!((quadratic_form(&a, &x) + 1.0).abs() < 1e-12);

        // Mirrored map (u -> -u) flips the sign
        let mut mirrored = x.clone();
        for k in 0..4 {
            mirrored[k] = -mirrored[k];
        }
        assert!((quadratic_form(&a, &mirrored) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_conformal_energy_vanishes_on_similarity() {
        let mesh = create_disk_mesh();
        let q = conformal_energy_matrix(&mesh);
        assert!(is_symmetric(&q, 1e-12));

        // Rotate by 30 degrees, scale by 2, translate
        let n = mesh.num_vertices();
        let (s, c) = (30f64.to_radians().sin(), 30f64.to_radians().cos());
        let mut x = DVector::zeros(2 * n);
        for i in 0..n {
            let p = mesh.position(i);
            x[i] = 2.0 * (c * p.x - s * p.y) + 3.0;
            x[n + i] = 2.0 * (s * p.x + c * p.y) - 1.0;
        }

        assert!(quadratic_form(&q, &x).abs() < 1e-9);
    }

    #[test]
    fn test_conformal_energy_positive_on_stretch() {
        let mesh = create_disk_mesh();
        let q = conformal_energy_matrix(&mesh);

        let mut x = planar_coordinates(&mesh);
        for i in 0..mesh.num_vertices() {
            x[i] *= 3.0;
        }
        assert!(quadratic_form(&q, &x) > 1e-3);
    }
}
