//! Boundary extraction.
//!
//! A boundary edge is an edge used by exactly one triangle. It keeps the
//! direction it has in that triangle, so for a consistently oriented mesh the
//! boundary edges chain head-to-tail into loops that run counter-clockwise
//! around the surface (as seen from the side the face normals point to).

use std::collections::{BTreeMap, HashMap};

use super::trimesh::TriMesh;
use crate::error::{ParamError, Result};

/// Collect the oriented boundary edges of a mesh.
///
/// Edges are returned in face order, each as `(from, to)` with the direction
/// it has in its only incident triangle.
pub fn boundary_edges(mesh: &TriMesh) -> Vec<(usize, usize)> {
    let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
    for face in mesh.faces() {
        for i in 0..3 {
            let v0 = face[i];
            let v1 = face[(i + 1) % 3];
            let edge = if v0 < v1 { (v0, v1) } else { (v1, v0) };
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }

    let mut edges = Vec::new();
    for face in mesh.faces() {
        for i in 0..3 {
            let v0 = face[i];
            let v1 = face[(i + 1) % 3];
            let edge = if v0 < v1 { (v0, v1) } else { (v1, v0) };
            if edge_count[&edge] == 1 {
                edges.push((v0, v1));
            }
        }
    }
    edges
}

/// Extract every boundary loop as an ordered vertex list.
///
/// Each loop starts at its smallest vertex index and follows the boundary edge
/// directions. Loops are returned in order of their starting vertex. A closed
/// mesh yields no loops.
///
/// # Errors
///
/// Returns [`ParamError::NonManifoldBoundary`] if a vertex starts more than
/// one boundary edge (two boundary loops touching at a vertex).
pub fn boundary_loops(mesh: &TriMesh) -> Result<Vec<Vec<usize>>> {
    let mut next: BTreeMap<usize, usize> = BTreeMap::new();
    for (from, to) in boundary_edges(mesh) {
        if next.insert(from, to).is_some() {
            return Err(ParamError::NonManifoldBoundary { vertex: from });
        }
    }

    let mut visited = vec![false; mesh.num_vertices()];
    let mut loops = Vec::new();

    for &start in next.keys() {
        if visited[start] {
            continue;
        }

        let mut boundary = Vec::new();
        let mut current = start;
        loop {
            visited[current] = true;
            boundary.push(current);
            match next.get(&current) {
                Some(&to) if !visited[to] => current = to,
                _ => break,
            }
        }
        loops.push(boundary);
    }

    Ok(loops)
}

/// Extract the longest boundary loop.
///
/// Ties are broken in favor of the loop with the smallest starting vertex.
/// Returns an empty list for a closed mesh.
///
/// # Example
///
/// ```
/// use conformap::mesh::{boundary_loop, build_from_triangles};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
/// assert_eq!(boundary_loop(&mesh).unwrap(), vec![0, 1, 2, 3]);
/// ```
pub fn boundary_loop(mesh: &TriMesh) -> Result<Vec<usize>> {
    let loops = boundary_loops(mesh)?;
    let mut longest: Vec<usize> = Vec::new();
    for boundary in loops {
        if boundary.len() > longest.len() {
            longest = boundary;
        }
    }
    Ok(longest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    fn create_grid_mesh(n: usize) -> TriMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;

                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn create_tetrahedron() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_boundary_edges_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        assert_eq!(boundary_edges(&mesh), vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_grid_boundary_loop_is_ordered() {
        // 3x3 vertices:
        // 6 7 8
        // 3 4 5
        // 0 1 2
        let mesh = create_grid_mesh(2);
        let boundary = boundary_loop(&mesh).unwrap();
        assert_eq!(boundary, vec![0, 1, 2, 5, 8, 7, 6, 3]);

        // Interior vertex is never on the boundary
        assert!(!boundary.contains(&4));
    }

    #[test]
    fn test_closed_mesh_has_no_boundary() {
        let mesh = create_tetrahedron();
        assert!(boundary_edges(&mesh).is_empty());
        assert!(boundary_loops(&mesh).unwrap().is_empty());
        assert!(boundary_loop(&mesh).unwrap().is_empty());
    }

    #[test]
    fn test_annulus_picks_longest_loop() {
        // Outer square 0..4 and inner triangle 4..7 (a square with a hole)
        let vertices = vec![
            Point3::new(-2.0, -2.0, 0.0),
            Point3::new(2.0, -2.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(-2.0, 2.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
        ];
        let faces = vec![
            [0, 1, 4],
            [1, 5, 4],
            [1, 2, 5],
            [2, 6, 5],
            [2, 3, 6],
            [3, 0, 6],
            [0, 4, 6],
        ];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let loops = boundary_loops(&mesh).unwrap();
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0], vec![0, 1, 2, 3]);
        assert_eq!(loops[1], vec![4, 6, 5]);

        assert_eq!(boundary_loop(&mesh).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bowtie_boundary_is_rejected() {
        // Two triangles touching at vertex 0 only
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let err = boundary_loops(&mesh).unwrap_err();
        assert_eq!(err, ParamError::NonManifoldBoundary { vertex: 0 });
    }
}
