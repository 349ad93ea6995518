//! UV coordinate storage and the stacked unknown layout.
//!
//! The linear systems in this crate work on a single vector of 2n unknowns.
//! [`UvLayout`] is the one place that knows how that vector is arranged: all
//! `u` coordinates first (vertex order), then all `v` coordinates. Nothing
//! else in the crate computes `n + i` offsets by hand.
//!
//! [`UVMap`] is the n×2 result table, one row per input vertex.

use std::fmt;

use nalgebra::{DMatrix, DVector, Point2};

use crate::error::{ParamError, Result};

/// One of the two texture coordinates of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UvAxis {
    /// The first (horizontal) texture coordinate.
    U,
    /// The second (vertical) texture coordinate.
    V,
}

impl UvAxis {
    /// Both axes, in stacking order.
    pub const ALL: [UvAxis; 2] = [UvAxis::U, UvAxis::V];
}

impl fmt::Display for UvAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UvAxis::U => f.write_str("u"),
            UvAxis::V => f.write_str("v"),
        }
    }
}

/// Layout of the 2n-length unknown vector `[u_0 .. u_{n-1}, v_0 .. v_{n-1}]`.
///
/// # Example
///
/// ```
/// use conformap::algo::parameterize::{UvAxis, UvLayout};
///
/// let layout = UvLayout::new(4);
/// assert_eq!(layout.len(), 8);
/// assert_eq!(layout.index(1, UvAxis::U), 1);
/// assert_eq!(layout.index(1, UvAxis::V), 5);
/// assert_eq!(layout.locate(5), Some((1, UvAxis::V)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvLayout {
    num_vertices: usize,
}

impl UvLayout {
    /// Create the layout for a mesh with `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        Self { num_vertices }
    }

    /// Number of vertices covered by the layout.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Length of the stacked vector (2n).
    #[inline]
    pub fn len(&self) -> usize {
        2 * self.num_vertices
    }

    /// Check if the layout covers no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// Position of a vertex coordinate in the stacked vector.
    #[inline]
    pub fn index(&self, vertex: usize, axis: UvAxis) -> usize {
        debug_assert!(vertex < self.num_vertices);
        match axis {
            UvAxis::U => vertex,
            UvAxis::V => self.num_vertices + vertex,
        }
    }

    /// Inverse of [`index`](Self::index): which vertex coordinate a stacked
    /// position holds, or `None` if it is past the end.
    pub fn locate(&self, flat: usize) -> Option<(usize, UvAxis)> {
        if flat < self.num_vertices {
            Some((flat, UvAxis::U))
        } else if flat < self.len() {
            Some((flat - self.num_vertices, UvAxis::V))
        } else {
            None
        }
    }

    /// Stack a UV table into a 2n vector.
    pub fn stack(&self, uv_map: &UVMap) -> Result<DVector<f64>> {
        if uv_map.len() != self.num_vertices {
            return Err(ParamError::DimensionMismatch {
                what: "UV table rows",
                expected: self.num_vertices,
                actual: uv_map.len(),
            });
        }

        let mut x = DVector::zeros(self.len());
        for (i, uv) in uv_map.as_slice().iter().enumerate() {
            x[self.index(i, UvAxis::U)] = uv.x;
            x[self.index(i, UvAxis::V)] = uv.y;
        }
        Ok(x)
    }

    /// Split a stacked 2n vector into the n×2 UV table.
    pub fn split(&self, x: &DVector<f64>) -> Result<UVMap> {
        if x.len() != self.len() {
            return Err(ParamError::DimensionMismatch {
                what: "stacked UV vector length",
                expected: self.len(),
                actual: x.len(),
            });
        }

        let coords = (0..self.num_vertices)
            .map(|i| Point2::new(x[self.index(i, UvAxis::U)], x[self.index(i, UvAxis::V)]))
            .collect();
        Ok(UVMap::new(coords))
    }
}

/// UV coordinates for mesh vertices.
///
/// This structure stores the 2D parameterization (UV coordinates) computed
/// for each vertex in a mesh, in input vertex order. Viewed as a table it has
/// one row per vertex and exactly two columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UVMap {
    /// UV coordinates indexed by vertex.
    coords: Vec<Point2<f64>>,
}

impl UVMap {
    /// Create a new UV map with the given coordinates.
    ///
    /// The coordinates are indexed by vertex (index 0 corresponds to
    /// vertex 0, etc.).
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Create a UV map filled with zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            coords: vec![Point2::origin(); n],
        }
    }

    /// Get the UV coordinates for a vertex.
    #[inline]
    pub fn get(&self, v: usize) -> Point2<f64> {
        self.coords[v]
    }

    /// Get the number of UV coordinates (table rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Number of table columns. Always 2.
    #[inline]
    pub fn ncols(&self) -> usize {
        2
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all UV coordinates with their vertex indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point2<f64>)> + '_ {
        self.coords.iter().copied().enumerate()
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Copy the coordinates out as `[u, v]` rows.
    pub fn to_rows(&self) -> Vec<[f64; 2]> {
        self.coords.iter().map(|uv| [uv.x, uv.y]).collect()
    }

    /// Copy the coordinates into an n×2 matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.coords.len(), 2, |i, j| self.coords[i][j])
    }

    /// Check that every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|uv| uv.x.is_finite() && uv.y.is_finite())
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the UV map is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = *self.coords.first()?;
        let mut min = first;
        let mut max = first;

        for uv in &self.coords {
            min.x = min.x.min(uv.x);
            min.y = min.y.min(uv.y);
            max.x = max.x.max(uv.x);
            max.y = max.y.max(uv.y);
        }

        Some((min, max))
    }

    /// Normalize UV coordinates to fit within [0, 1] range.
    ///
    /// Maintains aspect ratio by scaling uniformly based on the larger dimension.
    pub fn normalize(&mut self) {
        if let Some((min, max)) = self.bounding_box() {
            let scale = (max.x - min.x).max(max.y - min.y);

            if scale > 1e-10 {
                for uv in &mut self.coords {
                    uv.x = (uv.x - min.x) / scale;
                    uv.y = (uv.y - min.y) / scale;
                }
            }
        }
    }
}
