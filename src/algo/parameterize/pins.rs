//! Pinned vertices.
//!
//! The conformal energy is invariant under translation, rotation and uniform
//! scaling of the UV plane, so at least two vertices must be pinned to get a
//! unique minimizer. Pins can be given per vertex (both coordinates) or per
//! coordinate; with fewer than two, two boundary vertices are chosen
//! automatically.

use std::collections::BTreeMap;

use nalgebra::{DVector, Point2};

use crate::error::{ParamError, Result};
use crate::mesh::{boundary_loop, TriMesh};

use super::uv::{UvAxis, UvLayout};

/// A vertex pinned to a specific UV coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedVertex {
    /// The vertex index to pin.
    pub vertex: usize,
    /// The fixed U coordinate.
    pub u: f64,
    /// The fixed V coordinate.
    pub v: f64,
}

impl PinnedVertex {
    /// Create a new pinned vertex.
    pub fn new(vertex: usize, u: f64, v: f64) -> Self {
        Self { vertex, u, v }
    }

    /// Build pins from an index list and a k×2 value table.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::DimensionMismatch`] if the two lists differ in length.
    pub fn from_table(indices: &[usize], values: &[[f64; 2]]) -> Result<Vec<PinnedVertex>> {
        if indices.len() != values.len() {
            return Err(ParamError::DimensionMismatch {
                what: "pin value rows",
                expected: indices.len(),
                actual: values.len(),
            });
        }
        Ok(indices
            .iter()
            .zip(values)
            .map(|(&vertex, &[u, v])| PinnedVertex::new(vertex, u, v))
            .collect())
    }

    /// The pinned position.
    pub fn uv(&self) -> Point2<f64> {
        Point2::new(self.u, self.v)
    }

    fn coordinates(&self) -> [PinnedCoordinate; 2] {
        [
            PinnedCoordinate::new(self.vertex, UvAxis::U, self.u),
            PinnedCoordinate::new(self.vertex, UvAxis::V, self.v),
        ]
    }
}

/// A single vertex coordinate pinned to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedCoordinate {
    /// The vertex index.
    pub vertex: usize,
    /// Which coordinate is fixed.
    pub axis: UvAxis,
    /// The fixed value.
    pub value: f64,
}

impl PinnedCoordinate {
    /// Create a new pinned coordinate.
    pub fn new(vertex: usize, axis: UvAxis, value: f64) -> Self {
        Self {
            vertex,
            axis,
            value,
        }
    }

    /// Build pins from positions in the stacked `[u; v]` vector and a k×1
    /// value column.
    ///
    /// # Errors
    ///
    /// - [`ParamError::DimensionMismatch`] if the two lists differ in length
    /// - [`ParamError::PinOutOfRange`] if a position is past `2 * num_vertices`
    pub fn from_stacked(
        indices: &[usize],
        values: &[f64],
        num_vertices: usize,
    ) -> Result<Vec<PinnedCoordinate>> {
        if indices.len() != values.len() {
            return Err(ParamError::DimensionMismatch {
                what: "pin value rows",
                expected: indices.len(),
                actual: values.len(),
            });
        }

        let layout = UvLayout::new(num_vertices);
        indices
            .iter()
            .zip(values)
            .map(|(&flat, &value)| {
                let (vertex, axis) = layout.locate(flat).ok_or(ParamError::PinOutOfRange {
                    vertex: flat,
                    num_vertices,
                })?;
                Ok(PinnedCoordinate::new(vertex, axis, value))
            })
            .collect()
    }
}

/// Strategy for selecting which vertices to pin (fix) during parameterization.
#[derive(Debug, Clone, Default)]
pub enum PinStrategy {
    /// Pin the first vertex of the boundary loop to (0, 1) and the vertex
    /// halfway along the loop to (0, 0).
    #[default]
    Automatic,

    /// Use the given vertices with their UV coordinates. Fewer than two pins
    /// fall back to [`PinStrategy::Automatic`].
    Manual(Vec<PinnedVertex>),

    /// Use the given individual coordinates. Fewer than two pins fall back to
    /// [`PinStrategy::Automatic`].
    Coordinates(Vec<PinnedCoordinate>),
}

/// Pins resolved against a mesh, ready for the quadratic solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPins {
    /// Positions in the stacked `[u; v]` vector.
    pub indices: Vec<usize>,
    /// Value for each position.
    pub values: DVector<f64>,
}

/// Choose two boundary pins for a mesh.
///
/// The first vertex of the sorted boundary loop is pinned to (0, 1) and the
/// vertex at position `len / 2` of the loop to (0, 0). Selection is by loop
/// position, not by arc length.
///
/// # Errors
///
/// - [`ParamError::NoBoundary`] for a closed mesh
/// - [`ParamError::BoundaryTooSmall`] if the loop has fewer than two vertices
/// - any error from [`boundary_loop`]
pub fn boundary_pins(mesh: &TriMesh) -> Result<[PinnedVertex; 2]> {
    let boundary = boundary_loop(mesh)?;
    if boundary.is_empty() {
        return Err(ParamError::NoBoundary);
    }
    if boundary.len() < 2 {
        return Err(ParamError::BoundaryTooSmall {
            len: boundary.len(),
        });
    }

    let first = boundary[0];
    let middle = boundary[boundary.len() / 2];
    log::debug!(
        "automatic pins: vertex {} -> (0, 1), vertex {} -> (0, 0) on a boundary of {}",
        first,
        middle,
        boundary.len()
    );

    Ok([
        PinnedVertex::new(first, 0.0, 1.0),
        PinnedVertex::new(middle, 0.0, 0.0),
    ])
}

/// Turn a pin strategy into stacked indices and values.
///
/// # Errors
///
/// - [`ParamError::PinOutOfRange`] for a vertex index past the mesh
/// - [`ParamError::InvalidParameter`] for a non-finite pin value
/// - [`ParamError::ConflictingConstraints`] if a coordinate is pinned to two values
/// - [`ParamError::DegenerateConstraints`] if a constant map meets every pin,
///   or one axis has no pin
/// - the errors of [`boundary_pins`] when pins are chosen automatically
pub fn resolve_pins(mesh: &TriMesh, strategy: &PinStrategy) -> Result<ResolvedPins> {
    let coordinates: Vec<PinnedCoordinate> = match strategy {
        PinStrategy::Manual(pins) if pins.len() >= 2 => {
            pins.iter().flat_map(|p| p.coordinates()).collect()
        }
        PinStrategy::Coordinates(pins) if pins.len() >= 2 => pins.clone(),
        PinStrategy::Automatic => automatic_coordinates(mesh)?,
        PinStrategy::Manual(pins) => {
            if !pins.is_empty() {
                log::warn!("a single pinned vertex cannot fix the map; using boundary pins instead");
            }
            automatic_coordinates(mesh)?
        }
        PinStrategy::Coordinates(pins) => {
            if !pins.is_empty() {
                log::warn!("a single pinned coordinate cannot fix the map; using boundary pins instead");
            }
            automatic_coordinates(mesh)?
        }
    };

    let n = mesh.num_vertices();
    let mut merged: BTreeMap<(usize, UvAxis), f64> = BTreeMap::new();
    for pin in &coordinates {
        if pin.vertex >= n {
            return Err(ParamError::PinOutOfRange {
                vertex: pin.vertex,
                num_vertices: n,
            });
        }
        if !pin.value.is_finite() {
            return Err(ParamError::invalid_param(
                "pin value",
                pin.value,
                "must be finite",
            ));
        }
        if let Some(&previous) = merged.get(&(pin.vertex, pin.axis)) {
            if previous != pin.value {
                return Err(ParamError::ConflictingConstraints {
                    vertex: pin.vertex,
                    axis: pin.axis,
                });
            }
        }
        merged.insert((pin.vertex, pin.axis), pin.value);
    }

    check_not_collapsed(&merged)?;

    let layout = UvLayout::new(n);
    let indices = merged
        .keys()
        .map(|&(vertex, axis)| layout.index(vertex, axis))
        .collect();
    let values = DVector::from_iterator(merged.len(), merged.values().copied());

    Ok(ResolvedPins { indices, values })
}

fn automatic_coordinates(mesh: &TriMesh) -> Result<Vec<PinnedCoordinate>> {
    Ok(boundary_pins(mesh)?
        .iter()
        .flat_map(|p| p.coordinates())
        .collect())
}

/// Reject pin sets the constant map already satisfies.
///
/// The energy is zero on constant maps, so if every pinned `u` shares one
/// value and every pinned `v` shares one value, the minimizer collapses the
/// whole mesh onto that point. An axis with no pin at all leaves a free
/// translation.
fn check_not_collapsed(merged: &BTreeMap<(usize, UvAxis), f64>) -> Result<()> {
    for axis in UvAxis::ALL {
        let mut values = merged
            .iter()
            .filter(|((_, a), _)| *a == axis)
            .map(|(_, &value)| value);
        let Some(first) = values.next() else {
            log::debug!("no pin constrains the {} axis", axis);
            return Err(ParamError::DegenerateConstraints);
        };
        if values.any(|value| value != first) {
            return Ok(());
        }
    }
    Err(ParamError::DegenerateConstraints)
}
