//! Node element - represents a point in 3D space

use serde::{Deserialize, Serialize};

use super::Support;

/// A 3D node in the finite element model
///
/// Coordinates are fixed at creation; the solver writes results back through
/// `StructuralModel::store_results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Identifier from the geometry provider
    pub id: String,
    coords: [f64; 3],
    /// Support conditions (free by default)
    pub support: Support,

    /// Applied nodal load [FX, FY, FZ, MX, MY, MZ] of the last stored result
    #[serde(default)]
    pub applied: [f64; 6],
    /// Displacement of the last stored result [DX, DY, DZ, RX, RY, RZ]
    #[serde(default)]
    pub displacement: Option<[f64; 6]>,
    /// Reaction of the last stored result, Some only at supported nodes
    #[serde(default)]
    pub reaction: Option<[f64; 6]>,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: id.to_string(),
            coords: [x, y, z],
            support: Support::default(),
            applied: [0.0; 6],
            displacement: None,
            reaction: None,
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.coords[0] - self.coords[0];
        let dy = other.coords[1] - self.coords[1];
        let dz = other.coords[2] - self.coords[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// True if any DOF is constrained
    pub fn is_supported(&self) -> bool {
        self.support.is_supported()
    }

    /// Drop stored results
    pub(crate) fn clear_results(&mut self) {
        self.applied = [0.0; 6];
        self.displacement = None;
        self.reaction = None;
    }
}
