//! Concentrated loads at a distance along a member

use serde::{Deserialize, Serialize};

/// Axis a member load acts along
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadDirection {
    /// Local x, along the member
    Fx,
    /// Local y
    Fy,
    /// Local z
    Fz,
    /// Global X
    FX,
    /// Global Y
    FY,
    /// Force in global Z direction (vertical)
    FZ,
}

impl LoadDirection {
    /// Check if this is a local coordinate direction
    pub fn is_local(self) -> bool {
        matches!(self, LoadDirection::Fx | LoadDirection::Fy | LoadDirection::Fz)
    }

    /// Unit vector of the direction in its own (local or global) frame
    pub fn unit(self) -> [f64; 3] {
        match self {
            LoadDirection::Fx | LoadDirection::FX => [1.0, 0.0, 0.0],
            LoadDirection::Fy | LoadDirection::FY => [0.0, 1.0, 0.0],
            LoadDirection::Fz | LoadDirection::FZ => [0.0, 0.0, 1.0],
        }
    }
}

/// A concentrated force on a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Loaded element id
    pub element: String,
    /// Load magnitude (N)
    pub magnitude: f64,
    /// Distance from i-node (m)
    pub position: f64,
    /// Load direction
    pub direction: LoadDirection,
}

impl PointLoad {
    /// Load of `magnitude` at `position` metres from the i-end
    pub fn new(element: &str, magnitude: f64, position: f64, direction: LoadDirection) -> Self {
        Self {
            element: element.to_string(),
            magnitude,
            position,
            direction,
        }
    }

    /// Create a downward (negative global Z) point load
    pub fn downward(element: &str, magnitude: f64, position: f64) -> Self {
        Self::new(element, -magnitude.abs(), position, LoadDirection::FZ)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            ..self.clone()
        }
    }
}
