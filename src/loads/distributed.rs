//! Distributed loads on members

use serde::{Deserialize, Serialize};

use super::point_load::LoadDirection;

/// A uniform line load over the full length of a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Loaded element id
    pub element: String,
    /// Intensity per unit member length (N/m)
    pub w: f64,
    /// Load direction
    pub direction: LoadDirection,
}

impl DistributedLoad {
    /// Create a uniform distributed load over the full member length
    pub fn uniform(element: &str, w: f64, direction: LoadDirection) -> Self {
        Self {
            element: element.to_string(),
            w,
            direction,
        }
    }

    /// Create a uniform downward load (negative global Z)
    pub fn uniform_downward(element: &str, w: f64) -> Self {
        Self::uniform(element, -w.abs(), LoadDirection::FZ)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            w: self.w * factor,
            ..self.clone()
        }
    }
}
