//! Load cases

use serde::{Deserialize, Serialize};

use super::{DistributedLoad, NodeLoad, PointLoad};

/// Standard gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Origin of a load case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadCategory {
    Dead,
    Live,
    Wind,
    Snow,
    Seismic,
    Thermal,
    Custom(String),
}

/// A single load inside a load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Load {
    Node(NodeLoad),
    Point(PointLoad),
    Distributed(DistributedLoad),
    /// Weight of every element, ρ·A times the acceleration vector per unit length
    SelfWeight { acceleration: [f64; 3] },
}

impl Load {
    /// Copy of the load with every magnitude multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Load {
        match self {
            Load::Node(l) => Load::Node(l.scaled(factor)),
            Load::Point(l) => Load::Point(l.scaled(factor)),
            Load::Distributed(l) => Load::Distributed(l.scaled(factor)),
            Load::SelfWeight { acceleration } => Load::SelfWeight {
                acceleration: acceleration.map(|a| a * factor),
            },
        }
    }
}

/// A load case groups related loads under a common name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Name of the load case
    pub id: String,
    pub category: LoadCategory,
    /// Multiplier applied to every load of the case
    #[serde(default = "unit_scale")]
    pub scale_factor: f64,
    #[serde(default)]
    pub loads: Vec<Load>,
}

fn unit_scale() -> f64 {
    1.0
}

impl LoadCase {
    /// Create a new, empty load case
    pub fn new(id: &str, category: LoadCategory) -> Self {
        Self {
            id: id.to_string(),
            category,
            scale_factor: 1.0,
            loads: Vec::new(),
        }
    }

    /// Common load case names
    pub fn dead() -> Self {
        Self::new("Dead", LoadCategory::Dead)
    }

    pub fn live() -> Self {
        Self::new("Live", LoadCategory::Live)
    }

    pub fn wind() -> Self {
        Self::new("Wind", LoadCategory::Wind)
    }

    pub fn snow() -> Self {
        Self::new("Snow", LoadCategory::Snow)
    }

    pub fn with_scale(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    pub fn with_node_load(self, load: NodeLoad) -> Self {
        self.with_load(Load::Node(load))
    }

    pub fn with_point_load(self, load: PointLoad) -> Self {
        self.with_load(Load::Point(load))
    }

    pub fn with_distributed_load(self, load: DistributedLoad) -> Self {
        self.with_load(Load::Distributed(load))
    }

    /// Add self-weight under standard gravity (-Z)
    pub fn with_self_weight(self) -> Self {
        self.with_load(Load::SelfWeight {
            acceleration: [0.0, 0.0, -GRAVITY],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let case = LoadCase::snow()
            .with_node_load(NodeLoad::force("N1", 0.0, 0.0, -1.0))
            .with_self_weight()
            .with_scale(0.8);
        assert_eq!(case.loads.len(), 2);
        assert!(matches!(case.loads[0], Load::Node(_)));
        assert_eq!(case.scale_factor, 0.8);
    }

    #[test]
    fn test_load_case_from_json() {
        let json = r#"{
            "id": "W1",
            "category": "wind",
            "loads": [
                {"type": "node", "node": "N3", "fx": 1500.0},
                {"type": "distributed", "element": "R1", "w": -400.0, "direction": "Fz"}
            ]
        }"#;
        let case: LoadCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.category, LoadCategory::Wind);
        assert_eq!(case.scale_factor, 1.0);
        assert_eq!(case.loads.len(), 2);
    }

    #[test]
    fn test_scaled_loads() {
        let point = Load::Point(PointLoad::downward("R1", 200.0, 1.0)).scaled(1.5);
        assert!(matches!(point, Load::Point(ref p) if p.magnitude == -300.0 && p.position == 1.0));

        let line = Load::Distributed(DistributedLoad::uniform_downward("R1", 400.0)).scaled(0.5);
        assert!(matches!(line, Load::Distributed(ref d) if d.w == -200.0));

        let weight = LoadCase::dead().with_self_weight().loads[0].scaled(2.0);
        assert_eq!(weight, Load::SelfWeight { acceleration: [0.0, 0.0, -2.0 * GRAVITY] });
    }
}
