//! Concentrated actions at nodes, in global axes

use serde::{Deserialize, Serialize};

/// A load applied directly to a node, in global axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Loaded node id
    pub node: String,
    /// FX [N]
    #[serde(default)]
    pub fx: f64,
    /// FY [N]
    #[serde(default)]
    pub fy: f64,
    /// FZ [N]
    #[serde(default)]
    pub fz: f64,
    /// MX [N·m]
    #[serde(default)]
    pub mx: f64,
    /// MY [N·m]
    #[serde(default)]
    pub my: f64,
    /// MZ [N·m]
    #[serde(default)]
    pub mz: f64,
}

impl NodeLoad {
    /// All six components in DOF order
    pub fn new(node: &str, components: [f64; 6]) -> Self {
        let [fx, fy, fz, mx, my, mz] = components;
        Self {
            node: node.to_string(),
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
        }
    }

    /// Forces only
    pub fn force(node: &str, fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(node, [fx, fy, fz, 0.0, 0.0, 0.0])
    }

    /// Moments only
    pub fn moment(node: &str, mx: f64, my: f64, mz: f64) -> Self {
        Self::new(node, [0.0, 0.0, 0.0, mx, my, mz])
    }

    /// Components in DOF order
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let mut components = self.as_array();
        components.iter_mut().for_each(|c| *c *= factor);
        Self::new(&self.node, components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_load_components() {
        let load = NodeLoad::force("N2", 1.0, 0.0, -5.0).scaled(2.0);
        assert_eq!(load.as_array(), [2.0, 0.0, -10.0, 0.0, 0.0, 0.0]);
        assert_eq!(load.node, "N2");
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        let load: NodeLoad = serde_json::from_str(r#"{"node": "N1", "fz": -100.0}"#).unwrap();
        assert_eq!(load.as_array(), [0.0, 0.0, -100.0, 0.0, 0.0, 0.0]);
    }
}
