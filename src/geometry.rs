//! Input geometry from the CAD/geometry provider
//!
//! A `GeometryModel` lists nodes, structural components (arches, columns,
//! purlins, bracing, ...) made of two-node members, supports, and the
//! material and section libraries the members refer to by name.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::elements::{ElementType, Material, MemberReleases, Section, Support};
use crate::error::FEAResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryNode {
    pub id: String,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryMember {
    pub id: String,
    #[serde(default = "default_element_type")]
    pub element_type: ElementType,
    pub start: String,
    pub end: String,
    pub material: String,
    pub section: String,
    #[serde(default)]
    pub releases: Option<MemberReleases>,
    #[serde(default)]
    pub local_y: Option<[f64; 3]>,
    #[serde(default)]
    pub tension_only: bool,
    #[serde(default)]
    pub compression_only: bool,
}

fn default_element_type() -> ElementType {
    ElementType::Frame
}

/// A named group of members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    /// Free-form role, e.g. "column", "rafter", "bracing"
    #[serde(default)]
    pub kind: String,
    pub members: Vec<GeometryMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportSpec {
    pub node: String,
    pub support: Support,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryModel {
    pub nodes: Vec<GeometryNode>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub supports: Vec<SupportSpec>,
    #[serde(default)]
    pub materials: HashMap<String, Material>,
    #[serde(default)]
    pub sections: HashMap<String, Section>,
}

impl GeometryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FEAResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn add_node(&mut self, id: &str, position: [f64; 3]) -> &mut Self {
        self.nodes.push(GeometryNode {
            id: id.to_string(),
            position,
        });
        self
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> &mut Self {
        self.materials.insert(name.to_string(), material);
        self
    }

    pub fn add_section(&mut self, name: &str, section: Section) -> &mut Self {
        self.sections.insert(name.to_string(), section);
        self
    }

    pub fn add_support(&mut self, node: &str, support: Support) -> &mut Self {
        self.supports.push(SupportSpec {
            node: node.to_string(),
            support,
        });
        self
    }

    pub fn add_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn member_count(&self) -> usize {
        self.components.iter().map(|c| c.members.len()).sum()
    }

    /// Single gable frame in the XZ plane with fixed column bases
    ///
    /// Nodes: `B1` (left base), `E1` (left eave), `R` (ridge), `E2`, `B2`.
    /// Members: `C1`, `C2` (columns, component "columns") and `R1`, `R2`
    /// (rafters, component "rafters"), all frames using material "steel"
    /// and section "tube".
    pub fn gable_frame(span: f64, eave_height: f64, ridge_height: f64) -> Self {
        let mut geometry = Self::new();
        geometry
            .add_node("B1", [0.0, 0.0, 0.0])
            .add_node("E1", [0.0, 0.0, eave_height])
            .add_node("R", [span / 2.0, 0.0, ridge_height])
            .add_node("E2", [span, 0.0, eave_height])
            .add_node("B2", [span, 0.0, 0.0])
            .add_material("steel", Material::galvanized_steel())
            .add_section("tube", Section::box_section(0.08, 0.12, 0.003))
            .add_support("B1", Support::fixed())
            .add_support("B2", Support::fixed());

        let member = |id: &str, start: &str, end: &str| GeometryMember {
            id: id.to_string(),
            element_type: ElementType::Frame,
            start: start.to_string(),
            end: end.to_string(),
            material: "steel".to_string(),
            section: "tube".to_string(),
            releases: None,
            local_y: None,
            tension_only: false,
            compression_only: false,
        };
        geometry
            .add_component(Component {
                id: "columns".to_string(),
                kind: "column".to_string(),
                members: vec![member("C1", "B1", "E1"), member("C2", "B2", "E2")],
            })
            .add_component(Component {
                id: "rafters".to_string(),
                kind: "rafter".to_string(),
                members: vec![member("R1", "E1", "R"), member("R2", "R", "E2")],
            });
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gable_frame_layout() {
        let g = GeometryModel::gable_frame(8.0, 3.0, 4.5);
        assert_eq!(g.nodes.len(), 5);
        assert_eq!(g.member_count(), 4);
        assert_eq!(g.supports.len(), 2);
    }

    #[test]
    fn test_geometry_from_json() {
        let json = r#"{
            "nodes": [
                {"id": "A", "position": [0.0, 0.0, 0.0]},
                {"id": "B", "position": [2.0, 0.0, 0.0]}
            ],
            "components": [
                {"id": "brace", "members": [
                    {"id": "T1", "element_type": "truss", "start": "A", "end": "B",
                     "material": "s", "section": "rod", "tension_only": true}
                ]}
            ],
            "supports": [{"node": "A", "support": {"restraints": [true, true, true, true, true, true]}}],
            "materials": {"s": {"e": 2.1e11, "g": 8.1e10, "nu": 0.3, "rho": 7850.0}},
            "sections": {"rod": {"a": 1e-4, "iy": 1e-9, "iz": 1e-9, "ix": 2e-9, "j": 2e-9}}
        }"#;
        let g = GeometryModel::from_json_str(json).unwrap();
        let member = &g.components[0].members[0];
        assert_eq!(member.element_type, ElementType::Truss);
        assert!(member.tension_only);
        assert!(g.supports[0].support.is_supported());
        assert_eq!(g.sections["rod"].asy, 0.0);
    }
}
