//! Result types for FEA analysis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisType;
use crate::elements::ElementType;
use crate::error::FEAResult;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Section actions and stresses at one point along an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationResult {
    /// Distance from the i-node
    pub x: f64,
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force in local y direction
    pub shear_y: f64,
    /// Shear force in local z direction
    pub shear_z: f64,
    pub torsion: f64,
    /// Bending moment about local y axis
    pub moment_y: f64,
    /// Bending moment about local z axis
    pub moment_z: f64,
    /// |N|/A + |My|/Sy + |Mz|/Sz
    pub normal_stress: f64,
    /// |Vy|/Asy + |Vz|/Asz + |T|·r/J
    pub shear_stress: f64,
    pub von_mises: f64,
    /// Local deflection [u, v, w]
    pub deflection: [f64; 3],
}

/// Post-processed results of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    pub id: String,
    pub element_type: ElementType,
    pub length: f64,
    /// Local end forces [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, ..., Mz_j];
    /// trusses fill the translational entries only
    pub end_forces: [f64; 12],
    /// Axial force at the i-end (positive = tension)
    pub axial_force: f64,
    pub stations: Vec<StationResult>,
    pub max_von_mises: f64,
    /// max von Mises / design strength, None when the material has none
    pub utilization: Option<f64>,
    /// Index into `stations` of the largest von Mises stress
    pub critical_index: usize,
}

impl ElementResult {
    pub fn critical_station(&self) -> Option<&StationResult> {
        self.stations.get(self.critical_index)
    }

    /// Maximum absolute bending moment (either axis) over the stations
    pub fn max_moment(&self) -> f64 {
        self.stations
            .iter()
            .map(|s| s.moment_y.abs().max(s.moment_z.abs()))
            .fold(0.0, f64::max)
    }
}

/// One vibration mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeResult {
    /// 1-based mode number
    pub mode: usize,
    /// ω² (rad²/s²)
    pub eigenvalue: f64,
    /// Natural frequency (Hz)
    pub frequency: f64,
    /// f·√(1-ζ²) (Hz)
    pub damped_frequency: f64,
    /// Period (s)
    pub period: f64,
    /// Participation factors for global X, Y, Z
    pub participation: [f64; 3],
    /// Effective modal mass as a fraction of total mass, per direction
    pub effective_mass_ratio: [f64; 3],
    /// Mode shape per node, normalized to unit length over all DOFs
    pub shape: BTreeMap<String, [f64; 6]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModalResults {
    pub modes: Vec<ModeResult>,
    /// Total translational mass on free DOFs, per direction
    pub total_mass: [f64; 3],
}

impl ModalResults {
    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.frequency).collect()
    }

    /// Summed effective mass ratio per direction
    pub fn cumulative_mass_ratio(&self) -> [f64; 3] {
        let mut total = [0.0; 3];
        for mode in &self.modes {
            for (t, r) in total.iter_mut().zip(mode.effective_mass_ratio) {
                *t += r;
            }
        }
        total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucklingResults {
    /// Smallest positive load factor
    pub critical_factor: f64,
    /// All positive load factors found, ascending
    pub factors: Vec<f64>,
    /// Critical mode shape per node
    pub mode_shape: BTreeMap<String, [f64; 6]>,
}

/// Headline numbers of a solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub analysis_type: AnalysisType,
    pub converged: bool,
    pub cancelled: bool,
    pub iterations: usize,
    pub max_displacement: f64,
    pub max_stress: f64,
}

/// Everything a solve produces, tagged with its analysis type and combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResults {
    pub analysis_type: AnalysisType,
    pub combination: String,
    pub converged: bool,
    pub cancelled: bool,
    pub iterations: usize,
    /// ‖R‖ / ‖F‖ at the end of the solve (0 for direct solves)
    pub residual_norm: f64,
    /// Largest nodal translation magnitude
    pub max_displacement: f64,
    /// Largest von Mises stress over all element stations
    pub max_stress: f64,
    pub displacements: BTreeMap<String, [f64; 6]>,
    /// Reactions at supported nodes only
    pub reactions: BTreeMap<String, [f64; 6]>,
    pub applied_loads: BTreeMap<String, [f64; 6]>,
    pub elements: Vec<ElementResult>,
    pub modal: Option<ModalResults>,
    pub buckling: Option<BucklingResults>,
}

impl SolverResults {
    pub fn new(analysis_type: AnalysisType, combination: &str) -> Self {
        Self {
            analysis_type,
            combination: combination.to_string(),
            converged: false,
            cancelled: false,
            iterations: 0,
            residual_norm: 0.0,
            max_displacement: 0.0,
            max_stress: 0.0,
            displacements: BTreeMap::new(),
            reactions: BTreeMap::new(),
            applied_loads: BTreeMap::new(),
            elements: Vec::new(),
            modal: None,
            buckling: None,
        }
    }

    pub fn displacement(&self, node: &str) -> Option<[f64; 6]> {
        self.displacements.get(node).copied()
    }

    pub fn node_displacement(&self, node: &str) -> Option<NodeDisplacement> {
        self.displacement(node).map(NodeDisplacement::from_array)
    }

    pub fn reaction(&self, node: &str) -> Option<[f64; 6]> {
        self.reactions.get(node).copied()
    }

    pub fn element(&self, id: &str) -> Option<&ElementResult> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Component-wise sum of reactions [FX, FY, FZ, MX, MY, MZ]
    pub fn total_reaction(&self) -> [f64; 6] {
        sum_components(self.reactions.values())
    }

    /// Sum of applied nodal loads, including equivalent member loads
    pub fn total_applied(&self) -> [f64; 6] {
        sum_components(self.applied_loads.values())
    }

    /// Recompute `max_displacement` and `max_stress` from the stored fields
    pub(crate) fn update_extremes(&mut self) {
        self.max_displacement = self
            .displacements
            .values()
            .map(|d| NodeDisplacement::from_array(*d).translation_magnitude())
            .fold(0.0, f64::max);
        self.max_stress = self
            .elements
            .iter()
            .map(|e| e.max_von_mises)
            .fold(0.0, f64::max);
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            analysis_type: self.analysis_type,
            converged: self.converged,
            cancelled: self.cancelled,
            iterations: self.iterations,
            max_displacement: self.max_displacement,
            max_stress: self.max_stress,
        }
    }

    pub fn to_json(&self) -> FEAResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn sum_components<'a>(values: impl Iterator<Item = &'a [f64; 6]>) -> [f64; 6] {
    let mut total = [0.0; 6];
    for v in values {
        for (t, c) in total.iter_mut().zip(v) {
            *t += c;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_and_totals() {
        let mut results = SolverResults::new(AnalysisType::LinearStatic, "C1");
        results.displacements.insert("N1".into(), [3.0, 4.0, 0.0, 0.1, 0.0, 0.0]);
        results.displacements.insert("N2".into(), [0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        results.reactions.insert("N0".into(), [1.0, 0.0, 2.0, 0.0, 0.0, 0.0]);
        results.reactions.insert("N3".into(), [-1.0, 0.0, 3.0, 0.0, 0.0, 0.0]);
        results.update_extremes();

        assert_eq!(results.max_displacement, 5.0);
        assert_eq!(results.total_reaction(), [0.0, 0.0, 5.0, 0.0, 0.0, 0.0]);
        assert_eq!(results.summary().analysis_type, AnalysisType::LinearStatic);
    }

    #[test]
    fn test_results_serialize() {
        let results = SolverResults::new(AnalysisType::Modal, "modal");
        let json = results.to_json().unwrap();
        assert!(json.contains("\"analysis_type\": \"modal\""));
    }
}
