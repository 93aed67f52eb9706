//! Analysis types and solver configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Type of structural analysis to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// First-order linear static analysis
    #[default]
    LinearStatic,
    /// Newton-Raphson static analysis (geometric and/or material nonlinearity)
    NonlinearStatic,
    /// Natural frequencies and mode shapes
    Modal,
    /// Linearized (eigenvalue) buckling
    Buckling,
}

impl AnalysisType {
    pub fn name(self) -> &'static str {
        match self {
            AnalysisType::LinearStatic => "linear_static",
            AnalysisType::NonlinearStatic => "nonlinear_static",
            AnalysisType::Modal => "modal",
            AnalysisType::Buckling => "buckling",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            AnalysisType::LinearStatic,
            AnalysisType::NonlinearStatic,
            AnalysisType::Modal,
            AnalysisType::Buckling,
        ]
        .into_iter()
        .find(|t| t.name() == name)
    }
}

/// Options for one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfiguration {
    /// Convergence tolerance on ‖R‖ / ‖F‖
    pub tolerance: f64,
    /// Maximum Newton-Raphson corrections
    pub max_iterations: usize,
    /// Modal damping ratio ζ used for damped frequencies
    pub damping_ratio: f64,
    /// Type of analysis
    pub analysis_type: AnalysisType,
    /// Consistent geometric stiffness from current axial forces
    pub geometric_nonlinearity: bool,
    /// Bilinear axial law and tension-/compression-only members
    pub material_nonlinearity: bool,
    /// Timoshenko shear correction for frame elements
    pub include_shear_deformation: bool,
    /// Chord-rotation (P-Δ) geometric stiffness
    pub p_delta: bool,
    /// Number of modes to calculate (for modal analysis)
    pub num_modes: usize,
    /// Post-processing stations per element (ends included)
    pub stations: usize,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 30,
            damping_ratio: 0.05,
            analysis_type: AnalysisType::LinearStatic,
            geometric_nonlinearity: false,
            material_nonlinearity: false,
            include_shear_deformation: false,
            p_delta: false,
            num_modes: 12,
            stations: 11,
        }
    }
}

impl SolverConfiguration {
    /// Create options for linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Newton-Raphson with geometric nonlinearity
    pub fn nonlinear() -> Self {
        Self {
            analysis_type: AnalysisType::NonlinearStatic,
            geometric_nonlinearity: true,
            ..Self::default()
        }
    }

    /// Create options for P-Delta analysis
    pub fn p_delta() -> Self {
        Self {
            analysis_type: AnalysisType::NonlinearStatic,
            p_delta: true,
            ..Self::default()
        }
    }

    /// Create options for modal analysis
    pub fn modal(num_modes: usize) -> Self {
        Self {
            analysis_type: AnalysisType::Modal,
            num_modes,
            ..Self::default()
        }
    }

    pub fn buckling() -> Self {
        Self {
            analysis_type: AnalysisType::Buckling,
            ..Self::default()
        }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_damping_ratio(mut self, zeta: f64) -> Self {
        self.damping_ratio = zeta;
        self
    }

    pub fn with_geometric_nonlinearity(mut self, enabled: bool) -> Self {
        self.geometric_nonlinearity = enabled;
        self
    }

    pub fn with_material_nonlinearity(mut self, enabled: bool) -> Self {
        self.material_nonlinearity = enabled;
        self
    }

    pub fn with_shear_deformation(mut self, enabled: bool) -> Self {
        self.include_shear_deformation = enabled;
        self
    }

    pub fn with_stations(mut self, stations: usize) -> Self {
        self.stations = stations;
        self
    }

    /// Reject values no solve can run with
    pub fn validate(&self) -> FEAResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FEAError::InvalidConfiguration(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(FEAError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping_ratio) {
            return Err(FEAError::InvalidConfiguration(format!(
                "damping_ratio must lie in [0, 1), got {}",
                self.damping_ratio
            )));
        }
        if self.analysis_type == AnalysisType::Modal && self.num_modes == 0 {
            return Err(FEAError::InvalidConfiguration(
                "modal analysis needs num_modes >= 1".to_string(),
            ));
        }
        if self.stations < 2 {
            return Err(FEAError::InvalidConfiguration(
                "at least two stations per element are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    ///
    /// Unknown analysis types surface as a configuration-category error.
    pub fn from_json_str(json: &str) -> FEAResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(name) = value.get("analysis_type").and_then(|v| v.as_str()) {
            if AnalysisType::from_name(name).is_none() {
                return Err(FEAError::UnsupportedAnalysis(name.to_string()));
            }
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FEAResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_builders() {
        let config = SolverConfiguration::nonlinear().with_tolerance(1e-8).with_max_iter(50);
        assert_eq!(config.analysis_type, AnalysisType::NonlinearStatic);
        assert!(config.geometric_nonlinearity);
        assert_eq!(config.max_iterations, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_defaults() {
        let config = SolverConfiguration::from_json_str(r#"{"analysis_type": "modal", "num_modes": 4}"#).unwrap();
        assert_eq!(config.analysis_type, AnalysisType::Modal);
        assert_eq!(config.num_modes, 4);
        assert_eq!(config.tolerance, 1e-6);
    }

    #[test]
    fn test_unknown_analysis_type() {
        let err = SolverConfiguration::from_json_str(r#"{"analysis_type": "dynamic_explicit"}"#).unwrap_err();
        assert!(matches!(err, FEAError::UnsupportedAnalysis(ref name) if name == "dynamic_explicit"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(AnalysisType::from_name("buckling"), Some(AnalysisType::Buckling));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SolverConfiguration::default().with_tolerance(0.0).validate().is_err());
        assert!(SolverConfiguration::default().with_max_iter(0).validate().is_err());
        assert!(SolverConfiguration::modal(0).validate().is_err());
        assert!(SolverConfiguration::default().with_damping_ratio(1.5).validate().is_err());
    }
}
