//! Material properties

use serde::{Deserialize, Serialize};

/// Linear elastic isotropic material with optional strengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Young's modulus E [Pa]
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Yield strength fy [Pa], enables utilization and yielding
    #[serde(default)]
    pub fy: Option<f64>,
    /// Ultimate strength (optional) in Pa
    #[serde(default)]
    pub fu: Option<f64>,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            g,
            nu,
            rho,
            fy: None,
            fu: None,
        }
    }

    /// Set fy
    pub fn with_yield_strength(mut self, fy: f64) -> Self {
        self.fy = Some(fy);
        self
    }

    pub fn with_ultimate_strength(mut self, fu: f64) -> Self {
        self.fu = Some(fu);
        self
    }

    /// Derive G = E / 2(1 + ν)
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Structural steel (S235-like, the usual greenhouse frame grade)
    pub fn steel() -> Self {
        Self {
            e: 210e9,
            g: 81e9,
            nu: 0.3,
            rho: 7850.0,
            fy: Some(235e6),
            fu: Some(360e6),
        }
    }

    /// Hot-dip galvanized tube steel (S355)
    pub fn galvanized_steel() -> Self {
        Self {
            fy: Some(355e6),
            fu: Some(510e6),
            ..Self::steel()
        }
    }

    /// Aluminium alloy 6061-T6, used for glazing bars
    pub fn aluminum() -> Self {
        Self {
            e: 68.9e9,
            g: 26e9,
            nu: 0.33,
            rho: 2700.0,
            fy: Some(276e6),
            fu: Some(310e6),
        }
    }

    /// Strength used for utilization: yield, falling back to ultimate
    pub fn design_strength(&self) -> Option<f64> {
        self.fy.or(self.fu).filter(|s| *s > 0.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
