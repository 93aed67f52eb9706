//! Line elements (truss, beam, frame)
//!
//! An element owns copies of its material and section and refers to its end
//! nodes by arena index. All matrices are returned as dense `DMatrix` values
//! in the element's own DOF layout: 6x6 over the two nodes' translations for a
//! truss, 12x12 for beams and frames. `dof_map` gives the matching global
//! equation numbers.

use std::fmt;

use nalgebra::{DMatrix, DVector, SMatrix};
use serde::{Deserialize, Serialize};

use super::{Material, Node, Section};
use crate::analysis::SolverConfiguration;
use crate::error::{FEAError, FEAResult};
use crate::math::member::{
    apply_fer_releases, apply_releases, drop_axial_coupling, member_fixed_end_forces,
    member_geometric_stiffness,
    member_local_axes, member_local_stiffness, member_lumped_mass, member_shear_correction,
    member_string_stiffness, member_transformation_matrix, set_axial_stiffness,
    truss_geometric_stiffness, truss_local_stiffness, truss_lumped_mass, truss_transformation_matrix,
};
use crate::math::{Mat12, Mat3, Vec12};

/// Residual axial stiffness of a slack tension-only/compression-only member
pub const SLACK_STIFFNESS_RATIO: f64 = 1e-6;
/// Post-yield axial stiffness as a fraction of EA/L
pub const POST_YIELD_RATIO: f64 = 0.01;

/// Element formulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Axial-only bar
    Truss,
    /// 3D Euler-Bernoulli beam
    Beam,
    /// Beam with optional Timoshenko shear deformation
    Frame,
    Plate,
    Shell,
    Solid,
}

impl ElementType {
    /// Line elements are the only implemented formulations
    pub fn is_supported(self) -> bool {
        matches!(self, ElementType::Truss | ElementType::Beam | ElementType::Frame)
    }

    /// DOFs contributed per end node
    pub fn dofs_per_node(self) -> usize {
        match self {
            ElementType::Truss => 3,
            _ => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Truss => "truss",
            ElementType::Beam => "beam",
            ElementType::Frame => "frame",
            ElementType::Plate => "plate",
            ElementType::Shell => "shell",
            ElementType::Solid => "solid",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// End releases for a member (allowing specific DOFs to rotate/translate freely)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberReleases {
    /// i-node releases [DX, DY, DZ, RX, RY, RZ]
    pub i_node: [bool; 6],
    /// j-node releases [DX, DY, DZ, RX, RY, RZ]
    pub j_node: [bool; 6],
}

impl MemberReleases {
    /// Create releases with no end releases
    pub fn none() -> Self {
        Self::default()
    }

    /// Create releases for a pin at the i-node (moment releases)
    pub fn pin_i() -> Self {
        Self {
            i_node: [false, false, false, false, true, true],
            j_node: [false; 6],
        }
    }

    /// Create releases for a pin at the j-node (moment releases)
    pub fn pin_j() -> Self {
        Self {
            i_node: [false; 6],
            j_node: [false, false, false, false, true, true],
        }
    }

    /// Create releases for pins at both ends
    pub fn pin_both() -> Self {
        Self {
            i_node: [false, false, false, false, true, true],
            j_node: [false, false, false, false, true, true],
        }
    }

    pub fn any(&self) -> bool {
        self.i_node.iter().chain(self.j_node.iter()).any(|&r| r)
    }

    /// Get combined releases as 12-element array
    pub fn as_array(&self) -> [bool; 12] {
        let mut arr = [false; 12];
        arr[0..6].copy_from_slice(&self.i_node);
        arr[6..12].copy_from_slice(&self.j_node);
        arr
    }
}

/// Load between the nodes of an element, in local components
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberLoad {
    /// Force per unit length along the whole element
    Uniform { w: [f64; 3] },
    /// Concentrated force at distance `a` from the i-node
    Point { p: [f64; 3], a: f64 },
}

/// Axial force and stiffnesses for a given elongation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialState {
    /// Axial force, positive in tension
    pub force: f64,
    /// force / elongation
    pub secant: f64,
    /// d(force) / d(elongation)
    pub tangent: f64,
}

/// A two-node structural element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub element_type: ElementType,
    /// Arena indices of the i- and j-node
    pub nodes: [usize; 2],
    pub material: Material,
    pub section: Section,
    /// Reference vector for local y (global components)
    #[serde(default)]
    pub local_y: Option<[f64; 3]>,
    #[serde(default)]
    pub releases: Option<MemberReleases>,
    #[serde(default)]
    pub tension_only: bool,
    #[serde(default)]
    pub compression_only: bool,
    /// Geometry component the element was generated from
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    length: f64,
}

impl Element {
    /// Create an element between two nodes (by arena index)
    ///
    /// The length is computed when the element is added to a model.
    pub fn new(
        id: &str,
        element_type: ElementType,
        i_node: usize,
        j_node: usize,
        material: Material,
        section: Section,
    ) -> Self {
        Self {
            id: id.to_string(),
            element_type,
            nodes: [i_node, j_node],
            material,
            section,
            local_y: None,
            releases: None,
            tension_only: false,
            compression_only: false,
            component: None,
            length: 0.0,
        }
    }

    pub fn with_local_y(mut self, local_y: [f64; 3]) -> Self {
        self.local_y = Some(local_y);
        self
    }

    /// Set member end releases
    pub fn with_releases(mut self, releases: MemberReleases) -> Self {
        self.releases = Some(releases);
        self
    }

    /// Set as tension-only member
    pub fn tension_only(mut self) -> Self {
        self.tension_only = true;
        self.compression_only = false;
        self
    }

    /// Set as compression-only member
    pub fn compression_only(mut self) -> Self {
        self.compression_only = true;
        self.tension_only = false;
        self
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    /// Member length (0 until the element is bound to a model)
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Validate against the model's nodes and compute the length
    pub(crate) fn bind(&mut self, nodes: &[Node]) -> FEAResult<()> {
        if !self.element_type.is_supported() {
            return Err(FEAError::UnsupportedElement(self.element_type.to_string()));
        }
        if self.nodes[0] == self.nodes[1] {
            return Err(FEAError::InvalidGeometry(format!(
                "element '{}' connects a node to itself",
                self.id
            )));
        }
        if self.section.a <= 0.0 || self.material.e <= 0.0 {
            return Err(FEAError::InvalidInput(format!(
                "element '{}' needs positive E and A",
                self.id
            )));
        }
        let (i, j) = self.end_coords(nodes)?;
        // Also rejects zero length and a local y parallel to the axis
        member_local_axes(&i, &j, self.local_y)?;
        self.length = nodes[self.nodes[0]].distance_to(&nodes[self.nodes[1]]);
        Ok(())
    }

    /// Coordinates of the i- and j-node
    pub fn end_coords(&self, nodes: &[Node]) -> FEAResult<([f64; 3], [f64; 3])> {
        let lookup = |index: usize| {
            nodes
                .get(index)
                .map(Node::coords)
                .ok_or_else(|| FEAError::NodeNotFound(format!("#{}", index)))
        };
        Ok((lookup(self.nodes[0])?, lookup(self.nodes[1])?))
    }

    /// Direction cosines (rows are local x, y, z)
    pub fn rotation_matrix(&self, nodes: &[Node]) -> FEAResult<Mat3> {
        let (i, j) = self.end_coords(nodes)?;
        member_local_axes(&i, &j, self.local_y)
    }

    /// Local-to-global transformation (`d_local = T d_global`)
    pub fn transformation_matrix(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        let r = self.rotation_matrix(nodes)?;
        match self.element_type {
            ElementType::Truss => Ok(dynamic(&truss_transformation_matrix(&r))),
            ElementType::Beam | ElementType::Frame => Ok(dynamic(&member_transformation_matrix(&r))),
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }

    /// Global equation numbers of the element DOFs (node index i owns `6i..6i+6`)
    pub fn dof_map(&self) -> Vec<usize> {
        let per_node = self.element_type.dofs_per_node();
        self.nodes
            .iter()
            .flat_map(|&n| (0..per_node).map(move |k| 6 * n + k))
            .collect()
    }

    fn ea_l(&self) -> f64 {
        self.material.e * self.section.a / self.length
    }

    fn check_length(&self) -> FEAResult<()> {
        if self.length > 0.0 {
            Ok(())
        } else {
            Err(FEAError::InvalidGeometry(format!(
                "element '{}' has not been added to a model",
                self.id
            )))
        }
    }

    /// Unreleased 12x12 local stiffness, shear-corrected for frames when enabled
    fn member_stiffness(&self, config: &SolverConfiguration) -> Mat12 {
        let (m, s, l) = (&self.material, &self.section, self.length);
        let mut k = member_local_stiffness(m.e, m.g, s.a, s.iy, s.iz, s.j, l);
        if self.element_type == ElementType::Frame && config.include_shear_deformation {
            k += member_shear_correction(m.e, m.g, s.iy, s.iz, s.asy, s.asz, l);
        }
        k
    }

    fn condense(&self, k: &Mat12) -> FEAResult<Mat12> {
        match &self.releases {
            Some(r) if r.any() => apply_releases(k, &r.as_array()),
            _ => Ok(*k),
        }
    }

    /// Local linear stiffness with end releases condensed out
    pub fn local_stiffness(&self, config: &SolverConfiguration) -> FEAResult<DMatrix<f64>> {
        self.check_length()?;
        match self.element_type {
            ElementType::Truss => Ok(dynamic(&truss_local_stiffness(
                self.material.e,
                self.section.a,
                self.length,
            ))),
            ElementType::Beam | ElementType::Frame => {
                Ok(dynamic(&self.condense(&self.member_stiffness(config))?))
            }
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }

    /// Global stiffness `Tᵀ k T`
    pub fn stiffness_matrix(
        &self,
        nodes: &[Node],
        config: &SolverConfiguration,
    ) -> FEAResult<DMatrix<f64>> {
        let t = self.transformation_matrix(nodes)?;
        let k = self.local_stiffness(config)?;
        Ok(t.transpose() * k * &t)
    }

    /// Local lumped mass
    pub fn local_mass(&self) -> FEAResult<DMatrix<f64>> {
        self.check_length()?;
        let (rho, a, l) = (self.material.rho, self.section.a, self.length);
        match self.element_type {
            ElementType::Truss => Ok(dynamic(&truss_lumped_mass(rho, a, l))),
            ElementType::Beam | ElementType::Frame => Ok(dynamic(&member_lumped_mass(rho, a, l))),
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }

    /// Global lumped mass `Tᵀ m T`
    pub fn mass_matrix(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        let t = self.transformation_matrix(nodes)?;
        let m = self.local_mass()?;
        Ok(t.transpose() * m * &t)
    }

    /// Local geometric stiffness for axial force `axial_force` (tension positive)
    ///
    /// `consistent` selects the full beam-column matrix over the chord-rotation
    /// (P-Δ) string matrix; trusses always use the string matrix. For released
    /// members the result is the change in condensed stiffness.
    pub fn local_geometric_stiffness(
        &self,
        axial_force: f64,
        consistent: bool,
        config: &SolverConfiguration,
    ) -> FEAResult<DMatrix<f64>> {
        self.check_length()?;
        let l = self.length;
        match self.element_type {
            ElementType::Truss => Ok(dynamic(&truss_geometric_stiffness(axial_force, l))),
            ElementType::Beam | ElementType::Frame => {
                let kg = if consistent {
                    member_geometric_stiffness(axial_force, self.section.a, self.section.ix, l)
                } else {
                    member_string_stiffness(axial_force, l)
                };
                match &self.releases {
                    Some(r) if r.any() => {
                        let ke = self.member_stiffness(config);
                        let releases = r.as_array();
                        let with_kg = apply_releases(&(ke + kg), &releases)?;
                        Ok(dynamic(&(with_kg - apply_releases(&ke, &releases)?)))
                    }
                    _ => Ok(dynamic(&kg)),
                }
            }
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }

    /// Local stiffness for the nonlinear solver
    ///
    /// The axial terms use the secant or tangent stiffness of `axial`, and the
    /// geometric stiffness of its force is added when the configuration asks
    /// for second-order effects. The secant matrix gives the internal force,
    /// so its geometric part carries no axial terms: the axial internal force
    /// is exactly the force of the axial law.
    pub fn local_nonlinear_stiffness(
        &self,
        config: &SolverConfiguration,
        axial: &AxialState,
        secant: bool,
    ) -> FEAResult<DMatrix<f64>> {
        self.check_length()?;
        let ka = if secant { axial.secant } else { axial.tangent };
        let l = self.length;
        match self.element_type {
            ElementType::Truss => {
                let mut k =
                    truss_local_stiffness(self.material.e, self.section.a, l) * (ka / self.ea_l());
                if config.geometric_nonlinearity || config.p_delta {
                    k += truss_geometric_stiffness(axial.force, l);
                }
                Ok(dynamic(&k))
            }
            ElementType::Beam | ElementType::Frame => {
                let mut k = self.member_stiffness(config);
                set_axial_stiffness(&mut k, ka);
                if config.geometric_nonlinearity {
                    let mut kg = member_geometric_stiffness(axial.force, self.section.a, self.section.ix, l);
                    if secant {
                        drop_axial_coupling(&mut kg);
                    }
                    k += kg;
                } else if config.p_delta {
                    k += member_string_stiffness(axial.force, l);
                }
                Ok(dynamic(&self.condense(&k)?))
            }
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }

    /// Elongation `u_j - u_i` along local x from local end displacements
    pub fn elongation(&self, d_local: &DVector<f64>) -> f64 {
        match self.element_type {
            ElementType::Truss => d_local[3] - d_local[0],
            _ => d_local[6] - d_local[0],
        }
    }

    /// Axial force for an elongation
    ///
    /// Elastic unless `material_nonlinearity`: then slack tension-/compression-
    /// only members keep `SLACK_STIFFNESS_RATIO` of their stiffness and members
    /// with a yield strength follow a bilinear law with yield force `fy·A`.
    pub fn axial_response(&self, elongation: f64, material_nonlinearity: bool) -> AxialState {
        let ea_l = self.ea_l();
        let elastic = AxialState {
            force: ea_l * elongation,
            secant: ea_l,
            tangent: ea_l,
        };
        if !material_nonlinearity {
            return elastic;
        }

        let slack = (self.tension_only && elongation < 0.0)
            || (self.compression_only && elongation > 0.0);
        if slack {
            let k = ea_l * SLACK_STIFFNESS_RATIO;
            return AxialState {
                force: k * elongation,
                secant: k,
                tangent: k,
            };
        }

        let n_yield = match self.material.fy {
            Some(fy) if fy > 0.0 => fy * self.section.a,
            _ => return elastic,
        };
        if elastic.force.abs() <= n_yield {
            return elastic;
        }

        let hardening = ea_l * POST_YIELD_RATIO;
        let yield_elongation = n_yield / ea_l;
        let force = elongation.signum() * (n_yield + hardening * (elongation.abs() - yield_elongation));
        AxialState {
            force,
            secant: force / elongation,
            tangent: hardening,
        }
    }

    /// Local fixed-end forces of the member loads, release-condensed
    pub fn fixed_end_forces(
        &self,
        loads: &[MemberLoad],
        config: &SolverConfiguration,
    ) -> FEAResult<DVector<f64>> {
        self.check_length()?;
        let l = self.length;
        match self.element_type {
            ElementType::Truss => {
                // Simply supported transfer to the two ends
                let mut fer = DVector::zeros(6);
                for load in loads {
                    match *load {
                        MemberLoad::Uniform { w } => {
                            for d in 0..3 {
                                fer[d] -= w[d] * l / 2.0;
                                fer[3 + d] -= w[d] * l / 2.0;
                            }
                        }
                        MemberLoad::Point { p, a } => {
                            for d in 0..3 {
                                fer[d] -= p[d] * (l - a) / l;
                                fer[3 + d] -= p[d] * a / l;
                            }
                        }
                    }
                }
                Ok(fer)
            }
            ElementType::Beam | ElementType::Frame => {
                let mut fer = Vec12::zeros();
                for load in loads {
                    fer += match *load {
                        MemberLoad::Uniform { w } => member_fixed_end_forces(w, None, l),
                        MemberLoad::Point { p, a } => member_fixed_end_forces(p, Some(a), l),
                    };
                }
                let fer = match &self.releases {
                    Some(r) if r.any() => {
                        apply_fer_releases(&fer, &self.member_stiffness(config), &r.as_array())?
                    }
                    _ => fer,
                };
                Ok(DVector::from_column_slice(fer.as_slice()))
            }
            other => Err(FEAError::UnsupportedElement(other.to_string())),
        }
    }
}

fn dynamic<const N: usize>(m: &SMatrix<f64, N, N>) -> DMatrix<f64> {
    DMatrix::from_column_slice(N, N, m.as_slice())
}
