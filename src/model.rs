//! Structural model - node/element arenas, load cases and global assembly

use std::collections::HashMap;

use log::{debug, info};
use nalgebra::DVector;

use crate::analysis::SolverConfiguration;
use crate::elements::{Element, MemberLoad, Node, Support};
use crate::error::{FEAError, FEAResult};
use crate::events::{SolverEvent, SolverObserver};
use crate::geometry::GeometryModel;
use crate::loads::{Load, LoadCase, LoadCombination, LoadDirection};
use crate::math::{Mat3, Matrix, Vec3, Vector};
use crate::results::SolverResults;
use crate::solver::Solver;

/// Global stiffness and lumped mass matrices, 6 DOFs per node
#[derive(Debug, Clone)]
pub struct GlobalMatrices {
    pub stiffness: Matrix,
    pub mass: Matrix,
}

impl GlobalMatrices {
    pub fn dofs(&self) -> usize {
        self.stiffness.rows()
    }
}

/// Loads of one combination, ready for a solve
#[derive(Debug, Clone)]
pub struct CombinedLoads {
    /// Global nodal loads plus equivalent loads of member loads (`-Tᵀ·FEF`)
    pub vector: Vector,
    /// Local member loads per element (arena order)
    pub member_loads: Vec<Vec<MemberLoad>>,
    /// Local fixed-end forces per element (arena order)
    pub fixed_end_forces: Vec<DVector<f64>>,
}

/// The main 3D finite element model
///
/// Nodes and elements live in arenas indexed densely in insertion order;
/// node `i` owns global DOFs `6i..6i+6`.
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    node_index: HashMap<String, usize>,
    element_index: HashMap<String, usize>,
    load_cases: Vec<LoadCase>,
    load_case_index: HashMap<String, usize>,
}

impl StructuralModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the model from provider geometry, replacing any previous content
    ///
    /// On error the model is left untouched.
    pub fn create_model_from_geometry(
        &mut self,
        geometry: &GeometryModel,
        load_cases: &[LoadCase],
        observer: &mut dyn SolverObserver,
    ) -> FEAResult<()> {
        let mut model = StructuralModel::new();

        for node in &geometry.nodes {
            let [x, y, z] = node.position;
            model.add_node(Node::new(&node.id, x, y, z))?;
        }

        for component in &geometry.components {
            for member in &component.members {
                let material = geometry
                    .materials
                    .get(&member.material)
                    .ok_or_else(|| FEAError::MaterialNotFound(member.material.clone()))?;
                let section = geometry
                    .sections
                    .get(&member.section)
                    .ok_or_else(|| FEAError::SectionNotFound(member.section.clone()))?;
                let i = model.require_node(&member.start)?;
                let j = model.require_node(&member.end)?;

                let mut element = Element::new(
                    &member.id,
                    member.element_type,
                    i,
                    j,
                    material.clone(),
                    section.clone(),
                )
                .with_component(&component.id);
                element.local_y = member.local_y;
                element.releases = member.releases;
                element.tension_only = member.tension_only;
                element.compression_only = member.compression_only;
                model.add_element(element)?;
            }
        }

        for spec in &geometry.supports {
            model.add_support(&spec.node, spec.support)?;
        }

        for case in load_cases {
            model.add_load_case(case.clone())?;
        }

        *self = model;
        info!(
            "created model: {} nodes, {} elements, {} load cases",
            self.nodes.len(),
            self.elements.len(),
            self.load_cases.len()
        );
        observer.on_event(&SolverEvent::ModelCreated {
            nodes: self.nodes.len(),
            elements: self.elements.len(),
            load_cases: self.load_cases.len(),
        });
        Ok(())
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model, returning its arena index
    pub fn add_node(&mut self, node: Node) -> FEAResult<usize> {
        if self.node_index.contains_key(&node.id) {
            return Err(FEAError::DuplicateId(node.id));
        }
        let index = self.nodes.len();
        self.node_index.insert(node.id.clone(), index);
        self.nodes.push(node);
        Ok(index)
    }

    /// Add an element to the model, returning its arena index
    pub fn add_element(&mut self, mut element: Element) -> FEAResult<usize> {
        if self.element_index.contains_key(&element.id) {
            return Err(FEAError::DuplicateId(element.id));
        }
        element.bind(&self.nodes)?;
        let index = self.elements.len();
        self.element_index.insert(element.id.clone(), index);
        self.elements.push(element);
        Ok(index)
    }

    /// Add a support condition
    pub fn add_support(&mut self, node_id: &str, support: Support) -> FEAResult<()> {
        let index = self.require_node(node_id)?;
        self.nodes[index].support = support;
        Ok(())
    }

    /// Register a load case after checking every load against the model
    pub fn add_load_case(&mut self, case: LoadCase) -> FEAResult<()> {
        if self.load_case_index.contains_key(&case.id) {
            return Err(FEAError::DuplicateId(case.id));
        }
        for load in &case.loads {
            self.check_load(load)?;
        }
        self.load_case_index.insert(case.id.clone(), self.load_cases.len());
        self.load_cases.push(case);
        Ok(())
    }

    fn check_load(&self, load: &Load) -> FEAResult<()> {
        match load {
            Load::Node(l) => {
                self.require_node(&l.node)?;
            }
            Load::Point(l) => {
                let element = &self.elements[self.require_element(&l.element)?];
                if !(0.0..=element.length()).contains(&l.position) {
                    return Err(FEAError::InvalidInput(format!(
                        "point load at {} m lies outside element '{}' (length {:.3} m)",
                        l.position,
                        l.element,
                        element.length()
                    )));
                }
            }
            Load::Distributed(l) => {
                self.require_element(&l.element)?;
            }
            Load::SelfWeight { .. } => {}
        }
        Ok(())
    }

    fn require_node(&self, id: &str) -> FEAResult<usize> {
        self.node_index(id)
            .ok_or_else(|| FEAError::NodeNotFound(id.to_string()))
    }

    fn require_element(&self, id: &str) -> FEAResult<usize> {
        self.element_index(id)
            .ok_or_else(|| FEAError::ElementNotFound(id.to_string()))
    }

    // ========================
    // Lookups
    // ========================

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn element_index(&self, id: &str) -> Option<usize> {
        self.element_index.get(id).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.element_index(id).map(|i| &self.elements[i])
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    pub fn load_case(&self, id: &str) -> Option<&LoadCase> {
        self.load_case_index.get(id).map(|&i| &self.load_cases[i])
    }

    /// Total number of global DOFs (6 per node)
    pub fn dof_count(&self) -> usize {
        self.nodes.len() * 6
    }

    // ========================
    // Assembly
    // ========================

    /// Global linear stiffness
    pub fn assemble_stiffness(&self, config: &SolverConfiguration) -> FEAResult<Matrix> {
        let mut k = Matrix::zeros(self.dof_count(), self.dof_count());
        for element in &self.elements {
            let ke = element.stiffness_matrix(&self.nodes, config)?;
            scatter(&mut k, &element.dof_map(), &ke);
        }
        Ok(k)
    }

    /// Global lumped mass
    pub fn assemble_mass(&self) -> FEAResult<Matrix> {
        let mut m = Matrix::zeros(self.dof_count(), self.dof_count());
        for element in &self.elements {
            let me = element.mass_matrix(&self.nodes)?;
            scatter(&mut m, &element.dof_map(), &me);
        }
        Ok(m)
    }

    /// Assemble global stiffness and mass in element order
    pub fn assemble_global_matrices(
        &self,
        config: &SolverConfiguration,
        observer: &mut dyn SolverObserver,
    ) -> FEAResult<GlobalMatrices> {
        if self.nodes.is_empty() {
            return Err(FEAError::InvalidInput("model has no nodes".to_string()));
        }
        let matrices = GlobalMatrices {
            stiffness: self.assemble_stiffness(config)?,
            mass: self.assemble_mass()?,
        };
        debug!(
            "assembled {} elements into {} DOFs",
            self.elements.len(),
            matrices.dofs()
        );
        observer.on_event(&SolverEvent::MatricesAssembled {
            dofs: matrices.dofs(),
        });
        Ok(matrices)
    }

    /// Assemble and solve one combination
    pub fn analyze(
        &self,
        combination: &LoadCombination,
        config: &SolverConfiguration,
        observer: &mut dyn SolverObserver,
    ) -> FEAResult<SolverResults> {
        let matrices = self.assemble_global_matrices(config, observer)?;
        Solver::new(self, &matrices, config).solve(combination, observer)
    }

    /// Combine load cases into nodal loads and per-element member loads
    ///
    /// Each load is multiplied by its combination factor and its case scale.
    /// Member loads (point, distributed, self-weight) are resolved into local
    /// components and enter the nodal vector through their fixed-end forces.
    pub fn build_load_vector(
        &self,
        combination: &LoadCombination,
        config: &SolverConfiguration,
    ) -> FEAResult<CombinedLoads> {
        let mut vector = Vector::zeros(self.dof_count());
        let mut member_loads: Vec<Vec<MemberLoad>> = vec![Vec::new(); self.elements.len()];
        let mut rotations: Vec<Option<Mat3>> = vec![None; self.elements.len()];

        for case_id in combination.case_ids() {
            let case = self
                .load_case(case_id)
                .ok_or_else(|| FEAError::LoadCaseNotFound(case_id.to_string()))?;
            let factor = combination.factor(case_id) * case.scale_factor;
            if factor == 0.0 {
                continue;
            }

            for load in case.loads.iter().map(|l| l.scaled(factor)) {
                match load {
                    Load::Node(l) => {
                        let base = 6 * self.require_node(&l.node)?;
                        for (k, value) in l.as_array().iter().enumerate() {
                            vector[base + k] += value;
                        }
                    }
                    Load::Point(l) => {
                        let e = self.require_element(&l.element)?;
                        let p = self.local_components(e, &mut rotations, l.direction, l.magnitude)?;
                        member_loads[e].push(MemberLoad::Point { p, a: l.position });
                    }
                    Load::Distributed(l) => {
                        let e = self.require_element(&l.element)?;
                        let w = self.local_components(e, &mut rotations, l.direction, l.w)?;
                        member_loads[e].push(MemberLoad::Uniform { w });
                    }
                    Load::SelfWeight { acceleration } => {
                        for (e, element) in self.elements.iter().enumerate() {
                            let q = Vec3::from(acceleration) * (element.material.rho * element.section.a);
                            let w = rotation_of(&self.nodes, element, e, &mut rotations)? * q;
                            member_loads[e].push(MemberLoad::Uniform { w: [w.x, w.y, w.z] });
                        }
                    }
                }
            }
        }

        let mut fixed_end_forces = Vec::with_capacity(self.elements.len());
        for (e, element) in self.elements.iter().enumerate() {
            let fef = element.fixed_end_forces(&member_loads[e], config)?;
            if !member_loads[e].is_empty() {
                let t = element.transformation_matrix(&self.nodes)?;
                let equivalent = -(t.transpose() * &fef);
                for (a, &dof) in element.dof_map().iter().enumerate() {
                    vector[dof] += equivalent[a];
                }
            }
            fixed_end_forces.push(fef);
        }

        Ok(CombinedLoads {
            vector,
            member_loads,
            fixed_end_forces,
        })
    }

    fn local_components(
        &self,
        e: usize,
        rotations: &mut [Option<Mat3>],
        direction: LoadDirection,
        magnitude: f64,
    ) -> FEAResult<[f64; 3]> {
        let unit = Vec3::from(direction.unit()) * magnitude;
        let local = if direction.is_local() {
            unit
        } else {
            rotation_of(&self.nodes, &self.elements[e], e, rotations)? * unit
        };
        Ok([local.x, local.y, local.z])
    }

    /// Write displacements, reactions and applied loads of a result onto the nodes
    pub fn store_results(&mut self, results: &SolverResults) {
        for node in &mut self.nodes {
            node.clear_results();
            node.displacement = results.displacement(&node.id);
            node.reaction = results.reaction(&node.id);
            if let Some(applied) = results.applied_loads.get(&node.id) {
                node.applied = *applied;
            }
        }
    }
}

/// Direction cosines of element `e`, computed once per load vector
fn rotation_of(
    nodes: &[Node],
    element: &Element,
    e: usize,
    cache: &mut [Option<Mat3>],
) -> FEAResult<Mat3> {
    if let Some(r) = cache[e] {
        return Ok(r);
    }
    let r = element.rotation_matrix(nodes)?;
    cache[e] = Some(r);
    Ok(r)
}

/// Add an element matrix into a global matrix through its DOF map
pub(crate) fn scatter(target: &mut Matrix, dofs: &[usize], ke: &nalgebra::DMatrix<f64>) {
    for (a, &p) in dofs.iter().enumerate() {
        for (b, &q) in dofs.iter().enumerate() {
            let value = ke[(a, b)];
            if value != 0.0 {
                target.add_at(p, q, value);
            }
        }
    }
}
