//! Solver core
//!
//! `Solver` borrows a model, its assembled matrices and a configuration and
//! dispatches to the strategy selected by `SolverConfiguration::analysis_type`.
//! Nothing is mutated through these borrows, so several solves may share one
//! model across threads.

mod buckling;
pub mod dofs;
mod linear;
mod modal;
mod nonlinear;

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, warn};

use crate::analysis::{AnalysisType, SolverConfiguration};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::events::{CancellationToken, SolverEvent, SolverObserver};
use crate::loads::LoadCombination;
use crate::math::{solve_linear_system, Matrix, Vector};
use crate::model::{CombinedLoads, GlobalMatrices, StructuralModel};
use crate::results::SolverResults;

pub use dofs::DofPartition;

/// Runs one analysis per `solve` call
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    model: &'a StructuralModel,
    matrices: &'a GlobalMatrices,
    config: &'a SolverConfiguration,
    cancellation: Option<CancellationToken>,
}

impl<'a> Solver<'a> {
    pub fn new(
        model: &'a StructuralModel,
        matrices: &'a GlobalMatrices,
        config: &'a SolverConfiguration,
    ) -> Self {
        Self {
            model,
            matrices,
            config,
            cancellation: None,
        }
    }

    /// Check `token` once per nonlinear iteration
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }

    /// Analyze one load combination
    ///
    /// Emits `AnalysisComplete` on success (including a cancelled nonlinear
    /// run) and `AnalysisError` before returning an error.
    pub fn solve(
        &self,
        combination: &LoadCombination,
        observer: &mut dyn SolverObserver,
    ) -> FEAResult<SolverResults> {
        let start = Instant::now();
        let outcome = self.dispatch(combination, observer);
        match &outcome {
            Ok(results) => observer.on_event(&SolverEvent::AnalysisComplete {
                combination: combination.id.clone(),
                summary: results.summary(),
                elapsed: start.elapsed(),
            }),
            Err(err) => {
                warn!("{} failed for '{}': {}", self.config.analysis_type.name(), combination.id, err);
                observer.on_event(&SolverEvent::AnalysisError {
                    combination: combination.id.clone(),
                    error: err.to_string(),
                })
            }
        }
        outcome
    }

    fn dispatch(
        &self,
        combination: &LoadCombination,
        observer: &mut dyn SolverObserver,
    ) -> FEAResult<SolverResults> {
        self.config.validate()?;
        let n = self.model.dof_count();
        if self.matrices.stiffness.shape() != (n, n) || self.matrices.mass.shape() != (n, n) {
            return Err(FEAError::DimensionMismatch {
                operation: "solve",
                left: self.matrices.stiffness.shape(),
                right: (n, n),
            });
        }
        debug!(
            "{} analysis of '{}' over {} DOFs",
            self.config.analysis_type.name(),
            combination.id,
            n
        );

        match self.config.analysis_type {
            AnalysisType::LinearStatic => linear::solve(self, combination),
            AnalysisType::NonlinearStatic => nonlinear::solve(self, combination, observer),
            AnalysisType::Modal => modal::solve(self, combination),
            AnalysisType::Buckling => buckling::solve(self, combination),
        }
    }
}

/// Solve `K u = F` on the free DOFs with constrained DOFs at their prescribed
/// values
///
/// A zero right-hand side returns the prescribed vector without factorizing.
pub(crate) fn solve_static(k: &Matrix, f: &Vector, partition: &DofPartition) -> FEAResult<Vector> {
    let mut u = partition.prescribed.clone();
    if partition.free.is_empty() {
        return Ok(u);
    }

    let mut rhs = partition.gather_free(f);
    for (a, &i) in partition.free.iter().enumerate() {
        for &c in &partition.constrained {
            let uc = u[c];
            if uc != 0.0 {
                rhs[a] -= k[(i, c)] * uc;
            }
        }
    }
    if rhs.iter().all(|v| *v == 0.0) {
        return Ok(u);
    }

    let k_ff = k.submatrix(&partition.free, &partition.free)?;
    let u_free = solve_linear_system(&k_ff, &rhs)?;
    partition.scatter_add_free(&mut u, &u_free);
    Ok(u)
}

/// Fill displacements, reactions and applied loads keyed by node id
///
/// `reaction_vector` is `K·u - F` (or `F_int - F`); only constrained DOFs are
/// reported, at nodes with at least one restraint.
pub(crate) fn fill_nodal_results(
    results: &mut SolverResults,
    model: &StructuralModel,
    u: &Vector,
    reaction_vector: &Vector,
    loads: &CombinedLoads,
) {
    for (index, node) in model.nodes().iter().enumerate() {
        let base = 6 * index;
        let mut displacement = [0.0; 6];
        let mut applied = [0.0; 6];
        for k in 0..6 {
            displacement[k] = u[base + k];
            applied[k] = loads.vector[base + k];
        }
        results.displacements.insert(node.id.clone(), displacement);
        results.applied_loads.insert(node.id.clone(), applied);

        if node.is_supported() {
            let mut reaction = [0.0; 6];
            for (k, r) in reaction.iter_mut().enumerate() {
                if node.support.is_restrained(k) {
                    *r = reaction_vector[base + k];
                }
            }
            results.reactions.insert(node.id.clone(), reaction);
        }
    }
}

/// Element end displacements in local axes
pub(crate) fn local_displacements(
    model: &StructuralModel,
    element: &Element,
    u: &Vector,
) -> FEAResult<Vector> {
    let t = element.transformation_matrix(model.nodes())?;
    let dofs = element.dof_map();
    let u_e = Vector::from_iterator(dofs.len(), dofs.iter().map(|&i| u[i]));
    Ok(t * u_e)
}

/// Expand a free-DOF mode vector into per-node 6-component shapes
pub(crate) fn mode_shape(
    model: &StructuralModel,
    partition: &DofPartition,
    phi: &Vector,
) -> BTreeMap<String, [f64; 6]> {
    let full = partition.expand_free(phi);
    model
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let mut shape = [0.0; 6];
            for (k, s) in shape.iter_mut().enumerate() {
                *s = full[6 * index + k];
            }
            (node.id.clone(), shape)
        })
        .collect()
}
