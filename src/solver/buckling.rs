//! Linearized buckling analysis
//!
//! A linear solve under the combination gives the element axial forces; the
//! consistent geometric stiffness of those forces is then scaled by the load
//! factor λ in `K φ = λ (-K_G) φ`.

use log::info;

use super::{fill_nodal_results, mode_shape, solve_static, DofPartition, Solver};
use crate::error::{FEAError, FEAResult};
use crate::loads::LoadCombination;
use crate::math::{solve_buckling_eigenvalue, Matrix};
use crate::model::scatter;
use crate::postprocess::{element_results, linear_end_forces};
use crate::results::{BucklingResults, SolverResults};

pub(super) fn solve(solver: &Solver, combination: &LoadCombination) -> FEAResult<SolverResults> {
    let (model, config) = (solver.model, solver.config);
    let k = &solver.matrices.stiffness;
    let n = model.dof_count();

    let loads = model.build_load_vector(combination, config)?;
    let partition = DofPartition::new(model, k, Some(&loads.vector))?;
    if partition.free.is_empty() {
        return Err(FEAError::AnalysisFailed(
            "buckling analysis needs at least one free DOF".to_string(),
        ));
    }
    let u = solve_static(k, &loads.vector, &partition)?;
    let end_forces = linear_end_forces(model, config, &u, &loads)?;

    let mut kg = Matrix::zeros(n, n);
    for (element, forces) in model.elements().iter().zip(&end_forces) {
        let axial = -forces[0];
        if axial == 0.0 {
            continue;
        }
        let t = element.transformation_matrix(model.nodes())?;
        let kg_local = element.local_geometric_stiffness(axial, true, config)?;
        scatter(&mut kg, &element.dof_map(), &(t.transpose() * kg_local * &t));
    }

    let k_ff = k.submatrix(&partition.free, &partition.free)?;
    let kg_ff = kg.submatrix(&partition.free, &partition.free)?;
    let solution = solve_buckling_eigenvalue(&k_ff, &Matrix::from(-kg_ff.into_dmatrix()))?;
    if solution.is_empty() {
        return Err(FEAError::AnalysisFailed(
            "no positive buckling load factor - no member is in compression".to_string(),
        ));
    }

    let critical_factor = solution.eigenvalues[0];
    info!(
        "buckling of '{}': critical load factor {:.4}",
        combination.id, critical_factor
    );

    let mut results = SolverResults::new(config.analysis_type, &combination.id);
    results.converged = true;
    results.iterations = 1;
    let reactions = k.mul_vector(&u)? - &loads.vector;
    fill_nodal_results(&mut results, model, &u, &reactions, &loads);
    results.elements = element_results(model, config, &u, &loads, &end_forces)?;
    results.update_extremes();
    results.buckling = Some(BucklingResults {
        critical_factor,
        mode_shape: mode_shape(model, &partition, &solution.eigenvectors[0]),
        factors: solution.eigenvalues,
    });
    Ok(results)
}
