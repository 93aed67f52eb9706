//! Linear static analysis

use log::info;

use super::{fill_nodal_results, solve_static, DofPartition, Solver};
use crate::error::FEAResult;
use crate::loads::LoadCombination;
use crate::postprocess::{element_results, linear_end_forces};
use crate::results::SolverResults;

pub(super) fn solve(solver: &Solver, combination: &LoadCombination) -> FEAResult<SolverResults> {
    let (model, config) = (solver.model, solver.config);
    let k = &solver.matrices.stiffness;

    let loads = model.build_load_vector(combination, config)?;
    let partition = DofPartition::new(model, k, Some(&loads.vector))?;
    let u = solve_static(k, &loads.vector, &partition)?;

    // K·u - F vanishes on free rows and holds the reactions on constrained ones
    let reactions = k.mul_vector(&u)? - &loads.vector;

    let mut results = SolverResults::new(config.analysis_type, &combination.id);
    results.converged = true;
    results.iterations = 1;
    fill_nodal_results(&mut results, model, &u, &reactions, &loads);

    let end_forces = linear_end_forces(model, config, &u, &loads)?;
    results.elements = element_results(model, config, &u, &loads, &end_forces)?;
    results.update_extremes();

    info!(
        "linear solve of '{}': {} free DOFs, max displacement {:.4e} m",
        combination.id,
        partition.free.len(),
        results.max_displacement
    );
    Ok(results)
}
