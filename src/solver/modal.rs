//! Modal analysis

use std::f64::consts::PI;

use log::info;

use super::{mode_shape, DofPartition, Solver};
use crate::error::{FEAError, FEAResult};
use crate::loads::LoadCombination;
use crate::math::{solve_generalized_eigenvalue, Vector};
use crate::results::{ModalResults, ModeResult, SolverResults};

/// Eigenvalues below this fraction of the largest are rigid-body modes
const RIGID_MODE_RATIO: f64 = 1e-10;

pub(super) fn solve(solver: &Solver, combination: &LoadCombination) -> FEAResult<SolverResults> {
    let (model, config) = (solver.model, solver.config);
    let k = &solver.matrices.stiffness;
    let m = &solver.matrices.mass;

    let partition = DofPartition::new(model, k, None)?;
    if partition.free.is_empty() {
        return Err(FEAError::AnalysisFailed(
            "modal analysis needs at least one free DOF".to_string(),
        ));
    }
    let k_ff = k.submatrix(&partition.free, &partition.free)?;
    let m_ff = m.submatrix(&partition.free, &partition.free)?;
    let solution = solve_generalized_eigenvalue(&k_ff, &m_ff)?;

    // Unit rigid-body translation in global X, Y and Z
    let influence: Vec<Vector> = (0..3)
        .map(|d| {
            Vector::from_iterator(
                partition.free.len(),
                partition.free.iter().map(|&dof| if dof % 6 == d { 1.0 } else { 0.0 }),
            )
        })
        .collect();
    let mut total_mass = [0.0; 3];
    let mut m_r = Vec::with_capacity(3);
    for (d, r) in influence.iter().enumerate() {
        let product = m_ff.mul_vector(r)?;
        total_mass[d] = r.dot(&product);
        m_r.push(product);
    }

    let lambda_max = solution.eigenvalues.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = RIGID_MODE_RATIO * lambda_max;
    let zeta = config.damping_ratio;

    let mut modes = Vec::new();
    for (lambda, phi) in solution.eigenvalues.iter().zip(&solution.eigenvectors) {
        if modes.len() == config.num_modes {
            break;
        }
        if *lambda <= cutoff {
            continue;
        }

        let generalized = phi.dot(&m_ff.mul_vector(phi)?);
        let mut participation = [0.0; 3];
        let mut effective_mass_ratio = [0.0; 3];
        for d in 0..3 {
            let l = phi.dot(&m_r[d]);
            participation[d] = l / generalized;
            if total_mass[d] > 0.0 {
                effective_mass_ratio[d] = l * l / generalized / total_mass[d];
            }
        }

        let frequency = lambda.sqrt() / (2.0 * PI);
        modes.push(ModeResult {
            mode: modes.len() + 1,
            eigenvalue: *lambda,
            frequency,
            damped_frequency: frequency * (1.0 - zeta * zeta).sqrt(),
            period: 1.0 / frequency,
            participation,
            effective_mass_ratio,
            shape: mode_shape(model, &partition, phi),
        });
    }

    if modes.is_empty() {
        return Err(FEAError::AnalysisFailed(
            "no positive eigenvalues - the structure is a mechanism".to_string(),
        ));
    }
    info!(
        "modal analysis: {} modes, fundamental frequency {:.3} Hz",
        modes.len(),
        modes[0].frequency
    );

    let mut results = SolverResults::new(config.analysis_type, &combination.id);
    results.converged = true;
    results.iterations = 1;
    results.modal = Some(ModalResults { modes, total_mass });
    Ok(results)
}
