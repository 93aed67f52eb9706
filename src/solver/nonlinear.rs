//! Newton-Raphson static analysis
//!
//! The state at a displacement `u` is evaluated element by element: the
//! axial law gives the axial force and secant/tangent stiffness, the secant
//! matrix gives the internal force `f_int` and the tangent matrix drives the
//! next correction. Geometric stiffness uses the axial force including the
//! fixed-end contribution of member loads.

use log::{debug, trace};
use nalgebra::DVector;

use super::{fill_nodal_results, local_displacements, DofPartition, Solver};
use crate::elements::AxialState;
use crate::error::{FEAError, FEAResult};
use crate::events::{SolverEvent, SolverObserver};
use crate::loads::LoadCombination;
use crate::math::{solve_linear_system, Matrix, Vector};
use crate::model::{scatter, CombinedLoads};
use crate::postprocess::element_results;
use crate::results::SolverResults;

/// Internal force, tangent stiffness and local end forces at one displacement
struct State {
    internal: Vector,
    tangent: Matrix,
    end_forces: Vec<DVector<f64>>,
}

impl State {
    fn evaluate(solver: &Solver, loads: &CombinedLoads, u: &Vector) -> FEAResult<Self> {
        let (model, config) = (solver.model, solver.config);
        let n = model.dof_count();
        let mut internal = Vector::zeros(n);
        let mut tangent = Matrix::zeros(n, n);
        let mut end_forces = Vec::with_capacity(model.elements().len());

        for (e, element) in model.elements().iter().enumerate() {
            let fef = &loads.fixed_end_forces[e];
            let t = element.transformation_matrix(model.nodes())?;
            let d = local_displacements(model, element, u)?;

            let response = element.axial_response(element.elongation(&d), config.material_nonlinearity);
            let axial = AxialState {
                force: response.force - fef[0],
                ..response
            };

            let k_secant = element.local_nonlinear_stiffness(config, &axial, true)?;
            let k_tangent = element.local_nonlinear_stiffness(config, &axial, false)?;

            let f_local = k_secant * &d;
            let f_global = t.transpose() * &f_local;
            for (a, &dof) in element.dof_map().iter().enumerate() {
                internal[dof] += f_global[a];
            }
            scatter(&mut tangent, &element.dof_map(), &(t.transpose() * k_tangent * &t));
            end_forces.push(f_local + fef);
        }

        Ok(Self {
            internal,
            tangent,
            end_forces,
        })
    }

    /// `F - f_int` on the free DOFs
    fn residual(&self, partition: &DofPartition, f: &Vector) -> Vector {
        partition.gather_free(&(f - &self.internal))
    }
}

pub(super) fn solve(
    solver: &Solver,
    combination: &LoadCombination,
    observer: &mut dyn SolverObserver,
) -> FEAResult<SolverResults> {
    let (model, config) = (solver.model, solver.config);
    let loads = model.build_load_vector(combination, config)?;
    let f = &loads.vector;
    let partition = DofPartition::new(model, &solver.matrices.stiffness, Some(f))?;

    let mut u = partition.prescribed.clone();
    let mut state = State::evaluate(solver, &loads, &u)?;
    let mut r = state.residual(&partition, f);

    let mut reference = partition.gather_free(f).norm();
    if reference == 0.0 {
        // Only enforced displacements load the structure
        reference = r.norm();
    }
    let mut residual = if reference > 0.0 { r.norm() / reference } else { 0.0 };
    let mut iterations = 0;

    loop {
        if residual < config.tolerance {
            debug!(
                "'{}' converged after {} iterations (residual {:.3e})",
                combination.id, iterations, residual
            );
            let mut results = finish(solver, combination, &loads, &u, &state)?;
            results.converged = true;
            results.iterations = iterations;
            results.residual_norm = residual;
            return Ok(results);
        }

        if solver.is_cancelled() {
            debug!("'{}' cancelled after {} iterations", combination.id, iterations);
            let mut results = finish(solver, combination, &loads, &u, &state)?;
            results.cancelled = true;
            results.iterations = iterations;
            results.residual_norm = residual;
            return Ok(results);
        }

        if iterations >= config.max_iterations {
            let mut results = finish(solver, combination, &loads, &u, &state)?;
            results.iterations = iterations;
            results.residual_norm = residual;
            return Err(FEAError::ConvergenceFailed {
                iterations,
                residual,
                results: Box::new(results),
            });
        }

        let k_ff = state.tangent.submatrix(&partition.free, &partition.free)?;
        let delta = solve_linear_system(&k_ff, &r)?;
        partition.scatter_add_free(&mut u, &delta);
        iterations += 1;

        state = State::evaluate(solver, &loads, &u)?;
        r = state.residual(&partition, f);
        residual = r.norm() / reference;
        trace!(
            "iteration {}: |du| = {:.3e}, residual {:.3e}",
            iterations,
            delta.norm(),
            residual
        );
        observer.on_event(&SolverEvent::IterationProgress {
            iteration: iterations,
            residual_norm: residual,
            converged: residual < config.tolerance,
        });
    }
}

/// Results at the current state; reactions are `f_int - F`
fn finish(
    solver: &Solver,
    combination: &LoadCombination,
    loads: &CombinedLoads,
    u: &Vector,
    state: &State,
) -> FEAResult<SolverResults> {
    let (model, config) = (solver.model, solver.config);
    let mut results = SolverResults::new(config.analysis_type, &combination.id);
    let reactions = &state.internal - &loads.vector;
    fill_nodal_results(&mut results, model, u, &reactions, loads);
    results.elements = element_results(model, config, u, loads, &state.end_forces)?;
    results.update_extremes();
    Ok(results)
}
