//! Frame Solver Example - Greenhouse Gable Frame
//!
//! Runs a single galvanized steel gable frame through linear, nonlinear,
//! modal and buckling analysis. Set `RUST_LOG=debug` to see solver events.

use anyhow::{Context, Result};
use frame_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Frame Solver Example: Greenhouse Gable Frame ===\n");

    //            R
    //          /   \
    //     E1 /       \ E2
    //       |         |
    //       |         |
    //      B1         B2
    //    Fixed       Fixed
    let span = 9.6;
    let eave = 4.0;
    let ridge = 5.6;
    let geometry = GeometryModel::gable_frame(span, eave, ridge);

    // Frame spacing 4 m: 0.5 kN/m² snow, 0.6 kN/m² wind on the windward wall
    let spacing = 4.0;
    let dead = LoadCase::dead().with_self_weight();
    let snow = LoadCase::snow()
        .with_distributed_load(DistributedLoad::uniform_downward("R1", 500.0 * spacing))
        .with_distributed_load(DistributedLoad::uniform_downward("R2", 500.0 * spacing));
    let wind = LoadCase::wind().with_distributed_load(DistributedLoad::uniform(
        "C1",
        600.0 * spacing,
        LoadDirection::FX,
    ));

    let mut model = StructuralModel::new();
    model
        .create_model_from_geometry(&geometry, &[dead, snow, wind], &mut LogObserver)
        .context("building the frame model")?;

    println!("Model:");
    println!("  Nodes: {}", model.nodes().len());
    println!("  Elements: {}", model.elements().len());
    println!("  DOFs: {}", model.dof_count());
    println!("  Span: {} m, eave: {} m, ridge: {} m\n", span, eave, ridge);

    // Linear static
    let linear = SolverConfiguration::linear();
    for combination in [LoadCombination::uls_snow(), LoadCombination::uls_wind()] {
        let results = model
            .analyze(&combination, &linear, &mut LogObserver)
            .with_context(|| format!("linear analysis of {}", combination.id))?;
        print_static(&results);
    }

    // Second order with consistent geometric stiffness
    let nonlinear = SolverConfiguration::nonlinear().with_material_nonlinearity(true);
    let results = model
        .analyze(&LoadCombination::uls_wind(), &nonlinear, &mut LogObserver)
        .context("nonlinear analysis")?;
    println!("Nonlinear ({} iterations, converged: {}):", results.iterations, results.converged);
    print_static(&results);

    // Natural frequencies
    let modal = SolverConfiguration::modal(4);
    let results = model
        .analyze(&LoadCombination::new("modal"), &modal, &mut LogObserver)
        .context("modal analysis")?;
    if let Some(modal) = &results.modal {
        println!("Modal analysis:");
        for mode in &modal.modes {
            println!(
                "  Mode {}: f = {:.3} Hz, T = {:.4} s, mass X/Z = {:.1}% / {:.1}%",
                mode.mode,
                mode.frequency,
                mode.period,
                mode.effective_mass_ratio[0] * 100.0,
                mode.effective_mass_ratio[2] * 100.0
            );
        }
        println!();
    }

    // Elastic critical load factor under the snow combination
    let buckling = SolverConfiguration::buckling();
    let results = model
        .analyze(&LoadCombination::uls_snow(), &buckling, &mut LogObserver)
        .context("buckling analysis")?;
    if let Some(buckling) = &results.buckling {
        println!("Buckling analysis:");
        println!("  Critical load factor: {:.2}", buckling.critical_factor);
        if let Some(next) = buckling.factors.get(1) {
            println!("  Second load factor: {:.2}", next);
        }
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}

fn print_static(results: &SolverResults) {
    println!("Combination {}:", results.combination);
    for node in ["E1", "R", "E2"] {
        if let Some(d) = results.node_displacement(node) {
            println!(
                "  {:>2}: DX = {:8.3} mm, DZ = {:8.3} mm",
                node,
                d.dx * 1000.0,
                d.dz * 1000.0
            );
        }
    }
    for node in ["B1", "B2"] {
        if let Some(r) = results.reaction(node) {
            println!(
                "  Reaction {}: FX = {:7.2} kN, FZ = {:7.2} kN, MY = {:7.2} kNm",
                node,
                r[0] / 1000.0,
                r[2] / 1000.0,
                r[4] / 1000.0
            );
        }
    }
    if let Some(ridge) = results.node_displacement("R") {
        println!(
            "  Ridge: |u| = {:.3} mm, |θ| = {:.5} rad",
            ridge.translation_magnitude() * 1000.0,
            ridge.rotation_magnitude()
        );
    }
    for element in &results.elements {
        let critical_x = element.critical_station().map_or(0.0, |s| s.x);
        println!(
            "  {}: N = {:7.2} kN, max M = {:6.2} kNm, σ_vm = {:6.1} MPa at x = {:.2} m, utilization {:.2}",
            element.id,
            element.axial_force / 1000.0,
            element.max_moment() / 1000.0,
            element.max_von_mises / 1e6,
            critical_x,
            element.utilization.unwrap_or(0.0)
        );
    }
    println!();
}
