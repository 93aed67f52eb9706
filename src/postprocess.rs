//! Element post-processing
//!
//! Local end forces follow `f = k·d + FEF`: `f` are the forces the nodes
//! exert on the member, in local axes. Section actions at a station `x` come
//! from equilibrium of the segment `[0, x]`, so member loads between the
//! nodes show up in the diagrams. Axial force is positive in tension.

use nalgebra::DVector;

use crate::analysis::SolverConfiguration;
use crate::elements::{Element, ElementType, MemberLoad, Section};
use crate::error::FEAResult;
use crate::math::Vector;
use crate::model::{CombinedLoads, StructuralModel};
use crate::results::{ElementResult, StationResult};
use crate::solver::local_displacements;

/// Section actions at one station
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionActions {
    pub axial: f64,
    pub shear_y: f64,
    pub shear_z: f64,
    pub torsion: f64,
    pub moment_y: f64,
    pub moment_z: f64,
}

/// Linear end forces `k·d + FEF` for every element, in arena order
pub fn linear_end_forces(
    model: &StructuralModel,
    config: &SolverConfiguration,
    u: &Vector,
    loads: &CombinedLoads,
) -> FEAResult<Vec<DVector<f64>>> {
    model
        .elements()
        .iter()
        .enumerate()
        .map(|(e, element)| -> FEAResult<DVector<f64>> {
            let d = local_displacements(model, element, u)?;
            let k = element.local_stiffness(config)?;
            Ok(k * d + &loads.fixed_end_forces[e])
        })
        .collect()
}

/// Results for every element given the global displacements and end forces
pub fn element_results(
    model: &StructuralModel,
    config: &SolverConfiguration,
    u: &Vector,
    loads: &CombinedLoads,
    end_forces: &[DVector<f64>],
) -> FEAResult<Vec<ElementResult>> {
    let mut results = Vec::with_capacity(model.elements().len());
    for (e, element) in model.elements().iter().enumerate() {
        let d = local_displacements(model, element, u)?;
        results.push(element_result(
            element,
            &d,
            &end_forces[e],
            &loads.member_loads[e],
            config.stations,
        ));
    }
    Ok(results)
}

/// Stations, stresses and utilization of one element
///
/// `d_local` and `end_forces` are in the element's own DOF layout (6 entries
/// for trusses, 12 otherwise).
pub fn element_result(
    element: &Element,
    d_local: &DVector<f64>,
    end_forces: &DVector<f64>,
    loads: &[MemberLoad],
    stations: usize,
) -> ElementResult {
    let forces = expand_end_forces(element.element_type, end_forces);
    let length = element.length();
    let count = stations.max(2);

    let mut samples = Vec::with_capacity(count);
    for k in 0..count {
        let x = length * k as f64 / (count - 1) as f64;
        let mut actions = section_actions(&forces, loads, x);
        let deflection = if element.element_type == ElementType::Truss {
            actions = SectionActions {
                axial: actions.axial,
                ..SectionActions::default()
            };
            truss_deflection(d_local, x / length)
        } else {
            member_deflection(element, d_local, loads, x)
        };
        samples.push(station(&element.section, x, &actions, deflection));
    }

    let (critical_index, max_von_mises) = samples
        .iter()
        .enumerate()
        .fold((0, 0.0_f64), |(best, max), (k, s)| {
            if s.von_mises > max {
                (k, s.von_mises)
            } else {
                (best, max)
            }
        });

    ElementResult {
        id: element.id.clone(),
        element_type: element.element_type,
        length,
        end_forces: forces,
        axial_force: -forces[0],
        stations: samples,
        max_von_mises,
        utilization: element.material.design_strength().map(|f| max_von_mises / f),
        critical_index,
    }
}

/// Map element end forces onto the 12-entry layout
fn expand_end_forces(element_type: ElementType, end_forces: &DVector<f64>) -> [f64; 12] {
    let mut forces = [0.0; 12];
    if element_type == ElementType::Truss {
        for (k, &slot) in [0, 1, 2, 6, 7, 8].iter().enumerate() {
            forces[slot] = end_forces[k];
        }
    } else {
        for (k, f) in forces.iter_mut().enumerate() {
            *f = end_forces[k];
        }
    }
    forces
}

/// Section actions at `x` from equilibrium of the segment left of the cut
pub fn section_actions(forces: &[f64; 12], loads: &[MemberLoad], x: f64) -> SectionActions {
    // Resultant of the i-end forces and member loads on [0, x], and its
    // moment about the cut
    let mut f = [forces[0], forces[1], forces[2]];
    let mut m_y = forces[4] + x * forces[2];
    let mut m_z = forces[5] - x * forces[1];

    for load in loads {
        match *load {
            MemberLoad::Uniform { w } => {
                for (fd, wd) in f.iter_mut().zip(w) {
                    *fd += wd * x;
                }
                m_y += w[2] * x * x / 2.0;
                m_z -= w[1] * x * x / 2.0;
            }
            MemberLoad::Point { p, a } if a <= x => {
                for (fd, pd) in f.iter_mut().zip(p) {
                    *fd += pd;
                }
                m_y += (x - a) * p[2];
                m_z -= (x - a) * p[1];
            }
            MemberLoad::Point { .. } => {}
        }
    }

    SectionActions {
        axial: -f[0],
        shear_y: -f[1],
        shear_z: -f[2],
        torsion: -forces[3],
        moment_y: -m_y,
        moment_z: -m_z,
    }
}

/// Normal, shear and von Mises stress for a set of actions
///
/// Returns `(σ, τ, σ_vm)` with σ = |N|/A + |My|/Sy + |Mz|/Sz and
/// τ = |Vy|/Asy + |Vz|/Asz + |T|·r/J.
pub fn stresses(section: &Section, actions: &SectionActions) -> (f64, f64, f64) {
    let ratio = |value: f64, property: f64| {
        if property > 0.0 {
            value.abs() / property
        } else {
            0.0
        }
    };
    let normal = ratio(actions.axial, section.a)
        + ratio(actions.moment_y, section.sy())
        + ratio(actions.moment_z, section.sz());
    let shear = ratio(actions.shear_y, section.effective_asy())
        + ratio(actions.shear_z, section.effective_asz())
        + ratio(actions.torsion * section.torsion_radius(), section.j);
    let von_mises = (normal * normal + 3.0 * shear * shear).sqrt();
    (normal, shear, von_mises)
}

fn station(section: &Section, x: f64, actions: &SectionActions, deflection: [f64; 3]) -> StationResult {
    let (normal_stress, shear_stress, von_mises) = stresses(section, actions);
    StationResult {
        x,
        axial: actions.axial,
        shear_y: actions.shear_y,
        shear_z: actions.shear_z,
        torsion: actions.torsion,
        moment_y: actions.moment_y,
        moment_z: actions.moment_z,
        normal_stress,
        shear_stress,
        von_mises,
        deflection,
    }
}

fn truss_deflection(d: &DVector<f64>, xi: f64) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (k, o) in out.iter_mut().enumerate() {
        *o = (1.0 - xi) * d[k] + xi * d[3 + k];
    }
    out
}

/// Hermite interpolation of the end displacements plus the fixed-fixed
/// particular solution `w·x²(L-x)²/24EI` of uniform loads
fn member_deflection(element: &Element, d: &DVector<f64>, loads: &[MemberLoad], x: f64) -> [f64; 3] {
    let l = element.length();
    let xi = x / l;
    let n1 = 1.0 - 3.0 * xi * xi + 2.0 * xi.powi(3);
    let n2 = l * (xi - 2.0 * xi * xi + xi.powi(3));
    let n3 = 3.0 * xi * xi - 2.0 * xi.powi(3);
    let n4 = l * (xi.powi(3) - xi * xi);

    let u = (1.0 - xi) * d[0] + xi * d[6];
    // θz rotates +x towards +y; θy rotates +x towards -z
    let mut v = n1 * d[1] + n2 * d[5] + n3 * d[7] + n4 * d[11];
    let mut w = n1 * d[2] - n2 * d[4] + n3 * d[8] - n4 * d[10];

    let e = element.material.e;
    let shape = x * x * (l - x) * (l - x) / 24.0;
    for load in loads {
        if let MemberLoad::Uniform { w: q } = *load {
            if element.section.iz > 0.0 {
                v += q[1] * shape / (e * element.section.iz);
            }
            if element.section.iy > 0.0 {
                w += q[2] * shape / (e * element.section.iy);
            }
        }
    }
    [u, v, w]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Node};
    use approx::assert_relative_eq;

    fn beam(length: f64) -> Element {
        let mut e = Element::new("B", ElementType::Beam, 0, 1, Material::steel(), Section::rectangular(0.1, 0.2));
        e.bind(&[Node::new("A", 0.0, 0.0, 0.0), Node::new("C", length, 0.0, 0.0)])
            .unwrap();
        e
    }

    #[test]
    fn test_cantilever_tip_load_moment_diagram() {
        // Fixed at i, tip load -P (global/local z) at j
        let (p, l) = (1000.0, 4.0);
        let mut forces = [0.0; 12];
        forces[2] = p;
        forces[4] = -p * l;

        let root = section_actions(&forces, &[], 0.0);
        let mid = section_actions(&forces, &[], l / 2.0);
        let tip = section_actions(&forces, &[], l);

        assert_relative_eq!(root.moment_y.abs(), p * l, epsilon = 1e-9);
        assert_relative_eq!(mid.moment_y.abs(), p * l / 2.0, epsilon = 1e-9);
        assert_relative_eq!(tip.moment_y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(mid.shear_z.abs(), p, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_load_midspan_moment() {
        // Simply supported span under w (local -z): reactions wL/2 up
        let (w, l) = (2000.0, 6.0);
        let mut forces = [0.0; 12];
        forces[2] = w * l / 2.0;
        forces[8] = w * l / 2.0;
        let loads = [MemberLoad::Uniform { w: [0.0, 0.0, -w] }];

        let mid = section_actions(&forces, &loads, l / 2.0);
        assert_relative_eq!(mid.moment_y.abs(), w * l * l / 8.0, epsilon = 1e-6);
        assert_relative_eq!(mid.shear_z, 0.0, epsilon = 1e-9);
        let end = section_actions(&forces, &loads, l);
        assert_relative_eq!(end.moment_y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_point_load_jumps_shear() {
        let mut forces = [0.0; 12];
        forces[1] = 500.0;
        forces[7] = 500.0;
        let loads = [MemberLoad::Point { p: [0.0, -1000.0, 0.0], a: 2.0 }];
        let before = section_actions(&forces, &loads, 1.9);
        let after = section_actions(&forces, &loads, 2.1);
        assert_relative_eq!(before.shear_y, -500.0, epsilon = 1e-9);
        assert_relative_eq!(after.shear_y, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_axial_stress_only() {
        let section = Section::rectangular(0.1, 0.2);
        let actions = SectionActions {
            axial: 20_000.0,
            ..SectionActions::default()
        };
        let (normal, shear, vm) = stresses(&section, &actions);
        assert_relative_eq!(normal, 1.0e6, epsilon = 1e-6);
        assert_eq!(shear, 0.0);
        assert_relative_eq!(vm, normal, epsilon = 1e-9);
    }

    #[test]
    fn test_hermite_deflection_matches_end_values() {
        let e = beam(3.0);
        let mut d = DVector::zeros(12);
        d[8] = -0.01;
        d[10] = 0.004;
        let start = member_deflection(&e, &d, &[], 0.0);
        let end = member_deflection(&e, &d, &[], 3.0);
        assert_relative_eq!(start[2], 0.0, epsilon = 1e-15);
        assert_relative_eq!(end[2], -0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_element_result_utilization() {
        let e = beam(2.0);
        let mut f = DVector::zeros(12);
        f[0] = -10_000.0;
        f[6] = 10_000.0;
        let result = element_result(&e, &DVector::zeros(12), &f, &[], 5);

        assert_eq!(result.stations.len(), 5);
        assert_relative_eq!(result.axial_force, 10_000.0, epsilon = 1e-9);
        let sigma = 10_000.0 / e.section.a;
        assert_relative_eq!(result.max_von_mises, sigma, max_relative = 1e-12);
        assert_relative_eq!(result.utilization.unwrap(), sigma / 235e6, max_relative = 1e-12);
    }
}
