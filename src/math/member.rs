//! Element-level matrices for two-node line elements
//!
//! Local DOF order for beams/frames is
//! `[u_i, v_i, w_i, θx_i, θy_i, θz_i, u_j, v_j, w_j, θx_j, θy_j, θz_j]`;
//! for trusses it is `[u_i, v_i, w_i, u_j, v_j, w_j]`.

use nalgebra::{DMatrix, DVector};

use super::{Mat12, Mat3, Mat6, Vec12, Vec3};
use crate::error::{FEAError, FEAResult};

/// Members whose axis has a vertical direction cosine above this use global X
/// as the local y reference
pub const VERTICAL_THRESHOLD: f64 = 0.9;

/// Direction cosine matrix of a member, rows are local x, y and z
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
/// * `local_y` - Optional reference vector for local y (orthogonalized)
pub fn member_local_axes(
    i_node: &[f64; 3],
    j_node: &[f64; 3],
    local_y: Option<[f64; 3]>,
) -> FEAResult<Mat3> {
    let d = Vec3::new(
        j_node[0] - i_node[0],
        j_node[1] - i_node[1],
        j_node[2] - i_node[2],
    );
    let length = d.norm();
    if length < 1e-10 {
        return Err(FEAError::InvalidGeometry(format!(
            "zero-length member between {:?} and {:?}",
            i_node, j_node
        )));
    }
    let x = d / length;

    // y stays horizontal unless the member is near-vertical, where ẑ × x degenerates
    let reference = match local_y {
        Some(v) => Vec3::new(v[0], v[1], v[2]),
        None if x.z.abs() > VERTICAL_THRESHOLD => Vec3::x(),
        None => Vec3::z().cross(&x),
    };

    let y = reference - x * reference.dot(&x);
    let y_len = y.norm();
    if y_len < 1e-10 {
        return Err(FEAError::InvalidGeometry(
            "local y reference is parallel to the member axis".to_string(),
        ));
    }
    let y = y / y_len;
    let z = x.cross(&y);

    Ok(Mat3::new(
        x.x, x.y, x.z,
        y.x, y.y, y.z,
        z.x, z.y, z.z,
    ))
}

/// 12x12 transformation matrix from the direction cosine matrix
pub fn member_transformation_matrix(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(r);
    }
    t
}

/// 6x6 transformation matrix (translations only) for truss elements
pub fn truss_transformation_matrix(r: &Mat3) -> Mat6 {
    let mut t = Mat6::zeros();
    for block in 0..2 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(r);
    }
    t
}

/// Flexural coefficients of one bending plane, reduced by the shear factor Φ
#[derive(Debug, Clone, Copy)]
struct BendingTerms {
    /// 12EI / ((1+Φ)L³)
    a: f64,
    /// 6EI / ((1+Φ)L²)
    b: f64,
    /// (4+Φ)EI / ((1+Φ)L)
    c: f64,
    /// (2-Φ)EI / ((1+Φ)L)
    d: f64,
}

impl BendingTerms {
    fn new(ei: f64, phi: f64, l: f64) -> Self {
        let f = 1.0 + phi;
        Self {
            a: 12.0 * ei / (f * l * l * l),
            b: 6.0 * ei / (f * l * l),
            c: (4.0 + phi) * ei / (f * l),
            d: (2.0 - phi) * ei / (f * l),
        }
    }
}

/// `by` holds the terms for bending about local y (uses Iy, moves w),
/// `bz` for bending about local z (uses Iz, moves v)
fn frame_stiffness(ea_l: f64, gj_l: f64, by: BendingTerms, bz: BendingTerms) -> Mat12 {
    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,   0.0,    0.0,    0.0,    0.0,    0.0,    -ea_l,  0.0,    0.0,    0.0,    0.0,    0.0,
        // Row 1: shear Fy at i
        0.0,    bz.a,   0.0,    0.0,    0.0,    bz.b,   0.0,    -bz.a,  0.0,    0.0,    0.0,    bz.b,
        // Row 2: shear Fz at i
        0.0,    0.0,    by.a,   0.0,    -by.b,  0.0,    0.0,    0.0,    -by.a,  0.0,    -by.b,  0.0,
        // Row 3: torsion at i
        0.0,    0.0,    0.0,    gj_l,   0.0,    0.0,    0.0,    0.0,    0.0,    -gj_l,  0.0,    0.0,
        // Row 4: moment My at i
        0.0,    0.0,    -by.b,  0.0,    by.c,   0.0,    0.0,    0.0,    by.b,   0.0,    by.d,   0.0,
        // Row 5: moment Mz at i
        0.0,    bz.b,   0.0,    0.0,    0.0,    bz.c,   0.0,    -bz.b,  0.0,    0.0,    0.0,    bz.d,
        // Row 6: axial at j
        -ea_l,  0.0,    0.0,    0.0,    0.0,    0.0,    ea_l,   0.0,    0.0,    0.0,    0.0,    0.0,
        // Row 7: shear Fy at j
        0.0,    -bz.a,  0.0,    0.0,    0.0,    -bz.b,  0.0,    bz.a,   0.0,    0.0,    0.0,    -bz.b,
        // Row 8: shear Fz at j
        0.0,    0.0,    -by.a,  0.0,    by.b,   0.0,    0.0,    0.0,    by.a,   0.0,    by.b,   0.0,
        // Row 9: torsion at j
        0.0,    0.0,    0.0,    -gj_l,  0.0,    0.0,    0.0,    0.0,    0.0,    gj_l,   0.0,    0.0,
        // Row 10: moment My at j
        0.0,    0.0,    -by.b,  0.0,    by.d,   0.0,    0.0,    0.0,    by.b,   0.0,    by.c,   0.0,
        // Row 11: moment Mz at j
        0.0,    bz.b,   0.0,    0.0,    0.0,    bz.d,   0.0,    -bz.b,  0.0,    0.0,    0.0,    bz.c,
    ];

    Mat12::from_row_slice(&data)
}

/// Compute the local Euler-Bernoulli stiffness matrix for a 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    frame_stiffness(
        e * a / length,
        g * j / length,
        BendingTerms::new(e * iy, 0.0, length),
        BendingTerms::new(e * iz, 0.0, length),
    )
}

/// Additive Timoshenko correction to `member_local_stiffness`
///
/// Φ = 12EI / (G·As·L²) per bending plane; a zero shear area or shear modulus
/// leaves that plane uncorrected.
pub fn member_shear_correction(
    e: f64,
    g: f64,
    iy: f64,
    iz: f64,
    asy: f64,
    asz: f64,
    length: f64,
) -> Mat12 {
    let phi = |i: f64, shear_area: f64| {
        if g > 0.0 && shear_area > 0.0 {
            12.0 * e * i / (g * shear_area * length * length)
        } else {
            0.0
        }
    };
    // Bending about z moves v, resisted in shear by the y shear area
    let phi_y = phi(iz, asy);
    let phi_z = phi(iy, asz);

    let timoshenko = frame_stiffness(
        0.0,
        0.0,
        BendingTerms::new(e * iy, phi_z, length),
        BendingTerms::new(e * iz, phi_y, length),
    );
    let euler = frame_stiffness(
        0.0,
        0.0,
        BendingTerms::new(e * iy, 0.0, length),
        BendingTerms::new(e * iz, 0.0, length),
    );
    timoshenko - euler
}

/// Overwrite the axial terms of a local frame stiffness matrix
pub fn set_axial_stiffness(k: &mut Mat12, ka: f64) {
    k[(0, 0)] = ka;
    k[(6, 6)] = ka;
    k[(0, 6)] = -ka;
    k[(6, 0)] = -ka;
}

/// Compute the consistent geometric stiffness matrix for second-order analysis
///
/// # Arguments
/// * `p` - Axial force (positive = tension)
/// * `a` - Cross-sectional area
/// * `ix` - Polar moment of inertia
/// * `length` - Member length
pub fn member_geometric_stiffness(p: f64, a: f64, ix: f64, length: f64) -> Mat12 {
    if p.abs() < 1e-10 {
        return Mat12::zeros();
    }

    let l = length;
    let l2 = l * l;
    let p_l = p / l;
    let t = if a > 0.0 { p_l * ix / a } else { 0.0 };
    let s = 6.0 * p_l / 5.0;
    let q = p / 10.0;
    let r = 2.0 * p_l * l2 / 15.0;
    let u = p_l * l2 / 30.0;

    #[rustfmt::skip]
    let data = [
        p_l,  0.0,  0.0,  0.0,  0.0,  0.0,  -p_l, 0.0,  0.0,  0.0,  0.0,  0.0,
        0.0,  s,    0.0,  0.0,  0.0,  q,    0.0,  -s,   0.0,  0.0,  0.0,  q,
        0.0,  0.0,  s,    0.0,  -q,   0.0,  0.0,  0.0,  -s,   0.0,  -q,   0.0,
        0.0,  0.0,  0.0,  t,    0.0,  0.0,  0.0,  0.0,  0.0,  -t,   0.0,  0.0,
        0.0,  0.0,  -q,   0.0,  r,    0.0,  0.0,  0.0,  q,    0.0,  -u,   0.0,
        0.0,  q,    0.0,  0.0,  0.0,  r,    0.0,  -q,   0.0,  0.0,  0.0,  -u,
        -p_l, 0.0,  0.0,  0.0,  0.0,  0.0,  p_l,  0.0,  0.0,  0.0,  0.0,  0.0,
        0.0,  -s,   0.0,  0.0,  0.0,  -q,   0.0,  s,    0.0,  0.0,  0.0,  -q,
        0.0,  0.0,  -s,   0.0,  q,    0.0,  0.0,  0.0,  s,    0.0,  q,    0.0,
        0.0,  0.0,  0.0,  -t,   0.0,  0.0,  0.0,  0.0,  0.0,  t,    0.0,  0.0,
        0.0,  0.0,  -q,   0.0,  -u,   0.0,  0.0,  0.0,  q,    0.0,  r,    0.0,
        0.0,  q,    0.0,  0.0,  0.0,  -u,   0.0,  -q,   0.0,  0.0,  0.0,  r,
    ];

    Mat12::from_row_slice(&data)
}

/// Zero the axial rows and columns (local DOFs 0 and 6) of a member matrix
pub fn drop_axial_coupling(k: &mut Mat12) {
    for dof in [0, 6] {
        k.row_mut(dof).fill(0.0);
        k.column_mut(dof).fill(0.0);
    }
}

/// P-Δ (chord rotation) geometric stiffness: `P/L` on the transverse translations
pub fn member_string_stiffness(p: f64, length: f64) -> Mat12 {
    let mut kg = Mat12::zeros();
    let p_l = p / length;
    for (i, j) in [(1, 7), (2, 8)] {
        kg[(i, i)] = p_l;
        kg[(j, j)] = p_l;
        kg[(i, j)] = -p_l;
        kg[(j, i)] = -p_l;
    }
    kg
}

/// Local truss stiffness (axial only)
pub fn truss_local_stiffness(e: f64, a: f64, length: f64) -> Mat6 {
    let ea_l = e * a / length;
    let mut k = Mat6::zeros();
    k[(0, 0)] = ea_l;
    k[(3, 3)] = ea_l;
    k[(0, 3)] = -ea_l;
    k[(3, 0)] = -ea_l;
    k
}

/// Truss geometric stiffness (string matrix) for axial force `p` (tension positive)
pub fn truss_geometric_stiffness(p: f64, length: f64) -> Mat6 {
    let mut kg = Mat6::zeros();
    let p_l = p / length;
    for (i, j) in [(1, 4), (2, 5)] {
        kg[(i, i)] = p_l;
        kg[(j, j)] = p_l;
        kg[(i, j)] = -p_l;
        kg[(j, i)] = -p_l;
    }
    kg
}

/// Lumped member mass: ρAL/2 per translation and ρAL³/24 per rotation at each end
///
/// The rotational term is the inertia of each half-member about its node,
/// together ρAL³/12.
pub fn member_lumped_mass(rho: f64, a: f64, length: f64) -> Mat12 {
    let translational = rho * a * length / 2.0;
    let rotational = rho * a * length.powi(3) / 24.0;
    let mut m = Mat12::zeros();
    for end in [0, 6] {
        for k in 0..3 {
            m[(end + k, end + k)] = translational;
            m[(end + 3 + k, end + 3 + k)] = rotational;
        }
    }
    m
}

/// Lumped truss mass: ρAL/2 per translation at each end
pub fn truss_lumped_mass(rho: f64, a: f64, length: f64) -> Mat6 {
    Mat6::identity() * (rho * a * length / 2.0)
}

fn partition(releases: &[bool; 12]) -> (Vec<usize>, Vec<usize>) {
    (0..12).partition(|&i| !releases[i])
}

/// Apply static condensation for released DOFs
///
/// # Arguments
/// * `k` - Full stiffness matrix
/// * `releases` - Boolean array indicating which DOFs are released
pub fn apply_releases(k: &Mat12, releases: &[bool; 12]) -> FEAResult<Mat12> {
    let (unreleased, released) = partition(releases);
    if released.is_empty() {
        return Ok(*k);
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k11 = DMatrix::zeros(n1, n1);
    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k11[(i, j)] = k[(ui, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in released.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k21[(i, j)] = k[(ri, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    // Static condensation: k_cond = k11 - k12 * inv(k22) * k21
    let k22_inv = k22.try_inverse().ok_or_else(|| {
        FEAError::InvalidGeometry("end releases leave the member unstable".to_string())
    })?;
    let k_condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut k_result = Mat12::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k_result[(ui, uj)] = k_condensed[(i, j)];
        }
    }
    Ok(k_result)
}

/// Condense fixed-end forces for released DOFs: `fer1 - k12 * inv(k22) * fer2`
pub fn apply_fer_releases(fer: &Vec12, k: &Mat12, releases: &[bool; 12]) -> FEAResult<Vec12> {
    let (unreleased, released) = partition(releases);
    if released.is_empty() {
        return Ok(*fer);
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k22 = DMatrix::zeros(n2, n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in released.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let fer1 = DVector::from_iterator(n1, unreleased.iter().map(|&i| fer[i]));
    let fer2 = DVector::from_iterator(n2, released.iter().map(|&i| fer[i]));

    let k22_inv = k22.try_inverse().ok_or_else(|| {
        FEAError::InvalidGeometry("end releases leave the member unstable".to_string())
    })?;
    let fer_condensed = &fer1 - &k12 * &k22_inv * &fer2;

    // Released DOFs carry no end force
    let mut fer_result = Vec12::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        fer_result[ui] = fer_condensed[i];
    }
    Ok(fer_result)
}

/// Local fixed-end forces of a clamped member under one span load
///
/// `q` holds the local components of the load: intensity per metre for a
/// full-length uniform load (`position = None`) or the force of a point load
/// at `position` metres from the i-end. Entries are the end forces the
/// supports exert, in local DOF order.
pub fn member_fixed_end_forces(q: [f64; 3], position: Option<f64>, length: f64) -> Vec12 {
    let l = length;
    // Share of the load carried at each end, and the clamping moments per unit load
    let (share_i, share_j, moment_i, moment_j, axial_i, axial_j) = match position {
        None => (l / 2.0, l / 2.0, l * l / 12.0, l * l / 12.0, l / 2.0, l / 2.0),
        Some(a) => {
            let b = l - a;
            let l3 = l * l * l;
            (
                b * b * (3.0 * a + b) / l3,
                a * a * (a + 3.0 * b) / l3,
                a * b * b / (l * l),
                a * a * b / (l * l),
                b / l,
                a / l,
            )
        }
    };

    let [qx, qy, qz] = q;
    let mut fer = Vec12::zeros();
    fer[0] = -qx * axial_i;
    fer[6] = -qx * axial_j;
    // Bending about local z: the i-end moment opposes a +y load
    fer[1] = -qy * share_i;
    fer[5] = -qy * moment_i;
    fer[7] = -qy * share_j;
    fer[11] = qy * moment_j;
    // Bending about local y flips the moment signs
    fer[2] = -qz * share_i;
    fer[4] = qz * moment_i;
    fer[8] = -qz * share_j;
    fer[10] = -qz * moment_j;
    fer
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_symmetric(k: &Mat12) {
        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_local_axes_horizontal() {
        let r = member_local_axes(&[0.0, 0.0, 0.0], &[10.0, 0.0, 0.0], None).unwrap();

        // Member along +X: local axes coincide with global axes
        assert_relative_eq!(r[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_local_axes_vertical_uses_global_x() {
        let r = member_local_axes(&[0.0, 0.0, 0.0], &[0.0, 0.0, 4.0], None).unwrap();

        assert_relative_eq!(r[(0, 2)], 1.0, epsilon = 1e-12); // local x = global Z
        assert_relative_eq!(r[(1, 0)], 1.0, epsilon = 1e-12); // local y = global X
        assert_relative_eq!(r[(2, 1)], 1.0, epsilon = 1e-12); // local z = global Y
    }

    #[test]
    fn test_local_axes_inclined_rafter_keeps_y_horizontal() {
        let r = member_local_axes(&[0.0, 0.0, 3.0], &[4.0, 0.0, 5.0], None).unwrap();
        assert_relative_eq!(r[(1, 2)], 0.0, epsilon = 1e-12);
        // Orthonormal rows
        let rrt = r * r.transpose();
        assert_relative_eq!(rrt, Mat3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_local_axes_override() {
        let r = member_local_axes(&[0.0; 3], &[5.0, 0.0, 0.0], Some([0.0, 0.0, 1.0])).unwrap();
        assert_relative_eq!(r[(1, 2)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(2, 1)], -1.0, epsilon = 1e-12);

        let parallel = member_local_axes(&[0.0; 3], &[5.0, 0.0, 0.0], Some([2.0, 0.0, 0.0]));
        assert!(matches!(parallel, Err(FEAError::InvalidGeometry(_))));
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = member_local_axes(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], None);
        assert!(matches!(err, Err(FEAError::InvalidGeometry(_))));
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = member_local_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0);
        assert_symmetric(&k);
        assert_relative_eq!(k[(1, 1)], 12.0 * 200e9 * 2e-4 / 1000.0, max_relative = 1e-12);
        assert_relative_eq!(k[(4, 4)], 4.0 * 200e9 * 1e-4 / 10.0, max_relative = 1e-12);
    }

    #[test]
    fn test_shear_correction_softens_bending() {
        let (e, g, l) = (200e9, 77e9, 2.0);
        let k = member_local_stiffness(e, g, 0.01, 1e-4, 1e-4, 1e-5, l);
        let dk = member_shear_correction(e, g, 1e-4, 1e-4, 0.005, 0.005, l);
        assert_symmetric(&dk);
        assert!(dk[(1, 1)] < 0.0);
        assert!((k + dk)[(1, 1)] > 0.0);
        // Axial and torsion untouched
        assert_eq!(dk[(0, 0)], 0.0);
        assert_eq!(dk[(3, 3)], 0.0);
    }

    #[test]
    fn test_geometric_stiffness_symmetry() {
        let kg = member_geometric_stiffness(-1.0e5, 0.01, 2e-4, 3.0);
        assert_symmetric(&kg);
        assert!(kg[(1, 1)] < 0.0); // compression softens
    }

    #[test]
    fn test_truss_global_is_outer_product() {
        let r = member_local_axes(&[0.0; 3], &[3.0, 4.0, 0.0], None).unwrap();
        let t = truss_transformation_matrix(&r);
        let k = t.transpose() * truss_local_stiffness(1.0, 5.0, 5.0) * t;
        // EA/L = 1, c = (0.6, 0.8, 0)
        assert_relative_eq!(k[(0, 0)], 0.36, epsilon = 1e-12);
        assert_relative_eq!(k[(0, 1)], 0.48, epsilon = 1e-12);
        assert_relative_eq!(k[(1, 4)], -0.64, epsilon = 1e-12);
        assert_relative_eq!(k[(2, 2)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lumped_mass_total() {
        let m = member_lumped_mass(7850.0, 0.01, 4.0);
        let translational: f64 = (0..3).map(|i| m[(i, i)] + m[(i + 6, i + 6)]).sum();
        assert_relative_eq!(translational, 3.0 * 7850.0 * 0.01 * 4.0, max_relative = 1e-12);
        assert_relative_eq!(m[(3, 3)] + m[(9, 9)], 7850.0 * 0.01 * 64.0 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pin_release_zeroes_moment_row() {
        let k = member_local_stiffness(200e9, 77e9, 0.01, 1e-4, 1e-4, 1e-5, 5.0);
        let mut releases = [false; 12];
        releases[5] = true;
        let kc = apply_releases(&k, &releases).unwrap();
        for j in 0..12 {
            assert_eq!(kc[(5, j)], 0.0);
        }
        // Propped-cantilever transverse stiffness 3EI/L³
        let ei = 200e9 * 1e-4;
        assert_relative_eq!(kc[(1, 1)], 3.0 * ei / 125.0, max_relative = 1e-9);
    }

    #[test]
    fn test_uniform_fer_equilibrium() {
        let fer = member_fixed_end_forces([0.0, -10.0, 0.0], None, 6.0);
        // Fixed-end reactions balance the 60 N of load
        assert_relative_eq!(fer[1] + fer[7], 60.0, epsilon = 1e-12);
        assert_relative_eq!(fer[5], -fer[11], epsilon = 1e-12);
        assert_relative_eq!(fer[5], 10.0 * 36.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_fer() {
        let (p, a, l) = (-900.0, 1.0, 3.0);
        let fer = member_fixed_end_forces([0.0, 0.0, p], Some(a), l);
        // Clamped-clamped: Pb²(3a + b)/L³ and Pab²/L² at the near end
        assert_relative_eq!(fer[2], -p * 4.0 * 5.0 / 27.0, epsilon = 1e-9);
        assert_relative_eq!(fer[8], -p * 7.0 / 27.0, epsilon = 1e-9);
        assert_relative_eq!(fer[4], p * 4.0 / 9.0, epsilon = 1e-9);
        assert_relative_eq!(fer[10], -p * 2.0 / 9.0, epsilon = 1e-9);

        // Axial load at midspan splits evenly
        let axial = member_fixed_end_forces([120.0, 0.0, 0.0], Some(1.5), l);
        assert_relative_eq!(axial[0], -60.0, epsilon = 1e-12);
        assert_relative_eq!(axial[6], -60.0, epsilon = 1e-12);
    }
}
