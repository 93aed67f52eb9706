//! Generalized symmetric eigenvalue extraction
//!
//! Both routines reduce `A φ = λ B φ` to a standard symmetric problem through
//! a Cholesky factor `L Lᵀ` of the positive definite matrix, eigen-decompose
//! `L⁻¹ X L⁻ᵀ`, then map eigenvectors back with `φ = L⁻ᵀ ψ`.

use nalgebra::DMatrix;

use super::{Matrix, Vector};
use crate::error::{FEAError, FEAResult};

/// Eigenpairs sorted by ascending eigenvalue
#[derive(Debug, Clone)]
pub struct EigenSolution {
    pub eigenvalues: Vec<f64>,
    /// L2-normalized eigenvectors, one per eigenvalue
    pub eigenvectors: Vec<Vector>,
}

impl EigenSolution {
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }
}

/// Solve `K φ = λ M φ` for symmetric K and symmetric positive definite M
pub fn solve_generalized_eigenvalue(k: &Matrix, m: &Matrix) -> FEAResult<EigenSolution> {
    check_pair("solve_generalized_eigenvalue", k, m)?;

    let l = m
        .as_dmatrix()
        .clone()
        .cholesky()
        .ok_or_else(|| FEAError::EigenFailure("mass matrix is not positive definite".into()))?
        .l();

    let reduced = reduce_to_standard(&l, k.as_dmatrix())?;
    let eigen = reduced.symmetric_eigen();

    let mut pairs = Vec::with_capacity(eigen.eigenvalues.len());
    for (i, &lambda) in eigen.eigenvalues.iter().enumerate() {
        let phi = back_transform(&l, &eigen.eigenvectors.column(i).into_owned())?;
        pairs.push((lambda, phi));
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(unzip(pairs))
}

/// Solve `K φ = λ G φ` for symmetric positive definite K and symmetric,
/// possibly indefinite G (linearized buckling)
///
/// Decomposes `L⁻¹ G L⁻ᵀ ψ = μ ψ` with `μ = 1/λ`; only pairs with `μ > 0`
/// have a finite positive load factor and are returned, ascending by `λ`.
pub fn solve_buckling_eigenvalue(k: &Matrix, g: &Matrix) -> FEAResult<EigenSolution> {
    check_pair("solve_buckling_eigenvalue", k, g)?;

    let l = k
        .as_dmatrix()
        .clone()
        .cholesky()
        .ok_or_else(|| FEAError::EigenFailure("stiffness matrix is not positive definite".into()))?
        .l();

    let reduced = reduce_to_standard(&l, g.as_dmatrix())?;
    let eigen = reduced.symmetric_eigen();

    let mu_max = eigen.eigenvalues.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = 1e-12 * mu_max;

    let mut pairs = Vec::new();
    for (i, &mu) in eigen.eigenvalues.iter().enumerate() {
        if mu > cutoff && mu > 0.0 {
            let phi = back_transform(&l, &eigen.eigenvectors.column(i).into_owned())?;
            pairs.push((1.0 / mu, phi));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(unzip(pairs))
}

fn check_pair(operation: &'static str, a: &Matrix, b: &Matrix) -> FEAResult<()> {
    if !a.is_square() || a.shape() != b.shape() {
        return Err(FEAError::DimensionMismatch {
            operation,
            left: a.shape(),
            right: b.shape(),
        });
    }
    if a.rows() == 0 {
        return Err(FEAError::EigenFailure("empty system".into()));
    }
    Ok(())
}

/// `L⁻¹ X L⁻ᵀ`, symmetrized to remove round-off
fn reduce_to_standard(l: &DMatrix<f64>, x: &DMatrix<f64>) -> FEAResult<DMatrix<f64>> {
    let left = l
        .solve_lower_triangular(x)
        .ok_or_else(|| FEAError::EigenFailure("triangular solve failed".into()))?;
    let both = l
        .solve_lower_triangular(&left.transpose())
        .ok_or_else(|| FEAError::EigenFailure("triangular solve failed".into()))?;
    Ok((&both + both.transpose()) * 0.5)
}

/// `φ = L⁻ᵀ ψ`, L2-normalized with its largest component positive
fn back_transform(l: &DMatrix<f64>, psi: &Vector) -> FEAResult<Vector> {
    let mut phi = l
        .tr_solve_lower_triangular(psi)
        .ok_or_else(|| FEAError::EigenFailure("back transformation failed".into()))?;

    let norm = phi.norm();
    if norm > 0.0 {
        phi /= norm;
    }
    let dominant = phi.iter().fold(0.0_f64, |acc, &v| if v.abs() > acc.abs() { v } else { acc });
    if dominant < 0.0 {
        phi.neg_mut();
    }
    Ok(phi)
}

fn unzip(pairs: Vec<(f64, Vector)>) -> EigenSolution {
    let (eigenvalues, eigenvectors): (Vec<f64>, Vec<Vector>) = pairs.into_iter().unzip();
    EigenSolution {
        eigenvalues,
        eigenvectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_mass_spring_chain() {
        // k = [[2, -1], [-1, 1]], m = I -> λ = (3 ∓ √5) / 2
        let k = Matrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 1.0]).unwrap();
        let m = Matrix::identity(2);
        let sol = solve_generalized_eigenvalue(&k, &m).unwrap();

        assert_eq!(sol.len(), 2);
        assert_relative_eq!(sol.eigenvalues[0], (3.0 - 5.0_f64.sqrt()) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(sol.eigenvalues[1], (3.0 + 5.0_f64.sqrt()) / 2.0, epsilon = 1e-12);
        for phi in &sol.eigenvectors {
            assert_relative_eq!(phi.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_generalized_with_mass() {
        // Diagonal system: λ_i = k_i / m_i
        let k = Matrix::from_row_slice(3, 3, &[8.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 10.0]).unwrap();
        let m = Matrix::from_row_slice(3, 3, &[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let sol = solve_generalized_eigenvalue(&k, &m).unwrap();
        assert_relative_eq!(sol.eigenvalues[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sol.eigenvalues[1], 4.0, epsilon = 1e-12);
        assert_relative_eq!(sol.eigenvalues[2], 10.0, epsilon = 1e-12);
        // Mode 1 lives on DOF 1 only
        assert_relative_eq!(sol.eigenvectors[0][1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_indefinite_mass_rejected() {
        let k = Matrix::identity(2);
        let m = Matrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]).unwrap();
        assert!(matches!(
            solve_generalized_eigenvalue(&k, &m),
            Err(FEAError::EigenFailure(_))
        ));
    }

    #[test]
    fn test_buckling_skips_non_positive_factors() {
        // K φ = λ G φ with G = diag(2, -1, 0.5): λ = 2, 8 (the negative one is dropped)
        let k = Matrix::from_row_slice(3, 3, &[4.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 4.0]).unwrap();
        let g = Matrix::from_row_slice(3, 3, &[2.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.5]).unwrap();
        let sol = solve_buckling_eigenvalue(&k, &g).unwrap();
        assert_eq!(sol.len(), 2);
        assert_relative_eq!(sol.eigenvalues[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sol.eigenvalues[1], 8.0, epsilon = 1e-12);
    }
}
