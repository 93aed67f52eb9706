//! Dense matrix kernel
//!
//! `Matrix` wraps an `nalgebra::DMatrix<f64>` and validates shapes on every
//! binary operation, returning `FEAError::DimensionMismatch` where nalgebra
//! would panic.

use std::ops::Index;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::Vector;
use crate::error::{FEAError, FEAResult};

/// Pivot threshold for Gaussian elimination, relative to the largest entry
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Dense, row/column-counted matrix of `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// Zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: DMatrix::zeros(rows, cols),
        }
    }

    /// Square identity matrix
    pub fn identity(size: usize) -> Self {
        Self {
            data: DMatrix::identity(size, size),
        }
    }

    /// Build from row-major data
    pub fn from_row_slice(rows: usize, cols: usize, data: &[f64]) -> FEAResult<Self> {
        if data.len() != rows * cols {
            return Err(FEAError::DimensionMismatch {
                operation: "from_row_slice",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, data),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Entry at (row, col), None when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Accumulate a value into (row, col)
    ///
    /// Panics if the index is out of range; assembly code computes indices
    /// from the DOF map and never leaves the matrix.
    #[inline]
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] += value;
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.data
    }

    /// Matrix product `self * other`
    pub fn multiply(&self, other: &Matrix) -> FEAResult<Matrix> {
        if self.cols() != other.rows() {
            return Err(FEAError::DimensionMismatch {
                operation: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Matrix {
            data: &self.data * &other.data,
        })
    }

    pub fn add(&self, other: &Matrix) -> FEAResult<Matrix> {
        self.check_same_shape("add", other)?;
        Ok(Matrix {
            data: &self.data + &other.data,
        })
    }

    pub fn subtract(&self, other: &Matrix) -> FEAResult<Matrix> {
        self.check_same_shape("subtract", other)?;
        Ok(Matrix {
            data: &self.data - &other.data,
        })
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            data: self.data.transpose(),
        }
    }

    /// Frobenius norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Matrix-vector product
    pub fn mul_vector(&self, v: &Vector) -> FEAResult<Vector> {
        if self.cols() != v.len() {
            return Err(FEAError::DimensionMismatch {
                operation: "mul_vector",
                left: self.shape(),
                right: (v.len(), 1),
            });
        }
        Ok(&self.data * v)
    }

    /// Largest absolute entry (0 for an empty matrix)
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// True when `|a_ij - a_ji| <= tol * max(1, max|a|)` for all entries
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let scale = self.max_abs().max(1.0);
        let n = self.rows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.data[(i, j)] - self.data[(j, i)]).abs() > tol * scale {
                    return false;
                }
            }
        }
        true
    }

    /// Extract the rows/columns listed (in order)
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> FEAResult<Matrix> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.rows()) {
            return Err(FEAError::DimensionMismatch {
                operation: "submatrix",
                left: self.shape(),
                right: (bad, 0),
            });
        }
        if let Some(&bad) = cols.iter().find(|&&c| c >= self.cols()) {
            return Err(FEAError::DimensionMismatch {
                operation: "submatrix",
                left: self.shape(),
                right: (0, bad),
            });
        }
        let mut sub = DMatrix::zeros(rows.len(), cols.len());
        for (i, &r) in rows.iter().enumerate() {
            for (j, &c) in cols.iter().enumerate() {
                sub[(i, j)] = self.data[(r, c)];
            }
        }
        Ok(Matrix { data: sub })
    }

    fn check_same_shape(&self, operation: &'static str, other: &Matrix) -> FEAResult<()> {
        if self.shape() != other.shape() {
            return Err(FEAError::DimensionMismatch {
                operation,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}

impl From<DMatrix<f64>> for Matrix {
    fn from(data: DMatrix<f64>) -> Self {
        Self { data }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting
///
/// Before eliminating each column the row holding the largest absolute value
/// in that column is swapped into the pivot position. A pivot smaller than
/// `SINGULAR_TOLERANCE * max(1, max|A|)` stops the solve with
/// `FEAError::SingularMatrix`.
pub fn solve_linear_system(a: &Matrix, b: &Vector) -> FEAResult<Vector> {
    let n = a.rows();
    if !a.is_square() || b.len() != n {
        return Err(FEAError::DimensionMismatch {
            operation: "solve_linear_system",
            left: a.shape(),
            right: (b.len(), 1),
        });
    }

    let tol = SINGULAR_TOLERANCE * a.max_abs().max(1.0);
    let mut m = a.data.clone();
    let mut x = b.clone();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = m[(col, col)].abs();
        for row in (col + 1)..n {
            let candidate = m[(row, col)].abs();
            if candidate > pivot_abs {
                pivot_row = row;
                pivot_abs = candidate;
            }
        }

        if pivot_abs < tol {
            return Err(FEAError::SingularMatrix { pivot: col });
        }

        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            x.swap_rows(col, pivot_row);
        }

        let pivot = m[(col, col)];
        for row in (col + 1)..n {
            let factor = m[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            m[(row, col)] = 0.0;
            for k in (col + 1)..n {
                let upper = m[(col, k)];
                m[(row, k)] -= factor * upper;
            }
            let rhs = x[col];
            x[row] -= factor * rhs;
        }
    }

    for row in (0..n).rev() {
        let mut sum = x[row];
        for k in (row + 1)..n {
            sum -= m[(row, k)] * x[k];
        }
        x[row] = sum / m[(row, row)];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_and_norm() {
        let z = Matrix::zeros(3, 4);
        assert_eq!(z.shape(), (3, 4));
        assert_eq!(z.norm(), 0.0);

        let m = Matrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 4.0]).unwrap();
        assert_relative_eq!(m.norm(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            a.multiply(&b),
            Err(FEAError::DimensionMismatch { operation: "multiply", .. })
        ));
        assert!(a.add(&Matrix::zeros(3, 2)).is_err());
        assert!(a.subtract(&Matrix::zeros(2, 2)).is_err());
        assert!(a.add(&b).is_ok());
        assert_eq!(a.transpose().shape(), (3, 2));
        assert!(Matrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_multiply() {
        let a = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = a.transpose();
        let c = a.multiply(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_relative_eq!(c[(0, 0)], 14.0);
        assert_relative_eq!(c[(0, 1)], 32.0);
        assert_relative_eq!(c[(1, 1)], 77.0);
        assert!(c.is_symmetric(1e-12));
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // Zero on the leading diagonal: fails without row exchange
        let a = Matrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0]).unwrap();
        let x_true = Vector::from_vec(vec![1.0, -2.0, 3.0]);
        let b = a.mul_vector(&x_true).unwrap();
        let x = solve_linear_system(&a, &b).unwrap();
        for i in 0..3 {
            assert_relative_eq!(x[i], x_true[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_detection() {
        let a = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        let b = Vector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(FEAError::SingularMatrix { pivot: 1 })
        ));
    }

    #[test]
    fn test_submatrix() {
        let a = Matrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        let s = a.submatrix(&[0, 2], &[1, 2]).unwrap();
        assert_eq!(s.shape(), (2, 2));
        assert_relative_eq!(s[(1, 0)], 8.0);
        assert!(a.submatrix(&[3], &[0]).is_err());
    }
}
