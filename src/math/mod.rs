//! Mathematical utilities for FEA calculations
//!
//! The dense kernel (`matrix`, `eigen`) is used for global systems; the
//! statically sized aliases below are used for element-level formulas in
//! `member`.

pub mod eigen;
pub mod matrix;
pub mod member;

use nalgebra::{DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3};

pub use eigen::{solve_buckling_eigenvalue, solve_generalized_eigenvalue, EigenSolution};
pub use matrix::{solve_linear_system, Matrix, SINGULAR_TOLERANCE};

/// Dynamically sized vector used for global load/displacement vectors
pub type Vector = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 6x6 matrix for truss stiffness (two nodes, three translations each)
pub type Mat6 = Matrix6<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;
