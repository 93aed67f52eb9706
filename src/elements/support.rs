//! Support conditions

use serde::{Deserialize, Serialize};

/// Restraints and enforced displacements of a node
///
/// `restraints` follows the DOF order [DX, DY, DZ, RX, RY, RZ]; an enforced
/// value only applies to a restrained DOF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub restraints: [bool; 6],
    #[serde(default)]
    pub enforced: [Option<f64>; 6],
}

impl Support {
    /// Free node
    pub fn new() -> Self {
        Self::default()
    }

    /// All six DOFs held
    pub fn fixed() -> Self {
        Self::with_restraints(true, true, true, true, true, true)
    }

    /// Translations held, rotations free
    pub fn pinned() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Vertical roller (Z translation restrained only)
    pub fn roller_z() -> Self {
        Self::with_restraints(false, false, true, false, false, false)
    }

    /// Explicit restraint flags in DOF order
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            restraints: [dx, dy, dz, rx, ry, rz],
            enforced: [None; 6],
        }
    }

    /// Restrain DOF `dof` (0-5) to a prescribed value
    pub fn with_enforced(mut self, dof: usize, value: f64) -> Self {
        if dof < 6 {
            self.restraints[dof] = true;
            self.enforced[dof] = Some(value);
        }
        self
    }

    pub fn is_restrained(&self, dof: usize) -> bool {
        self.restraints.get(dof).copied().unwrap_or(false)
    }

    /// Prescribed value of a restrained DOF (0 unless enforced)
    pub fn enforced_value(&self, dof: usize) -> f64 {
        self.enforced.get(dof).copied().flatten().unwrap_or(0.0)
    }

    /// Held local DOF indices 0..6
    pub fn restrained_dofs(&self) -> Vec<usize> {
        (0..6).filter(|&i| self.restraints[i]).collect()
    }

    /// True when at least one DOF is held
    pub fn is_supported(&self) -> bool {
        self.restraints.iter().any(|&r| r)
    }

    /// Number of held DOFs
    pub fn num_restrained(&self) -> usize {
        self.restraints.iter().filter(|&&r| r).count()
    }
}
