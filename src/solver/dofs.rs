//! DOF partitioning
//!
//! Every global DOF is one of: constrained (restrained by a support),
//! inactive (no element stiffens it and no load acts on it, e.g. rotations of
//! a node joined only by trusses) or free. Inactive DOFs are held at zero and
//! never produce reactions.

use crate::error::{FEAError, FEAResult};
use crate::math::{Matrix, Vector};
use crate::model::StructuralModel;

/// Stiffness rows with every entry below this fraction of max|K| count as empty
const EMPTY_ROW_TOLERANCE: f64 = 1e-14;

#[derive(Debug, Clone)]
pub struct DofPartition {
    pub free: Vec<usize>,
    pub constrained: Vec<usize>,
    pub inactive: Vec<usize>,
    /// Full-length vector holding enforced values at constrained DOFs
    pub prescribed: Vector,
}

impl DofPartition {
    /// Partition against a stiffness matrix and (optional) load vector
    pub fn new(model: &StructuralModel, k: &Matrix, load: Option<&Vector>) -> FEAResult<Self> {
        let n = model.dof_count();
        if k.shape() != (n, n) {
            return Err(FEAError::DimensionMismatch {
                operation: "partition",
                left: k.shape(),
                right: (n, n),
            });
        }
        if let Some(f) = load {
            if f.len() != n {
                return Err(FEAError::DimensionMismatch {
                    operation: "partition",
                    left: (n, 1),
                    right: (f.len(), 1),
                });
            }
        }

        let threshold = EMPTY_ROW_TOLERANCE * k.max_abs();
        let mut partition = Self {
            free: Vec::new(),
            constrained: Vec::new(),
            inactive: Vec::new(),
            prescribed: Vector::zeros(n),
        };

        for (index, node) in model.nodes().iter().enumerate() {
            for local in 0..6 {
                let dof = 6 * index + local;
                if node.support.is_restrained(local) {
                    partition.constrained.push(dof);
                    partition.prescribed[dof] = node.support.enforced_value(local);
                    continue;
                }
                let empty_row = (0..n).all(|j| k[(dof, j)].abs() <= threshold);
                let unloaded = load.map_or(true, |f| f[dof] == 0.0);
                if empty_row && unloaded {
                    partition.inactive.push(dof);
                } else {
                    partition.free.push(dof);
                }
            }
        }
        Ok(partition)
    }

    /// Values of `v` at the free DOFs
    pub fn gather_free(&self, v: &Vector) -> Vector {
        Vector::from_iterator(self.free.len(), self.free.iter().map(|&i| v[i]))
    }

    /// Add a free-DOF vector into a full-length vector
    pub fn scatter_add_free(&self, target: &mut Vector, values: &Vector) {
        for (a, &i) in self.free.iter().enumerate() {
            target[i] += values[a];
        }
    }

    /// Expand a free-DOF vector into a full-length one (zeros elsewhere)
    pub fn expand_free(&self, values: &Vector) -> Vector {
        let mut full = Vector::zeros(self.prescribed.len());
        self.scatter_add_free(&mut full, values);
        full
    }

    pub fn is_constrained(&self, dof: usize) -> bool {
        self.constrained.binary_search(&dof).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SolverConfiguration;
    use crate::elements::{Element, ElementType, Material, Node, Section, Support};

    #[test]
    fn test_truss_node_rotations_are_inactive() {
        let mut model = StructuralModel::new();
        model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
        model.add_node(Node::new("B", 2.0, 0.0, 0.0)).unwrap();
        model
            .add_element(Element::new("T", ElementType::Truss, 0, 1, Material::steel(), Section::circular(0.02)))
            .unwrap();
        model.add_support("A", Support::pinned()).unwrap();

        let k = model.assemble_stiffness(&SolverConfiguration::default()).unwrap();
        let mut f = Vector::zeros(12);
        f[6] = 100.0;
        let p = DofPartition::new(&model, &k, Some(&f)).unwrap();

        assert_eq!(p.constrained, vec![0, 1, 2]);
        // Only the axial DOF of B stays free
        assert_eq!(p.free, vec![6]);
        assert_eq!(p.inactive.len(), 8);
        assert!(p.is_constrained(1));
    }

    #[test]
    fn test_loaded_empty_row_stays_free() {
        let mut model = StructuralModel::new();
        model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
        let k = Matrix::zeros(6, 6);
        let mut f = Vector::zeros(6);
        f[2] = -1.0;
        let p = DofPartition::new(&model, &k, Some(&f)).unwrap();
        assert_eq!(p.free, vec![2]);
    }
}
