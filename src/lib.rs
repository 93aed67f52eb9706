//! Frame Solver - 3D finite element analysis of greenhouse and building frames
//!
//! Geometry from a CAD provider (nodes, components made of two-node members,
//! supports, material and section libraries) is turned into a structural
//! model of truss, beam and frame elements and analyzed with:
//! - Linear static analysis
//! - Newton-Raphson nonlinear static analysis (consistent geometric
//!   stiffness or P-Delta, bilinear axial yielding, tension-/compression-only
//!   members)
//! - Modal analysis (frequencies, participation, effective mass)
//! - Linearized buckling
//!
//! Every solve returns a serde-serializable `SolverResults` with nodal
//! displacements and reactions, element forces and von Mises stresses along
//! each member, and utilization against the material strength.
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let geometry = GeometryModel::gable_frame(8.0, 3.0, 4.5);
//! let snow = LoadCase::snow()
//!     .with_distributed_load(DistributedLoad::uniform_downward("R1", 1500.0))
//!     .with_distributed_load(DistributedLoad::uniform_downward("R2", 1500.0));
//!
//! let mut model = StructuralModel::new();
//! model
//!     .create_model_from_geometry(&geometry, &[LoadCase::dead().with_self_weight(), snow], &mut ())
//!     .unwrap();
//!
//! let config = SolverConfiguration::linear();
//! let results = model
//!     .analyze(&LoadCombination::uls_snow(), &config, &mut LogObserver)
//!     .unwrap();
//!
//! let ridge = results.node_displacement("R").unwrap();
//! assert!(ridge.dz < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod events;
pub mod geometry;
pub mod loads;
pub mod math;
pub mod model;
pub mod postprocess;
pub mod results;
pub mod solver;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisType, SolverConfiguration};
    pub use crate::elements::{
        Element, ElementType, Material, MemberReleases, Node, Section, Support,
    };
    pub use crate::error::{ErrorCategory, FEAError, FEAResult};
    pub use crate::events::{
        CancellationToken, EventRecorder, LogObserver, SolverEvent, SolverObserver,
    };
    pub use crate::geometry::{Component, GeometryMember, GeometryModel};
    pub use crate::loads::{
        DistributedLoad, Load, LoadCase, LoadCategory, LoadCombination, LoadDirection, NodeLoad,
        PointLoad,
    };
    pub use crate::model::{GlobalMatrices, StructuralModel};
    pub use crate::results::{ElementResult, NodeDisplacement, SolverResults};
    pub use crate::solver::Solver;
}
