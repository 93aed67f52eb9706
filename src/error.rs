//! Error types for the frame solver

use thiserror::Error;

use crate::results::SolverResults;

/// Broad class of a failure, used by callers to decide what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad configuration or unsupported feature; fails before any matrix work
    Configuration,
    /// Inconsistent model data (missing nodes, load cases, ...)
    Model,
    /// Singular or otherwise unsolvable numerics
    Numerical,
    /// Iterative solve did not reach the tolerance
    Convergence,
    /// Reading configuration from disk failed
    Io,
}

/// Main error type for solver operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Unsupported element type '{0}' - only truss, beam and frame elements are implemented")]
    UnsupportedElement(String),

    #[error("Unsupported analysis type '{0}'")]
    UnsupportedAnalysis(String),

    #[error("Invalid solver configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in model")]
    ElementNotFound(String),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Load case '{0}' not found in model")]
    LoadCaseNotFound(String),

    #[error("Duplicate id '{0}' already exists")]
    DuplicateId(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular stiffness matrix at pivot {pivot} - model may be unstable or have insufficient supports")]
    SingularMatrix { pivot: usize },

    #[error("Dimension mismatch in {operation}: {left:?} vs {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Eigenvalue extraction failed: {0}")]
    EigenFailure(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Convergence failed after {iterations} iterations (residual = {residual:.3e})")]
    ConvergenceFailed {
        iterations: usize,
        residual: f64,
        /// Partial results of the divergent run, for inspection only
        results: Box<SolverResults>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FEAError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            FEAError::UnsupportedElement(_)
            | FEAError::UnsupportedAnalysis(_)
            | FEAError::InvalidConfiguration(_)
            | FEAError::Serialization(_) => ErrorCategory::Configuration,
            FEAError::NodeNotFound(_)
            | FEAError::ElementNotFound(_)
            | FEAError::MaterialNotFound(_)
            | FEAError::SectionNotFound(_)
            | FEAError::LoadCaseNotFound(_)
            | FEAError::DuplicateId(_)
            | FEAError::InvalidGeometry(_)
            | FEAError::InvalidInput(_) => ErrorCategory::Model,
            FEAError::SingularMatrix { .. }
            | FEAError::DimensionMismatch { .. }
            | FEAError::EigenFailure(_)
            | FEAError::AnalysisFailed(_) => ErrorCategory::Numerical,
            FEAError::ConvergenceFailed { .. } => ErrorCategory::Convergence,
            FEAError::Io(_) => ErrorCategory::Io,
        }
    }

    /// Partial results attached to a convergence failure
    pub fn partial_results(&self) -> Option<&SolverResults> {
        match self {
            FEAError::ConvergenceFailed { results, .. } => Some(results),
            _ => None,
        }
    }
}

/// Result type for solver operations
pub type FEAResult<T> = Result<T, FEAError>;
