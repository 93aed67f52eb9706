//! Solver lifecycle events, observers and cooperative cancellation
//!
//! Events are plain values handed to a `SolverObserver` passed into each call.
//! Delivery is synchronous and fire-and-forget: an observer cannot fail or
//! influence the solve.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;

use crate::results::ResultSummary;

/// An event emitted by the model assembler or a solver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SolverEvent {
    /// Model built from geometry
    ModelCreated {
        nodes: usize,
        elements: usize,
        load_cases: usize,
    },

    /// Global stiffness and mass assembled
    MatricesAssembled { dofs: usize },

    /// Newton-Raphson correction applied
    IterationProgress {
        iteration: usize,
        /// ‖R‖ / ‖F‖ after the correction
        residual_norm: f64,
        converged: bool,
    },

    /// A solve finished (converged, cancelled or eigen extraction done)
    AnalysisComplete {
        combination: String,
        summary: ResultSummary,
        /// Wall-clock time of the solve
        elapsed: Duration,
    },

    /// A solve failed; the error is also returned to the caller
    AnalysisError { combination: String, error: String },
}

/// Consumer of solver events
///
/// Implemented for `()` (discard), for closures taking `&SolverEvent`, and by
/// `LogObserver` and `EventRecorder`.
pub trait SolverObserver {
    fn on_event(&mut self, event: &SolverEvent);
}

impl SolverObserver for () {
    fn on_event(&mut self, _event: &SolverEvent) {}
}

impl<F> SolverObserver for F
where
    F: FnMut(&SolverEvent),
{
    fn on_event(&mut self, event: &SolverEvent) {
        (*self)(event)
    }
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SolverObserver for LogObserver {
    fn on_event(&mut self, event: &SolverEvent) {
        match event {
            SolverEvent::ModelCreated {
                nodes,
                elements,
                load_cases,
            } => info!(
                "model created: {} nodes, {} elements, {} load cases",
                nodes, elements, load_cases
            ),
            SolverEvent::MatricesAssembled { dofs } => debug!("assembled {} DOFs", dofs),
            SolverEvent::IterationProgress {
                iteration,
                residual_norm,
                converged,
            } => debug!(
                "iteration {}: residual {:.3e}{}",
                iteration,
                residual_norm,
                if *converged { " (converged)" } else { "" }
            ),
            SolverEvent::AnalysisComplete {
                combination,
                summary,
                elapsed,
            } => info!(
                "{} '{}' done in {:.1} ms: converged={}, iterations={}, max displacement {:.4e}",
                summary.analysis_type.name(),
                combination,
                elapsed.as_secs_f64() * 1e3,
                summary.converged,
                summary.iterations,
                summary.max_displacement
            ),
            SolverEvent::AnalysisError { combination, error } => {
                warn!("analysis of '{}' failed: {}", combination, error)
            }
        }
    }
}

/// Collects events, for tests and inspection
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    pub events: Vec<SolverEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `IterationProgress` events seen
    pub fn iterations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SolverEvent::IterationProgress { .. }))
            .count()
    }
}

impl SolverObserver for EventRecorder {
    fn on_event(&mut self, event: &SolverEvent) {
        self.events.push(event.clone());
    }
}

/// Shared flag checked by iterative solvers between iterations
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut observer = |_: &SolverEvent| seen += 1;
            observer.on_event(&SolverEvent::MatricesAssembled { dofs: 12 });
            observer.on_event(&SolverEvent::MatricesAssembled { dofs: 12 });
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_recorder_counts_iterations() {
        let mut recorder = EventRecorder::new();
        recorder.on_event(&SolverEvent::IterationProgress {
            iteration: 1,
            residual_norm: 0.1,
            converged: false,
        });
        recorder.on_event(&SolverEvent::MatricesAssembled { dofs: 6 });
        assert_eq!(recorder.events.len(), 2);
        assert_eq!(recorder.iterations(), 1);
    }

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
