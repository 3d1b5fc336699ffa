use crate::config::{LayoutConfig, SolverKind};
use crate::error::LayoutError;

use super::generation::Generations;
use super::graph::FamilyGraph;
use super::tree::TreeSolver;

/// Horizontal placement produced by a solver: one box-center x per arena index.
#[derive(Debug, Clone)]
pub struct Placement {
    pub x: Vec<f32>,
    pub solver: &'static str,
    /// Whether same-level collisions are expected and the overlap pass
    /// should run under `OverlapPass::Auto`.
    pub needs_overlap_pass: bool,
}

pub trait PositionSolver {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        graph: &FamilyGraph,
        generations: &Generations,
        config: &LayoutConfig,
    ) -> Result<Placement, LayoutError>;
}

/// Runs `fallback` only when `primary` reports its backend unavailable.
pub struct FallbackSolver {
    primary: Box<dyn PositionSolver>,
    fallback: Box<dyn PositionSolver>,
}

impl FallbackSolver {
    pub fn new(primary: Box<dyn PositionSolver>, fallback: Box<dyn PositionSolver>) -> Self {
        Self { primary, fallback }
    }
}

impl PositionSolver for FallbackSolver {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn solve(
        &self,
        graph: &FamilyGraph,
        generations: &Generations,
        config: &LayoutConfig,
    ) -> Result<Placement, LayoutError> {
        match self.primary.solve(graph, generations, config) {
            Err(err @ LayoutError::BackendUnavailable { .. }) => {
                tracing::warn!(
                    error = %err,
                    fallback = self.fallback.name(),
                    "position solver failed, using fallback"
                );
                self.fallback.solve(graph, generations, config)
            }
            other => other,
        }
    }
}

#[cfg(not(feature = "dagre"))]
struct MissingBackend {
    name: &'static str,
}

#[cfg(not(feature = "dagre"))]
impl PositionSolver for MissingBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn solve(
        &self,
        _graph: &FamilyGraph,
        _generations: &Generations,
        _config: &LayoutConfig,
    ) -> Result<Placement, LayoutError> {
        Err(LayoutError::BackendUnavailable {
            backend: self.name,
            reason: "built without the `dagre` feature".to_string(),
        })
    }
}

fn solver_of_kind(kind: SolverKind) -> Box<dyn PositionSolver> {
    match kind {
        SolverKind::Tree => Box::new(TreeSolver),
        #[cfg(feature = "dagre")]
        SolverKind::Dagre => Box::new(super::dagre::DagreSolver),
        #[cfg(not(feature = "dagre"))]
        SolverKind::Dagre => Box::new(MissingBackend {
            name: SolverKind::Dagre.name(),
        }),
    }
}

pub fn solver_for(config: &LayoutConfig) -> Box<dyn PositionSolver> {
    let primary = solver_of_kind(config.solver);
    match config.fallback_solver {
        Some(kind) if kind != config.solver => {
            Box::new(FallbackSolver::new(primary, solver_of_kind(kind)))
        }
        _ => primary,
    }
}
