mod connectors;
#[cfg(feature = "dagre")]
mod dagre;
mod generation;
mod graph;
mod overlap;
mod solver;
mod tree;
pub(crate) mod types;

pub use connectors::build_segments;
#[cfg(feature = "dagre")]
pub use dagre::DagreSolver;
pub use generation::{Generations, assign_generations};
pub use graph::{FamilyGraph, GraphNode};
pub use overlap::resolve_overlaps;
pub use solver::{FallbackSolver, Placement, PositionSolver, solver_for};
pub use tree::TreeSolver;
pub use types::*;

use std::collections::BTreeMap;

use crate::config::{LayoutConfig, OverlapPass};
use crate::error::LayoutError;
use crate::ir::FamilyTree;

/// Full pipeline: graph → generations → x solver → overlap pass → connectors.
#[tracing::instrument(skip_all, fields(persons = tree.persons.len(), solver = config.solver.name()))]
pub fn compute_layout(tree: &FamilyTree, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    let solver = solver_for(config);
    compute_layout_with(tree, config, solver.as_ref())
}

/// Same as [`compute_layout`] with an explicit position solver.
pub fn compute_layout_with(
    tree: &FamilyTree,
    config: &LayoutConfig,
    solver: &dyn PositionSolver,
) -> Result<Layout, LayoutError> {
    let graph = FamilyGraph::build(tree, config)?;
    let mut layout = Layout {
        box_width: config.box_width,
        box_height: config.box_height,
        ..Layout::default()
    };
    if graph.is_empty() {
        return Ok(layout);
    }

    let generations = assign_generations(&graph, config);
    tracing::debug!(
        roots = generations.roots().len(),
        depth = generations.depth(),
        trailing = generations.trailing().len(),
        "generations assigned"
    );

    let placement = solver.solve(&graph, &generations, config)?;
    let ys: Vec<f32> = generations
        .levels()
        .iter()
        .map(|level| config.level_y(*level))
        .collect();
    let mut xs = placement.x;

    let run_overlap_pass = match config.overlap_pass {
        OverlapPass::Auto => placement.needs_overlap_pass,
        OverlapPass::Always => true,
        OverlapPass::Never => false,
    };
    if run_overlap_pass {
        let shifts = resolve_overlaps(&graph, &ys, &mut xs, config);
        tracing::debug!(shifts, solver = placement.solver, "overlap pass done");
    }

    let centers: Vec<Point> = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| Point::new(*x, *y))
        .collect();
    let segments = build_segments(&graph, &centers, config);

    let mut positions = BTreeMap::new();
    let mut levels = BTreeMap::new();
    for (idx, center) in centers.iter().enumerate() {
        positions.insert(graph.id(idx), *center);
        levels.insert(graph.id(idx), generations.level(idx));
    }

    layout.bounds = Some(compute_bounds(&centers, &segments, config));
    layout.positions = positions;
    layout.levels = levels;
    layout.segments = segments;
    Ok(layout)
}

fn compute_bounds(centers: &[Point], segments: &[Segment], config: &LayoutConfig) -> Bounds {
    let half_w = config.box_width / 2.0;
    let half_h = config.box_height / 2.0;
    let mut bounds = Bounds {
        min_x: f32::MAX,
        min_y: f32::MAX,
        max_x: f32::MIN,
        max_y: f32::MIN,
    };
    for center in centers {
        bounds.min_x = bounds.min_x.min(center.x - half_w);
        bounds.max_x = bounds.max_x.max(center.x + half_w);
        bounds.min_y = bounds.min_y.min(center.y - half_h);
        bounds.max_y = bounds.max_y.max(center.y + half_h);
    }
    for segment in segments {
        for point in [segment.from, segment.to] {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_y = bounds.max_y.max(point.y);
        }
    }
    bounds
}
