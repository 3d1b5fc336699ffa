use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use crate::config::{LayoutConfig, SolverKind};
use crate::error::LayoutError;

use super::generation::Generations;
use super::graph::FamilyGraph;
use super::solver::{Placement, PositionSolver};

/// Layered layout from dagre. Only the x axis is taken from the backend;
/// levels stay authoritative for y.
pub struct DagreSolver;

impl PositionSolver for DagreSolver {
    fn name(&self) -> &'static str {
        SolverKind::Dagre.name()
    }

    fn solve(
        &self,
        graph: &FamilyGraph,
        _generations: &Generations,
        config: &LayoutConfig,
    ) -> Result<Placement, LayoutError> {
        let mut x = run_dagre(graph, config)?;
        align_spouses(graph, &mut x, config);
        Ok(Placement {
            x,
            solver: self.name(),
            needs_overlap_pass: true,
        })
    }
}

fn run_dagre(graph: &FamilyGraph, config: &LayoutConfig) -> Result<Vec<f32>, LayoutError> {
    if graph.is_empty() {
        return Ok(Vec::new());
    }

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some("tb".to_string());
    graph_config.nodesep = Some(config.horizontal_spacing);
    graph_config.ranksep = Some(config.vertical_spacing);
    graph_config.marginx = Some(config.dagre.margin_x);
    graph_config.marginy = Some(config.dagre.margin_y);
    dagre_graph.set_graph(graph_config);

    let keys: Vec<String> = graph.nodes().iter().map(|node| node.id.to_string()).collect();
    for (idx, key) in keys.iter().enumerate() {
        let mut node = DagreNode::default();
        node.width = config.box_width;
        node.height = config.box_height;
        node.order = Some(idx);
        dagre_graph.set_node(key.clone(), Some(node));
    }

    for (idx, node) in graph.nodes().iter().enumerate() {
        for &child in &node.children {
            let edge_label = DagreEdge::default();
            let _ = dagre_graph.set_edge(&keys[idx], &keys[child], Some(edge_label), None);
        }
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut x = Vec::with_capacity(keys.len());
    for key in &keys {
        let Some(dagre_node) = dagre_graph.node(key) else {
            return Err(LayoutError::BackendUnavailable {
                backend: SolverKind::Dagre.name(),
                reason: format!("no coordinates returned for person {key}"),
            });
        };
        if !dagre_node.x.is_finite() {
            return Err(LayoutError::BackendUnavailable {
                backend: SolverKind::Dagre.name(),
                reason: format!("non-finite coordinate for person {key}"),
            });
        }
        x.push(dagre_node.x);
    }
    tracing::debug!(nodes = x.len(), "dagre layout applied");
    Ok(x)
}

/// The backend knows nothing about couples: put each first spouse directly
/// right of the lower-id partner.
fn align_spouses(graph: &FamilyGraph, x: &mut [f32], config: &LayoutConfig) {
    for (idx, node) in graph.nodes().iter().enumerate() {
        let Some(&spouse) = node.spouses.first() else {
            continue;
        };
        if node.id < graph.id(spouse) {
            x[spouse] = x[idx] + config.box_width + config.spouse_spacing;
        }
    }
}
