use std::collections::VecDeque;

use crate::config::LayoutConfig;
use crate::error::LayoutError;

use super::generation::Generations;
use super::graph::FamilyGraph;
use super::solver::{Placement, PositionSolver};

/// Native solver: bottom-up subtree widths, then top-down centering of each
/// child row under its parent.
pub struct TreeSolver;

impl PositionSolver for TreeSolver {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn solve(
        &self,
        graph: &FamilyGraph,
        generations: &Generations,
        config: &LayoutConfig,
    ) -> Result<Placement, LayoutError> {
        let widths = subtree_widths(graph, generations.roots(), config);
        let x = place_nodes(graph, generations, &widths, config);
        Ok(Placement {
            x,
            solver: self.name(),
            needs_overlap_pass: false,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

fn children_span(children: &[usize], widths: &[f32], spacing: f32) -> f32 {
    if children.is_empty() {
        return 0.0;
    }
    let sum: f32 = children.iter().map(|child| widths[*child]).sum();
    sum + spacing * (children.len() - 1) as f32
}

/// Post-order width aggregation from every root. Iterative so deep lineages
/// and parent cycles cannot blow the stack; a child still open on the stack
/// contributes its provisional (box) width.
pub(super) fn subtree_widths(graph: &FamilyGraph, roots: &[usize], config: &LayoutConfig) -> Vec<f32> {
    let count = graph.len();
    let mut widths = vec![config.box_width; count];
    let mut state = vec![Visit::New; count];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for &root in roots {
        if state[root] != Visit::New {
            continue;
        }
        state[root] = Visit::Open;
        stack.push((root, 0));
        while let Some(top) = stack.last_mut() {
            let idx = top.0;
            let children = &graph.node(idx).children;
            if top.1 < children.len() {
                let child = children[top.1];
                top.1 += 1;
                if state[child] == Visit::New {
                    state[child] = Visit::Open;
                    stack.push((child, 0));
                }
                continue;
            }
            stack.pop();
            state[idx] = Visit::Done;
            if !children.is_empty() {
                let span = children_span(children, &widths, config.horizontal_spacing);
                widths[idx] = config.box_width.max(span);
            }
        }
    }
    widths
}

fn place_nodes(
    graph: &FamilyGraph,
    generations: &Generations,
    widths: &[f32],
    config: &LayoutConfig,
) -> Vec<f32> {
    let count = graph.len();
    let half_box = config.box_width / 2.0;
    let spacing = config.horizontal_spacing;
    let mut x = vec![0.0f32; count];
    let mut placed = vec![false; count];
    let mut expanded = vec![false; count];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut cursor = 0.0f32;

    for &root in generations.roots() {
        if expanded[root] {
            continue;
        }
        // The next group starts after this one's subtree width, or after the
        // rightmost box it placed (spouses hang off the right edge).
        let mut next_cursor = cursor;
        if !placed[root] {
            x[root] = cursor + widths[root] / 2.0;
            placed[root] = true;
            next_cursor = cursor + widths[root] + spacing;
        }
        expanded[root] = true;
        queue.push_back(root);

        while let Some(idx) = queue.pop_front() {
            let node = graph.node(idx);
            for &spouse in &node.spouses {
                if placed[spouse] {
                    continue;
                }
                x[spouse] = x[idx] + config.box_width + config.spouse_spacing;
                placed[spouse] = true;
                next_cursor = next_cursor.max(x[spouse] + half_box + spacing);
                if config.expand_spouses && !expanded[spouse] {
                    expanded[spouse] = true;
                    queue.push_back(spouse);
                }
            }

            let total = children_span(&node.children, widths, spacing);
            let mut child_cursor = x[idx] - total / 2.0;
            for &child in &node.children {
                if !placed[child] {
                    x[child] = child_cursor + widths[child] / 2.0;
                    placed[child] = true;
                    next_cursor = next_cursor.max(x[child] + half_box + spacing);
                }
                child_cursor += widths[child] + spacing;
                if !expanded[child] {
                    expanded[child] = true;
                    queue.push_back(child);
                }
            }
        }
        cursor = cursor.max(next_cursor);
    }

    for idx in 0..count {
        if placed[idx] {
            continue;
        }
        x[idx] = cursor + half_box;
        placed[idx] = true;
        cursor += config.box_width + spacing;
    }

    x
}
