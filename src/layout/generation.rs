use std::collections::VecDeque;

use crate::config::LayoutConfig;

use super::graph::FamilyGraph;

/// Discrete vertical level of every node plus the traversal order that
/// produced it. The horizontal solvers replay the same root order.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    levels: Vec<usize>,
    roots: Vec<usize>,
    trailing: Vec<usize>,
    depth: usize,
}

impl Generations {
    pub fn level(&self, idx: usize) -> usize {
        self.levels[idx]
    }

    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Nodes unreachable from any root, ascending id. They all sit on the
    /// level after the deepest assigned one.
    pub fn trailing(&self) -> &[usize] {
        &self.trailing
    }

    /// Number of distinct levels, trailing bucket included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn buckets(&self) -> Vec<Vec<usize>> {
        let mut buckets = vec![Vec::new(); self.depth];
        for (idx, level) in self.levels.iter().enumerate() {
            buckets[*level].push(idx);
        }
        buckets
    }
}

pub fn assign_generations(graph: &FamilyGraph, config: &LayoutConfig) -> Generations {
    let count = graph.len();
    if count == 0 {
        return Generations::default();
    }

    let mut roots: Vec<usize> = (0..count)
        .filter(|idx| graph.node(*idx).parents.is_empty())
        .collect();
    if roots.is_empty() {
        roots = component_representatives(graph);
        tracing::debug!(components = roots.len(), "no roots, falling back to component representatives");
    }

    let mut levels: Vec<Option<usize>> = vec![None; count];
    let mut expanded = vec![false; count];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &root in &roots {
        if expanded[root] {
            continue;
        }
        // A root already leveled as an earlier root's spouse keeps that level.
        if levels[root].is_none() {
            levels[root] = Some(0);
        }
        expanded[root] = true;
        queue.push_back(root);

        while let Some(idx) = queue.pop_front() {
            let Some(level) = levels[idx] else {
                continue;
            };
            let node = graph.node(idx);
            for &spouse in &node.spouses {
                if levels[spouse].is_none() {
                    levels[spouse] = Some(level);
                    if config.expand_spouses && !expanded[spouse] {
                        expanded[spouse] = true;
                        queue.push_back(spouse);
                    }
                }
            }
            for &child in &node.children {
                if levels[child].is_none() {
                    levels[child] = Some(level + 1);
                }
                if !expanded[child] {
                    expanded[child] = true;
                    queue.push_back(child);
                }
            }
        }
    }

    let deepest = levels.iter().flatten().copied().max();
    let trailing_level = deepest.map(|level| level + 1).unwrap_or(0);
    let trailing: Vec<usize> = (0..count).filter(|idx| levels[*idx].is_none()).collect();
    if !trailing.is_empty() {
        tracing::debug!(
            count = trailing.len(),
            level = trailing_level,
            "unreachable nodes placed in trailing bucket"
        );
    }

    let levels: Vec<usize> = levels
        .into_iter()
        .map(|level| level.unwrap_or(trailing_level))
        .collect();
    let depth = levels.iter().copied().max().map(|max| max + 1).unwrap_or(0);

    Generations {
        levels,
        roots,
        trailing,
        depth,
    }
}

/// Lowest-id node of every weakly connected component, ascending.
fn component_representatives(graph: &FamilyGraph) -> Vec<usize> {
    let count = graph.len();
    let mut seen = vec![false; count];
    let mut reps = Vec::new();
    let mut stack = Vec::new();
    for start in 0..count {
        if seen[start] {
            continue;
        }
        reps.push(start);
        seen[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let node = graph.node(idx);
            let neighbors = node
                .children
                .iter()
                .chain(node.parents.iter())
                .chain(node.spouses.iter());
            for &next in neighbors {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    reps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyTree, Person, PersonId, Relationship};

    fn generations(ids: &[PersonId], rels: Vec<Relationship>, config: &LayoutConfig) -> (FamilyGraph, Generations) {
        let tree = FamilyTree {
            persons: ids.iter().map(|id| Person::new(*id, format!("P{id}"))).collect(),
            relationships: rels,
        };
        let graph = FamilyGraph::build(&tree, config).unwrap();
        let generations = assign_generations(&graph, config);
        (graph, generations)
    }

    fn level_of(graph: &FamilyGraph, generations: &Generations, id: PersonId) -> usize {
        generations.level(graph.index_of(id).unwrap())
    }

    #[test]
    fn chain_levels_follow_parent_edges() {
        let rels = vec![Relationship::parent_child(1, 2), Relationship::parent_child(2, 3)];
        let (graph, gens) = generations(&[1, 2, 3], rels, &LayoutConfig::default());
        assert_eq!(level_of(&graph, &gens, 1), 0);
        assert_eq!(level_of(&graph, &gens, 2), 1);
        assert_eq!(level_of(&graph, &gens, 3), 2);
        assert_eq!(gens.depth(), 3);
        assert!(gens.trailing().is_empty());
    }

    #[test]
    fn spouse_shares_level_and_own_children_are_reached() {
        // 1 and 2 are both roots; the child is only linked through 2.
        let rels = vec![Relationship::spouse(1, 2), Relationship::parent_child(2, 3)];
        let (graph, gens) = generations(&[1, 2, 3], rels, &LayoutConfig::default());
        assert_eq!(level_of(&graph, &gens, 1), 0);
        assert_eq!(level_of(&graph, &gens, 2), 0);
        assert_eq!(level_of(&graph, &gens, 3), 1);
        assert!(gens.trailing().is_empty());
    }

    #[test]
    fn first_write_wins_on_diamonds() {
        let rels = vec![
            Relationship::parent_child(1, 2),
            Relationship::parent_child(2, 4),
            Relationship::parent_child(5, 4),
        ];
        let (graph, gens) = generations(&[1, 2, 4, 5], rels, &LayoutConfig::default());
        assert_eq!(level_of(&graph, &gens, 4), 2);
        assert_eq!(level_of(&graph, &gens, 5), 0);
    }

    #[test]
    fn spouse_leveled_first_still_expands_as_child() {
        let rels = vec![
            Relationship::spouse(1, 2),
            Relationship::parent_child(3, 2),
            Relationship::parent_child(2, 4),
        ];
        let (graph, gens) = generations(&[1, 2, 3, 4], rels, &LayoutConfig::default());
        assert_eq!(level_of(&graph, &gens, 2), 0);
        assert_eq!(level_of(&graph, &gens, 4), 1);
    }

    #[test]
    fn parent_cycle_falls_back_to_component_representative() {
        let rels = vec![Relationship::parent_child(1, 2), Relationship::parent_child(2, 1)];
        let (graph, gens) = generations(&[1, 2], rels, &LayoutConfig::default());
        assert_eq!(gens.roots(), &[0]);
        assert_eq!(level_of(&graph, &gens, 1), 0);
        assert_eq!(level_of(&graph, &gens, 2), 1);
    }

    #[test]
    fn unreachable_cycle_goes_to_trailing_bucket() {
        let rels = vec![Relationship::parent_child(2, 3), Relationship::parent_child(3, 2)];
        let (graph, gens) = generations(&[1, 2, 3], rels, &LayoutConfig::default());
        assert_eq!(gens.trailing(), &[1, 2]);
        assert_eq!(level_of(&graph, &gens, 1), 0);
        assert_eq!(level_of(&graph, &gens, 2), 1);
        assert_eq!(level_of(&graph, &gens, 3), 1);
        assert_eq!(gens.buckets(), vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn expand_spouses_reaches_children_of_leveled_spouse() {
        // 2 and 3 form a parent cycle only reachable through 1's spouse link.
        let rels = vec![
            Relationship::spouse(1, 2),
            Relationship::parent_child(2, 3),
            Relationship::parent_child(3, 2),
        ];
        let (_, gens) = generations(&[1, 2, 3], rels.clone(), &LayoutConfig::default());
        assert_eq!(gens.trailing(), &[2]);

        let config = LayoutConfig {
            expand_spouses: true,
            ..LayoutConfig::default()
        };
        let (graph, gens) = generations(&[1, 2, 3], rels, &config);
        assert!(gens.trailing().is_empty());
        assert_eq!(level_of(&graph, &gens, 3), 1);
    }

    #[test]
    fn empty_graph_has_no_levels() {
        let (_, gens) = generations(&[], vec![], &LayoutConfig::default());
        assert_eq!(gens.depth(), 0);
        assert!(gens.roots().is_empty());
        assert!(gens.buckets().is_empty());
    }
}
