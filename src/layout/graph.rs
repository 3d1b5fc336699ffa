use std::collections::{BTreeMap, HashSet};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::ir::{FamilyTree, PersonId, RelationshipKind};

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: PersonId,
    pub children: Vec<usize>,
    pub spouses: Vec<usize>,
    pub parents: Vec<usize>,
}

impl GraphNode {
    fn new(id: PersonId) -> Self {
        Self {
            id,
            children: Vec::new(),
            spouses: Vec::new(),
            parents: Vec::new(),
        }
    }
}

/// Arena of person nodes, ordered by ascending id. Adjacency lists hold arena
/// indices in first-seen input order.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    nodes: Vec<GraphNode>,
    index: BTreeMap<PersonId, usize>,
    dropped: usize,
}

impl FamilyGraph {
    pub fn build(tree: &FamilyTree, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let mut index: BTreeMap<PersonId, usize> = BTreeMap::new();
        for person in &tree.persons {
            if index.insert(person.id, 0).is_some() {
                return Err(LayoutError::DuplicatePersonId(person.id));
            }
        }
        let mut nodes = Vec::with_capacity(index.len());
        for (slot, (id, idx)) in index.iter_mut().enumerate() {
            *idx = slot;
            nodes.push(GraphNode::new(*id));
        }

        let mut parent_edges: HashSet<(usize, usize)> = HashSet::new();
        let mut spouse_pairs: HashSet<(usize, usize)> = HashSet::new();
        let mut dropped = 0usize;

        for rel in &tree.relationships {
            let (Some(&source), Some(&target)) = (index.get(&rel.source), index.get(&rel.target))
            else {
                dropped += 1;
                continue;
            };
            if source == target {
                dropped += 1;
                continue;
            }
            match rel.kind {
                RelationshipKind::Spouse => {
                    if spouse_pairs.insert((source.min(target), source.max(target))) {
                        nodes[source].spouses.push(target);
                        nodes[target].spouses.push(source);
                    }
                }
                RelationshipKind::ParentChild | RelationshipKind::Adopted => {
                    if parent_edges.insert((source, target)) {
                        nodes[source].children.push(target);
                        nodes[target].parents.push(source);
                    }
                }
                RelationshipKind::Unknown => dropped += 1,
            }
        }

        if config.sort_children_by_birth {
            let mut birth: Vec<&str> = vec![""; nodes.len()];
            for person in &tree.persons {
                if let Some(&idx) = index.get(&person.id) {
                    birth[idx] = person.birth_date.as_deref().unwrap_or("");
                }
            }
            for node in &mut nodes {
                node.children.sort_by(|a, b| birth[*a].cmp(birth[*b]));
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, "skipped relationships with unresolved or invalid endpoints");
        }
        tracing::debug!(
            nodes = nodes.len(),
            parent_edges = parent_edges.len(),
            spouse_pairs = spouse_pairs.len(),
            "family graph built"
        );

        Ok(Self {
            nodes,
            index,
            dropped,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &GraphNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn index_of(&self, id: PersonId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn id(&self, idx: usize) -> PersonId {
        self.nodes[idx].id
    }

    /// Relationships skipped while building.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
