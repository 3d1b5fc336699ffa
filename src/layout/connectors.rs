use std::collections::HashSet;

use crate::config::{DropAnchor, LayoutConfig};

use super::graph::FamilyGraph;
use super::types::{Point, Segment, SegmentKind};

type SegmentKey = (SegmentKind, [u32; 4]);

fn segment_key(segment: &Segment) -> SegmentKey {
    (
        segment.kind,
        [
            segment.from.x.to_bits(),
            segment.from.y.to_bits(),
            segment.to.x.to_bits(),
            segment.to.y.to_bits(),
        ],
    )
}

struct SegmentSink {
    segments: Vec<Segment>,
    seen: HashSet<SegmentKey>,
}

impl SegmentSink {
    fn push(&mut self, from: Point, to: Point, kind: SegmentKind) {
        let segment = Segment::new(from, to, kind);
        if self.seen.insert(segment_key(&segment)) {
            self.segments.push(segment);
        }
    }
}

/// Derive connector segments from final box centers (one per arena index).
/// Spouse bars come first, then drop/bus/riser groups per parent in id order.
pub fn build_segments(graph: &FamilyGraph, centers: &[Point], config: &LayoutConfig) -> Vec<Segment> {
    let half_w = config.box_width / 2.0;
    let half_h = config.box_height / 2.0;
    let mut sink = SegmentSink {
        segments: Vec::new(),
        seen: HashSet::new(),
    };

    for (idx, node) in graph.nodes().iter().enumerate() {
        for &spouse in &node.spouses {
            if node.id > graph.id(spouse) {
                continue;
            }
            let (left, right) = if centers[spouse].x < centers[idx].x {
                (centers[spouse], centers[idx])
            } else {
                (centers[idx], centers[spouse])
            };
            sink.push(
                Point::new(left.x + half_w, left.y),
                Point::new(right.x - half_w, right.y),
                SegmentKind::Spouse,
            );
        }
    }

    for (idx, node) in graph.nodes().iter().enumerate() {
        if node.children.is_empty() {
            continue;
        }
        let parent = centers[idx];
        let anchor_x = match config.drop_anchor {
            DropAnchor::Parent => parent.x,
            DropAnchor::Couple => match node.spouses.first() {
                Some(&spouse) if centers[spouse].y == parent.y => (parent.x + centers[spouse].x) / 2.0,
                _ => parent.x,
            },
        };
        let top = parent.y + half_h;
        let bus_y = top + config.vertical_spacing / 2.0;
        sink.push(
            Point::new(anchor_x, top),
            Point::new(anchor_x, bus_y),
            SegmentKind::Drop,
        );

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for &child in &node.children {
            min_x = min_x.min(centers[child].x);
            max_x = max_x.max(centers[child].x);
        }
        if config.bus_spans_anchor {
            min_x = min_x.min(anchor_x);
            max_x = max_x.max(anchor_x);
        }
        sink.push(Point::new(min_x, bus_y), Point::new(max_x, bus_y), SegmentKind::Bus);

        for &child in &node.children {
            let center = centers[child];
            sink.push(
                Point::new(center.x, bus_y),
                Point::new(center.x, center.y - half_h),
                SegmentKind::Riser,
            );
        }
    }

    sink.segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyTree, Person, Relationship};

    fn family(rels: Vec<Relationship>, count: u32) -> FamilyGraph {
        let mut tree = FamilyTree::new();
        for id in 1..=count {
            tree.add_person(Person::new(id, format!("P{id}")));
        }
        tree.relationships = rels;
        FamilyGraph::build(&tree, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn spouse_bar_joins_facing_edges_once() {
        let config = LayoutConfig::default();
        let graph = family(vec![Relationship::spouse(2, 1), Relationship::spouse(1, 2)], 2);
        let centers = [Point::new(80.0, 0.0), Point::new(260.0, 0.0)];
        let segments = build_segments(&graph, &centers, &config);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Spouse);
        assert_eq!(segments[0].from, Point::new(160.0, 0.0));
        assert_eq!(segments[0].to, Point::new(180.0, 0.0));
    }

    #[test]
    fn parent_gets_drop_bus_and_risers() {
        let config = LayoutConfig::default();
        let graph = family(
            vec![Relationship::parent_child(1, 2), Relationship::parent_child(1, 3)],
            3,
        );
        let centers = [
            Point::new(185.0, 0.0),
            Point::new(80.0, 150.0),
            Point::new(290.0, 150.0),
        ];
        let segments = build_segments(&graph, &centers, &config);
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SegmentKind::Drop, SegmentKind::Bus, SegmentKind::Riser, SegmentKind::Riser]
        );
        assert_eq!(segments[0].from, Point::new(185.0, 35.0));
        assert_eq!(segments[0].to, Point::new(185.0, 75.0));
        assert_eq!(segments[1].from, Point::new(80.0, 75.0));
        assert_eq!(segments[1].to, Point::new(290.0, 75.0));
        assert_eq!(segments[2].to, Point::new(80.0, 115.0));
        assert_eq!(segments[3].to, Point::new(290.0, 115.0));
    }

    #[test]
    fn couple_sharing_children_emits_one_group() {
        let config = LayoutConfig::default();
        let graph = family(
            vec![
                Relationship::spouse(1, 2),
                Relationship::parent_child(1, 3),
                Relationship::parent_child(2, 3),
            ],
            3,
        );
        let centers = [
            Point::new(80.0, 0.0),
            Point::new(260.0, 0.0),
            Point::new(170.0, 150.0),
        ];
        let segments = build_segments(&graph, &centers, &config);
        let count = |kind| segments.iter().filter(|s| s.kind == kind).count();
        assert_eq!(count(SegmentKind::Spouse), 1);
        assert_eq!(count(SegmentKind::Drop), 1);
        assert_eq!(count(SegmentKind::Bus), 1);
        assert_eq!(count(SegmentKind::Riser), 1);
        let drop = segments.iter().find(|s| s.kind == SegmentKind::Drop).unwrap();
        assert_eq!(drop.from.x, 170.0);
    }

    #[test]
    fn parent_anchor_ignores_spouse() {
        let config = LayoutConfig {
            drop_anchor: DropAnchor::Parent,
            ..LayoutConfig::default()
        };
        let graph = family(vec![Relationship::spouse(1, 2), Relationship::parent_child(1, 3)], 3);
        let centers = [
            Point::new(80.0, 0.0),
            Point::new(260.0, 0.0),
            Point::new(80.0, 150.0),
        ];
        let segments = build_segments(&graph, &centers, &config);
        let drop = segments.iter().find(|s| s.kind == SegmentKind::Drop).unwrap();
        assert_eq!(drop.from.x, 80.0);
    }

    #[test]
    fn bus_spans_children_only_by_default() {
        let graph = family(vec![Relationship::spouse(1, 2), Relationship::parent_child(1, 3)], 3);
        let centers = [
            Point::new(80.0, 0.0),
            Point::new(260.0, 0.0),
            Point::new(80.0, 150.0),
        ];
        let segments = build_segments(&graph, &centers, &LayoutConfig::default());
        let drop = segments.iter().find(|s| s.kind == SegmentKind::Drop).unwrap();
        let bus = segments.iter().find(|s| s.kind == SegmentKind::Bus).unwrap();
        assert_eq!(drop.from.x, 170.0);
        assert_eq!(bus.from, Point::new(80.0, 75.0));
        assert_eq!(bus.to, Point::new(80.0, 75.0));

        let config = LayoutConfig {
            bus_spans_anchor: true,
            ..LayoutConfig::default()
        };
        let segments = build_segments(&graph, &centers, &config);
        let bus = segments.iter().find(|s| s.kind == SegmentKind::Bus).unwrap();
        assert_eq!(bus.from.x, 80.0);
        assert_eq!(bus.to.x, 170.0);
    }
}
