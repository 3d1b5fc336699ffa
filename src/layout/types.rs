use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::PersonId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Center of a person's box.
pub type Position = Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Horizontal bar joining a couple.
    Spouse,
    /// Vertical line from a parent (or couple) down to the bus.
    Drop,
    /// Horizontal line spanning the children of one parent.
    Bus,
    /// Vertical line from the bus up to a child.
    Riser,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(from: Point, to: Point, kind: SegmentKind) -> Self {
        Self { from, to, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub positions: BTreeMap<PersonId, Position>,
    pub levels: BTreeMap<PersonId, usize>,
    pub segments: Vec<Segment>,
    /// Box extents including the connectors; `None` for an empty tree.
    pub bounds: Option<Bounds>,
    pub box_width: f32,
    pub box_height: f32,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn segments_of(&self, kind: SegmentKind) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(move |segment| segment.kind == kind)
    }
}
