use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::LayoutConfig;

use super::graph::FamilyGraph;

/// Single left-to-right sweep per row of equal (rounded) y. Each too-close
/// adjacent pair is pushed apart symmetrically: everything at or left of the
/// left member moves left by half the shortfall, everything at or right of
/// the right member moves right by the other half. Returns the number of
/// pairs that were separated.
pub fn resolve_overlaps(graph: &FamilyGraph, ys: &[f32], xs: &mut [f32], config: &LayoutConfig) -> usize {
    let min_gap = config.min_center_gap();
    let mut rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, y) in ys.iter().enumerate() {
        rows.entry(y.round() as i64).or_default().push(idx);
    }

    let mut shifts = 0usize;
    for row in rows.values_mut() {
        row.sort_by(|a, b| {
            xs[*a]
                .partial_cmp(&xs[*b])
                .unwrap_or(Ordering::Equal)
                .then_with(|| graph.id(*a).cmp(&graph.id(*b)))
        });
        for i in 0..row.len().saturating_sub(1) {
            let gap = xs[row[i + 1]] - xs[row[i]];
            if gap >= min_gap {
                continue;
            }
            let half = (min_gap - gap) / 2.0;
            for &idx in &row[..=i] {
                xs[idx] -= half;
            }
            for &idx in &row[i + 1..] {
                xs[idx] += half;
            }
            shifts += 1;
        }
    }
    shifts
}
