//! Retention decisions: which versions of each artifact go, which stay.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::KeepPolicy;
use crate::coordinate::{count_items, CoordinateGroups, VersionedItem};

/// Outcome of partitioning every coordinate group.
///
/// For every coordinate of the input, `to_delete[c]` and `to_keep[c]` are
/// disjoint and together hold exactly the input items of `c`.
#[derive(Debug, Clone, Default)]
pub struct RetentionResult {
    /// Oldest items beyond the retention count, ascending by version
    pub to_delete: CoordinateGroups,
    /// Newest items ascending by version, followed by unparseable ones
    pub to_keep: CoordinateGroups,
    /// Items in `to_keep` only because their version could not be parsed
    pub unparseable: CoordinateGroups,
}

impl RetentionResult {
    pub fn total_to_delete(&self) -> usize {
        count_items(&self.to_delete)
    }

    pub fn total_to_keep(&self) -> usize {
        count_items(&self.to_keep)
    }

    pub fn total_unparseable(&self) -> usize {
        count_items(&self.unparseable)
    }
}

/// Totals of one partitioning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionCounts {
    pub coordinates: usize,
    pub to_delete: usize,
    pub to_keep: usize,
    pub unparseable: usize,
}

impl From<&RetentionResult> for RetentionCounts {
    fn from(result: &RetentionResult) -> Self {
        RetentionCounts {
            coordinates: result.to_keep.len(),
            to_delete: result.total_to_delete(),
            to_keep: result.total_to_keep(),
            unparseable: result.total_unparseable(),
        }
    }
}

fn by_version(a: &VersionedItem, b: &VersionedItem) -> Ordering {
    match (a.parsed(), b.parsed()) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Split each coordinate group into delete and keep sets.
///
/// Parseable items are sorted oldest first with a stable sort, so equal
/// versions keep their retrieval order, and the oldest
/// `keep.delete_count(n)` of them are marked for deletion. Items whose
/// version did not parse are always kept and listed in `unparseable`.
///
/// Pure: the same groups and policy always yield the same result.
pub fn partition(groups: &CoordinateGroups, keep: KeepPolicy) -> RetentionResult {
    let mut result = RetentionResult::default();

    for (coordinate, items) in groups {
        let (mut ordered, unparseable): (Vec<VersionedItem>, Vec<VersionedItem>) = items
            .iter()
            .cloned()
            .partition(|item| item.parsed().is_some());

        ordered.sort_by(by_version);
        let split_index = keep.delete_count(ordered.len());
        let mut kept = ordered.split_off(split_index);
        kept.extend(unparseable.iter().cloned());

        result.to_delete.insert(coordinate.clone(), ordered);
        result.to_keep.insert(coordinate.clone(), kept);
        if !unparseable.is_empty() {
            result.unparseable.insert(coordinate.clone(), unparseable);
        }
    }

    result
}
