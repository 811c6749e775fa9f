//! Grouping of repository components by Maven coordinate.

use std::collections::BTreeMap;
use std::fmt;

use nexus_rm::RepositoryItem;
use tracing::{debug, error};

use crate::error::VersionError;
use crate::version::MavenVersion;

/// `(group, artifact name)` pair identifying a family of versions.
///
/// Ordered field by field, so `("a.b", "c")` and `("a", "b.c")` stay two
/// different coordinates even though both display as `a.b.c`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
}

impl Coordinate {
    pub fn new(group: &str, name: &str) -> Self {
        Coordinate {
            group: group.to_string(),
            name: name.to_string(),
        }
    }

    pub fn of(item: &RepositoryItem) -> Self {
        Coordinate::new(&item.group, &item.name)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// A repository component together with its parsed version.
#[derive(Debug, Clone)]
pub struct VersionedItem {
    pub item: RepositoryItem,
    /// Parse result; an `Err` item is never ordered and never deleted.
    pub version: Result<MavenVersion, VersionError>,
}

impl VersionedItem {
    /// Parse the item's version, logging (not swallowing) failures.
    pub fn new(item: RepositoryItem) -> Self {
        let version = MavenVersion::parse(&item.version);
        if let Err(err) = &version {
            error!(
                artifact = %Coordinate::of(&item),
                version = %item.version,
                id = %item.id,
                error = %err,
                "failed to parse version"
            );
        }
        VersionedItem { item, version }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::of(&self.item)
    }

    /// Version text as stored in the repository
    pub fn raw_version(&self) -> &str {
        &self.item.version
    }

    pub fn parsed(&self) -> Option<&MavenVersion> {
        self.version.as_ref().ok()
    }
}

/// Coordinate → items, in retrieval order within each coordinate.
pub type CoordinateGroups = BTreeMap<Coordinate, Vec<VersionedItem>>;

/// Wrap every retrieved component with its parsed version.
pub fn versioned_items(items: Vec<RepositoryItem>) -> Vec<VersionedItem> {
    items.into_iter().map(VersionedItem::new).collect()
}

/// Partition items by coordinate. No item is dropped.
pub fn group_by_coordinate(items: Vec<VersionedItem>) -> CoordinateGroups {
    let mut groups = CoordinateGroups::new();
    for item in items {
        groups.entry(item.coordinate()).or_default().push(item);
    }

    for (coordinate, items) in &groups {
        debug!(
            artifact = %coordinate,
            versions = ?items.iter().map(VersionedItem::raw_version).collect::<Vec<_>>(),
            "artifact contains versions"
        );
    }
    groups
}

/// Total number of items across all groups
pub fn count_items(groups: &CoordinateGroups) -> usize {
    groups.values().map(Vec::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, group: &str, name: &str, version: &str) -> VersionedItem {
        VersionedItem::new(RepositoryItem::new(id, group, name, version))
    }

    #[test]
    fn test_groups_by_group_and_name() {
        let groups = group_by_coordinate(vec![
            item("1", "com.foo", "bar", "1.0"),
            item("2", "com.foo", "baz", "1.0"),
            item("3", "com.foo", "bar", "2.0"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Coordinate::new("com.foo", "bar")].len(), 2);
        assert_eq!(groups[&Coordinate::new("com.foo", "baz")].len(), 1);
    }

    #[test]
    fn test_retrieval_order_preserved_within_group() {
        let groups = group_by_coordinate(vec![
            item("1", "g", "a", "3.0"),
            item("2", "g", "a", "1.0"),
            item("3", "g", "a", "2.0"),
        ]);
        let ids: Vec<&str> = groups[&Coordinate::new("g", "a")]
            .iter()
            .map(|i| i.item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_ambiguous_dotted_names_stay_separate() {
        let groups = group_by_coordinate(vec![
            item("1", "a.b", "c", "1.0"),
            item("2", "a", "b.c", "1.0"),
        ]);
        assert_eq!(groups.len(), 2);
        for (coordinate, items) in &groups {
            assert_eq!(coordinate.to_string(), "a.b.c");
            assert_eq!(items.len(), 1);
        }
    }

    #[test]
    fn test_every_item_lands_in_exactly_one_group() {
        let input: Vec<VersionedItem> = (0..20)
            .map(|i| item(&i.to_string(), "g", &format!("a{}", i % 3), &format!("1.{i}")))
            .collect();
        let groups = group_by_coordinate(input);
        assert_eq!(count_items(&groups), 20);

        let mut ids: Vec<String> = groups
            .values()
            .flatten()
            .map(|i| i.item.id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_coordinate(Vec::new()).is_empty());
    }

    #[test]
    fn test_unparseable_version_is_kept_with_error() {
        let bad = item("1", "g", "a", "");
        assert!(bad.parsed().is_none());
        assert_eq!(bad.version, Err(VersionError::Empty));
        let groups = group_by_coordinate(vec![bad]);
        assert_eq!(count_items(&groups), 1);
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new("com.foo", "bar").to_string(), "com.foo.bar");
    }
}
