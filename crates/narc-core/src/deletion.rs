//! Deletion of the components selected by the partitioner.
//!
//! Every item is attempted on its own. A failed delete is logged and
//! counted, it never stops the remaining deletes. There is no retry: the
//! next run selects the still-present versions again.

use futures::stream::{self, StreamExt};
use nexus_rm::ComponentRepository;
use serde::Serialize;
use tracing::{debug, error};

use crate::coordinate::{Coordinate, VersionedItem};

/// Result of one delete call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum DeletionStatus {
    Deleted,
    Failed(String),
}

/// Per-item record of a delete attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub id: String,
    pub artifact: String,
    pub version: String,
    pub status: DeletionStatus,
}

impl ItemOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == DeletionStatus::Deleted
    }
}

/// Outcomes of a batch of deletes, in delete-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    pub items: Vec<ItemOutcome>,
}

impl DeletionOutcome {
    pub fn deleted(&self) -> usize {
        self.items.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.deleted()
    }

    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    /// Append another batch
    pub fn merge(&mut self, other: DeletionOutcome) {
        self.items.extend(other.items);
    }
}

async fn delete_one<R>(repo: &R, coordinate: &Coordinate, item: &VersionedItem) -> ItemOutcome
where
    R: ComponentRepository + ?Sized,
{
    let artifact = coordinate.to_string();
    let status = match repo.delete_component(&item.item.id).await {
        Ok(()) => {
            debug!(gav = %item.item.gav(), id = %item.item.id, "deleted artifact");
            DeletionStatus::Deleted
        }
        Err(err) => {
            error!(
                gav = %item.item.gav(),
                id = %item.item.id,
                error = %err,
                "failed to delete artifact"
            );
            DeletionStatus::Failed(err.to_string())
        }
    };

    ItemOutcome {
        id: item.item.id.clone(),
        artifact,
        version: item.raw_version().to_string(),
        status,
    }
}

/// Delete every item of one coordinate's delete-set.
///
/// At most `concurrency` deletes are in flight (values below 1 mean 1).
/// Outcomes come back in the order of `items` regardless.
pub async fn delete_components<R>(
    repo: &R,
    coordinate: &Coordinate,
    items: &[VersionedItem],
    concurrency: usize,
) -> DeletionOutcome
where
    R: ComponentRepository + ?Sized,
{
    let items = stream::iter(items)
        .map(|item| delete_one(repo, coordinate, item))
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    DeletionOutcome { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_rm::{MemoryRepository, RepositoryItem};

    const REPO: &str = "maven-releases";

    fn items(versions: &[&str]) -> Vec<VersionedItem> {
        versions
            .iter()
            .map(|v| VersionedItem::new(RepositoryItem::new(&format!("id-{v}"), "com.foo", "bar", v)))
            .collect()
    }

    fn seeded(items: &[VersionedItem]) -> MemoryRepository {
        MemoryRepository::new().with_components(REPO, items.iter().map(|i| i.item.clone()).collect())
    }

    #[tokio::test]
    async fn test_all_deletes_succeed() {
        let batch = items(&["1.0", "1.1", "1.2"]);
        let repo = seeded(&batch);
        let outcome =
            delete_components(&repo, &Coordinate::new("com.foo", "bar"), &batch, 1).await;

        assert_eq!(outcome.deleted(), 3);
        assert_eq!(outcome.failed(), 0);
        assert!(repo.components(REPO).is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let batch = items(&["1.0", "1.1", "1.2", "1.3"]);
        let repo = seeded(&batch);
        repo.fail_delete("id-1.1");

        let outcome =
            delete_components(&repo, &Coordinate::new("com.foo", "bar"), &batch, 1).await;

        assert_eq!(outcome.attempted(), 4);
        assert_eq!(outcome.deleted(), 3);
        assert_eq!(outcome.failed(), 1);
        assert!(matches!(outcome.items[1].status, DeletionStatus::Failed(_)));
        assert_eq!(outcome.items[1].version, "1.1");
        assert_eq!(
            repo.delete_calls(),
            vec!["id-1.0", "id-1.1", "id-1.2", "id-1.3"]
        );
        let remaining: Vec<String> = repo.components(REPO).into_iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec!["id-1.1"]);
    }

    #[tokio::test]
    async fn test_already_deleted_component_counts_as_failure() {
        let batch = items(&["1.0"]);
        let repo = MemoryRepository::new().with_components(REPO, Vec::new());
        let outcome =
            delete_components(&repo, &Coordinate::new("com.foo", "bar"), &batch, 1).await;
        assert_eq!(outcome.deleted(), 0);
        assert_eq!(outcome.failed(), 1);
    }

    #[tokio::test]
    async fn test_bounded_concurrency_keeps_order_and_isolation() {
        let batch = items(&["1", "2", "3", "4", "5", "6"]);
        let repo = seeded(&batch);
        repo.fail_delete("id-4");

        let outcome =
            delete_components(&repo, &Coordinate::new("com.foo", "bar"), &batch, 3).await;

        let versions: Vec<&str> = outcome.items.iter().map(|o| o.version.as_str()).collect();
        assert_eq!(versions, vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(outcome.deleted(), 5);
        assert_eq!(outcome.failed(), 1);
    }

    #[tokio::test]
    async fn test_empty_delete_set() {
        let repo = MemoryRepository::new();
        let outcome = delete_components(&repo, &Coordinate::new("g", "a"), &[], 1).await;
        assert_eq!(outcome.attempted(), 0);
        assert!(repo.delete_calls().is_empty());
    }

    #[test]
    fn test_merge_accumulates() {
        let mut total = DeletionOutcome::default();
        total.merge(DeletionOutcome {
            items: vec![ItemOutcome {
                id: "a".into(),
                artifact: "g.a".into(),
                version: "1".into(),
                status: DeletionStatus::Deleted,
            }],
        });
        total.merge(DeletionOutcome {
            items: vec![ItemOutcome {
                id: "b".into(),
                artifact: "g.b".into(),
                version: "1".into(),
                status: DeletionStatus::Failed("boom".into()),
            }],
        });
        assert_eq!(total.deleted(), 1);
        assert_eq!(total.failed(), 1);
    }
}
