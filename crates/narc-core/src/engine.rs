//! Cleanup run orchestration.
//!
//! components → group by coordinate → partition → audit (always) →
//! delete (unless dry run). Groups and items are processed one after
//! another; the only fatal failure is the initial listing.

use std::time::{Duration, Instant};

use nexus_rm::{ComponentRepository, RepositoryItem};
use serde::Serialize;
use tracing::info;

use crate::audit::AuditReport;
use crate::config::{KeepPolicy, RetentionConfig};
use crate::coordinate::{group_by_coordinate, versioned_items, CoordinateGroups};
use crate::deletion::{delete_components, DeletionOutcome};
use crate::error::{Result, RetentionError};
use crate::retention::{partition, RetentionCounts, RetentionResult};

/// Grouping and retention decisions for a set of components.
#[derive(Debug, Clone)]
pub struct CleanupPlan {
    pub components_retrieved: usize,
    pub groups: CoordinateGroups,
    pub retention: RetentionResult,
}

/// Decide what to delete. No I/O.
pub fn plan(items: Vec<RepositoryItem>, keep: KeepPolicy) -> CleanupPlan {
    let components_retrieved = items.len();
    let groups = group_by_coordinate(versioned_items(items));
    let retention = partition(&groups, keep);
    CleanupPlan {
        components_retrieved,
        groups,
        retention,
    }
}

/// Figures reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub repository: String,
    pub dry_run: bool,
    pub components_retrieved: usize,
    pub coordinates: usize,
    pub total_to_delete: usize,
    pub total_deleted: usize,
    pub total_failed: usize,
    pub unparseable: usize,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u128(duration.as_millis())
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub audit: AuditReport,
    pub deletions: DeletionOutcome,
    pub summary: RunSummary,
}

/// Run one retention pass against `repo`.
///
/// Returns an error only when the component listing fails or the audit
/// report cannot be written; in both cases nothing has been deleted.
/// Individual delete failures are logged and reflected in
/// `summary.total_failed`.
pub async fn run_cleanup<R>(repo: &R, config: &RetentionConfig) -> Result<RunReport>
where
    R: ComponentRepository + ?Sized,
{
    info!(
        repository = %config.repository,
        keep_versions = %config.keep,
        dry_run = config.dry_run,
        "starting cleanup process"
    );
    let started = Instant::now();

    let components = repo
        .list_components(&config.repository)
        .await
        .map_err(|source| RetentionError::Listing {
            repository: config.repository.clone(),
            source,
        })?;
    info!(count = components.len(), "retrieved components");

    let cleanup = plan(components, config.keep);
    let counts = RetentionCounts::from(&cleanup.retention);
    info!(
        coordinates = counts.coordinates,
        to_delete = counts.to_delete,
        to_keep = counts.to_keep,
        unparseable = counts.unparseable,
        "retention decided"
    );
    let audit = AuditReport::build(
        &config.repository,
        config.keep,
        cleanup.components_retrieved,
        &cleanup.groups,
        &cleanup.retention,
    );
    audit.emit();
    if let Some(path) = &config.report_path {
        audit.write_json(path)?;
    }

    let mut deletions = DeletionOutcome::default();
    if !config.dry_run {
        for (coordinate, items) in &cleanup.retention.to_delete {
            if items.is_empty() {
                continue;
            }
            let outcome =
                delete_components(repo, coordinate, items, config.delete_concurrency).await;
            deletions.merge(outcome);
        }
    }
    info!(count = deletions.deleted(), "total deleted");

    let summary = RunSummary {
        repository: config.repository.clone(),
        dry_run: config.dry_run,
        components_retrieved: cleanup.components_retrieved,
        coordinates: counts.coordinates,
        total_to_delete: counts.to_delete,
        total_deleted: deletions.deleted(),
        total_failed: deletions.failed(),
        unparseable: counts.unparseable,
        duration: started.elapsed(),
    };
    info!(
        duration = ?summary.duration,
        total_to_delete = summary.total_to_delete,
        total_deleted = summary.total_deleted,
        total_failed = summary.total_failed,
        "cleanup process completed"
    );

    Ok(RunReport {
        audit,
        deletions,
        summary,
    })
}
