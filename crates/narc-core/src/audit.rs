//! Audit report of retention decisions.
//!
//! The report is built from the grouped input and the partition result
//! only. Dry-run never reaches this module, so a dry run and a real run
//! over the same components produce the same report.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::KeepPolicy;
use crate::coordinate::{CoordinateGroups, VersionedItem};
use crate::error::Result;
use crate::retention::RetentionResult;

/// Decisions for one coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateAudit {
    pub artifact: String,
    pub group: String,
    pub name: String,
    pub delete: Vec<String>,
    pub delete_count: usize,
    pub keep: Vec<String>,
    pub keep_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unparseable: Vec<String>,
}

/// Complete, deterministic record of what a run decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub repository: String,
    pub keep: KeepPolicy,
    pub components_retrieved: usize,
    pub coordinates: Vec<CoordinateAudit>,
    pub total_to_delete: usize,
    pub total_to_keep: usize,
    pub total_unparseable: usize,
}

fn raw_versions(items: Option<&Vec<VersionedItem>>) -> Vec<String> {
    items
        .map(|items| {
            items
                .iter()
                .map(|item| item.raw_version().to_string())
                .collect()
        })
        .unwrap_or_default()
}

impl AuditReport {
    /// Build the report for every coordinate of `groups`, including those
    /// with nothing to delete.
    pub fn build(
        repository: &str,
        keep: KeepPolicy,
        components_retrieved: usize,
        groups: &CoordinateGroups,
        result: &RetentionResult,
    ) -> Self {
        let coordinates: Vec<CoordinateAudit> = groups
            .keys()
            .map(|coordinate| {
                let delete = raw_versions(result.to_delete.get(coordinate));
                let kept = raw_versions(result.to_keep.get(coordinate));
                CoordinateAudit {
                    artifact: coordinate.to_string(),
                    group: coordinate.group.clone(),
                    name: coordinate.name.clone(),
                    delete_count: delete.len(),
                    keep_count: kept.len(),
                    delete,
                    keep: kept,
                    unparseable: raw_versions(result.unparseable.get(coordinate)),
                }
            })
            .collect();

        AuditReport {
            repository: repository.to_string(),
            keep,
            components_retrieved,
            total_to_delete: coordinates.iter().map(|c| c.delete_count).sum(),
            total_to_keep: coordinates.iter().map(|c| c.keep_count).sum(),
            total_unparseable: coordinates.iter().map(|c| c.unparseable.len()).sum(),
            coordinates,
        }
    }

    /// Log the report: one debug record per version, counts at info.
    pub fn emit(&self) {
        for entry in &self.coordinates {
            for version in &entry.delete {
                debug!(artifact = %entry.artifact, version = %version, "delete artifact");
            }
            info!(
                artifact = %entry.artifact,
                count = entry.delete_count,
                "artifact versions count to delete"
            );
            for version in &entry.keep {
                debug!(artifact = %entry.artifact, version = %version, "to keep version");
            }
            info!(
                artifact = %entry.artifact,
                count = entry.keep_count,
                "artifact versions count to keep"
            );
            for version in &entry.unparseable {
                warn!(
                    artifact = %entry.artifact,
                    version = %version,
                    "unparseable version excluded from deletion"
                );
            }
        }

        if self.total_unparseable > 0 {
            warn!(
                count = self.total_unparseable,
                "total unparseable versions excluded from deletion"
            );
        }
        info!(count = self.total_to_delete, "total artifacts to delete");
    }

    /// Plain-text rendering, stable for identical reports.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "repository={} keep={} components={}",
            self.repository, self.keep, self.components_retrieved
        );
        for entry in &self.coordinates {
            let _ = writeln!(
                out,
                "{} delete[{}]={} keep[{}]={}",
                entry.artifact,
                entry.delete_count,
                entry.delete.join(","),
                entry.keep_count,
                entry.keep.join(",")
            );
            if !entry.unparseable.is_empty() {
                let _ = writeln!(
                    out,
                    "{} unparseable={}",
                    entry.artifact,
                    entry.unparseable.join(",")
                );
            }
        }
        let _ = writeln!(
            out,
            "total_to_delete={} total_to_keep={} total_unparseable={}",
            self.total_to_delete, self.total_to_keep, self.total_unparseable
        );
        out
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "wrote audit report");
        Ok(())
    }
}
