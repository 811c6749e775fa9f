//! NARC Core Library
//!
//! Retention engine for Maven artifacts stored in a Nexus repository:
//! keeps the N newest versions of every `group:artifact` and deletes the
//! rest.
//!
//! ## Pipeline
//!
//! - `version`: Maven version ordering
//! - `coordinate`: grouping of components by `(group, artifact)`
//! - `retention`: keep/delete partition per coordinate
//! - `audit`: deterministic report of every decision
//! - `deletion`: per-item deletes with failure isolation
//! - `engine`: one full run, dry or real

pub mod audit;
pub mod config;
pub mod coordinate;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod retention;
pub mod telemetry;
pub mod version;

pub use audit::{AuditReport, CoordinateAudit};
pub use config::{KeepPolicy, LogConfig, RetentionConfig};
pub use coordinate::{
    count_items, group_by_coordinate, versioned_items, Coordinate, CoordinateGroups,
    VersionedItem,
};
pub use deletion::{delete_components, DeletionOutcome, DeletionStatus, ItemOutcome};
pub use engine::{plan, run_cleanup, CleanupPlan, RunReport, RunSummary};
pub use error::{Result, RetentionError, VersionError};
pub use retention::{partition, RetentionCounts, RetentionResult};
pub use telemetry::init_tracing;
pub use version::{compare_versions, MavenVersion};

/// NARC version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
