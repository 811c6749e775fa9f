//! Repository trait definition for NARC
//!
//! `ComponentRepository` is the only seam between the retention engine and
//! the artifact server. The Nexus HTTP client implements it for real runs;
//! `MemoryRepository` implements it for tests.

use async_trait::async_trait;

use crate::error::NexusResult;
use crate::item::RepositoryItem;

/// Listing and deletion of stored components.
///
/// Guarantees:
/// - `list_components` returns every component of the repository, or an
///   error. A partial listing is never returned as success.
/// - `delete_component` may be called with an id that is already gone; that
///   call fails (typically `NexusError::NotFound`) and has no other effect.
#[async_trait]
pub trait ComponentRepository: Send + Sync {
    /// List all components stored in `repository`.
    async fn list_components(&self, repository: &str) -> NexusResult<Vec<RepositoryItem>>;

    /// Delete one component by its identity.
    async fn delete_component(&self, id: &str) -> NexusResult<()>;
}
