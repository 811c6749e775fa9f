//! In-memory fake for the repository trait (testing only)
//!
//! `MemoryRepository` behaves like a Nexus server that never pages and
//! never times out, with switches to make listing or individual deletions
//! fail.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{NexusError, NexusResult};
use crate::item::RepositoryItem;
use crate::repository::ComponentRepository;

#[derive(Debug, Default)]
struct State {
    repositories: BTreeMap<String, Vec<RepositoryItem>>,
    failing_ids: HashSet<String>,
    fail_listing: bool,
    delete_calls: Vec<String>,
}

/// In-memory component repository keyed by repository name.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `repository` with `items`, in listing order.
    pub fn with_components(self, repository: &str, items: Vec<RepositoryItem>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let stored = state.repositories.entry(repository.to_string()).or_default();
            stored.extend(
                items
                    .into_iter()
                    .map(|item| item.in_repository(repository)),
            );
        }
        self
    }

    /// Make every delete call for `id` fail with an HTTP 500.
    pub fn fail_delete(&self, id: &str) {
        self.state.lock().unwrap().failing_ids.insert(id.to_string());
    }

    /// Make `list_components` fail for every repository.
    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Ids passed to `delete_component`, in call order, including failures.
    pub fn delete_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().delete_calls.clone()
    }

    /// Components still stored in `repository`.
    pub fn components(&self, repository: &str) -> Vec<RepositoryItem> {
        self.state
            .lock()
            .unwrap()
            .repositories
            .get(repository)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComponentRepository for MemoryRepository {
    async fn list_components(&self, repository: &str) -> NexusResult<Vec<RepositoryItem>> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(NexusError::Http {
                status: 503,
                url: format!("memory://{repository}"),
                body: "listing disabled".to_string(),
            });
        }
        state
            .repositories
            .get(repository)
            .cloned()
            .ok_or_else(|| NexusError::Http {
                status: 404,
                url: format!("memory://{repository}"),
                body: format!("Repository not found: {repository}"),
            })
    }

    async fn delete_component(&self, id: &str) -> NexusResult<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(id.to_string());

        if state.failing_ids.contains(id) {
            return Err(NexusError::Http {
                status: 500,
                url: format!("memory://components/{id}"),
                body: "injected failure".to_string(),
            });
        }

        for items in state.repositories.values_mut() {
            if let Some(pos) = items.iter().position(|item| item.id == id) {
                items.remove(pos);
                return Ok(());
            }
        }
        Err(NexusError::NotFound(id.to_string()))
    }
}
