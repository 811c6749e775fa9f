//! Nexus Repository Manager REST client
//!
//! Talks to the `/service/rest/v1/components` endpoints of a Nexus 3
//! server using basic authentication. Listing follows `continuationToken`
//! until the server reports no further pages.

use crate::error::{NexusError, NexusResult};
use crate::item::RepositoryItem;
use crate::repository::ComponentRepository;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Upper bound for any single request to the server.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const COMPONENTS_PATH: [&str; 4] = ["service", "rest", "v1", "components"];

/// Nexus connection parameters
#[derive(Clone)]
pub struct NexusConfig {
    /// Server root URL, e.g. `http://localhost:8081`
    pub base_url: String,
    /// Basic auth user
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl fmt::Debug for NexusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NexusConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NexusConfig {
    /// Create config for a specific server with default credentials
    pub fn new(base_url: &str) -> Self {
        NexusConfig {
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set basic auth credentials
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentPage {
    #[serde(default)]
    items: Vec<RepositoryItem>,
    continuation_token: Option<String>,
}

/// Nexus client for component listing and deletion
#[derive(Debug, Clone)]
pub struct NexusClient {
    config: NexusConfig,
    components_url: reqwest::Url,
    http_client: reqwest::Client,
}

impl NexusClient {
    /// Create a new Nexus client.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// built; no request is sent here.
    pub fn new(config: NexusConfig) -> NexusResult<Self> {
        let base = reqwest::Url::parse(&config.base_url).map_err(|e| NexusError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(NexusError::InvalidUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("narc/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| NexusError::Client(e.to_string()))?;

        let mut components_url = base;
        components_url
            .path_segments_mut()
            .map_err(|_| NexusError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(COMPONENTS_PATH);

        Ok(NexusClient {
            config,
            components_url,
            http_client,
        })
    }

    /// Server root URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// URL of a single component. The id is pushed as one path segment, so
    /// `/`, `?` and `#` in it are percent-encoded.
    fn component_url(&self, id: &str) -> reqwest::Url {
        let mut url = self.components_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn fetch_page(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> NexusResult<ComponentPage> {
        let mut query = vec![("repository", repository)];
        if let Some(token) = continuation_token {
            query.push(("continuationToken", token));
        }

        let response = self
            .http_client
            .get(self.components_url.clone())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .query(&query)
            .send()
            .await
            .map_err(|e| NexusError::from_reqwest(self.components_url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NexusError::Http {
                status: status.as_u16(),
                url: self.components_url.to_string(),
                body,
            });
        }

        response
            .json::<ComponentPage>()
            .await
            .map_err(|e| NexusError::from_reqwest(self.components_url.as_str(), e))
    }
}

#[async_trait]
impl ComponentRepository for NexusClient {
    async fn list_components(&self, repository: &str) -> NexusResult<Vec<RepositoryItem>> {
        let mut components = Vec::new();
        let mut token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(repository, token.as_deref()).await?;
            pages += 1;
            trace!(page = pages, items = page.items.len(), "fetched component page");
            components.extend(page.items);

            match page.continuation_token {
                Some(next) if !next.is_empty() => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(NexusError::RepeatedToken {
                            url: self.components_url.to_string(),
                            token: next,
                        });
                    }
                    token = Some(next);
                }
                _ => break,
            }
        }

        debug!(
            repository = %repository,
            pages,
            count = components.len(),
            "listed components"
        );
        Ok(components)
    }

    async fn delete_component(&self, id: &str) -> NexusResult<()> {
        let url = self.component_url(id);

        let response = self
            .http_client
            .delete(url.clone())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| NexusError::from_reqwest(url.as_str(), e))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(NexusError::NotFound(id.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(NexusError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body,
                })
            }
        }
    }
}
