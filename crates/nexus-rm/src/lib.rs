//! Nexus-RM: Repository collaborator layer for NARC
//!
//! This crate owns everything NARC knows about the artifact repository:
//! - `RepositoryItem`: one stored component as reported by the server
//! - `ComponentRepository`: async list/delete abstraction the engine runs against
//! - `NexusClient`: reqwest implementation against the Nexus REST v1 API
//! - `MemoryRepository`: in-memory fake with failure injection (testing)
//!
//! ## Layer 0 - Repository access
//!
//! Focus: faithful listing (all pages) and per-component deletion.

pub mod client;
pub mod error;
pub mod fakes;
pub mod item;
pub mod repository;

pub use client::{NexusClient, NexusConfig, DEFAULT_TIMEOUT};
pub use error::{NexusError, NexusResult};
pub use fakes::MemoryRepository;
pub use item::{Asset, RepositoryItem};
pub use repository::ComponentRepository;
