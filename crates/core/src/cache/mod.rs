//! Tier cache backends.
//!
//! The retrieval layer talks to a [`TierCache`]: a minimal key/value store
//! holding serialized tier records with a per-entry time-to-live. Two
//! backends are provided:
//!
//! - [`CacheDb`]: SQLite-backed, async access via tokio-rusqlite, WAL mode,
//!   versioned schema migrations
//! - [`MemoryCache`]: process-local map, used for tests and ephemeral runs

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod tiers;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryCache;

use async_trait::async_trait;
use std::time::Duration;

/// Key/value store for serialized tier records.
///
/// Values are JSON text. An entry older than its TTL must read as absent.
/// Implementations are shared across tasks, so they must be `Send + Sync`.
#[async_trait]
pub trait TierCache: Send + Sync {
    /// Look up a live entry.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;
}
