//! In-process tier cache.

use super::TierCache;
use crate::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local cache with lazy expiry.
///
/// Expired entries are dropped on the read that discovers them. Uses
/// `tokio::time::Instant` so paused-clock tests can advance past a TTL.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet observed.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, Error> {
        self.entries
            .lock()
            .map_err(|_| Error::InvalidInput("memory cache lock poisoned".into()))
    }
}

#[async_trait]
impl TierCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::InvalidInput("cache key cannot be empty".into()));
        }
        let entry = Entry { value: value.to_string(), expires_at: Instant::now() + ttl };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }
}
