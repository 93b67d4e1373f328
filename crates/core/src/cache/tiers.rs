//! SQLite storage for tier records.
//!
//! Implements [`TierCache`] on top of the `tier_cache` table: UPSERT on
//! write, freshness checked on read, expired rows purged on demand.

use super::TierCache;
use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::time::Duration;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Fixed-width RFC 3339 so timestamps compare correctly as text.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl CacheDb {
    /// Get a live tier record by key.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_tier(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value_json FROM tier_cache WHERE key = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key, now], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a tier record.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, replaces the value
    /// and both timestamps if it does.
    pub async fn put_tier(&self, key: &str, value_json: &str, ttl: Duration) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::InvalidInput("cache key cannot be empty".into()));
        }
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| Error::InvalidInput(format!("invalid ttl: {e}")))?;

        let key = key.to_string();
        let value_json = value_json.to_string();
        let cached_at = Utc::now();
        let expires_at = timestamp(cached_at + ttl);
        let cached_at = timestamp(cached_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO tier_cache (key, value_json, cached_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value_json = excluded.value_json,
                        cached_at = excluded.cached_at,
                        expires_at = excluded.expires_at",
                    params![key, value_json, cached_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired tier records.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM tier_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl TierCache for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_tier(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.put_tier(key, value, ttl).await
    }
}
