//! Core types and shared functionality for sheetscope.
//!
//! This crate provides:
//! - Tier cache abstraction with SQLite and in-memory backends
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, MemoryCache, TierCache};
pub use config::{AppConfig, CacheBackend, ConfigError, Credential};
pub use error::Error;
