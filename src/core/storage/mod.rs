// src/core/storage/mod.rs

//! The key-value store seam used by every cache in the service.
//!
//! Values are stored as JSON text so that any backend speaking strings
//! (an in-process map or a Redis instance) can sit behind the trait.

pub mod data_types;
pub mod memory;
pub mod ttl;

use crate::core::LarderError;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use memory::MemoryStore;

/// A string key-value store with optional expiry and list-valued keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the string value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, LarderError>;

    /// Stores `value` at `key`, replacing any previous value. A `ttl` of `None` never expires.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>)
    -> Result<(), LarderError>;

    /// Appends `value` to the list at `key`, creating it if needed. Returns the new length.
    async fn list_append(&self, key: &str, value: String) -> Result<usize, LarderError>;

    /// Returns every element of the list at `key` in insertion order.
    async fn list_range(&self, key: &str) -> Result<Vec<String>, LarderError>;
}

/// Reads and deserializes a JSON value stored at `key`.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, LarderError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes `value` as JSON and stores it at `key`.
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) -> Result<(), LarderError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw, ttl).await
}
