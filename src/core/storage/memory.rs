// src/core/storage/memory.rs

//! An in-process, sharded implementation of `KeyValueStore`.
//!
//! Expired keys are hidden lazily on read and removed actively by the
//! `TtlManager` sweeper, which samples them through `get_expired_sample_keys`.

use super::KeyValueStore;
use super::data_types::{DataValue, StoredValue};
use crate::core::LarderError;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

/// The number of shards in the store.
pub const NUM_SHARDS: usize = 16;

/// `MemoryStore` is composed of multiple mutex-guarded shards to limit contention.
#[derive(Debug)]
pub struct MemoryStore {
    shards: Vec<Mutex<HashMap<String, StoredValue>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Mutex::new(HashMap::new())).collect();
        Self { shards }
    }

    /// Calculates the shard index for a given key using hashing.
    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    /// Returns the number of stored keys, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets a random sample of keys that are expired, for active deletion.
    pub fn get_expired_sample_keys(&self, sample_size: usize) -> Vec<String> {
        let mut rng = rand::rngs::SmallRng::from_entropy();
        let mut expired_keys = Vec::with_capacity(sample_size);
        for _ in 0..sample_size {
            let shard_index = rng.gen_range(0..NUM_SHARDS);
            let guard = self.shards[shard_index].lock();
            if let Some((key, _)) = guard
                .iter()
                .filter(|(_, v)| v.is_expired())
                .choose(&mut rng)
                && !expired_keys.contains(key)
            {
                expired_keys.push(key.clone());
            }
        }
        expired_keys
    }

    /// Removes the given keys if they are still expired. Returns how many were removed.
    pub fn purge_expired(&self, keys: &[String]) -> usize {
        let mut purged = 0;
        for key in keys {
            let mut guard = self.shards[self.shard_index(key)].lock();
            if guard.get(key).is_some_and(StoredValue::is_expired) {
                guard.remove(key);
                purged += 1;
            }
        }
        purged
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LarderError> {
        let guard = self.shards[self.shard_index(key)].lock();
        match guard.get(key) {
            Some(value) if !value.is_expired() => match &value.data {
                DataValue::String(s) => Ok(Some(s.clone())),
                DataValue::List(_) => Err(wrong_type(key)),
            },
            _ => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), LarderError> {
        let mut guard = self.shards[self.shard_index(key)].lock();
        guard.insert(
            key.to_string(),
            StoredValue::new(DataValue::String(value), ttl),
        );
        Ok(())
    }

    async fn list_append(&self, key: &str, value: String) -> Result<usize, LarderError> {
        let mut guard = self.shards[self.shard_index(key)].lock();
        if guard.get(key).is_some_and(StoredValue::is_expired) {
            guard.remove(key);
        }
        let entry = guard
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::new(DataValue::List(Vec::new()), None));
        match &mut entry.data {
            DataValue::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            DataValue::String(_) => Err(wrong_type(key)),
        }
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>, LarderError> {
        let guard = self.shards[self.shard_index(key)].lock();
        match guard.get(key) {
            Some(value) if !value.is_expired() => match &value.data {
                DataValue::List(items) => Ok(items.clone()),
                DataValue::String(_) => Err(wrong_type(key)),
            },
            _ => Ok(Vec::new()),
        }
    }
}

fn wrong_type(key: &str) -> LarderError {
    LarderError::Storage(format!(
        "WRONGTYPE operation against key '{key}' holding the wrong kind of value"
    ))
}
