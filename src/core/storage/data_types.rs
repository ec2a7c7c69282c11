// src/core/storage/data_types.rs

//! Defines the value types held by the in-process store.

use std::time::{Duration, Instant};

/// The payload of a stored key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    String(String),
    List(Vec<String>),
}

impl DataValue {
    /// Approximate heap usage of the payload in bytes.
    pub fn memory_usage(&self) -> usize {
        match self {
            DataValue::String(s) => s.len(),
            DataValue::List(items) => items.iter().map(String::len).sum(),
        }
    }
}

/// A value together with its expiry metadata.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub data: DataValue,
    /// The instant after which the value is no longer served.
    pub expiry: Option<Instant>,
}

impl StoredValue {
    /// Creates a new `StoredValue` that expires after `ttl`, or never if `ttl` is `None`.
    pub fn new(data: DataValue, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expiry: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= Instant::now())
    }
}
