// src/core/pagination/mod.rs

//! Arbitrary-page access over a cursor-only upstream API.

pub mod keys;
pub mod resolver;

use crate::core::upstream::RecipeHit;
use serde::{Deserialize, Serialize};

pub use keys::{page_cache_key, page_entry_key, page_max_key};
pub use resolver::{CursorChainResolver, ResolvedPage};

/// One cached page of a result set: its hits and the cursor that continues it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCacheEntry {
    pub hits: Vec<RecipeHit>,
    /// `None` only for the last page the provider has.
    #[serde(default)]
    pub next: Option<String>,
}
