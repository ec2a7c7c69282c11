// src/core/pagination/keys.rs

//! Store key layout for cached search pages.

/// Prefix of every per-page cache key.
pub const PAGE_KEY_PREFIX: &str = "recipes_pages";

/// Builds the composite cache key identifying one result set: the search
/// endpoint, the free-text query and the serialized tag filter.
pub fn page_cache_key(base_url: &str, query: &str, tags: &[String]) -> String {
    let serialized_tags = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{base_url}?q={}&tags={}",
        urlencoding::encode(query),
        urlencoding::encode(&serialized_tags)
    )
}

/// The store key of a single page of the result set identified by `cache_key`.
pub fn page_entry_key(cache_key: &str, page: u32) -> String {
    format!("{PAGE_KEY_PREFIX}:{cache_key}:{page}")
}

/// The store key holding the highest page number ever cached for `cache_key`.
pub fn page_max_key(cache_key: &str) -> String {
    format!("{PAGE_KEY_PREFIX}:{cache_key}:max")
}
