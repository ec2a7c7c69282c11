// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

#![allow(dead_code)]

use super::fixtures::{ScriptedProvider, URI_PREFIX};
use larder::config::Config;
use larder::core::AppState;
use larder::core::caller::{Caller, Role};
use larder::core::favorites::MemoryFavoriteStore;
use larder::core::pagination::CursorChainResolver;
use larder::core::recipes::RecipeCache;
use larder::core::reviews::MemoryReviewStore;
use larder::core::saved::MemorySavedRecipeStore;
use larder::core::storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// TestContext provides a complete service wired to in-process backends and
/// a scripted upstream provider.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub provider: Arc<ScriptedProvider>,
    pub review_store: Arc<MemoryReviewStore>,
    pub favorite_store: Arc<MemoryFavoriteStore>,
    pub saved_store: Arc<MemorySavedRecipeStore>,
}

impl TestContext {
    /// Creates a new test context with the default test configuration
    pub fn new() -> Self {
        Self::with_provider(ScriptedProvider::new())
    }

    pub fn with_provider(provider: ScriptedProvider) -> Self {
        Self::with_config(test_config(), provider)
    }

    /// Creates a new test context with custom configuration
    pub fn with_config(config: Config, provider: ScriptedProvider) -> Self {
        // Initialize tracing (ignore error if already initialized)
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();

        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(provider);
        let review_store = Arc::new(MemoryReviewStore::new());
        let favorite_store = Arc::new(MemoryFavoriteStore::new());
        let saved_store = Arc::new(MemorySavedRecipeStore::new());

        let state = AppState::with_backends(
            config,
            store.clone(),
            provider.clone(),
            review_store.clone(),
            favorite_store.clone(),
            saved_store.clone(),
        );

        Self {
            state,
            store,
            provider,
            review_store,
            favorite_store,
            saved_store,
        }
    }

    /// A resolver over the context's store and provider, for exercising pagination directly.
    pub fn resolver(&self) -> CursorChainResolver {
        CursorChainResolver::new(self.kv(), self.provider.clone(), None)
    }

    /// A recipe cache over the context's store and provider.
    pub fn recipe_cache(&self) -> RecipeCache {
        RecipeCache::new(
            self.kv(),
            self.provider.clone(),
            URI_PREFIX.to_string(),
            None,
            4,
        )
    }

    pub fn kv(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }
}

/// Default configuration with a small tag page so slicing is easy to observe.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.upstream.recipe_uri_prefix = URI_PREFIX.to_string();
    config.pagination.tag_page_size = 2;
    config.pagination.max_page = 50;
    config.recipes.fetch_concurrency = 4;
    config
}

pub fn user(id: &str) -> Caller {
    Caller::new(id, Role::User)
}

pub fn admin(id: &str) -> Caller {
    Caller::new(id, Role::Admin)
}
