// src/core/state.rs

//! Defines the central `AppState` struct, holding the services every request shares.

use crate::config::Config;
use crate::core::favorites::{FavoriteStore, FavoritesService, MemoryFavoriteStore};
use crate::core::pagination::CursorChainResolver;
use crate::core::recipes::RecipeCache;
use crate::core::resolvers::RecipeService;
use crate::core::reviews::{MemoryReviewStore, ReviewAggregator, ReviewService, ReviewStore};
use crate::core::saved::{MemorySavedRecipeStore, SavedRecipeStore, SavedRecipesService};
use crate::core::storage::{KeyValueStore, MemoryStore};
use crate::core::tags::TagIndex;
use crate::core::upstream::{EdamamClient, RecipeProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// The shared state behind every GraphQL request.
///
/// Wrapped in an `Arc` and handed to the HTTP layer and the background tasks.
/// Every backend is injected at construction, so tests can swap the provider
/// or the stores without touching process-wide state.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// The key-value cache. Kept concrete so the TTL sweeper can sample it.
    pub store: Arc<MemoryStore>,
    pub recipes: RecipeService,
    pub reviews: ReviewService,
    pub favorites: FavoritesService,
    pub saved: SavedRecipesService,
}

impl AppState {
    /// Builds the production state: an in-process cache and document stores
    /// in front of the Edamam API.
    pub fn initialize(config: Config) -> Result<Arc<Self>> {
        let provider = Arc::new(EdamamClient::new(config.upstream.clone())?);
        let state = Self::with_backends(
            config,
            Arc::new(MemoryStore::new()),
            provider,
            Arc::new(MemoryReviewStore::new()),
            Arc::new(MemoryFavoriteStore::new()),
            Arc::new(MemorySavedRecipeStore::new()),
        );
        info!("Application state initialized.");
        Ok(state)
    }

    /// Wires every service on top of the given backends.
    pub fn with_backends(
        config: Config,
        store: Arc<MemoryStore>,
        provider: Arc<dyn RecipeProvider>,
        review_store: Arc<dyn ReviewStore>,
        favorite_store: Arc<dyn FavoriteStore>,
        saved_store: Arc<dyn SavedRecipeStore>,
    ) -> Arc<Self> {
        let kv: Arc<dyn KeyValueStore> = store.clone();
        let uri_prefix = config.upstream.recipe_uri_prefix.clone();
        let concurrency = config.recipes.fetch_concurrency;

        let recipe_cache = RecipeCache::new(
            kv.clone(),
            provider.clone(),
            uri_prefix.clone(),
            config.cache.recipe_ttl(),
            concurrency,
        );
        let resolver = CursorChainResolver::new(kv.clone(), provider.clone(), config.cache.page_ttl());
        let aggregator = ReviewAggregator::new(review_store.clone(), uri_prefix, concurrency);
        let tags = TagIndex::new(kv, recipe_cache.clone());

        let recipes = RecipeService::new(
            provider,
            resolver,
            recipe_cache.clone(),
            aggregator,
            tags,
            config.pagination.tag_page_size,
            config.pagination.max_page,
        );
        let reviews = ReviewService::new(review_store, recipe_cache.clone());
        let favorites = FavoritesService::new(favorite_store, recipe_cache.clone());
        let saved = SavedRecipesService::new(saved_store, recipe_cache);

        Arc::new(Self {
            config,
            store,
            recipes,
            reviews,
            favorites,
            saved,
        })
    }
}
