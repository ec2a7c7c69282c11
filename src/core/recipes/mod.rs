// src/core/recipes/mod.rs

//! The recipe cache facade: single-recipe get-or-fetch and order-preserving batch fetch.

use crate::core::storage::{self, KeyValueStore};
use crate::core::upstream::{Recipe, RecipeProvider};
use crate::core::{LarderError, metrics};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The store key of a cached recipe.
pub fn recipe_key(recipe_id: &str) -> String {
    format!("recipe-{recipe_id}")
}

/// Strips the provider's canonical URI prefix, yielding the recipe id.
/// A value without the prefix is already an id and is returned unchanged.
pub fn recipe_id_from_uri<'a>(uri: &'a str, prefix: &str) -> &'a str {
    uri.strip_prefix(prefix).unwrap_or(uri)
}

#[derive(Debug, Clone)]
pub struct RecipeCache {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn RecipeProvider>,
    uri_prefix: String,
    recipe_ttl: Option<Duration>,
    fetch_concurrency: usize,
}

impl RecipeCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn RecipeProvider>,
        uri_prefix: String,
        recipe_ttl: Option<Duration>,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            store,
            provider,
            uri_prefix,
            recipe_ttl,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    /// The id of `recipe`, derived from its canonical URI.
    pub fn recipe_id<'a>(&self, recipe: &'a Recipe) -> &'a str {
        recipe_id_from_uri(&recipe.uri, &self.uri_prefix)
    }

    pub fn uri_prefix(&self) -> &str {
        &self.uri_prefix
    }

    pub fn fetch_concurrency(&self) -> usize {
        self.fetch_concurrency
    }

    /// Returns the cached recipe if present, without touching the provider.
    pub async fn cached(&self, recipe_id: &str) -> Result<Option<Recipe>, LarderError> {
        storage::get_json(self.store.as_ref(), &recipe_key(recipe_id)).await
    }

    /// Returns the recipe from the cache, or looks it up upstream and caches it.
    ///
    /// Fails with `NotFound` if the provider has no recipe with this id; nothing
    /// is cached in that case.
    pub async fn get_or_fetch(&self, recipe_id: &str) -> Result<Recipe, LarderError> {
        if let Some(recipe) = self.cached(recipe_id).await? {
            metrics::RECIPE_CACHE_HITS_TOTAL.inc();
            return Ok(recipe);
        }
        metrics::RECIPE_CACHE_MISSES_TOTAL.inc();
        debug!("Recipe cache miss for '{}'.", recipe_id);

        let uri = format!("{}{}", self.uri_prefix, recipe_id);
        let page = self.provider.lookup_by_uri(&uri).await?;
        let recipe = page
            .into_recipes()
            .into_iter()
            .next()
            .ok_or_else(LarderError::recipe_not_found)?;

        storage::set_json(
            self.store.as_ref(),
            &recipe_key(recipe_id),
            &recipe,
            self.recipe_ttl,
        )
        .await?;
        Ok(recipe)
    }

    /// Fetches every id concurrently, returning recipes in input order.
    ///
    /// Duplicated ids yield duplicated recipes. The first failure fails the batch.
    pub async fn fetch_by_ids(&self, recipe_ids: &[String]) -> Result<Vec<Recipe>, LarderError> {
        stream::iter(recipe_ids.to_vec())
            .map(|id| async move { self.get_or_fetch(&id).await })
            .buffered(self.fetch_concurrency)
            .try_collect()
            .await
    }
}
