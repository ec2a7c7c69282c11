// src/core/favorites/mod.rs

//! Per-user favorite recipes.

use crate::core::LarderError;
use crate::core::caller::Caller;
use crate::core::recipes::RecipeCache;
use crate::core::upstream::Recipe;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[async_trait]
pub trait FavoriteStore: Send + Sync + std::fmt::Debug {
    async fn contains(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError>;
    async fn add(&self, user_id: &str, recipe_id: &str) -> Result<(), LarderError>;
    async fn remove(&self, user_id: &str, recipe_id: &str) -> Result<(), LarderError>;
    /// The user's favorites in the order they were added.
    async fn list(&self, user_id: &str) -> Result<Vec<String>, LarderError>;
}

#[derive(Debug, Default)]
pub struct MemoryFavoriteStore {
    favorites: DashMap<String, Vec<String>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn contains(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError> {
        Ok(self
            .favorites
            .get(user_id)
            .is_some_and(|ids| ids.iter().any(|id| id == recipe_id)))
    }

    async fn add(&self, user_id: &str, recipe_id: &str) -> Result<(), LarderError> {
        let mut ids = self.favorites.entry(user_id.to_string()).or_default();
        if !ids.iter().any(|id| id == recipe_id) {
            ids.push(recipe_id.to_string());
        }
        Ok(())
    }

    async fn remove(&self, user_id: &str, recipe_id: &str) -> Result<(), LarderError> {
        if let Some(mut ids) = self.favorites.get_mut(user_id) {
            ids.retain(|id| id != recipe_id);
        }
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<String>, LarderError> {
        Ok(self
            .favorites
            .get(user_id)
            .map(|ids| ids.clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoriteStore>,
    recipes: RecipeCache,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoriteStore>, recipes: RecipeCache) -> Self {
        Self { store, recipes }
    }

    /// Adds the recipe to the caller's favorites, or removes it if already there.
    /// Returns `true` when the recipe is a favorite afterwards.
    pub async fn toggle_favorite(&self, caller: &Caller, recipe_id: &str) -> Result<bool, LarderError> {
        if recipe_id.trim().is_empty() {
            return Err(LarderError::InvalidInput("recipeId is required".to_string()));
        }
        if self.store.contains(&caller.user_id, recipe_id).await? {
            self.store.remove(&caller.user_id, recipe_id).await?;
            return Ok(false);
        }
        self.recipes.get_or_fetch(recipe_id).await?;
        self.store.add(&caller.user_id, recipe_id).await?;
        Ok(true)
    }

    pub async fn get_favorites(&self, caller: &Caller) -> Result<Vec<Recipe>, LarderError> {
        let ids = self.store.list(&caller.user_id).await?;
        self.recipes.fetch_by_ids(&ids).await
    }
}
