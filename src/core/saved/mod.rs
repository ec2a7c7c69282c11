// src/core/saved/mod.rs

//! Per-user saved recipes: a bookmark list kept apart from favorites,
//! listed oldest first with an optional tail of the most recent saves.

use crate::core::LarderError;
use crate::core::caller::Caller;
use crate::core::recipes::RecipeCache;
use crate::core::upstream::Recipe;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait SavedRecipeStore: Send + Sync + std::fmt::Debug {
    /// Appends the recipe, or drops it when already saved.
    /// Returns `true` when the recipe is saved afterwards.
    async fn toggle(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError>;
    async fn contains(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError>;
    /// The user's saved recipe ids, oldest first.
    async fn list(&self, user_id: &str) -> Result<Vec<String>, LarderError>;
}

#[derive(Debug, Default)]
pub struct MemorySavedRecipeStore {
    saved: DashMap<String, Vec<String>>,
}

impl MemorySavedRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedRecipeStore for MemorySavedRecipeStore {
    async fn toggle(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError> {
        // The entry guard holds the shard lock, so the check and the write are atomic.
        let mut ids = self.saved.entry(user_id.to_string()).or_default();
        match ids.iter().position(|id| id == recipe_id) {
            Some(index) => {
                ids.remove(index);
                Ok(false)
            }
            None => {
                ids.push(recipe_id.to_string());
                Ok(true)
            }
        }
    }

    async fn contains(&self, user_id: &str, recipe_id: &str) -> Result<bool, LarderError> {
        Ok(self
            .saved
            .get(user_id)
            .is_some_and(|ids| ids.iter().any(|id| id == recipe_id)))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<String>, LarderError> {
        Ok(self
            .saved
            .get(user_id)
            .map(|ids| ids.clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct SavedRecipesService {
    store: Arc<dyn SavedRecipeStore>,
    recipes: RecipeCache,
}

impl SavedRecipesService {
    pub fn new(store: Arc<dyn SavedRecipeStore>, recipes: RecipeCache) -> Self {
        Self { store, recipes }
    }

    /// Saves the recipe for the caller, or unsaves it if already saved.
    /// A recipe must resolve before it can be saved; unsaving never looks it up.
    pub async fn toggle_saved(&self, caller: &Caller, recipe_id: &str) -> Result<bool, LarderError> {
        if recipe_id.trim().is_empty() {
            return Err(LarderError::InvalidInput("recipeId is required".to_string()));
        }
        if !self.store.contains(&caller.user_id, recipe_id).await? {
            self.recipes.get_or_fetch(recipe_id).await?;
        }
        let saved = self.store.toggle(&caller.user_id, recipe_id).await?;
        info!(
            user_id = %caller.user_id,
            recipe_id,
            action = if saved { "saved" } else { "removed" },
            "Saved recipes updated"
        );
        Ok(saved)
    }

    /// Lists the caller's saved recipes, oldest first. With a positive `size`
    /// only the `size` most recent saves are returned; zero or `None` means all.
    pub async fn get_saved(&self, caller: &Caller, size: Option<i32>) -> Result<Vec<Recipe>, LarderError> {
        let ids = self.store.list(&caller.user_id).await?;
        let tail = match size {
            None | Some(0) => ids.as_slice(),
            Some(n) if n < 0 => {
                return Err(LarderError::OutOfRange("size can't be negative".to_string()));
            }
            Some(n) => {
                let n = usize::try_from(n).unwrap_or(usize::MAX).min(ids.len());
                &ids[ids.len() - n..]
            }
        };
        self.recipes.fetch_by_ids(tail).await
    }
}
