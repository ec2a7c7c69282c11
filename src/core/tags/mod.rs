// src/core/tags/mod.rs

//! The tag index: a list-valued secondary index from tag to recipe ids.
//!
//! Writes append unconditionally, so a list may hold the same id many times.
//! Readers deduplicate by recipe URL, or by URI for recipes without one.

use crate::core::LarderError;
use crate::core::caller::Caller;
use crate::core::recipes::RecipeCache;
use crate::core::storage::KeyValueStore;
use crate::core::upstream::Recipe;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Prefix of every tag index key.
pub const TAG_KEY_PREFIX: &str = "recipe_tags";

pub fn tag_key(tag: &str) -> String {
    format!("{TAG_KEY_PREFIX}:{tag}")
}

#[derive(Debug, Clone)]
pub struct TagIndex {
    store: Arc<dyn KeyValueStore>,
    recipes: RecipeCache,
}

impl TagIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, recipes: RecipeCache) -> Self {
        Self { store, recipes }
    }

    pub async fn append_tag(&self, tag: &str, recipe_id: &str) -> Result<(), LarderError> {
        self.store
            .list_append(&tag_key(tag), recipe_id.to_string())
            .await?;
        Ok(())
    }

    /// The ids stored under `tag`, in insertion order, duplicates included.
    pub async fn list_by_tag(&self, tag: &str) -> Result<Vec<String>, LarderError> {
        self.store.list_range(&tag_key(tag)).await
    }

    /// The first id stored under the first tag that has any.
    pub async fn first_recipe_id(&self, tags: &[String]) -> Result<Option<String>, LarderError> {
        for tag in tags {
            if let Some(id) = self.list_by_tag(tag).await?.into_iter().next() {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Fetches every recipe listed under `tags` and removes duplicates by URL
    /// (URI when the URL is missing), keeping the first occurrence.
    pub async fn get_recipes_by_tags(&self, tags: &[String]) -> Result<Vec<Recipe>, LarderError> {
        let mut ids = Vec::new();
        for tag in tags {
            ids.extend(self.list_by_tag(tag).await?);
        }
        let recipes = self.recipes.fetch_by_ids(&ids).await?;

        let mut seen = HashSet::new();
        Ok(recipes
            .into_iter()
            .filter(|recipe| seen.insert(recipe.dedupe_key().to_string()))
            .collect())
    }

    /// Files `recipe_id` under every tag. Only admins may tag recipes.
    ///
    /// Input is validated before the role check, and the role check happens
    /// before any write.
    pub async fn set_tags_to_recipe(
        &self,
        caller: &Caller,
        recipe_id: &str,
        tags: &[String],
    ) -> Result<(), LarderError> {
        if recipe_id.trim().is_empty() {
            return Err(LarderError::InvalidInput("recipeId is required".to_string()));
        }
        if tags.is_empty() || tags.iter().any(|t| t.trim().is_empty()) {
            return Err(LarderError::InvalidInput(
                "At least one non-empty tag is required".to_string(),
            ));
        }
        if !caller.is_admin() {
            return Err(LarderError::Forbidden(
                "Only admins can tag recipes".to_string(),
            ));
        }

        for tag in tags {
            self.append_tag(tag.trim(), recipe_id).await?;
        }
        info!(
            "Admin '{}' tagged recipe '{}' with {:?}.",
            caller.user_id, recipe_id, tags
        );
        Ok(())
    }
}
