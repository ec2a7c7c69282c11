// src/core/resolvers/mod.rs

//! The orchestration layer behind the GraphQL operations.
//!
//! `RecipeService` composes the cursor-chain resolver, the recipe cache, the tag
//! index and review aggregation. Inputs arrive as typed structs and are
//! validated here before any cache or upstream access.

pub mod inputs;

use crate::core::LarderError;
use crate::core::caller::Caller;
use crate::core::pagination::{CursorChainResolver, page_cache_key};
use crate::core::recipes::RecipeCache;
use crate::core::reviews::{EnrichedRecipe, Review, ReviewAggregator};
use crate::core::tags::TagIndex;
use crate::core::upstream::{Recipe, RecipeProvider};
use std::sync::Arc;
use tracing::debug;

pub use inputs::{
    GetRecipeInput, GetRecipesInput, RecipeLookup, RecipeSearch, SetTagsInput,
};

/// A single recipe with its reviews and rating statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub reviews: Vec<Review>,
    pub avg_rating: Option<f64>,
    pub amount_of_reviews: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RecipeService {
    provider: Arc<dyn RecipeProvider>,
    resolver: CursorChainResolver,
    recipes: RecipeCache,
    aggregator: ReviewAggregator,
    tags: TagIndex,
    tag_page_size: usize,
    max_page: u32,
}

impl RecipeService {
    pub fn new(
        provider: Arc<dyn RecipeProvider>,
        resolver: CursorChainResolver,
        recipes: RecipeCache,
        aggregator: ReviewAggregator,
        tags: TagIndex,
        tag_page_size: usize,
        max_page: u32,
    ) -> Self {
        Self {
            provider,
            resolver,
            recipes,
            aggregator,
            tags,
            tag_page_size: tag_page_size.max(1),
            max_page: max_page.max(1),
        }
    }

    /// `getRecipes`: one page of enriched recipes, by free-text query or by tags.
    pub async fn get_recipes(
        &self,
        input: GetRecipesInput,
    ) -> Result<Vec<EnrichedRecipe>, LarderError> {
        let recipes = match input.validate()? {
            RecipeSearch::Query { query, page } => {
                self.check_page_bound(page)?;
                self.search_page(&query, page).await?
            }
            RecipeSearch::Tags { tags, page } => {
                self.check_page_bound(page)?;
                self.tagged_page(&tags, page).await?
            }
        };
        self.aggregator.enrich_all(recipes).await
    }

    fn check_page_bound(&self, page: u32) -> Result<(), LarderError> {
        if page > self.max_page {
            return Err(LarderError::OutOfRange(format!(
                "Page can't be greater than {}",
                self.max_page
            )));
        }
        Ok(())
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<Recipe>, LarderError> {
        let cache_key = page_cache_key(self.provider.base_url(), query, &[]);
        let first_page_url = self.provider.search_url(query)?;
        let resolved = self
            .resolver
            .resolve_page(&cache_key, &first_page_url, page)
            .await?;
        debug!(
            "Resolved page {} of '{}' with {} upstream calls.",
            page, query, resolved.upstream_calls
        );
        Ok(resolved.hits.into_iter().map(|hit| hit.recipe).collect())
    }

    async fn tagged_page(&self, tags: &[String], page: u32) -> Result<Vec<Recipe>, LarderError> {
        let all = self.tags.get_recipes_by_tags(tags).await?;
        let start = (page as usize - 1).saturating_mul(self.tag_page_size);
        let slice: Vec<Recipe> = all
            .into_iter()
            .skip(start)
            .take(self.tag_page_size)
            .collect();
        if slice.is_empty() {
            return Err(LarderError::no_recipes_left());
        }
        Ok(slice)
    }

    /// `getRecipe`: a recipe by id, or a representative recipe of the given tags,
    /// with its reviews and rating statistics.
    pub async fn get_recipe(&self, input: GetRecipeInput) -> Result<RecipeDetails, LarderError> {
        let recipe_id = match input.validate()? {
            RecipeLookup::ById(id) => id,
            RecipeLookup::ByTags(tags) => self.tags.first_recipe_id(&tags).await?.ok_or_else(|| {
                LarderError::NotFound("No recipe is tagged with the given tags".to_string())
            })?,
        };

        let recipe = self.recipes.get_or_fetch(&recipe_id).await?;
        let (reviews, summary) = tokio::try_join!(
            self.aggregator.reviews_of(&recipe_id),
            self.aggregator.average_and_count(&recipe_id),
        )?;

        Ok(RecipeDetails {
            recipe,
            reviews,
            avg_rating: summary.average,
            amount_of_reviews: summary.count,
        })
    }

    /// `setTagsToRecipe`: admin-only tagging mutation.
    pub async fn set_tags_to_recipe(
        &self,
        caller: &Caller,
        input: SetTagsInput,
    ) -> Result<(), LarderError> {
        let recipe_id = input.recipe_id.unwrap_or_default();
        let tags = input.tags.unwrap_or_default();
        self.tags.set_tags_to_recipe(caller, &recipe_id, &tags).await
    }
}
