// src/core/reviews/aggregation.rs

//! Review aggregation and recipe enrichment.

use super::Review;
use super::store::ReviewStore;
use crate::core::LarderError;
use crate::core::recipes::recipe_id_from_uri;
use crate::core::upstream::Recipe;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Average rating and review count of a recipe.
///
/// Both are `None` when the recipe has no reviews yet, which is distinct from
/// a rating of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: Option<u64>,
}

/// A recipe with its review statistics attached, built per response.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecipe {
    pub recipe: Recipe,
    pub avg_rating: Option<f64>,
    pub amount_of_reviews: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ReviewAggregator {
    store: Arc<dyn ReviewStore>,
    uri_prefix: String,
    concurrency: usize,
}

impl ReviewAggregator {
    pub fn new(store: Arc<dyn ReviewStore>, uri_prefix: String, concurrency: usize) -> Self {
        Self {
            store,
            uri_prefix,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn average_and_count(&self, recipe_id: &str) -> Result<RatingSummary, LarderError> {
        Ok(match self.store.aggregate_rating(recipe_id).await? {
            Some((average, count)) => RatingSummary {
                average: Some(average),
                count: Some(count),
            },
            None => RatingSummary::default(),
        })
    }

    /// Every review of the recipe, oldest first.
    pub async fn reviews_of(&self, recipe_id: &str) -> Result<Vec<Review>, LarderError> {
        self.store.find_by_recipe(recipe_id).await
    }

    /// Attaches rating statistics to every recipe, computed concurrently, in input order.
    pub async fn enrich_all(&self, recipes: Vec<Recipe>) -> Result<Vec<EnrichedRecipe>, LarderError> {
        stream::iter(recipes)
            .map(|recipe| async move {
                let summary = self
                    .average_and_count(recipe_id_from_uri(&recipe.uri, &self.uri_prefix))
                    .await?;
                Ok::<_, LarderError>(EnrichedRecipe {
                    recipe,
                    avg_rating: summary.average,
                    amount_of_reviews: summary.count,
                })
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
