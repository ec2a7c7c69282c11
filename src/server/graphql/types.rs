// src/server/graphql/types.rs

//! GraphQL object and input types, converted from the core domain types.

use crate::core::recipes::recipe_id_from_uri;
use crate::core::resolvers::RecipeDetails;
use crate::core::reviews::{EnrichedRecipe, Review};
use crate::core::upstream::Recipe;
use async_graphql::{InputObject, SimpleObject};

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Recipe")]
pub struct GqlRecipe {
    pub id: String,
    pub uri: String,
    pub url: String,
    pub label: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
    pub diet_labels: Vec<String>,
    pub health_labels: Vec<String>,
    pub cautions: Vec<String>,
    pub ingredient_lines: Vec<String>,
    pub calories: Option<f64>,
    pub total_weight: Option<f64>,
    pub total_time: Option<f64>,
    pub cuisine_type: Vec<String>,
    pub meal_type: Vec<String>,
    pub dish_type: Vec<String>,
}

impl GqlRecipe {
    pub fn new(recipe: Recipe, uri_prefix: &str) -> Self {
        Self {
            id: recipe_id_from_uri(&recipe.uri, uri_prefix).to_string(),
            uri: recipe.uri,
            url: recipe.url,
            label: recipe.label,
            image: recipe.image,
            source: recipe.source,
            diet_labels: recipe.diet_labels,
            health_labels: recipe.health_labels,
            cautions: recipe.cautions,
            ingredient_lines: recipe.ingredient_lines,
            calories: recipe.calories,
            total_weight: recipe.total_weight,
            total_time: recipe.total_time,
            cuisine_type: recipe.cuisine_type,
            meal_type: recipe.meal_type,
            dish_type: recipe.dish_type,
        }
    }
}

/// A search result: the recipe fields plus its rating statistics.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "RecipeWithAvgRating")]
pub struct GqlRecipeWithRating {
    #[graphql(flatten)]
    pub recipe: GqlRecipe,
    pub avg_rating: Option<f64>,
    pub amount_of_reviews: Option<u64>,
}

impl GqlRecipeWithRating {
    pub fn new(enriched: EnrichedRecipe, uri_prefix: &str) -> Self {
        Self {
            recipe: GqlRecipe::new(enriched.recipe, uri_prefix),
            avg_rating: enriched.avg_rating,
            amount_of_reviews: enriched.amount_of_reviews,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Review")]
pub struct GqlReview {
    pub id: String,
    pub user_id: String,
    pub review: Option<String>,
    pub rating: i32,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<Review> for GqlReview {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            review: review.text,
            rating: i32::from(review.rating),
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "RecipeWithReviewsAndAvgRating")]
pub struct GqlRecipeDetails {
    pub recipe: GqlRecipe,
    pub reviews: Vec<GqlReview>,
    pub avg_rating: Option<f64>,
    pub amount_of_reviews: Option<u64>,
}

impl GqlRecipeDetails {
    pub fn new(details: RecipeDetails, uri_prefix: &str) -> Self {
        Self {
            recipe: GqlRecipe::new(details.recipe, uri_prefix),
            reviews: details.reviews.into_iter().map(GqlReview::from).collect(),
            avg_rating: details.avg_rating,
            amount_of_reviews: details.amount_of_reviews,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct ReviewInput {
    pub recipe_id: String,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, InputObject)]
pub struct ChangeReviewInput {
    pub review_id: String,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, InputObject)]
pub struct ReviewIdInput {
    pub id: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct ReportInput {
    pub review_id: String,
    pub message: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct RecipeIdInput {
    pub recipe_id: String,
}
