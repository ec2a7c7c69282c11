// src/core/reviews/service.rs

//! The review write paths: create, change, remove and report.

use super::store::ReviewStore;
use super::{
    MAX_RATING, MAX_REPORT_LEN, MAX_REVIEW_LEN, MIN_RATING, MIN_REPORT_LEN, Review, ReviewReport,
};
use crate::core::LarderError;
use crate::core::caller::Caller;
use crate::core::recipes::RecipeCache;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    recipes: RecipeCache,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>, recipes: RecipeCache) -> Self {
        Self { store, recipes }
    }

    /// Creates the caller's review of a recipe. Returns the new review id.
    ///
    /// The one-review-per-user rule is checked by query-before-insert, so two
    /// concurrent submissions by the same user can both succeed.
    pub async fn review_recipe(
        &self,
        caller: &Caller,
        recipe_id: &str,
        text: Option<String>,
        rating: i32,
    ) -> Result<String, LarderError> {
        if recipe_id.trim().is_empty() {
            return Err(LarderError::InvalidInput("recipeId is required".to_string()));
        }
        let rating = validate_rating(rating)?;
        let text = text.map(validate_review_text).transpose()?;

        if self
            .store
            .find_by_recipe_and_user(recipe_id, &caller.user_id)
            .await?
            .is_some()
        {
            return Err(LarderError::InvalidInput(
                "You can't create more than one review for each recipe".to_string(),
            ));
        }

        // Makes sure the recipe exists and leaves it cached for the next read.
        self.recipes.get_or_fetch(recipe_id).await?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            recipe_id: recipe_id.to_string(),
            user_id: caller.user_id.clone(),
            rating,
            text,
            created_at: Utc::now(),
        };
        let id = review.id.clone();
        self.store.create(review).await?;
        info!("User '{}' reviewed recipe '{}'.", caller.user_id, recipe_id);
        Ok(id)
    }

    /// Changes the text and/or rating of the caller's own review.
    pub async fn change_review(
        &self,
        caller: &Caller,
        review_id: &str,
        text: Option<String>,
        rating: Option<i32>,
    ) -> Result<(), LarderError> {
        let mut review = self.owned_review(caller, review_id).await?;

        if text.is_none() && rating.is_none() {
            return Err(LarderError::InvalidInput(
                "You need to provide at least one changed value".to_string(),
            ));
        }
        if let Some(text) = text {
            review.text = Some(validate_review_text(text)?);
        }
        if let Some(rating) = rating {
            review.rating = validate_rating(rating)?;
        }

        self.store.update(review).await
    }

    /// Deletes the caller's own review.
    pub async fn remove_review(&self, caller: &Caller, review_id: &str) -> Result<(), LarderError> {
        let review = self.owned_review(caller, review_id).await?;
        self.store.delete(&review.id).await?;
        Ok(())
    }

    /// Files a report against someone else's review.
    pub async fn report_review(
        &self,
        caller: &Caller,
        review_id: &str,
        message: &str,
    ) -> Result<(), LarderError> {
        let review = self
            .store
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| LarderError::NotFound("There is no review with such id".to_string()))?;

        if review.user_id == caller.user_id {
            return Err(LarderError::InvalidInput(
                "You can't report your own reviews".to_string(),
            ));
        }

        let message = message.trim();
        let len = message.chars().count();
        if len < MIN_REPORT_LEN {
            return Err(LarderError::InvalidInput(format!(
                "Message should be at least {MIN_REPORT_LEN} characters long"
            )));
        }
        if len > MAX_REPORT_LEN {
            return Err(LarderError::InvalidInput(format!(
                "Message can't be longer than {MAX_REPORT_LEN} characters"
            )));
        }

        self.store
            .create_report(ReviewReport {
                id: Uuid::new_v4().to_string(),
                review_id: review.id,
                sender_id: caller.user_id.clone(),
                message: message.to_string(),
                created_at: Utc::now(),
            })
            .await
    }

    /// Loads a review and checks that the caller wrote it.
    async fn owned_review(&self, caller: &Caller, review_id: &str) -> Result<Review, LarderError> {
        let review = self
            .store
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| LarderError::NotFound("Review with provided id does not exist".to_string()))?;
        if review.user_id != caller.user_id {
            return Err(LarderError::Forbidden(
                "You can't change reviews that are not yours".to_string(),
            ));
        }
        Ok(review)
    }
}

fn validate_rating(rating: i32) -> Result<u8, LarderError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(LarderError::InvalidInput(format!(
            "Rating can't be less than {MIN_RATING} or greater than {MAX_RATING}"
        )));
    }
    Ok(rating as u8)
}

fn validate_review_text(text: String) -> Result<String, LarderError> {
    if text.trim().is_empty() {
        return Err(LarderError::InvalidInput(
            "Review should contain at least one character".to_string(),
        ));
    }
    if text.chars().count() > MAX_REVIEW_LEN {
        return Err(LarderError::InvalidInput(format!(
            "Review can't be longer than {MAX_REVIEW_LEN} characters"
        )));
    }
    Ok(text)
}
