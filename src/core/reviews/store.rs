// src/core/reviews/store.rs

//! The review document store seam and its in-process implementation.

use super::{Review, ReviewReport};
use crate::core::LarderError;
use async_trait::async_trait;
use parking_lot::RwLock;

#[async_trait]
pub trait ReviewStore: Send + Sync + std::fmt::Debug {
    /// All reviews of a recipe, oldest first.
    async fn find_by_recipe(&self, recipe_id: &str) -> Result<Vec<Review>, LarderError>;

    async fn find_by_id(&self, review_id: &str) -> Result<Option<Review>, LarderError>;

    async fn find_by_recipe_and_user(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> Result<Option<Review>, LarderError>;

    /// Groups the reviews of a recipe and returns `(average rating, count)`,
    /// or `None` when the recipe has no reviews.
    async fn aggregate_rating(&self, recipe_id: &str) -> Result<Option<(f64, u64)>, LarderError>;

    async fn create(&self, review: Review) -> Result<(), LarderError>;

    /// Replaces the stored review with the same id. Fails if it does not exist.
    async fn update(&self, review: Review) -> Result<(), LarderError>;

    /// Returns `true` if a review was deleted.
    async fn delete(&self, review_id: &str) -> Result<bool, LarderError>;

    async fn create_report(&self, report: ReviewReport) -> Result<(), LarderError>;
}

#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
    reports: RwLock<Vec<ReviewReport>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored report, oldest first.
    pub fn reports(&self) -> Vec<ReviewReport> {
        self.reports.read().clone()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn find_by_recipe(&self, recipe_id: &str) -> Result<Vec<Review>, LarderError> {
        Ok(self
            .reviews
            .read()
            .iter()
            .filter(|r| r.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, review_id: &str) -> Result<Option<Review>, LarderError> {
        Ok(self
            .reviews
            .read()
            .iter()
            .find(|r| r.id == review_id)
            .cloned())
    }

    async fn find_by_recipe_and_user(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> Result<Option<Review>, LarderError> {
        Ok(self
            .reviews
            .read()
            .iter()
            .find(|r| r.recipe_id == recipe_id && r.user_id == user_id)
            .cloned())
    }

    async fn aggregate_rating(&self, recipe_id: &str) -> Result<Option<(f64, u64)>, LarderError> {
        let guard = self.reviews.read();
        let (sum, count) = guard
            .iter()
            .filter(|r| r.recipe_id == recipe_id)
            .fold((0u64, 0u64), |(sum, count), r| {
                (sum + u64::from(r.rating), count + 1)
            });
        if count == 0 {
            return Ok(None);
        }
        Ok(Some((sum as f64 / count as f64, count)))
    }

    async fn create(&self, review: Review) -> Result<(), LarderError> {
        self.reviews.write().push(review);
        Ok(())
    }

    async fn update(&self, review: Review) -> Result<(), LarderError> {
        let mut guard = self.reviews.write();
        match guard.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => {
                *existing = review;
                Ok(())
            }
            None => Err(LarderError::Storage(format!(
                "review '{}' vanished during update",
                review.id
            ))),
        }
    }

    async fn delete(&self, review_id: &str) -> Result<bool, LarderError> {
        let mut guard = self.reviews.write();
        let before = guard.len();
        guard.retain(|r| r.id != review_id);
        Ok(guard.len() != before)
    }

    async fn create_report(&self, report: ReviewReport) -> Result<(), LarderError> {
        self.reports.write().push(report);
        Ok(())
    }
}
