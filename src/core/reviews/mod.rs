// src/core/reviews/mod.rs

//! Recipe reviews: storage, rating aggregation and the review write paths.

pub mod aggregation;
pub mod service;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use aggregation::{EnrichedRecipe, RatingSummary, ReviewAggregator};
pub use service::ReviewService;
pub use store::{MemoryReviewStore, ReviewStore};

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;
/// Maximum length of a review text in characters.
pub const MAX_REVIEW_LEN: usize = 256;
/// Bounds on the length of a report message in characters, after trimming.
pub const MIN_REPORT_LEN: usize = 12;
pub const MAX_REPORT_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub rating: u8,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub id: String,
    pub review_id: String,
    pub sender_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
