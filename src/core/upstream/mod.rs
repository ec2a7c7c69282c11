// src/core/upstream/mod.rs

//! The upstream recipe provider seam.

pub mod edamam;
pub mod types;

use crate::core::LarderError;
use async_trait::async_trait;

pub use edamam::EdamamClient;
pub use types::{Recipe, RecipeHit, SearchPage};

/// A cursor-paginated recipe API.
#[async_trait]
pub trait RecipeProvider: Send + Sync + std::fmt::Debug {
    /// The search endpoint, without credentials. Used to build page cache keys.
    fn base_url(&self) -> &str;

    /// The URL of page 1 of the results for `query`.
    fn search_url(&self, query: &str) -> Result<String, LarderError>;

    /// Fetches one page by following `url`, which is either a `search_url`
    /// or a cursor link from a previous page.
    async fn search(&self, url: &str) -> Result<SearchPage, LarderError>;

    /// Looks up a single recipe by canonical URI. The page holds zero or one hits.
    async fn lookup_by_uri(&self, uri: &str) -> Result<SearchPage, LarderError>;
}
