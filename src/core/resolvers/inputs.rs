// src/core/resolvers/inputs.rs

//! Typed operation inputs, validated at the orchestration boundary.

use crate::core::LarderError;

/// Arguments of `getRecipes` as received from the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRecipesInput {
    pub query: Option<String>,
    pub tags: Option<Vec<String>>,
    pub page: Option<i32>,
}

/// A validated `getRecipes` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSearch {
    /// Free-text search, paginated by following upstream cursors.
    Query { query: String, page: u32 },
    /// Tag-filtered browsing, paginated by slicing the tag index.
    Tags { tags: Vec<String>, page: u32 },
}

impl GetRecipesInput {
    /// Checks the page range and that exactly one of `query` or `tags` is given.
    pub fn validate(self) -> Result<RecipeSearch, LarderError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(LarderError::OutOfRange(
                "Page can't be zero or negative value".to_string(),
            ));
        }
        let page = page as u32;

        let query = self
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let tags = normalize_tags(self.tags);

        match (query, tags.is_empty()) {
            (Some(query), true) => Ok(RecipeSearch::Query { query, page }),
            (None, false) => Ok(RecipeSearch::Tags { tags, page }),
            (Some(_), false) => Err(LarderError::InvalidInput(
                "Provide either a query or tags, not both".to_string(),
            )),
            (None, true) => Err(LarderError::InvalidInput(
                "Either a query or at least one tag is required".to_string(),
            )),
        }
    }
}

/// Arguments of `getRecipe` as received from the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRecipeInput {
    pub id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A validated `getRecipe` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeLookup {
    ById(String),
    /// Resolve one representative recipe from the tag index.
    ByTags(Vec<String>),
}

impl GetRecipeInput {
    pub fn validate(self) -> Result<RecipeLookup, LarderError> {
        if let Some(id) = self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
            return Ok(RecipeLookup::ById(id));
        }
        let tags = normalize_tags(self.tags);
        if tags.is_empty() {
            return Err(LarderError::InvalidInput(
                "Either an id or at least one tag is required".to_string(),
            ));
        }
        Ok(RecipeLookup::ByTags(tags))
    }
}

/// Arguments of the `setTagsToRecipe` mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetTagsInput {
    pub recipe_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Trims tags and drops blank ones.
fn normalize_tags(tags: Option<Vec<String>>) -> Vec<String> {
    tags.unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
