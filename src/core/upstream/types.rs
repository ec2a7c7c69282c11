// src/core/upstream/types.rs

//! Wire types of the upstream recipe API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recipe as returned by the upstream provider.
///
/// The commonly used fields are typed; everything else the provider sends
/// (images, nutrients, digest, ...) is kept verbatim in `extra` so that the
/// cached record is the full upstream payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// The canonical URI; the recipe id is this value without the provider prefix.
    pub uri: String,
    /// The publisher's page for the recipe. Used for deduplication.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub diet_labels: Vec<String>,
    #[serde(default)]
    pub health_labels: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
    #[serde(default)]
    pub ingredient_lines: Vec<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub total_weight: Option<f64>,
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default)]
    pub cuisine_type: Vec<String>,
    #[serde(default)]
    pub meal_type: Vec<String>,
    #[serde(default)]
    pub dish_type: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// The identity used to merge duplicate results: the publisher URL, or the
    /// canonical URI when the provider sent no URL.
    pub fn dedupe_key(&self) -> &str {
        if self.url.is_empty() { &self.uri } else { &self.url }
    }
}

/// One element of a result page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeHit {
    pub recipe: Recipe,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

/// A page of search results together with its continuation cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub hits: Vec<RecipeHit>,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

impl SearchPage {
    /// The opaque link that continues the result set, if the provider sent one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.links.next.as_ref().map(|link| link.href.as_str())
    }

    pub fn into_recipes(self) -> Vec<Recipe> {
        self.hits.into_iter().map(|hit| hit.recipe).collect()
    }
}
