// tests/integration/recipes_test.rs

//! Integration tests for the recipe cache facade
//! Tests: get-or-fetch, not-found handling, order-preserving batch fetch

use super::fixtures::{URI_PREFIX, recipe};
use super::test_helpers::TestContext;
use larder::core::recipes::recipe_key;
use larder::core::storage::KeyValueStore;

#[tokio::test]
async fn test_miss_fetches_once_then_serves_from_cache() {
    let ctx = TestContext::new();
    ctx.provider.add_recipe(recipe("abc", "https://cook.test/abc"));
    let cache = ctx.recipe_cache();

    let fetched = cache.get_or_fetch("abc").await.unwrap();
    assert_eq!(fetched.uri, format!("{URI_PREFIX}abc"));
    assert_eq!(ctx.provider.lookup_calls(), 1);
    assert!(ctx.store.get(&recipe_key("abc")).await.unwrap().is_some());

    let cached = cache.get_or_fetch("abc").await.unwrap();
    assert_eq!(cached, fetched);
    assert_eq!(ctx.provider.lookup_calls(), 1);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found_and_not_cached() {
    let ctx = TestContext::new();
    let cache = ctx.recipe_cache();

    let err = cache.get_or_fetch("missing").await.unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.to_string(), "Recipe with provided id does not exist");
    assert!(ctx.store.get(&recipe_key("missing")).await.unwrap().is_none());
    assert!(cache.cached("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_batch_fetch_preserves_input_order_and_duplicates() {
    let ctx = TestContext::new();
    for id in ["a", "b", "c"] {
        ctx.provider
            .add_recipe(recipe(id, &format!("https://cook.test/{id}")));
    }
    let cache = ctx.recipe_cache();
    // Warm one entry so the batch mixes hits and misses.
    cache.get_or_fetch("b").await.unwrap();

    let ids: Vec<String> = ["c", "a", "b", "a"].iter().map(|s| s.to_string()).collect();
    let recipes = cache.fetch_by_ids(&ids).await.unwrap();

    let got: Vec<&str> = recipes.iter().map(|r| cache.recipe_id(r)).collect();
    assert_eq!(got, vec!["c", "a", "b", "a"]);
}

#[tokio::test]
async fn test_batch_fetch_fails_on_first_unknown_id() {
    let ctx = TestContext::new();
    ctx.provider.add_recipe(recipe("a", "https://cook.test/a"));
    let cache = ctx.recipe_cache();

    let ids = vec!["a".to_string(), "ghost".to_string()];
    let err = cache.fetch_by_ids(&ids).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_empty_batch_makes_no_calls() {
    let ctx = TestContext::new();
    let recipes = ctx.recipe_cache().fetch_by_ids(&[]).await.unwrap();
    assert!(recipes.is_empty());
    assert_eq!(ctx.provider.lookup_calls(), 0);
}

#[tokio::test]
async fn test_batch_fetch_runs_on_a_spawned_task() {
    let ctx = TestContext::new();
    for id in ["a", "b"] {
        ctx.provider
            .add_recipe(recipe(id, &format!("https://cook.test/{id}")));
    }
    let cache = ctx.recipe_cache();
    let ids = vec!["b".to_string(), "a".to_string()];

    // The batch future must be Send to run on the multi-threaded runtime.
    let recipes = tokio::spawn(async move { cache.fetch_by_ids(&ids).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].url, "https://cook.test/b");
}
