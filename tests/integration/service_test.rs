// tests/integration/service_test.rs

//! Integration tests for the orchestration layer
//! Tests: getRecipes in query and tag mode, getRecipe, favorites

use super::fixtures::{HITS_PER_PAGE, ScriptedProvider, recipe};
use super::test_helpers::{TestContext, admin, user};
use larder::core::recipes::recipe_key;
use larder::core::resolvers::{GetRecipeInput, GetRecipesInput, SetTagsInput};
use larder::core::storage::KeyValueStore;

fn query(q: &str, page: Option<i32>) -> GetRecipesInput {
    GetRecipesInput {
        query: Some(q.to_string()),
        tags: None,
        page,
    }
}

fn by_tags(tags: &[&str], page: Option<i32>) -> GetRecipesInput {
    GetRecipesInput {
        query: None,
        tags: Some(tags.iter().map(|s| s.to_string()).collect()),
        page,
    }
}

async fn tag(ctx: &TestContext, recipe_id: &str, tags: &[&str]) {
    ctx.state
        .recipes
        .set_tags_to_recipe(
            &admin("root"),
            SetTagsInput {
                recipe_id: Some(recipe_id.to_string()),
                tags: Some(tags.iter().map(|s| s.to_string()).collect()),
            },
        )
        .await
        .unwrap();
}

// ===== getRecipes =====

#[tokio::test]
async fn test_query_mode_walks_once_and_enriches() {
    let ctx = TestContext::with_provider(ScriptedProvider::new().with_pages("pasta", 4));
    let service = &ctx.state.recipes;

    let page3 = service.get_recipes(query("pasta", Some(3))).await.unwrap();
    assert_eq!(page3.len(), HITS_PER_PAGE);
    assert_eq!(ctx.provider.search_calls(), 3);
    assert!(page3.iter().all(|r| r.avg_rating.is_none() && r.amount_of_reviews.is_none()));

    let again = service.get_recipes(query("pasta", Some(3))).await.unwrap();
    assert_eq!(again, page3);
    assert_eq!(ctx.provider.search_calls(), 3);

    service.get_recipes(query("pasta", Some(4))).await.unwrap();
    assert_eq!(ctx.provider.search_calls(), 4);
}

#[tokio::test]
async fn test_query_mode_defaults_to_first_page() {
    let ctx = TestContext::with_provider(ScriptedProvider::new().with_pages("soup", 1));
    let recipes = ctx.state.recipes.get_recipes(query("soup", None)).await.unwrap();
    assert_eq!(recipes.len(), HITS_PER_PAGE);
    assert_eq!(ctx.provider.search_calls(), 1);
}

#[tokio::test]
async fn test_query_mode_past_the_end_is_exhaustion() {
    let ctx = TestContext::with_provider(ScriptedProvider::new().with_pages("soup", 1));
    let err = ctx
        .state
        .recipes
        .get_recipes(query("soup", Some(3)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "There are no recipes left");
}

#[tokio::test]
async fn test_invalid_inputs_touch_nothing() {
    let ctx = TestContext::with_provider(ScriptedProvider::new().with_pages("soup", 1));
    let service = &ctx.state.recipes;

    let err = service.get_recipes(query("soup", Some(0))).await.unwrap_err();
    assert_eq!(err.code(), "RANGE_ERROR");
    let err = service
        .get_recipes(GetRecipesInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INPUT_ERROR");

    assert_eq!(ctx.provider.search_calls(), 0);
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_pages_above_the_configured_bound_are_range_errors() {
    let ctx = TestContext::with_provider(ScriptedProvider::new().with_pages("soup", 3));
    let service = &ctx.state.recipes;

    // The test configuration allows pages up to 50.
    let err = service
        .get_recipes(query("soup", Some(i32::MAX)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RANGE_ERROR");
    let err = service
        .get_recipes(by_tags(&["vegan"], Some(51)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RANGE_ERROR");
    assert_eq!(ctx.provider.search_calls(), 0);

    let err = service.get_recipes(query("soup", Some(50))).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(ctx.provider.search_calls(), 3);
}

#[tokio::test]
async fn test_tag_mode_slices_deduplicated_recipes() {
    let ctx = TestContext::new();
    for id in ["t1", "t2", "t3"] {
        ctx.provider
            .add_recipe(recipe(id, &format!("https://cook.test/{id}")));
    }
    tag(&ctx, "t1", &["vegan"]).await;
    tag(&ctx, "t2", &["vegan"]).await;
    tag(&ctx, "t1", &["vegan"]).await;
    tag(&ctx, "t3", &["vegan"]).await;

    let service = &ctx.state.recipes;
    // The test configuration uses two recipes per tag page.
    let first = service.get_recipes(by_tags(&["vegan"], None)).await.unwrap();
    let second = service.get_recipes(by_tags(&["vegan"], Some(2))).await.unwrap();

    let urls = |page: &[larder::core::reviews::EnrichedRecipe]| -> Vec<String> {
        page.iter().map(|r| r.recipe.url.clone()).collect()
    };
    assert_eq!(urls(&first), vec!["https://cook.test/t1", "https://cook.test/t2"]);
    assert_eq!(urls(&second), vec!["https://cook.test/t3"]);

    let err = service
        .get_recipes(by_tags(&["vegan"], Some(3)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "There are no recipes left");
    assert_eq!(ctx.provider.search_calls(), 0);
}

// ===== getRecipe =====

#[tokio::test]
async fn test_get_recipe_returns_reviews_and_statistics() {
    let ctx = TestContext::new();
    ctx.provider.add_recipe(recipe("r1", "https://cook.test/r1"));
    let reviews = &ctx.state.reviews;
    reviews.review_recipe(&user("a"), "r1", None, 5).await.unwrap();
    reviews.review_recipe(&user("b"), "r1", Some("ok".into()), 2).await.unwrap();

    let details = ctx
        .state
        .recipes
        .get_recipe(GetRecipeInput {
            id: Some("r1".into()),
            tags: None,
        })
        .await
        .unwrap();

    assert_eq!(details.recipe.url, "https://cook.test/r1");
    assert_eq!(details.reviews.len(), 2);
    assert_eq!(details.avg_rating, Some(3.5));
    assert_eq!(details.amount_of_reviews, Some(2));
}

#[tokio::test]
async fn test_get_recipe_by_tags_uses_first_tagged_recipe() {
    let ctx = TestContext::new();
    ctx.provider.add_recipe(recipe("r7", "https://cook.test/r7"));
    tag(&ctx, "r7", &["dessert"]).await;

    let details = ctx
        .state
        .recipes
        .get_recipe(GetRecipeInput {
            id: None,
            tags: Some(vec!["nothing".into(), "dessert".into()]),
        })
        .await
        .unwrap();
    assert!(details.recipe.uri.ends_with("r7"));
    assert_eq!(details.avg_rating, None);
    assert!(details.reviews.is_empty());

    let err = ctx
        .state
        .recipes
        .get_recipe(GetRecipeInput {
            id: None,
            tags: Some(vec!["nothing".into()]),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_get_recipe_with_no_upstream_hit_is_not_found_and_writes_nothing() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .recipes
        .get_recipe(GetRecipeInput {
            id: Some("ghost".into()),
            tags: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(ctx.provider.lookup_calls(), 1);
    assert!(ctx.store.get(&recipe_key("ghost")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_tags_requires_admin() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .recipes
        .set_tags_to_recipe(
            &user("bob"),
            SetTagsInput {
                recipe_id: Some("r1".into()),
                tags: Some(vec!["vegan".into()]),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert!(ctx.store.is_empty());
}

// ===== Favorites =====

#[tokio::test]
async fn test_favorites_toggle_and_list_in_order() {
    let ctx = TestContext::new();
    for id in ["f1", "f2"] {
        ctx.provider
            .add_recipe(recipe(id, &format!("https://cook.test/{id}")));
    }
    let favorites = &ctx.state.favorites;
    let alice = user("alice");

    assert!(favorites.toggle_favorite(&alice, "f2").await.unwrap());
    assert!(favorites.toggle_favorite(&alice, "f1").await.unwrap());
    let listed = favorites.get_favorites(&alice).await.unwrap();
    let urls: Vec<&str> = listed.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://cook.test/f2", "https://cook.test/f1"]);

    assert!(!favorites.toggle_favorite(&alice, "f2").await.unwrap());
    assert_eq!(favorites.get_favorites(&alice).await.unwrap().len(), 1);
    assert!(favorites.get_favorites(&user("bob")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_recipe_cannot_be_favorited() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .favorites
        .toggle_favorite(&user("alice"), "ghost")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    assert!(ctx.state.favorites.get_favorites(&user("alice")).await.unwrap().is_empty());
}

// ===== Saved recipes =====

#[tokio::test]
async fn test_saved_recipes_list_the_most_recent_tail() {
    let ctx = TestContext::new();
    for id in ["s1", "s2", "s3"] {
        ctx.provider
            .add_recipe(recipe(id, &format!("https://cook.test/{id}")));
    }
    let saved = &ctx.state.saved;
    let alice = user("alice");

    for id in ["s1", "s2", "s3"] {
        assert!(saved.toggle_saved(&alice, id).await.unwrap());
    }
    let urls = |recipes: Vec<larder::core::upstream::Recipe>| -> Vec<String> {
        recipes.into_iter().map(|r| r.url).collect()
    };

    assert_eq!(
        urls(saved.get_saved(&alice, None).await.unwrap()),
        vec!["https://cook.test/s1", "https://cook.test/s2", "https://cook.test/s3"]
    );
    assert_eq!(
        urls(saved.get_saved(&alice, Some(2)).await.unwrap()),
        vec!["https://cook.test/s2", "https://cook.test/s3"]
    );
    assert_eq!(saved.get_saved(&alice, Some(0)).await.unwrap().len(), 3);
    assert_eq!(saved.get_saved(&alice, Some(10)).await.unwrap().len(), 3);

    // Unsaving removes the entry; saving again moves it to the end.
    assert!(!saved.toggle_saved(&alice, "s1").await.unwrap());
    assert!(saved.toggle_saved(&alice, "s1").await.unwrap());
    assert_eq!(
        urls(saved.get_saved(&alice, Some(1)).await.unwrap()),
        vec!["https://cook.test/s1"]
    );
    assert!(saved.get_saved(&user("bob"), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_saved_recipes_reject_bad_input() {
    let ctx = TestContext::new();
    let saved = &ctx.state.saved;
    let alice = user("alice");

    let err = saved.toggle_saved(&alice, "ghost").await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    let err = saved.toggle_saved(&alice, "  ").await.unwrap_err();
    assert_eq!(err.code(), "INPUT_ERROR");
    let err = saved.get_saved(&alice, Some(-1)).await.unwrap_err();
    assert_eq!(err.code(), "RANGE_ERROR");

    assert!(saved.get_saved(&alice, None).await.unwrap().is_empty());
    // Saved recipes are kept apart from favorites.
    assert!(ctx.state.favorites.get_favorites(&alice).await.unwrap().is_empty());
}
