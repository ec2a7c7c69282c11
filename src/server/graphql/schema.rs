// src/server/graphql/schema.rs

//! Query and mutation roots. Each resolver pulls the shared state and the
//! request's caller out of the context and delegates to a core service.

use super::types::{
    ChangeReviewInput, GqlRecipe, GqlRecipeDetails, GqlRecipeWithRating, RecipeIdInput,
    ReportInput, ReviewIdInput, ReviewInput,
};
use crate::core::caller::{Caller, require_caller};
use crate::core::resolvers::{GetRecipeInput, GetRecipesInput, SetTagsInput};
use crate::core::{AppState, LarderError};
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};
use std::sync::Arc;

pub type LarderSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with the application state attached as context data.
pub fn build_schema(state: Arc<AppState>) -> LarderSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

impl ErrorExtensions for LarderError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            e.set("status", i32::from(self.http_status()));
        })
    }
}

/// Converts a core result, keeping the error code and status as extensions.
fn gql<T>(res: Result<T, LarderError>) -> Result<T> {
    res.map_err(|e| e.extend())
}

fn state<'a>(ctx: &Context<'a>) -> &'a Arc<AppState> {
    ctx.data_unchecked::<Arc<AppState>>()
}

fn caller<'a>(ctx: &Context<'a>) -> Result<&'a Caller> {
    gql(require_caller(ctx.data_opt::<Caller>()))
}

fn uri_prefix<'a>(ctx: &Context<'a>) -> &'a str {
    &state(ctx).config.upstream.recipe_uri_prefix
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// One page of recipes matching a free-text query, or carrying any of the given tags.
    async fn get_recipes(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
        tags: Option<Vec<String>>,
        page: Option<i32>,
    ) -> Result<Vec<GqlRecipeWithRating>> {
        caller(ctx)?;
        let recipes = gql(
            state(ctx)
                .recipes
                .get_recipes(GetRecipesInput { query, tags, page })
                .await,
        )?;
        let prefix = uri_prefix(ctx);
        Ok(recipes
            .into_iter()
            .map(|r| GqlRecipeWithRating::new(r, prefix))
            .collect())
    }

    /// A recipe by id, or the first recipe filed under the given tags, with its reviews.
    async fn get_recipe(
        &self,
        ctx: &Context<'_>,
        id: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<GqlRecipeDetails> {
        caller(ctx)?;
        let details = gql(
            state(ctx)
                .recipes
                .get_recipe(GetRecipeInput { id, tags })
                .await,
        )?;
        Ok(GqlRecipeDetails::new(details, uri_prefix(ctx)))
    }

    async fn get_favorites(&self, ctx: &Context<'_>) -> Result<Vec<GqlRecipe>> {
        let caller = caller(ctx)?;
        let recipes = gql(state(ctx).favorites.get_favorites(caller).await)?;
        let prefix = uri_prefix(ctx);
        Ok(recipes
            .into_iter()
            .map(|r| GqlRecipe::new(r, prefix))
            .collect())
    }

    /// The caller's saved recipes, oldest first. `size` keeps only the most recent saves.
    async fn get_saved_recipes(&self, ctx: &Context<'_>, size: Option<i32>) -> Result<Vec<GqlRecipe>> {
        let caller = caller(ctx)?;
        let recipes = gql(state(ctx).saved.get_saved(caller, size).await)?;
        let prefix = uri_prefix(ctx);
        Ok(recipes
            .into_iter()
            .map(|r| GqlRecipe::new(r, prefix))
            .collect())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Files a recipe under every given tag. Admins only.
    async fn set_tags_to_recipe(
        &self,
        ctx: &Context<'_>,
        recipe_id: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx)
            .recipes
            .set_tags_to_recipe(caller, SetTagsInput { recipe_id, tags })
            .await)?;
        Ok(true)
    }

    async fn review_recipe(&self, ctx: &Context<'_>, input: ReviewInput) -> Result<bool> {
        let caller = caller(ctx)?;
        let rating = gql(input
            .rating
            .ok_or_else(|| LarderError::InvalidInput("rating is required".to_string())))?;
        gql(state(ctx)
            .reviews
            .review_recipe(caller, &input.recipe_id, input.review_text, rating)
            .await)?;
        Ok(true)
    }

    async fn change_review(&self, ctx: &Context<'_>, input: ChangeReviewInput) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx)
            .reviews
            .change_review(caller, &input.review_id, input.review_text, input.rating)
            .await)?;
        Ok(true)
    }

    async fn remove_review_from_recipe(
        &self,
        ctx: &Context<'_>,
        input: ReviewIdInput,
    ) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx).reviews.remove_review(caller, &input.id).await)?;
        Ok(true)
    }

    /// Reports someone else's review to the moderators.
    async fn report(&self, ctx: &Context<'_>, input: ReportInput) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx)
            .reviews
            .report_review(caller, &input.review_id, &input.message)
            .await)?;
        Ok(true)
    }

    /// Toggles a recipe in the caller's favorites. Returns whether it is a favorite afterwards.
    async fn add_to_favorite(&self, ctx: &Context<'_>, input: RecipeIdInput) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx)
            .favorites
            .toggle_favorite(caller, &input.recipe_id)
            .await)
    }

    async fn add_to_saved_recipes(&self, ctx: &Context<'_>, input: RecipeIdInput) -> Result<bool> {
        let caller = caller(ctx)?;
        gql(state(ctx).saved.toggle_saved(caller, &input.recipe_id).await)
    }
}
