// src/server/graphql/mod.rs

//! The GraphQL surface of the service.

pub mod schema;
pub mod types;

pub use schema::{LarderSchema, MutationRoot, QueryRoot, build_schema};
