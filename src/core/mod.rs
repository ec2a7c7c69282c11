// src/core/mod.rs

//! The central module containing the recipe caching core and its services.

pub mod caller;
pub mod errors;
pub mod favorites;
pub mod metrics;
pub mod pagination;
pub mod recipes;
pub mod resolvers;
pub mod reviews;
pub mod saved;
pub mod state;
pub mod storage;
pub mod tags;
pub mod upstream;

pub use errors::LarderError;
pub use state::AppState;
