//! GraphQL API
//!
//! This is the single API surface for the Bookshelf backend. Resolvers are
//! split into `queries/` and `mutations/` and merged in `schema.rs`.

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::AuthUser;
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};
