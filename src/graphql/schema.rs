//! GraphQL schema definition
//!
//! Queries: `me` (auth), `searchGoogleBooks`.
//! Mutations: `addUser`, `login`, `saveBook` (auth), `removeBook` (auth).

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::{AuthService, BookSearch};

use super::mutations::{AuthMutations, BookMutations};
use super::queries::{BookQueries, UserQueries};

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries, BookQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, BookMutations);

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with all resolvers
pub fn build_schema(
    db: Database,
    auth_service: AuthService,
    book_search: Arc<dyn BookSearch>,
) -> BookshelfSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .data(auth_service)
        .data(book_search)
        .finish()
}
