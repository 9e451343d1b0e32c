//! Reading-list mutations. Both require authentication and only ever touch
//! the caller's own list.

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use crate::db::{BookRecord, Database};
use crate::error::AppError;
use crate::graphql::auth::{AuthExt, AuthGuard};
use crate::graphql::types::{BookInput, User};

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book to the caller's saved books (no-op if already saved)
    #[graphql(guard = "AuthGuard")]
    async fn save_book(&self, ctx: &Context<'_>, book_data: BookInput) -> Result<User> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let book = BookRecord::from(book_data);

        let user = db
            .users()
            .add_saved_book(&auth.user_id, &book)
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| AppError::not_found("No user found with this id").extend())?;

        tracing::info!(user_id = %auth.user_id, book_id = %book.book_id, "Book saved");
        Ok(user.into())
    }

    /// Remove a book from the caller's saved books
    #[graphql(guard = "AuthGuard")]
    async fn remove_book(&self, ctx: &Context<'_>, book_id: ID) -> Result<User> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let user = db
            .users()
            .remove_saved_book(&auth.user_id, book_id.as_str())
            .await
            .map_err(|e| e.extend())?
            .ok_or_else(|| AppError::not_found("No user found with this id").extend())?;

        tracing::info!(user_id = %auth.user_id, book_id = %book_id.as_str(), "Book removed");
        Ok(user.into())
    }
}
