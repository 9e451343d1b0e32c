//! GraphQL authentication
//!
//! The HTTP handler verifies the bearer token and inserts an [`AuthUser`] into
//! the request data. Resolvers read it through [`AuthExt`].
//!
//! ## Guards
//!
//! Use `AuthGuard` to require authentication on any GraphQL operation:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn protected_query(&self, ctx: &Context<'_>) -> Result<String> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::TokenClaims;

/// Message returned when a protected operation is called anonymously
pub const NOT_LOGGED_IN: &str = "You are not logged in";

/// Caller identity taken from a verified token, available in GraphQL resolvers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<TokenClaims> for AuthUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

/// Extension trait to get authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or return an error if not authenticated
    fn auth_user(&self) -> Result<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>()
            .ok_or_else(|| AppError::authentication(NOT_LOGGED_IN).extend())
    }
}

/// Guard that requires authentication for GraphQL operations.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().map(|_| ());
        async move { result }
    }
}
