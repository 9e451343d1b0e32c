//! GraphQL authentication mutations
//!
//! Registration and login. Neither requires an existing token; both return a
//! fresh token together with the user.

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::graphql::types::Auth;
use crate::services::{AuthService, RegisterInput};

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user account
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<Auth> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        match auth_service
            .register(RegisterInput {
                username,
                email,
                password,
            })
            .await
        {
            Ok(payload) => {
                tracing::info!(
                    user_id = %payload.user.id,
                    username = %payload.user.username,
                    "User registered successfully"
                );
                Ok(payload.into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "User registration failed");
                Err(e.extend())
            }
        }
    }

    /// Authenticate with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        match auth_service.login(&email, &password).await {
            Ok(payload) => {
                tracing::info!(
                    user_id = %payload.user.id,
                    username = %payload.user.username,
                    "User logged in successfully"
                );
                Ok(payload.into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                Err(e.extend())
            }
        }
    }
}
