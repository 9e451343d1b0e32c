//! Error taxonomy shared by the API layer and its services
//!
//! Every resolver failure is one of these kinds; the GraphQL layer turns them
//! into errors carrying a `code` extension so clients can branch on the kind
//! without parsing messages.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Failures talking to the upstream book-search API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("Book search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-success status
    #[error("Book search returned status {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the JSON shape we expect
    #[error("Book search returned an unreadable payload: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Short machine-readable kind, exposed as the `kind` error extension
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Request(_) => "request",
            UpstreamError::Status(_) => "status",
            UpstreamError::Malformed(_) => "malformed",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad credentials, or a missing/invalid bearer token
    #[error("{0}")]
    Authentication(String),

    /// A persistence constraint was violated (duplicate email, bad input)
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn authentication(msg: impl Into<String>) -> Self {
        AppError::Authentication(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// GraphQL error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "UNAUTHENTICATED",
            AppError::Validation(_) => "BAD_USER_INPUT",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if let AppError::Internal(inner) = self {
            tracing::error!(error = %inner, "Internal error while resolving request");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let AppError::Upstream(upstream) = self {
                e.set("kind", upstream.kind());
            }
        })
    }
}
