//! Services used by the API layer: auth, book search, logging setup

pub mod auth;
pub mod google_books;
pub mod logging;

pub use auth::{AuthConfig, AuthPayload, AuthService, RegisterInput, TokenClaims};
pub use google_books::{BookSearch, GoogleBooksClient, GoogleBooksConfig};
