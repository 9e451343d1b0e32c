//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::services::auth::{AuthConfig, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::services::google_books::{DEFAULT_BASE_URL, GoogleBooksConfig};

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite connection URL
    pub database_url: String,

    /// Maximum pool size
    pub database_max_connections: u32,

    /// JWT secret for signing and verifying bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Google Books API base URL
    pub google_books_url: String,

    /// Google Books API key (optional; raises the anonymous quota)
    pub google_books_api_key: Option<String>,

    /// Directory of a built web client to serve for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            // Tokens signed with this die with the process; set JWT_SECRET in production.
            tracing::warn!("JWT_SECRET not set, using a generated development secret");
            format!("dev-secret-{}", uuid::Uuid::new_v4())
        });

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/bookshelf.db".to_string()),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),

            jwt_secret: jwt_secret.trim().to_string(),

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),

            google_books_url: env::var("GOOGLE_BOOKS_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            google_books_api_key: env::var("GOOGLE_BOOKS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),

            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_lifetime: self.token_lifetime_secs,
            bcrypt_cost: self.bcrypt_cost,
        }
    }

    pub fn google_books_config(&self) -> GoogleBooksConfig {
        GoogleBooksConfig {
            base_url: self.google_books_url.clone(),
            api_key: self.google_books_api_key.clone(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Terminal client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint of the server
    pub api_url: String,

    /// Where the token, saved ids and client log live
    pub data_dir: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("BOOKSHELF_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("bookshelf")
            });

        Self {
            api_url: env::var("BOOKSHELF_API_URL")
                .unwrap_or_else(|_| "http://localhost:3001/graphql".to_string()),
            data_dir,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("client.log")
    }
}
