//! Authentication service for user registration and JWT handling
//!
//! Provides:
//! - Password hashing with bcrypt
//! - Stateless HS256 bearer tokens (never stored server-side)
//! - Registration and login against the users repository

use std::sync::Arc;

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::db::{CreateUser, Database, UserRecord};
use crate::error::{AppError, AppResult};

/// Message for every login failure, so callers cannot probe which emails exist
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password";

/// Default token lifetime: 2 hours
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Token plus the user it was issued for
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 2 hours)
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
    /// Hash checked when the email is unknown, so both login failures cost
    /// one bcrypt verification
    dummy_hash: Arc<OnceCell<Option<String>>>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self {
            db,
            config,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a new user and issue their first token
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthPayload> {
        if input.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        let token = self.issue_token(&user)?;
        Ok(AuthPayload { token, user })
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let Some(user) = self.db.users().get_by_email(email).await? else {
            self.burn_verification(password);
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&user)?;
        Ok(AuthPayload { token, user })
    }

    // ========================================================================
    // Passwords
    // ========================================================================

    /// Hash a password with bcrypt
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to verify password: {}", e)))
    }

    fn burn_verification(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_init(|| hash("not-a-real-password", self.config.bcrypt_cost).ok());
        if let Some(dummy) = dummy {
            let _ = verify(password, dummy);
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Sign a token for `user` that expires after the configured lifetime
    pub fn issue_token(&self, user: &UserRecord) -> AppResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create token: {}", e)))
    }

    /// Decode and validate a token
    pub fn verify_token(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AppError::authentication("Invalid or expired token")
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    async fn service(token_lifetime: i64) -> AuthService {
        let db = Database::in_memory().await.unwrap();
        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime,
                bcrypt_cost: 4,
            },
        )
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            username: "bilbo".to_string(),
            email: "bilbo@shire.me".to_string(),
            password: "precious".to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let auth = service(60).await;
        let hashed = auth.hash_password("precious").unwrap();
        assert_ne!(hashed, "precious");
        assert!(auth.verify_password("precious", &hashed).unwrap());
        assert!(!auth.verify_password("ring", &hashed).unwrap());
    }

    #[tokio::test]
    async fn test_token_carries_identity() {
        let auth = service(60).await;
        let payload = auth.register(register_input()).await.unwrap();

        let claims = auth.verify_token(&payload.token).unwrap();
        assert_eq!(claims.sub, payload.user.id);
        assert_eq!(claims.username, "bilbo");
        assert_eq!(claims.email, "bilbo@shire.me");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let auth = service(-3600).await;
        let payload = auth.register(register_input()).await.unwrap();
        assert_matches!(
            auth.verify_token(&payload.token),
            Err(AppError::Authentication(_))
        );
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let auth = service(60).await;
        let payload = auth.register(register_input()).await.unwrap();

        let other = AuthService::new(
            Database::in_memory().await.unwrap(),
            AuthConfig::new("another-secret"),
        );
        assert_matches!(
            other.verify_token(&payload.token),
            Err(AppError::Authentication(_))
        );
        assert_matches!(auth.verify_token("garbage"), Err(AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let auth = service(60).await;
        auth.register(register_input()).await.unwrap();

        let wrong_password = auth.login("bilbo@shire.me", "ring").await.unwrap_err();
        let unknown_email = auth.login("frodo@shire.me", "precious").await.unwrap_err();

        assert_matches!(wrong_password, AppError::Authentication(_));
        assert_matches!(unknown_email, AppError::Authentication(_));
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_success() {
        let auth = service(60).await;
        let registered = auth.register(register_input()).await.unwrap();
        let logged_in = auth.login("bilbo@shire.me", "precious").await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_requires_password() {
        let auth = service(60).await;
        let mut input = register_input();
        input.password.clear();
        assert_matches!(auth.register(input).await, Err(AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_hash() {
        let auth = service(60).await;
        assert!(auth.dummy_hash.get().is_none());

        let err = auth.login("nobody@shire.me", "precious").await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);

        // hashed at the configured cost, so the miss costs what a wrong password does
        let dummy = auth.dummy_hash.get().cloned().flatten().unwrap();
        assert!(dummy.starts_with("$2b$04$"));
    }
}
