//! Client session context
//!
//! Holds the bearer token the user logged in with. It is created once at
//! startup and handed to whatever UI code needs to know who is logged in.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::services::TokenClaims;

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Claims of a present, unexpired token. The client cannot check the
    /// signature; the server does that on every request.
    pub fn profile(&self) -> Option<TokenClaims> {
        let token = self.token.as_deref()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .ok()
    }

    pub fn logged_in(&self) -> bool {
        self.profile().is_some()
    }

    /// The token, only while it is still usable
    pub fn token(&self) -> Option<&str> {
        if self.logged_in() {
            self.token.as_deref()
        } else {
            None
        }
    }
}
