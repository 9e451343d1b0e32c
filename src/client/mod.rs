//! Client side of Bookshelf: GraphQL client, session, local storage and the
//! page state the terminal UI renders.

pub mod api;
pub mod pages;
pub mod session;
pub mod storage;

use anyhow::Result;

pub use api::{AccountUser, AuthResponse, BooksApi, ClientError, GraphqlClient};
pub use pages::{SaveControl, SavedBooksPage, SearchPage};
pub use session::Session;
pub use storage::LocalStore;

/// Create an account and keep its token for later commands
pub async fn signup(
    api: &dyn BooksApi,
    store: &LocalStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AccountUser> {
    let auth = api.add_user(username, email, password).await?;
    store.save_token(&auth.token)?;
    tracing::info!(username = %auth.user.username, "Signed up");
    Ok(auth.user)
}

pub async fn login(
    api: &dyn BooksApi,
    store: &LocalStore,
    email: &str,
    password: &str,
) -> Result<AccountUser> {
    let auth = api.login(email, password).await?;
    store.save_token(&auth.token)?;
    tracing::info!(username = %auth.user.username, "Logged in");
    Ok(auth.user)
}

/// Forget the stored token. Saved book ids stay behind.
pub fn logout(store: &LocalStore) -> Result<()> {
    store.clear_token()?;
    tracing::info!("Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::BookRecord;

    struct AccountApi;

    fn account() -> AccountUser {
        AccountUser {
            id: "u1".to_string(),
            username: "leto".to_string(),
            email: "leto@caladan.org".to_string(),
            book_count: 0,
            saved_books: Vec::new(),
        }
    }

    #[async_trait]
    impl BooksApi for AccountApi {
        async fn search_books(&self, _query: &str) -> Result<Vec<BookRecord>, ClientError> {
            Err(ClientError::MissingData)
        }

        async fn save_book(&self, _token: &str, _book: &BookRecord) -> Result<AccountUser, ClientError> {
            Err(ClientError::MissingData)
        }

        async fn remove_book(&self, _token: &str, _book_id: &str) -> Result<AccountUser, ClientError> {
            Err(ClientError::MissingData)
        }

        async fn me(&self, _token: &str) -> Result<AccountUser, ClientError> {
            Err(ClientError::MissingData)
        }

        async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
            if email == "leto@caladan.org" && password == "duke" {
                Ok(AuthResponse {
                    token: "login-token".to_string(),
                    user: account(),
                })
            } else {
                Err(ClientError::GraphQL("Incorrect email or password".to_string()))
            }
        }

        async fn add_user(
            &self,
            _username: &str,
            _email: &str,
            _password: &str,
        ) -> Result<AuthResponse, ClientError> {
            Ok(AuthResponse {
                token: "signup-token".to_string(),
                user: account(),
            })
        }
    }

    #[tokio::test]
    async fn test_signup_stores_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let user = signup(&AccountApi, &store, "leto", "leto@caladan.org", "duke")
            .await
            .unwrap();
        assert_eq!(user.username, "leto");
        assert_eq!(store.token().as_deref(), Some("signup-token"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_old_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.save_token("old-token").unwrap();

        let err = login(&AccountApi, &store, "leto@caladan.org", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(store.token().as_deref(), Some("old-token"));

        login(&AccountApi, &store, "leto@caladan.org", "duke").await.unwrap();
        assert_eq!(store.token().as_deref(), Some("login-token"));
    }

    #[test]
    fn test_logout_clears_token_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.save_token("t").unwrap();
        store.save_book_ids(&["a".to_string()]).unwrap();

        logout(&store).unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.saved_book_ids(), vec!["a"]);
    }
}
