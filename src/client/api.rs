//! GraphQL client for the Bookshelf server

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::db::BookRecord;

pub const QUERY_ME: &str = r#"
query me {
  me {
    _id
    username
    email
    bookCount
    savedBooks { bookId authors description image link title }
  }
}"#;

pub const SEARCH_GOOGLE_BOOKS: &str = r#"
query searchGoogleBooks($query: String!) {
  searchGoogleBooks(query: $query) { bookId authors description image link title }
}"#;

pub const LOGIN_USER: &str = r#"
mutation login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    token
    user { _id username email bookCount savedBooks { bookId authors description image link title } }
  }
}"#;

pub const ADD_USER: &str = r#"
mutation addUser($username: String!, $email: String!, $password: String!) {
  addUser(username: $username, email: $email, password: $password) {
    token
    user { _id username email bookCount savedBooks { bookId authors description image link title } }
  }
}"#;

pub const SAVE_BOOK: &str = r#"
mutation saveBook($bookData: BookInput!) {
  saveBook(bookData: $bookData) {
    _id
    username
    email
    bookCount
    savedBooks { bookId authors description image link title }
  }
}"#;

pub const REMOVE_BOOK: &str = r#"
mutation removeBook($bookId: ID!) {
  removeBook(bookId: $bookId) {
    _id
    username
    email
    bookCount
    savedBooks { bookId authors description image link title }
  }
}"#;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request to server failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    GraphQL(String),

    #[error("Server response had no data")]
    MissingData,
}

/// User as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub book_count: i32,
    pub saved_books: Vec<BookRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountUser,
}

/// Operations the UI needs from the server
#[async_trait]
pub trait BooksApi: Send + Sync {
    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, ClientError>;
    async fn save_book(&self, token: &str, book: &BookRecord) -> Result<AccountUser, ClientError>;
    async fn remove_book(&self, token: &str, book_id: &str) -> Result<AccountUser, ClientError>;
    async fn me(&self, token: &str) -> Result<AccountUser, ClientError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;
    async fn add_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError>;
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponseBody {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

/// HTTP GraphQL client
pub struct GraphqlClient {
    http: reqwest::Client,
    url: String,
}

impl GraphqlClient {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            url: url.into(),
        })
    }

    /// Run one operation and pull `data.<field>` out of the response
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let mut request = self
            .http
            .post(&self.url)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let body: GraphQLResponseBody = request.send().await?.error_for_status()?.json().await?;

        if let Some(first) = body.errors.into_iter().next() {
            return Err(ClientError::GraphQL(first.message));
        }

        let value = body
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .filter(|v| !v.is_null())
            .ok_or(ClientError::MissingData)?;

        serde_json::from_value(value).map_err(|e| ClientError::GraphQL(e.to_string()))
    }
}

#[async_trait]
impl BooksApi for GraphqlClient {
    async fn search_books(&self, query: &str) -> Result<Vec<BookRecord>, ClientError> {
        self.execute(
            SEARCH_GOOGLE_BOOKS,
            json!({ "query": query }),
            "searchGoogleBooks",
            None,
        )
        .await
    }

    async fn save_book(&self, token: &str, book: &BookRecord) -> Result<AccountUser, ClientError> {
        self.execute(SAVE_BOOK, json!({ "bookData": book }), "saveBook", Some(token))
            .await
    }

    async fn remove_book(&self, token: &str, book_id: &str) -> Result<AccountUser, ClientError> {
        self.execute(
            REMOVE_BOOK,
            json!({ "bookId": book_id }),
            "removeBook",
            Some(token),
        )
        .await
    }

    async fn me(&self, token: &str) -> Result<AccountUser, ClientError> {
        self.execute(QUERY_ME, json!({}), "me", Some(token)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.execute(
            LOGIN_USER,
            json!({ "email": email, "password": password }),
            "login",
            None,
        )
        .await
    }

    async fn add_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.execute(
            ADD_USER,
            json!({ "username": username, "email": email, "password": password }),
            "addUser",
            None,
        )
        .await
    }
}
