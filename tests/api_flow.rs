//! End-to-end tests for the Bookshelf API
//!
//! These tests drive the whole stack against an in-memory database and a
//! canned book search:
//! - Account flow: addUser -> login -> searchGoogleBooks -> saveBook -> me
//! - Authentication errors
//! - The terminal client talking to a live HTTP server

use std::sync::Arc;

use async_graphql::{Request, Variables};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use bookshelf::app::{AppState, build_app};
use bookshelf::client::{self, BooksApi, GraphqlClient, LocalStore, SavedBooksPage, SearchPage, Session};
use bookshelf::config::Config;
use bookshelf::db::{BookRecord, Database};
use bookshelf::error::UpstreamError;
use bookshelf::graphql::{AuthUser, BookshelfSchema, build_schema};
use bookshelf::services::google_books::parse_volumes;
use bookshelf::services::{AuthConfig, AuthService, BookSearch};

// ============================================================================
// Fixtures
// ============================================================================

/// One upstream volume with no authors listed
const HARRY_POTTER_RESPONSE: &str = r#"{
  "kind": "books#volumes",
  "totalItems": 1,
  "items": [{
    "id": "hp-1",
    "volumeInfo": {
      "title": "Harry Potter and the Philosopher's Stone",
      "description": "A boy learns he is a wizard.",
      "imageLinks": { "thumbnail": "http://books.google.com/hp.jpg" },
      "infoLink": "http://books.google.com/hp"
    }
  }]
}"#;

/// Book search that answers every query from a fixed upstream body
struct CannedSearch;

#[async_trait]
impl BookSearch for CannedSearch {
    async fn search(&self, query: &str) -> Result<Vec<BookRecord>, UpstreamError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_volumes(HARRY_POTTER_RESPONSE)
    }
}

struct TestApp {
    db: Database,
    auth: AuthService,
    schema: BookshelfSchema,
}

async fn test_app() -> TestApp {
    let db = Database::in_memory().await.unwrap();
    let auth = AuthService::new(
        db.clone(),
        AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::new("integration-secret")
        },
    );
    let schema = build_schema(db.clone(), auth.clone(), Arc::new(CannedSearch));
    TestApp { db, auth, schema }
}

impl TestApp {
    /// Execute an operation, optionally as the holder of `token`
    async fn execute(&self, query: &str, variables: Value, token: Option<&str>) -> async_graphql::Response {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(token) = token {
            let claims = self.auth.verify_token(token).unwrap();
            request = request.data(AuthUser::from(claims));
        }
        self.schema.execute(request).await
    }

    async fn data(&self, query: &str, variables: Value, token: Option<&str>) -> Value {
        let response = self.execute(query, variables, token).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }
}

const ADD_USER: &str = r#"
mutation addUser($username: String!, $email: String!, $password: String!) {
  addUser(username: $username, email: $email, password: $password) {
    token
    user { _id username email bookCount }
  }
}"#;

const LOGIN: &str = r#"
mutation login($email: String!, $password: String!) {
  login(email: $email, password: $password) { token user { _id username } }
}"#;

const SEARCH: &str = r#"
query search($query: String!) {
  searchGoogleBooks(query: $query) { bookId authors description image link title }
}"#;

const SAVE_BOOK: &str = r#"
mutation saveBook($bookData: BookInput!) {
  saveBook(bookData: $bookData) { bookCount savedBooks { bookId authors title } }
}"#;

const REMOVE_BOOK: &str = r#"
mutation removeBook($bookId: ID!) {
  removeBook(bookId: $bookId) { bookCount savedBooks { bookId } }
}"#;

const ME: &str = r#"
query { me { _id username email bookCount savedBooks { bookId authors title } } }
"#;

fn error_code(response: &async_graphql::Response) -> Option<String> {
    let extensions = response.errors.first()?.extensions.as_ref()?;
    match extensions.get("code")? {
        async_graphql::Value::String(code) => Some(code.clone()),
        _ => None,
    }
}

async fn sign_up(app: &TestApp) -> String {
    let data = app
        .data(
            ADD_USER,
            json!({ "username": "harry", "email": "harry@hogwarts.edu", "password": "alohomora" }),
            None,
        )
        .await;
    data["addUser"]["token"].as_str().unwrap().to_string()
}

// ============================================================================
// Schema-level flow
// ============================================================================

#[tokio::test]
async fn test_signup_search_save_and_read_back() {
    let app = test_app().await;

    let data = app
        .data(
            ADD_USER,
            json!({ "username": "harry", "email": "harry@hogwarts.edu", "password": "alohomora" }),
            None,
        )
        .await;
    assert_eq!(data["addUser"]["user"]["username"], "harry");
    assert_eq!(data["addUser"]["user"]["bookCount"], 0);

    let data = app
        .data(
            LOGIN,
            json!({ "email": "harry@hogwarts.edu", "password": "alohomora" }),
            None,
        )
        .await;
    let token = data["login"]["token"].as_str().unwrap().to_string();

    let data = app.data(SEARCH, json!({ "query": "Harry Potter" }), None).await;
    let results = data["searchGoogleBooks"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["authors"], json!(["No author to display"]));

    let book = results[0].clone();
    let data = app
        .data(SAVE_BOOK, json!({ "bookData": book }), Some(&token))
        .await;
    assert_eq!(data["saveBook"]["bookCount"], 1);

    // saving again leaves one copy
    app.data(SAVE_BOOK, json!({ "bookData": book }), Some(&token)).await;

    let data = app.data(ME, json!({}), Some(&token)).await;
    assert_eq!(data["me"]["bookCount"], 1);
    assert_eq!(
        data["me"]["savedBooks"],
        json!([{
            "bookId": "hp-1",
            "authors": ["No author to display"],
            "title": "Harry Potter and the Philosopher's Stone"
        }])
    );
}

#[tokio::test]
async fn test_remove_book() {
    let app = test_app().await;
    let token = sign_up(&app).await;

    for id in ["a", "b"] {
        let book = json!({ "bookId": id, "authors": ["Rowling"], "title": id });
        app.data(SAVE_BOOK, json!({ "bookData": book }), Some(&token)).await;
    }

    let data = app.data(REMOVE_BOOK, json!({ "bookId": "a" }), Some(&token)).await;
    assert_eq!(data["removeBook"]["bookCount"], 1);
    assert_eq!(data["removeBook"]["savedBooks"], json!([{ "bookId": "b" }]));

    // removing something not saved is not an error
    let data = app.data(REMOVE_BOOK, json!({ "bookId": "zzz" }), Some(&token)).await;
    assert_eq!(data["removeBook"]["bookCount"], 1);
}

#[tokio::test]
async fn test_blank_search_returns_nothing() {
    let app = test_app().await;
    let data = app.data(SEARCH, json!({ "query": "   " }), None).await;
    assert_eq!(data["searchGoogleBooks"], json!([]));
}

// ============================================================================
// Authentication errors
// ============================================================================

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = test_app().await;
    sign_up(&app).await;

    let unknown = app
        .execute(LOGIN, json!({ "email": "nobody@hogwarts.edu", "password": "x" }), None)
        .await;
    let wrong = app
        .execute(LOGIN, json!({ "email": "harry@hogwarts.edu", "password": "x" }), None)
        .await;

    assert_eq!(unknown.errors[0].message, wrong.errors[0].message);
    assert_eq!(error_code(&unknown).as_deref(), Some("UNAUTHENTICATED"));
    assert_eq!(error_code(&wrong).as_deref(), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_protected_operations_need_login() {
    let app = test_app().await;

    let response = app.execute(ME, json!({}), None).await;
    assert_eq!(response.errors[0].message, "You are not logged in");
    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHENTICATED"));

    let book = json!({ "bookId": "a", "title": "A" });
    let response = app.execute(SAVE_BOOK, json!({ "bookData": book }), None).await;
    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = test_app().await;
    sign_up(&app).await;

    let response = app
        .execute(
            ADD_USER,
            json!({ "username": "other", "email": "HARRY@hogwarts.edu", "password": "pw" }),
            None,
        )
        .await;
    assert_eq!(error_code(&response).as_deref(), Some("BAD_USER_INPUT"));
    assert!(app.db.users().get_by_username("other").await.unwrap().is_none());
}

// ============================================================================
// Client against a live server
// ============================================================================

/// Serve the full router on an ephemeral port and return the GraphQL URL
async fn spawn_server(app: &TestApp) -> String {
    let config = Config {
        host: None,
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: "integration-secret".to_string(),
        token_lifetime_secs: 7200,
        bcrypt_cost: 4,
        google_books_url: "http://127.0.0.1:9".to_string(),
        google_books_api_key: None,
        static_dir: None,
    };
    let state = AppState {
        config: Arc::new(config),
        db: app.db.clone(),
        schema: app.schema.clone(),
        auth: app.auth.clone(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_app(state)).await.unwrap();
    });
    format!("http://{}/graphql", addr)
}

#[tokio::test]
async fn test_client_round_trip_over_http() {
    let app = test_app().await;
    let url = spawn_server(&app).await;
    let api = GraphqlClient::new(url).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());

    client::signup(&api, &store, "hermione", "hermione@hogwarts.edu", "leviosa")
        .await
        .unwrap();
    let session = Session::with_token(store.token().unwrap());
    assert!(session.logged_in());

    let mut search = SearchPage::mount(&store);
    search.search_input = "Harry Potter".to_string();
    assert!(search.submit(&api).await);
    assert_eq!(search.heading(), "Viewing 1 results:");
    assert!(search.save_book(&api, &session, "hp-1").await);
    search.unmount(&store);
    assert_eq!(store.saved_book_ids(), vec!["hp-1"]);

    let mut saved = SavedBooksPage::default();
    assert!(saved.load(&api, &session).await);
    assert_eq!(saved.books()[0].authors, vec!["No author to display"]);
    assert_eq!(
        saved.books()[0].description.as_deref(),
        Some("A boy learns he is a wizard.")
    );

    assert!(saved.remove(&api, &session, &store, "hp-1").await);
    assert_eq!(saved.heading(), "You have no saved books!");
    assert!(store.saved_book_ids().is_empty());
}

#[tokio::test]
async fn test_client_sees_server_errors() {
    let app = test_app().await;
    let url = spawn_server(&app).await;
    let api = GraphqlClient::new(url).unwrap();

    let err = api.me("not-a-token").await.unwrap_err();
    assert_eq!(err.to_string(), "You are not logged in");

    let err = api.login("ghost@hogwarts.edu", "boo").await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect email or password");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;
    let token = sign_up(&app).await;
    let book = json!({ "bookId": "hp-1", "title": "Harry Potter" });
    app.data(SAVE_BOOK, json!({ "bookData": book }), Some(&token)).await;
    let url = spawn_server(&app).await;
    let base = url.trim_end_matches("/graphql");

    let health: Value = reqwest::get(format!("{}/healthz", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let ready: Value = reqwest::get(format!("{}/readyz", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["shelf"], json!({ "users": 1, "savedBooks": 1 }));
}
