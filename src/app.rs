//! Application state and HTTP router construction.
//!
//! Used by `main` to serve the API and by the integration tests to stand up
//! a server on an ephemeral port.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{AuthUser, BookshelfSchema};
use crate::services::AuthService;

/// Shared state for HTTP handlers (GraphQL, health routes).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: BookshelfSchema,
    pub auth: AuthService,
}

/// Build the full Axum router: /graphql, health endpoints, layers, and the
/// optional static fallback. Returns Router<()> (state fully applied).
pub fn build_app(state: AppState) -> Router<()> {
    let static_dir = state.config.static_dir.clone();

    let app = Router::new()
        .merge(api::health::router())
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            app.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)))
        }
        None => app,
    }
}

/// Extract bearer token from Authorization header
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    // A bad token leaves the request anonymous; protected fields reject it.
    if let Some(token) = extract_token(&headers) {
        match state.auth.verify_token(token) {
            Ok(claims) => request = request.data(AuthUser::from(claims)),
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}
