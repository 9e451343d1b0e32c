//! Bookshelf entry point: runs the GraphQL server or one of the client
//! commands.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};

use bookshelf::app::{AppState, build_app};
use bookshelf::cli::Command;
use bookshelf::client::{self, BooksApi, GraphqlClient, LocalStore, Session};
use bookshelf::config::{ClientConfig, Config};
use bookshelf::db::Database;
use bookshelf::graphql::build_schema;
use bookshelf::services::logging::{init_client_logging, init_server_logging};
use bookshelf::services::{AuthService, BookSearch, GoogleBooksClient};
use bookshelf::tui::{self, TuiApp, TuiConfig, View};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let command = Command::from_args()?;

    if command.is_client() {
        run_client(command).await
    } else {
        serve().await
    }
}

async fn serve() -> anyhow::Result<()> {
    init_server_logging();
    tracing::info!("Starting Bookshelf server");

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database connected");

    let auth = AuthService::new(db.clone(), config.auth_config());
    let book_search: Arc<dyn BookSearch> =
        Arc::new(GoogleBooksClient::new(config.google_books_config())?);

    let schema = build_schema(db.clone(), auth.clone(), book_search);
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        db,
        schema,
        auth,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let host = config.host.as_deref().unwrap_or("localhost");
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://{}:{}/graphql", host, config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_client(command: Command) -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_client_logging(&config.log_path())?;

    let store = LocalStore::new(&config.data_dir);
    let api = GraphqlClient::new(&config.api_url)?;

    match command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let user = client::signup(&api, &store, &username, &email, &password).await?;
            println!("Welcome, {}! You are logged in.", user.username);
        }
        Command::Login { email, password } => {
            let user = client::login(&api, &store, &email, &password).await?;
            println!("Logged in as {}.", user.username);
        }
        Command::Logout => {
            client::logout(&store)?;
            println!("Logged out.");
        }
        Command::Search => browse(store, api, View::Search).await?,
        Command::Saved => browse(store, api, View::Saved).await?,
        Command::Serve => bail!("serve is not a client command"),
    }

    Ok(())
}

/// Open the terminal UI on the given page
async fn browse(store: LocalStore, api: GraphqlClient, start_view: View) -> anyhow::Result<()> {
    if !tui::should_use_tui() {
        bail!("The book browser needs an interactive terminal");
    }

    let session = store
        .token()
        .map(Session::with_token)
        .unwrap_or_else(Session::anonymous);
    let api: Arc<dyn BooksApi> = Arc::new(api);

    TuiApp::new(
        session,
        store,
        api,
        TuiConfig {
            start_view,
            ..Default::default()
        },
    )
    .context("Failed to start terminal UI")?
    .run()
    .await?;

    Ok(())
}
