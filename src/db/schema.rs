//! Static schema migrations
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS`, so running this on
//! every start is safe. A user "document" is one `users` row plus its
//! `saved_books` rows, ordered by `position`.

use sqlx::SqlitePool;
use tracing::{debug, info};

const USERS_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE COLLATE NOCASE,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const SAVED_BOOKS_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS saved_books (
        position INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        book_id TEXT NOT NULL,
        authors TEXT NOT NULL,
        description TEXT,
        image TEXT NOT NULL DEFAULT '',
        link TEXT NOT NULL DEFAULT '',
        title TEXT NOT NULL,
        UNIQUE (user_id, book_id)
    )
"#;

const SAVED_BOOKS_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_saved_books_user ON saved_books (user_id, position)";

/// Create all tables and indexes
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (name, sql) in [
        ("users", USERS_SQL),
        ("saved_books", SAVED_BOOKS_SQL),
        ("idx_saved_books_user", SAVED_BOOKS_INDEX_SQL),
    ] {
        debug!(object = name, "Applying schema");
        sqlx::query(sql.trim()).execute(pool).await?;
    }
    info!("Database schema up to date");
    Ok(())
}
