//! Users repository: accounts and their saved books
//!
//! A user owns an ordered set of saved books keyed by `book_id`. Saving is
//! add-if-absent, removal deletes by `book_id`; both run in a transaction
//! scoped to the one user.

use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::sqlite_helpers::{is_unique_violation, json_to_vec, now_iso8601, vec_to_json};
use crate::error::{AppError, AppResult};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// ============================================================================
// Records
// ============================================================================

/// A normalized book, as returned by search and stored in a user's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub book_id: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image: String,
    pub link: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub saved_books: Vec<BookRecord>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Row totals reported by the readiness endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfCounts {
    pub users: i64,
    pub saved_books: i64,
}

type UserRow = (String, String, String, String, String, String);
type BookRow = (String, String, Option<String>, String, String, String);

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> AppResult<UserRecord> {
        let username = user.username.trim();
        let email = user.email.trim();

        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(AppError::validation("Must use a valid email address"));
        }
        if user.password_hash.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                let msg = e.to_string();
                return Err(if msg.contains("users.email") {
                    AppError::validation("Email is already registered")
                } else {
                    AppError::validation("Username is already taken")
                });
            }
            return Err(e.into());
        }

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create user")))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_user(&mut conn, "id", id).await?)
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_user(&mut conn, "email", email.trim()).await?)
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_user(&mut conn, "username", username.trim()).await?)
    }

    // ========================================================================
    // Saved books
    // ========================================================================

    /// Add a book to the user's list unless one with the same `book_id` is
    /// already there. Returns `None` if the user does not exist.
    pub async fn add_saved_book(
        &self,
        user_id: &str,
        book: &BookRecord,
    ) -> AppResult<Option<UserRecord>> {
        let mut tx = WriteTx::begin(&self.pool).await?;

        if !user_exists(&mut tx, user_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO saved_books (user_id, book_id, authors, description, image, link, title)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&book.book_id)
        .bind(vec_to_json(&book.authors))
        .bind(&book.description)
        .bind(&book.image)
        .bind(&book.link)
        .bind(&book.title)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            touch_user(&mut tx, user_id).await?;
        } else {
            tracing::debug!(user_id, book_id = %book.book_id, "Book already saved");
        }

        let user = load_user(&mut tx, "id", user_id).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Remove every saved entry with `book_id`. Returns `None` if the user
    /// does not exist.
    pub async fn remove_saved_book(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> AppResult<Option<UserRecord>> {
        let mut tx = WriteTx::begin(&self.pool).await?;

        if !user_exists(&mut tx, user_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query("DELETE FROM saved_books WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() > 0 {
            touch_user(&mut tx, user_id).await?;
        }

        let user = load_user(&mut tx, "id", user_id).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Totals across every user. Fails if either table is missing.
    pub async fn counts(&self) -> AppResult<ShelfCounts> {
        let (users, saved_books): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM saved_books)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(ShelfCounts { users, saved_books })
    }

    /// Saved books for a user, oldest first
    pub async fn saved_books(&self, user_id: &str) -> AppResult<Vec<BookRecord>> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_saved_books(&mut conn, user_id).await?)
    }
}

// ============================================================================
// Write transactions
// ============================================================================

/// Transaction opened with `BEGIN IMMEDIATE`, so the write lock is taken (or
/// waited for under the busy timeout) before the first read. A deferred
/// transaction that has already read cannot wait for the lock and fails with
/// SQLITE_BUSY instead.
struct WriteTx {
    conn: PoolConnection<Sqlite>,
    finished: bool,
}

impl WriteTx {
    async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    async fn commit(mut self) -> Result<(), sqlx::Error> {
        sqlx::query("COMMIT").execute(&mut *self.conn).await?;
        self.finished = true;
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), sqlx::Error> {
        sqlx::query("ROLLBACK").execute(&mut *self.conn).await?;
        self.finished = true;
        Ok(())
    }
}

impl Deref for WriteTx {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        &self.conn
    }
}

impl DerefMut for WriteTx {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl Drop for WriteTx {
    fn drop(&mut self) {
        // Closing the connection rolls back whatever an early `?` left open;
        // it must not go back to the pool mid-transaction.
        if !self.finished {
            self.conn.close_on_drop();
        }
    }
}

// ============================================================================
// Row helpers
// ============================================================================

/// `column` is always one of our own column names, never user input
async fn load_user(
    conn: &mut SqliteConnection,
    column: &str,
    value: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(value)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(r) = row else {
        return Ok(None);
    };

    let saved_books = load_saved_books(conn, &r.0).await?;
    Ok(Some(UserRecord {
        id: r.0,
        username: r.1,
        email: r.2,
        password_hash: r.3,
        saved_books,
        created_at: r.4,
        updated_at: r.5,
    }))
}

async fn load_saved_books(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<BookRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BookRow>(
        "SELECT book_id, authors, description, image, link, title FROM saved_books WHERE user_id = ? ORDER BY position",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| BookRecord {
            book_id: r.0,
            authors: json_to_vec(&r.1),
            description: r.2,
            image: r.3,
            link: r.4,
            title: r.5,
        })
        .collect())
}

async fn user_exists(conn: &mut SqliteConnection, user_id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn touch_user(conn: &mut SqliteConnection, user_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
        .bind(now_iso8601())
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
