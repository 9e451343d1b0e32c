//! Client-side persisted state: the saved book ids and the login token.
//!
//! Writes are best effort and last write wins; nothing here coordinates with
//! the server.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::db::sqlite_helpers::{json_to_vec, vec_to_json};

const SAVED_BOOKS_FILE: &str = "saved_books.json";
const TOKEN_FILE: &str = "id_token";

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Option<String> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "Failed to read client state");
                None
            }
        }
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        fs::write(self.dir.join(name), contents)
            .with_context(|| format!("Failed to write {}", name))
    }

    // ========================================================================
    // Saved book ids
    // ========================================================================

    /// Ids of books this client has saved; empty if nothing is stored
    pub fn saved_book_ids(&self) -> Vec<String> {
        self.read(SAVED_BOOKS_FILE)
            .map(|s| json_to_vec(&s))
            .unwrap_or_default()
    }

    pub fn save_book_ids(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return self.remove(SAVED_BOOKS_FILE);
        }
        self.write(SAVED_BOOKS_FILE, &vec_to_json(ids))
    }

    /// Drop one id. Returns false when it was not stored.
    pub fn remove_book_id(&self, book_id: &str) -> Result<bool> {
        let mut ids = self.saved_book_ids();
        let before = ids.len();
        ids.retain(|id| id != book_id);
        if ids.len() == before {
            return Ok(false);
        }
        self.save_book_ids(&ids)?;
        Ok(true)
    }

    // ========================================================================
    // Token
    // ========================================================================

    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_FILE)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.write(TOKEN_FILE, token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.remove(TOKEN_FILE)
    }

    fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", name)),
        }
    }
}
