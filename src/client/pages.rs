//! Page state for the client: searching, saving and the saved-books list.
//!
//! Failures are logged and swallowed: the page simply keeps its old state.

use crate::client::api::{AccountUser, BooksApi};
use crate::client::session::Session;
use crate::client::storage::LocalStore;
use crate::db::BookRecord;

/// What the save control for one search result looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveControl {
    /// Anonymous sessions never see it
    Hidden,
    Enabled,
    /// Already saved
    Disabled,
}

impl SaveControl {
    pub fn label(self) -> &'static str {
        match self {
            SaveControl::Hidden => "",
            SaveControl::Enabled => "Save this Book!",
            SaveControl::Disabled => "This book has already been saved!",
        }
    }
}

// ============================================================================
// Search page
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub search_input: String,
    pub searched_books: Vec<BookRecord>,
    pub saved_book_ids: Vec<String>,
}

impl SearchPage {
    /// Start the page with the saved ids from local storage
    pub fn mount(store: &LocalStore) -> Self {
        Self {
            saved_book_ids: store.saved_book_ids(),
            ..Default::default()
        }
    }

    /// Persist saved ids on the way out
    pub fn unmount(&self, store: &LocalStore) {
        if let Err(e) = store.save_book_ids(&self.saved_book_ids) {
            tracing::error!(error = %e, "Failed to persist saved book ids");
        }
    }

    /// Run the search for the current input. Empty input is ignored.
    /// Returns whether the result list was replaced.
    pub async fn submit(&mut self, api: &dyn BooksApi) -> bool {
        let query = self.search_input.trim().to_string();
        if query.is_empty() {
            return false;
        }

        match api.search_books(&query).await {
            Ok(books) => {
                tracing::info!(query = %query, count = books.len(), "Search complete");
                self.searched_books = books;
                self.search_input.clear();
                true
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Search failed");
                false
            }
        }
    }

    pub fn is_saved(&self, book_id: &str) -> bool {
        self.saved_book_ids.iter().any(|id| id == book_id)
    }

    pub fn save_control(&self, session: &Session, book_id: &str) -> SaveControl {
        if !session.logged_in() {
            SaveControl::Hidden
        } else if self.is_saved(book_id) {
            SaveControl::Disabled
        } else {
            SaveControl::Enabled
        }
    }

    /// Save one of the current results to the user's account. Returns whether
    /// the book is now marked saved.
    pub async fn save_book(&mut self, api: &dyn BooksApi, session: &Session, book_id: &str) -> bool {
        let Some(book) = self.searched_books.iter().find(|b| b.book_id == book_id) else {
            return false;
        };
        let Some(token) = session.token() else {
            return false;
        };

        match api.save_book(token, book).await {
            Ok(_) => {
                if !self.is_saved(book_id) {
                    self.saved_book_ids.push(book_id.to_string());
                }
                true
            }
            Err(e) => {
                tracing::error!(book_id, error = %e, "Saving book failed");
                false
            }
        }
    }

    pub fn heading(&self) -> String {
        if self.searched_books.is_empty() {
            "Search for a book to begin".to_string()
        } else {
            format!("Viewing {} results:", self.searched_books.len())
        }
    }
}

// ============================================================================
// Saved books page
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SavedBooksPage {
    pub user: Option<AccountUser>,
}

impl SavedBooksPage {
    /// Fetch the logged-in user's saved books
    pub async fn load(&mut self, api: &dyn BooksApi, session: &Session) -> bool {
        let Some(token) = session.token() else {
            return false;
        };

        match api.me(token).await {
            Ok(user) => {
                self.user = Some(user);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Loading saved books failed");
                false
            }
        }
    }

    pub fn books(&self) -> &[BookRecord] {
        self.user
            .as_ref()
            .map(|u| u.saved_books.as_slice())
            .unwrap_or(&[])
    }

    /// Delete a book from the account and from the local saved ids
    pub async fn remove(
        &mut self,
        api: &dyn BooksApi,
        session: &Session,
        store: &LocalStore,
        book_id: &str,
    ) -> bool {
        let Some(token) = session.token() else {
            return false;
        };

        match api.remove_book(token, book_id).await {
            Ok(user) => {
                self.user = Some(user);
                if let Err(e) = store.remove_book_id(book_id) {
                    tracing::warn!(book_id, error = %e, "Failed to drop saved book id");
                }
                true
            }
            Err(e) => {
                tracing::error!(book_id, error = %e, "Removing book failed");
                false
            }
        }
    }

    pub fn heading(&self) -> String {
        match self.books().len() {
            0 => "You have no saved books!".to_string(),
            1 => "Viewing 1 saved book:".to_string(),
            n => format!("Viewing {} saved books:", n),
        }
    }
}
