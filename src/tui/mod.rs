//! Terminal user interface for searching and saving books
//!
//! Two pages:
//! - Search: type a query, browse results, save the highlighted book
//! - Saved: the logged-in user's saved books, with delete

mod app;
mod input;
mod theme;
mod ui;

use std::io::{self, IsTerminal};

pub use app::{ClientState, TuiApp, TuiConfig};
pub use input::{Action, View};

/// The TUI needs a real terminal on both ends
pub fn should_use_tui() -> bool {
    if std::env::var("BOOKSHELF_HEADLESS").is_ok() {
        return false;
    }
    io::stdout().is_terminal() && io::stdin().is_terminal()
}
