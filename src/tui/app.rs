//! Main TUI application

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::client::{BooksApi, LocalStore, SavedBooksPage, SearchPage, Session};
use crate::tui::input::{Action, InputHandler, View};
use crate::tui::ui;

/// TUI configuration
pub struct TuiConfig {
    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
    /// Page shown first
    pub start_view: View,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            start_view: View::Search,
        }
    }
}

/// Everything the screen shows, independent of the terminal
pub struct ClientState {
    pub view: View,
    pub search: SearchPage,
    pub saved: SavedBooksPage,
    pub selected: usize,
    pub status: Option<String>,
    pub session: Session,
    pub store: LocalStore,
}

impl ClientState {
    pub fn new(session: Session, store: LocalStore) -> Self {
        Self {
            view: View::Search,
            search: SearchPage::mount(&store),
            saved: SavedBooksPage::default(),
            selected: 0,
            status: None,
            session,
            store,
        }
    }

    fn list_len(&self) -> usize {
        match self.view {
            View::Search => self.search.searched_books.len(),
            View::Saved => self.saved.books().len(),
        }
    }

    fn selected_id(&self) -> Option<String> {
        let books = match self.view {
            View::Search => self.search.searched_books.as_slice(),
            View::Saved => self.saved.books(),
        };
        books.get(self.selected).map(|b| b.book_id.clone())
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.list_len().saturating_sub(1));
    }

    /// Show the given page, fetching saved books when needed
    pub async fn open(&mut self, view: View, api: &dyn BooksApi) {
        self.view = view;
        self.selected = 0;
        self.status = None;
        if view == View::Saved {
            if !self.session.logged_in() {
                self.status = Some("Log in to see your saved books".to_string());
            } else if !self.saved.load(api, &self.session).await {
                self.status = Some("Could not load saved books".to_string());
            }
        }
    }

    /// Apply one input action. Returns false once the user asked to quit.
    pub async fn handle(&mut self, action: Action, api: &dyn BooksApi) -> bool {
        match action {
            Action::Quit => return false,
            Action::SwitchView => {
                let next = match self.view {
                    View::Search => View::Saved,
                    View::Saved => View::Search,
                };
                self.open(next, api).await;
            }
            Action::SelectPrev => self.selected = self.selected.saturating_sub(1),
            Action::SelectNext => {
                self.selected += 1;
                self.clamp_selection();
            }
            Action::Type(c) if self.view == View::Search => self.search.search_input.push(c),
            Action::Backspace if self.view == View::Search => {
                self.search.search_input.pop();
            }
            Action::Submit if self.view == View::Search => {
                if self.search.submit(api).await {
                    self.selected = 0;
                    self.status = None;
                }
            }
            Action::SaveSelected if self.view == View::Search => {
                if let Some(id) = self.selected_id() {
                    if self.search.save_book(api, &self.session, &id).await {
                        self.status = Some("Book saved".to_string());
                    }
                }
            }
            Action::RemoveSelected if self.view == View::Saved => {
                if let Some(id) = self.selected_id() {
                    if self.saved.remove(api, &self.session, &self.store, &id).await {
                        self.search.saved_book_ids.retain(|saved| saved != &id);
                        self.status = Some("Book removed".to_string());
                        self.clamp_selection();
                    }
                }
            }
            _ => {}
        }
        true
    }

    /// Persist client state before exit
    pub fn close(&self) {
        self.search.unmount(&self.store);
    }
}

/// Main TUI application
pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: InputHandler,
    state: ClientState,
    api: Arc<dyn BooksApi>,
}

impl TuiApp {
    pub fn new(
        session: Session,
        store: LocalStore,
        api: Arc<dyn BooksApi>,
        config: TuiConfig,
    ) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let mut state = ClientState::new(session, store);
        state.view = config.start_view;

        Ok(Self {
            terminal,
            input: InputHandler::new(config.tick_rate_ms),
            state,
            api,
        })
    }

    /// Run the TUI event loop
    pub async fn run(mut self) -> io::Result<()> {
        let start = self.state.view;
        self.state.open(start, self.api.as_ref()).await;

        loop {
            self.terminal.draw(|frame| ui::render(frame, &self.state))?;

            // Crossterm polling blocks, keep it off the runtime threads
            let input = self.input;
            let view = self.state.view;
            let action = tokio::task::spawn_blocking(move || input.next_action(view))
                .await
                .map_err(io::Error::other)??;

            if !self.state.handle(action, self.api.as_ref()).await {
                break;
            }
        }

        self.state.close();
        self.cleanup()
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        // Best effort cleanup on drop
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
