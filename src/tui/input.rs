//! Input event handling for the TUI

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Which page the TUI is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    Saved,
}

/// Actions that can be triggered by user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Toggle between search and saved books (Tab)
    SwitchView,
    /// Move the selection
    SelectPrev,
    SelectNext,
    /// Run the search (Enter)
    Submit,
    /// Save the highlighted result (Ctrl+S)
    SaveSelected,
    /// Delete the highlighted saved book (d)
    RemoveSelected,
    /// Edit the search box
    Type(char),
    Backspace,
    /// No action (tick)
    Tick,
}

/// Input handler that converts terminal events to actions
#[derive(Debug, Clone, Copy)]
pub struct InputHandler {
    tick_rate: Duration,
}

impl InputHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next action (blocks until event or timeout)
    pub fn next_action(&self, view: View) -> std::io::Result<Action> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key, view)),
                _ => Ok(Action::Tick),
            }
        } else {
            Ok(Action::Tick)
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Convert a key event to an action. Printable keys edit the search box on
/// the search page, so only the saved page has single-letter shortcuts.
pub fn map_key(key: KeyEvent, view: View) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('s') if ctrl => Action::SaveSelected,
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchView,
        KeyCode::Up => Action::SelectPrev,
        KeyCode::Down => Action::SelectNext,
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) if !ctrl => match view {
            View::Search => Action::Type(c),
            View::Saved => match c {
                'q' => Action::Quit,
                'd' => Action::RemoveSelected,
                'k' => Action::SelectPrev,
                'j' => Action::SelectNext,
                _ => Action::Tick,
            },
        },
        _ => Action::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_letters_type_on_search_page() {
        assert_eq!(map_key(key(KeyCode::Char('q')), View::Search), Action::Type('q'));
        assert_eq!(map_key(key(KeyCode::Char('d')), View::Search), Action::Type('d'));
    }

    #[test]
    fn test_letters_are_shortcuts_on_saved_page() {
        assert_eq!(map_key(key(KeyCode::Char('q')), View::Saved), Action::Quit);
        assert_eq!(map_key(key(KeyCode::Char('d')), View::Saved), Action::RemoveSelected);
        assert_eq!(map_key(key(KeyCode::Char('x')), View::Saved), Action::Tick);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key(ctrl('c'), View::Search), Action::Quit);
        assert_eq!(map_key(ctrl('s'), View::Search), Action::SaveSelected);
        assert_eq!(map_key(ctrl('x'), View::Search), Action::Tick);
        assert_eq!(map_key(key(KeyCode::Tab), View::Saved), Action::SwitchView);
        assert_eq!(map_key(key(KeyCode::Enter), View::Search), Action::Submit);
    }
}
