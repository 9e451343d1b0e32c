//! Theme and color definitions for the TUI

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the book client
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const BORDER: Color = Color::Rgb(80, 80, 80);
    pub const BORDER_FOCUSED: Color = Color::Rgb(100, 149, 237); // Cornflower blue

    pub const SUCCESS: Color = Color::Rgb(74, 222, 128); // Green-400
    pub const INFO: Color = Color::Rgb(96, 165, 250); // Blue-400
    pub const WARN: Color = Color::Rgb(251, 191, 36); // Amber-400

    pub const TITLE_SEARCH: Color = Color::Rgb(167, 139, 250); // Purple
    pub const TITLE_SAVED: Color = Color::Rgb(52, 211, 153); // Emerald

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    /// Style for dimmed/secondary text
    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Style for the highlighted book
    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Rgb(55, 65, 81)) // Gray-700
            .add_modifier(Modifier::BOLD)
    }

    pub fn book_title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn page_title(saved_view: bool) -> Style {
        let color = if saved_view {
            Self::TITLE_SAVED
        } else {
            Self::TITLE_SEARCH
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Enabled save control
    pub fn action() -> Style {
        Style::default().fg(Self::INFO)
    }

    pub fn status() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARN)
    }

    /// Style for keyboard shortcut hints
    pub fn keybind() -> Style {
        Style::default().fg(Color::Rgb(156, 163, 175)) // Gray-400
    }

    /// Style for keyboard shortcut key
    pub fn keybind_key() -> Style {
        Style::default()
            .fg(Color::Rgb(96, 165, 250)) // Blue-400
            .add_modifier(Modifier::BOLD)
    }
}
