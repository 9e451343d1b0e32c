//! UI layout and rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::client::SaveControl;
use crate::db::BookRecord;
use crate::tui::app::ClientState;
use crate::tui::input::View;
use crate::tui::theme::Theme;

/// Screen areas
///
/// ```text
/// Bookshelf · Search for Books!                      logged in as reader
/// ┌─ Search ─────────────────────────────────────────────────────────────┐
/// │ harry potter_                                                        │
/// └──────────────────────────────────────────────────────────────────────┘
/// ┌─ Viewing 10 results: ────────────────────────────────────────────────┐
/// │ Title                                                                │
/// │   Authors: ...                                          [Save ...]   │
/// └──────────────────────────────────────────────────────────────────────┘
/// [Tab] Saved Books  [Enter] Search  [Ctrl+S] Save  [Esc] Quit
/// ```
struct Areas {
    header: Rect,
    input: Rect,
    list: Rect,
    status: Rect,
}

fn calculate_areas(area: Rect, view: View) -> Areas {
    let input_height = if view == View::Search { 3 } else { 0 };
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(input_height),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    Areas {
        header: rows[0],
        input: rows[1],
        list: rows[2],
        status: rows[3],
    }
}

pub fn render(frame: &mut Frame, state: &ClientState) {
    let areas = calculate_areas(frame.area(), state.view);

    render_header(frame, areas.header, state);
    if state.view == View::Search {
        render_input(frame, areas.input, &state.search.search_input);
    }
    render_books(frame, areas.list, state);
    render_status_bar(frame, areas.status, state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &ClientState) {
    let page = match state.view {
        View::Search => "Search for Books!",
        View::Saved => "Viewing saved books!",
    };
    let who = match state.session.profile() {
        Some(claims) => format!("logged in as {}", claims.username),
        None => "not logged in".to_string(),
    };

    let header = Line::from(vec![
        Span::styled("Bookshelf", Theme::page_title(state.view == View::Saved)),
        Span::styled(format!(" · {}  ", page), Theme::text()),
        Span::styled(who, Theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_input(frame: &mut Frame, area: Rect, input: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_focused())
        .title(" Search ");
    let text = Line::from(vec![
        Span::styled(input.to_string(), Theme::text()),
        Span::styled("_", Theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_books(frame: &mut Frame, area: Rect, state: &ClientState) {
    let (heading, books) = match state.view {
        View::Search => (state.search.heading(), state.search.searched_books.as_slice()),
        View::Saved => (state.saved.heading(), state.saved.books()),
    };

    let items: Vec<ListItem> = books
        .iter()
        .map(|book| {
            let control = match state.view {
                View::Search => {
                    let control = state.search.save_control(&state.session, &book.book_id);
                    let style = match control {
                        SaveControl::Enabled => Theme::action(),
                        _ => Theme::dim(),
                    };
                    Span::styled(control.label(), style)
                }
                View::Saved => Span::styled("Delete this Book! [d]", Theme::warning()),
            };
            book_item(book, control)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(format!(" {} ", heading), Theme::page_title(state.view == View::Saved))),
        )
        .highlight_style(Theme::selected());

    let mut list_state = ListState::default();
    if !books.is_empty() {
        list_state.select(Some(state.selected.min(books.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn book_item<'a>(book: &'a BookRecord, control: Span<'a>) -> ListItem<'a> {
    let mut lines = vec![
        Line::from(Span::styled(book.title.as_str(), Theme::book_title())),
        Line::from(Span::styled(format!("  Authors: {}", book.authors.join(", ")), Theme::text())),
    ];
    if let Some(description) = &book.description {
        lines.push(Line::from(Span::styled(format!("  {}", first_line(description, 100)), Theme::dim())));
    }
    if !control.content.is_empty() {
        lines.push(Line::from(vec![Span::raw("  "), control]));
    }
    ListItem::new(lines)
}

/// Truncate long descriptions to one row
fn first_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut.trim_end())
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &ClientState) {
    let keybinds: &[(&str, &str)] = match state.view {
        View::Search => &[
            ("Tab", "Saved Books"),
            ("Enter", "Search"),
            ("↑↓", "Select"),
            ("Ctrl+S", "Save"),
            ("Esc", "Quit"),
        ],
        View::Saved => &[("Tab", "Search"), ("↑↓", "Select"), ("d", "Delete"), ("q", "Quit")],
    };

    let mut spans = Vec::new();
    for (i, (key, desc)) in keybinds.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Theme::dim()));
        }
        spans.push(Span::styled(format!("[{}]", key), Theme::keybind_key()));
        spans.push(Span::styled(format!(" {}", desc), Theme::keybind()));
    }
    if let Some(status) = &state.status {
        spans.push(Span::styled(format!("   {}", status), Theme::status()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
