//! Modal full-terminal overlay for model selection.
//!
//! Owns the terminal for the duration of the popup: raw mode plus alternate
//! screen on entry, guaranteed restore on exit. All state transitions go
//! through [`PickerState`]; this module only maps keys and draws.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::core::catalog::ModelCatalog;
use crate::ui::picker::{PickerEvent, PickerFocus, PickerOutcome, PickerState};

const FOOTER_HINT: &str = "↑/↓ move • PgUp/PgDn jump • Enter select • Esc cancel • / filter";

/// Run the picker overlay and return the chosen model id, or `None` on
/// cancellation. The catalog itself is never modified here; the caller
/// commits the selection through `ModelCatalog::set_model`.
pub fn pick_model(catalog: &ModelCatalog) -> Result<Option<String>, Box<dyn Error>> {
    let mut picker = PickerState::new(catalog.list(), Some(catalog.current()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_picker(&mut terminal, &mut picker);

    // Restore the terminal no matter how the loop ended.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_picker(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    picker: &mut PickerState,
) -> Result<Option<String>, Box<dyn Error>> {
    let mut list_state = ListState::default();
    let mut list_height: u16 = 0;

    loop {
        terminal.draw(|frame| {
            list_height = draw_picker(frame, picker, &mut list_state);
        })?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Page moves jump by the visible window minus one row of overlap.
            let page = usize::from(list_height.saturating_sub(1).max(1));
            let Some(picker_event) = map_key(&key, picker.focus, page) else {
                continue;
            };
            if let Some(outcome) = picker.handle(picker_event) {
                return Ok(match outcome {
                    PickerOutcome::Selected(id) => Some(id),
                    PickerOutcome::Cancelled => None,
                });
            }
        }
    }
}

fn map_key(key: &KeyEvent, focus: PickerFocus, page: usize) -> Option<PickerEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(PickerEvent::Cancel),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(PickerEvent::Cancel),
        KeyCode::Enter => Some(PickerEvent::Confirm),
        KeyCode::Up => Some(PickerEvent::MoveUp),
        KeyCode::Down => Some(PickerEvent::MoveDown),
        KeyCode::PageUp => Some(PickerEvent::PageUp(page)),
        KeyCode::PageDown => Some(PickerEvent::PageDown(page)),
        KeyCode::Backspace => Some(PickerEvent::Backspace),
        KeyCode::Char('/') if focus == PickerFocus::List => Some(PickerEvent::StartFilter),
        KeyCode::Char(ch) if focus == PickerFocus::Filter => Some(PickerEvent::Input(ch)),
        _ => None,
    }
}

/// Draw one frame and report the height of the list window.
fn draw_picker(frame: &mut Frame, picker: &PickerState, list_state: &mut ListState) -> u16 {
    let show_filter = picker.focus == PickerFocus::Filter || !picker.filter.is_empty();

    let mut constraints = vec![Constraint::Length(1)];
    if show_filter {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let list_area = chunks[if show_filter { 2 } else { 1 }];
    let footer_area = chunks[if show_filter { 3 } else { 2 }];

    let title = Paragraph::new("Select a model")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    if show_filter {
        let filter_line = Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::DarkGray)),
            Span::raw(picker.filter.as_str()),
        ]);
        frame.render_widget(Paragraph::new(filter_line), chunks[1]);
        if picker.focus == PickerFocus::Filter {
            let cursor_x = chunks[1].x + 2 + picker.filter.width() as u16;
            frame.set_cursor_position((cursor_x.min(chunks[1].right()), chunks[1].y));
        }
    }

    if picker.filtered.is_empty() {
        let placeholder = Paragraph::new(" No models match your filter.").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
        frame.render_widget(placeholder, list_area);
    } else {
        let items: Vec<ListItem> = picker
            .filtered
            .iter()
            .map(|id| {
                let (label, style) = if picker.is_current(id) {
                    (format!(" {id} (current)"), Style::default().fg(Color::Cyan))
                } else {
                    (format!(" {id}"), Style::default())
                };
                ListItem::new(label).style(style)
            })
            .collect();
        // The selected row gets reverse video; a selected current row keeps
        // its cyan foreground underneath, which yields the combined style.
        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        list_state.select(Some(picker.selected));
        frame.render_stateful_widget(list, list_area, list_state);
    }

    let footer = Paragraph::new(FOOTER_HINT).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    list_area.height
}
