/*
[INPUT]:  Frame regions, AppState session info, active tab and mode
[OUTPUT]: Tab bar, hotkey footer, shared palette and layout helpers
[POS]:    TUI UI chrome shared by every tab
[UPDATE]: When keybindings, palette or chrome layout change
*/

use arc_task::app::state::AppState;
use arc_task_adapter::short_address;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use crate::tui::view::{Mode, Tab, View};

pub(super) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(super) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn key_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn selected_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn panel(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(title)
}

fn session_title(state: &AppState) -> String {
    let account = match (state.account, state.connecting) {
        (Some(account), _) => short_address(&account),
        (None, true) => "connecting...".to_string(),
        (None, false) => "not connected".to_string(),
    };
    match state.market.balance {
        Some(balance) => format!("arc-task | {account} | {}", state.format_amount(balance)),
        None => format!("arc-task | {account}"),
    }
}

pub(super) fn draw_tabs(frame: &mut ratatui::Frame, area: Rect, state: &AppState, current: Tab) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|tab| Line::from(tab.title())).collect();
    let tabs = Tabs::new(titles)
        .block(panel(session_title(state)))
        .highlight_style(header_style())
        .select(current.index());
    frame.render_widget(tabs, area);
}

fn hotkeys(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in pairs {
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    Line::from(spans)
}

pub(super) fn draw_footer(frame: &mut ratatui::Frame, area: Rect, state: &AppState, view: &View) {
    let line1 = match view.mode {
        Mode::Normal => hotkeys(&[
            ("[Tab/1-3]", "Switch"),
            ("[Up/Down]", "Select"),
            ("[r]", "Refresh"),
            ("[w]", "Connect"),
            ("[Esc]", "Clear notices"),
            ("[q]", "Quit"),
        ]),
        Mode::EditTodo(_) | Mode::EditPost(_) => hotkeys(&[
            ("[Tab]", "Next field"),
            ("[Enter]", "Submit"),
            ("[Esc]", "Close"),
        ]),
    };
    let line2 = match (view.mode, view.tab) {
        (Mode::Normal, Tab::Todo) => {
            let mut keys = vec![("[n]", "New")];
            if let Some(task) = view.selected_todo(state) {
                if state.todo.can_complete(task) {
                    keys.push(("[x]", "Complete"));
                }
                if state.todo.can_delete(task) {
                    keys.push(("[d]", "Delete"));
                }
            }
            keys.push(("[f]", "Filter"));
            hotkeys(&keys)
        }
        (Mode::Normal, Tab::Market) => hotkeys(&[
            ("[n]", "Post"),
            ("[t]", "Take"),
            ("[m]", "Mark done"),
            ("[a]", "Approve"),
            ("[x]", "Cancel"),
            ("[o]", "Only mine"),
        ]),
        (Mode::EditTodo(_), _) => hotkeys(&[("[Left/Right]", "Priority")]),
        _ => Line::default(),
    };

    let status = match view.tab.screen().and_then(|screen| state.in_flight(screen)) {
        Some(in_flight) => format!("{} ({})", in_flight.purpose, in_flight.phase()),
        None => "Ready".to_string(),
    };
    let mut line2 = line2;
    line2.spans.push(Span::raw(format!("Status: {status}")));

    let widget = Paragraph::new(Text::from(vec![line1, line2]))
        .block(panel("Hotkeys"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(super) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
