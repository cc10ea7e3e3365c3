/*
[INPUT]:  AppState marketplace screen, View selection
[OUTPUT]: Marketplace table plus a detail pane with legal controls and post progress
[POS]:    TUI UI marketplace tab
[UPDATE]: When marketplace columns or the detail pane change
*/

use arc_task::app::state::AppState;
use arc_task_adapter::{MarketTask, TaskStatus, short_address};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState, Wrap};

use super::layout::{header_style, panel, selected_style};
use crate::tui::view::View;

fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Open => Color::Cyan,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Completed => Color::LightBlue,
        TaskStatus::Approved => Color::LightGreen,
        TaskStatus::Cancelled => Color::DarkGray,
    };
    Style::default().fg(color)
}

fn row(state: &AppState, task: &MarketTask) -> Row<'static> {
    let worker = task
        .worker
        .map(|worker| short_address(&worker))
        .unwrap_or_else(|| "-".to_string());
    Row::new(vec![
        Cell::from(format!("#{}", task.id)),
        Cell::from(task.title.clone()),
        Cell::from(state.format_amount(task.bounty)),
        Cell::from(task.status.label()).style(status_style(task.status)),
        Cell::from(short_address(&task.poster)),
        Cell::from(worker),
    ])
}

fn detail(state: &AppState, task: Option<&MarketTask>) -> Vec<Line<'static>> {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    if let Some(task) = task {
        lines.push(Line::from(Span::styled(task.title.clone(), label)));
        if !task.description.is_empty() {
            lines.push(Line::from(task.description.clone()));
        }
        let created = task
            .created_at_utc()
            .map(|time| time.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        lines.push(Line::from(format!("Posted {created}")));
        let controls = state.market.controls(task, state.account);
        let actions = if controls.is_empty() {
            "none".to_string()
        } else {
            controls
                .iter()
                .map(|action| action.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(Line::from(vec![Span::styled("Actions: ", label), Span::raw(actions)]));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Post: ", label),
        Span::raw(state.market.flow.label()),
    ]));
    lines
}

pub(super) fn draw_market(frame: &mut ratatui::Frame, area: Rect, state: &AppState, view: &View) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let mut title = "Marketplace".to_string();
    if state.market.only_mine {
        title.push_str(" [mine]");
    }
    if state.market.loading {
        title.push_str(" (loading)");
    }

    let tasks = state.market.visible_tasks(state.account);
    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks listed.").block(panel(title));
        frame.render_widget(empty, columns[0]);
    } else {
        let rows: Vec<Row> = tasks.iter().map(|task| row(state, task)).collect();
        let header = Row::new(vec!["ID", "Title", "Bounty", "Status", "Poster", "Worker"])
            .style(header_style());
        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(16),
                Constraint::Length(14),
                Constraint::Length(11),
                Constraint::Length(13),
                Constraint::Length(13),
            ],
        )
        .header(header)
        .block(panel(title))
        .row_highlight_style(selected_style())
        .highlight_symbol("> ");
        let mut table_state = TableState::default().with_selected(Some(view.market_selected));
        frame.render_stateful_widget(table, columns[0], &mut table_state);
    }

    let selected = view.selected_market(state);
    let pane = Paragraph::new(detail(state, selected))
        .block(panel("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(pane, columns[1]);
}
