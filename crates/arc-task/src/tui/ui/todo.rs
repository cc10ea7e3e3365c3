/*
[INPUT]:  AppState todo screen, View selection
[OUTPUT]: Todo table with stats and filter in the panel title
[POS]:    TUI UI todo tab
[UPDATE]: When todo columns or stats display change
*/

use arc_task::app::state::{AppState, TodoFilter};
use arc_task_adapter::{Priority, TodoTask};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use super::layout::{header_style, panel, selected_style};
use crate::tui::view::View;

fn filter_label(filter: TodoFilter) -> &'static str {
    match filter {
        TodoFilter::All => "all",
        TodoFilter::Pending => "pending",
        TodoFilter::Completed => "completed",
    }
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::LightRed),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Gray),
    }
}

fn row(task: &TodoTask) -> Row<'static> {
    let done = if task.completed { "[x]" } else { "[ ]" };
    let created = task
        .created_at_utc()
        .map(|time| time.format("%m-%d %H:%M").to_string())
        .unwrap_or_default();
    Row::new(vec![
        Cell::from(format!("#{}", task.id)),
        Cell::from(done),
        Cell::from(task.title.clone()),
        Cell::from(task.priority.label()).style(priority_style(task.priority)),
        Cell::from(created),
    ])
}

pub(super) fn draw_todo(frame: &mut ratatui::Frame, area: Rect, state: &AppState, view: &View) {
    let mut title = format!("Todo [{}]", filter_label(state.todo.filter));
    if let Some(stats) = state.todo.stats {
        title.push_str(&format!(
            " total {} / completed {} / pending {}",
            stats.total, stats.completed, stats.pending
        ));
    }
    if state.todo.loading {
        title.push_str(" (loading)");
    }

    if state.account.is_none() {
        let hint = Paragraph::new("Press [w] to connect a wallet.").block(panel(title));
        frame.render_widget(hint, area);
        return;
    }

    let rows: Vec<Row> = state.todo.visible_tasks().map(row).collect();
    if rows.is_empty() {
        let empty = Paragraph::new("No tasks. Press [n] to create one.").block(panel(title));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["ID", "", "Title", "Priority", "Created"]).style(header_style());
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(panel(title))
    .row_highlight_style(selected_style())
    .highlight_symbol("> ");
    let mut table_state = TableState::default().with_selected(Some(view.todo_selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}
