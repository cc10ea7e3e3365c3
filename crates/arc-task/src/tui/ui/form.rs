/*
[INPUT]:  AppState form contents, focused field
[OUTPUT]: Form overlay for creating a todo or posting a bounty task
[POS]:    TUI UI form overlay
[UPDATE]: When form fields change
*/

use arc_task::app::state::AppState;
use arc_task_adapter::Priority;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use super::layout::panel;
use crate::tui::view::{PostField, TodoField};

fn field(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(Span::styled(format!("{label}: {value}{cursor}"), style))
}

fn render(frame: &mut ratatui::Frame, area: Rect, title: &'static str, lines: Vec<Line<'static>>) {
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(panel(title)), area);
}

pub(super) fn draw_todo_form(frame: &mut ratatui::Frame, area: Rect, state: &AppState, focus: TodoField) {
    let form = &state.todo.form;
    let priorities = Priority::ALL
        .iter()
        .map(|priority| {
            if *priority == form.priority {
                format!("<{}>", priority.label())
            } else {
                priority.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let lines = vec![
        field("Title", &form.title, focus == TodoField::Title),
        field("Description", &form.description, focus == TodoField::Description),
        field("Priority", &priorities, focus == TodoField::Priority),
    ];
    render(frame, area, "New task", lines);
}

pub(super) fn draw_post_form(frame: &mut ratatui::Frame, area: Rect, state: &AppState, focus: PostField) {
    let form = &state.market.form;
    let mut lines = vec![
        field("Title", &form.title, focus == PostField::Title),
        field("Description", &form.description, focus == PostField::Description),
        field(
            &format!("Bounty ({})", state.token_symbol),
            &form.bounty,
            focus == PostField::Bounty,
        ),
        Line::default(),
        Line::from("Submitting asks the wallet twice: approve the bounty, then post."),
    ];
    if let Some(balance) = state.market.balance {
        lines.push(Line::from(format!("Balance: {}", state.format_amount(balance))));
    }
    lines.push(Line::from(format!("Phase: {}", state.market.flow.label())));
    render(frame, area, "Post task", lines);
}
