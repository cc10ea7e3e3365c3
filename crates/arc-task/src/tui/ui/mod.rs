/*
[INPUT]:  AppState, View and the log buffer
[OUTPUT]: One full frame: tabs, active screen, notices, footer and open form
[POS]:    TUI UI module root
[UPDATE]: When the frame layout or panel set changes
*/

mod form;
mod layout;
mod logs;
mod market;
mod notices;
mod todo;

use arc_task::app::state::AppState;
use ratatui::layout::{Constraint, Direction, Layout};

use super::LogBufferHandle;
use super::view::{Mode, Tab, View};

pub(super) fn draw(
    frame: &mut ratatui::Frame,
    state: &AppState,
    view: &View,
    log_buffer: &LogBufferHandle,
) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(area);

    layout::draw_tabs(frame, rows[0], state, view.tab);
    match view.tab {
        Tab::Todo => todo::draw_todo(frame, rows[1], state, view),
        Tab::Market => market::draw_market(frame, rows[1], state, view),
        Tab::Logs => logs::draw_logs(frame, rows[1], log_buffer),
    }
    notices::draw_notices(frame, rows[2], state);
    layout::draw_footer(frame, rows[3], state, view);

    match view.mode {
        Mode::Normal => {}
        Mode::EditTodo(field) => {
            form::draw_todo_form(frame, layout::centered_rect(area, 60, 40), state, field)
        }
        Mode::EditPost(field) => {
            form::draw_post_form(frame, layout::centered_rect(area, 60, 40), state, field)
        }
    }
}
