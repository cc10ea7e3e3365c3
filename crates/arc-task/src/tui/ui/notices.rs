/*
[INPUT]:  AppState notices
[OUTPUT]: Most recent notices, errors with their kind hint
[POS]:    TUI UI notice panel
[UPDATE]: When notice styling changes
*/

use arc_task::app::state::{AppState, NoticeLevel};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::layout::panel;

pub(super) fn draw_notices(frame: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let available = area.height.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    for notice in state.notices.iter().rev() {
        let (tag, color) = match notice.level {
            NoticeLevel::Info => ("info", Color::Cyan),
            NoticeLevel::Success => ("ok", Color::LightGreen),
            NoticeLevel::Error => ("error", Color::LightRed),
        };
        let mut line = vec![
            Span::styled(format!("[{tag}] "), Style::default().fg(color)),
            Span::raw(notice.message.clone()),
        ];
        if notice.level == NoticeLevel::Error
            && let Some(hint) = notice.hint()
        {
            line.push(Span::styled(format!("  {hint}"), Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(line));
        if lines.len() >= available {
            break;
        }
    }
    let widget = Paragraph::new(lines)
        .block(panel("Notices"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}
