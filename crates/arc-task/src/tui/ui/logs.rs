/*
[INPUT]:  LogBufferHandle
[OUTPUT]: Log panel showing the newest lines that fit
[POS]:    TUI UI logs tab
[UPDATE]: When log panel formatting changes
*/

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::layout::panel;
use crate::tui::LogBufferHandle;
use crate::tui::runtime::lock;

pub(super) fn draw_logs(frame: &mut ratatui::Frame, area: Rect, buffer: &LogBufferHandle) {
    let available = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = lock(buffer)
        .tail(available)
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Logs")), area);
}
