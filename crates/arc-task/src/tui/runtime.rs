/*
[INPUT]:  Session, AppConfig, log buffer, terminal key events, effect results
[OUTPUT]: TUI run loop plus the in-memory log sink behind the Logs tab
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing the event loop, tick rate, or log capture
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use arc_task::app::event::Action;
use arc_task::app::state::Screen;
use arc_task::{AppConfig, Session};
use ratatui::crossterm::event::{self as term_event, Event as TermEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::fmt::MakeWriter;

use super::events::handle_key;
use super::terminal::TerminalGuard;
use super::ui;
use super::view::View;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

/// Bounded ring of formatted log lines
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn handle(capacity: usize) -> LogBufferHandle {
        Arc::new(StdMutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The newest `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }
}

/// Lock that survives a panicked writer; log lines are plain data
pub(super) fn lock(buffer: &LogBufferHandle) -> MutexGuard<'_, LogBuffer> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `MakeWriter` feeding tracing output into a [`LogBuffer`]
#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            lock(&self.buffer).push_line(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            lock(&self.buffer).push_line(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

/// Interactive loop: keys and effect results feed the reducer; every turn redraws
pub async fn run_tui(
    session: Session,
    config: AppConfig,
    screen: Screen,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if term_event::poll(INPUT_POLL_INTERVAL).unwrap_or(false)
                && let Ok(event) = term_event::read()
                && input_tx.send(event).is_err()
            {
                break;
            }
        }
    });

    let mut app = session.app(&config, screen, shutdown.clone());
    let mut view = View::new(screen);
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    app.dispatch_detached(Action::Connect, &action_tx);
    info!(wallet = app.executor().wallet_name(), "tui started");

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    loop {
        view.clamp(app.state());
        terminal.draw(|frame| ui::draw(frame, app.state(), &view, &log_buffer))?;

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tick.tick() => {}
            Some(action) = action_rx.recv() => {
                app.dispatch_detached(action, &action_tx);
            }
            Some(event) = input_rx.recv() => {
                let TermEvent::Key(key) = event else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let outcome = handle_key(&mut view, app.state(), key);
                for action in outcome.actions {
                    debug!(?action, "key action");
                    app.dispatch_detached(action, &action_tx);
                }
                if outcome.quit {
                    break;
                }
            }
        }
    }

    input_shutdown.cancel();
    // stops any confirmation still being polled
    shutdown.cancel();
    info!("tui stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_buffer_drops_oldest() {
        let mut buffer = LogBuffer::new(2);
        buffer.push_line("a".to_string());
        buffer.push_line("b".to_string());
        buffer.push_line("c".to_string());
        assert_eq!(buffer.tail(10), vec!["b", "c"]);
        assert_eq!(buffer.tail(1), vec!["c"]);
    }

    #[test]
    fn test_writer_splits_lines_and_flushes_partial() {
        let handle = LogBuffer::handle(10);
        let factory = LogWriterFactory::new(handle.clone());
        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\npar").unwrap();
            writer.write_all(b"tial").unwrap();
        }
        assert_eq!(lock(&handle).tail(10), vec!["first", "second", "partial"]);
    }
}
