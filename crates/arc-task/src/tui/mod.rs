/*
[INPUT]:  Session, AppConfig, log buffer, shutdown token
[OUTPUT]: Ratatui terminal UI over the shared view-model
[POS]:    TUI module for the arc-task binary
[UPDATE]: When changing TUI layout, keybindings, or runtime loop
*/

mod events;
mod runtime;
mod terminal;
mod ui;
mod view;

pub use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_tui};
