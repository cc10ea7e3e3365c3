/*
[INPUT]:  Public API exports for the arc-task client crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod app;
pub mod config;
pub mod render;
pub mod session;
pub mod sync;

// Re-export main types for convenience
pub use app::App;
pub use app::event::Action;
pub use app::state::{AppState, Screen};
pub use config::AppConfig;
pub use session::Session;
pub use sync::{Confirmation, SyncPolicy};
