//! UI layer: terminal input, projections, and ratatui drawing.

mod event_source;
mod message_input;
mod message_rendering;
pub mod shell;
mod sidebar_rendering;
mod styles;
mod terminal;
mod timestamp;
mod view;

pub(crate) use event_source::CrosstermEventSource;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
