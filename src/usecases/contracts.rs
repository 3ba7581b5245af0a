use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    /// Issues the initial requests once the shell is about to draw.
    fn start(&mut self) -> Result<()>;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}
