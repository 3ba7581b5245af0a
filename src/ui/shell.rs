use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        server = %context.config.server.base_url,
        user_id = context.config.session.user_id,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;
    orchestrator.start()?;

    while orchestrator.state().is_running() {
        terminal.draw(|frame| view::render(frame, orchestrator.state_mut()))?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            conversation::UserId,
            events::{AppEvent, KeyInput},
            notification::NotificationPermission,
            session::SessionIdentity,
            shell_state::{ExitRequest, ShellState},
        },
        infra::stubs::{RecordingDispatcher, RecordingTransport},
        ui::event_source::MockEventSource,
        usecases::shell::DefaultShellOrchestrator,
    };

    fn orchestrator() -> DefaultShellOrchestrator<RecordingDispatcher, RecordingTransport> {
        DefaultShellOrchestrator::new(
            ShellState::new(
                SessionIdentity::new(UserId(1)),
                NotificationPermission::Denied,
            ),
            RecordingDispatcher::default(),
            RecordingTransport::default(),
        )
    }

    #[test]
    fn mock_source_replays_events_then_ends() {
        let mut source = MockEventSource::from(vec![AppEvent::Tick]);

        assert_eq!(
            source.next_event().expect("must read mock event"),
            Some(AppEvent::Tick)
        );
        assert_eq!(source.next_event().expect("must read mock event"), None);
    }

    #[test]
    fn orchestrator_stops_on_logout_key_from_source() {
        let mut source = MockEventSource::from(vec![
            AppEvent::Tick,
            AppEvent::InputKey(KeyInput::new("L", false)),
        ]);
        let mut orchestrator = orchestrator();

        while let Some(event) = source.next_event().expect("must read mock event") {
            orchestrator
                .handle_event(event)
                .expect("must handle event");
        }

        assert!(!orchestrator.state().is_running());
        assert_eq!(
            orchestrator.state().exit_request(),
            Some(ExitRequest::Logout)
        );
    }
}
