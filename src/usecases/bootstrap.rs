use std::{path::Path, sync::mpsc};

use crate::{
    backend::{
        api_worker::ApiWorker,
        http::HttpChatApi,
        realtime_worker::{RealtimeSettings, RealtimeWorker},
    },
    domain::{
        conversation::UserId, notification::NotificationPermission, session::SessionIdentity,
        shell_state::ShellState,
    },
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::ConfigAdapter,
        error::AppError,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let context = build_context(config_path)?;
    let guard = infra::logging::init(&context.config.logging)?;

    Ok(context.with_log_guard(guard))
}

fn build_context(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let config = config_adapter.load().map_err(AppError::Other)?;

    Ok(AppContext::new(config, config_path))
}

/// The session is established in the browser; the client only reuses its
/// cookie and user id.
pub fn require_session(config: &AppConfig) -> Result<SessionIdentity, AppError> {
    if !config.session.is_configured() {
        return Err(AppError::InvalidConfig {
            details: "[session] user_id and cookie must be set; log in through the web page and copy the session cookie".to_owned(),
        });
    }

    Ok(SessionIdentity::new(UserId(config.session.user_id)))
}

/// Starts the API and realtime workers and wires them, with the terminal
/// event source, into the interaction controller.
pub fn compose_shell(
    context: &AppContext,
    session: SessionIdentity,
    permission: NotificationPermission,
) -> Result<ShellComposition, AppError> {
    let (events_tx, events_rx) = mpsc::channel();

    let api = ApiWorker::start(HttpChatApi::new(&context.config), events_tx.clone())
        .map_err(|error| AppError::Other(error.into()))?;
    let realtime_settings = RealtimeSettings::from_config(&context.config)
        .map_err(|error| AppError::Other(error.into()))?;
    let realtime = RealtimeWorker::start(realtime_settings, events_tx)
        .map_err(|error| AppError::Other(error.into()))?;

    let state = ShellState::new(session, permission);

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(events_rx)),
        orchestrator: Box::new(DefaultShellOrchestrator::new(state, api, realtime)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_context_with_default_config_when_file_is_missing() {
        let context = build_context(Some(Path::new("./missing-config.toml")))
            .expect("context should build from defaults");

        assert_eq!(context.config, AppConfig::default());
        assert_eq!(
            context.config_path(),
            Some(Path::new("./missing-config.toml"))
        );
    }

    #[test]
    fn missing_session_is_rejected() {
        let config = AppConfig::default();

        let error = require_session(&config).expect_err("default config has no session");

        assert!(matches!(error, AppError::InvalidConfig { .. }));
    }

    #[test]
    fn configured_session_yields_identity() {
        let mut config = AppConfig::default();
        config.session.user_id = 42;
        config.session.cookie = "session=abc".to_owned();

        let session = require_session(&config).expect("session is configured");

        assert!(session.is(UserId(42)));
    }
}
