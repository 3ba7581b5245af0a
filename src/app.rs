use anyhow::Result;

use crate::{
    backend::{self, http::HttpChatApi},
    cli::{Cli, Command},
    domain::{self, shell_state::ExitRequest},
    infra::{self, config::FilePermissionStore},
    ui,
    usecases::{
        self,
        api::ChatApi,
        bootstrap,
        context::AppContext,
        notification_permission::{ensure_permission, StdTerminal},
    },
};

const LOGOUT_FAILED: &str = "LOGOUT_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        backend = backend::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let session = bootstrap::require_session(&context.config)?;

    match cli.command_or_default() {
        Command::Run => {
            let store = FilePermissionStore::new(context.config_path());
            let permission = ensure_permission(
                context.config.notifications.permission(),
                &mut StdTerminal,
                &store,
            )?;

            let exit = run_shell(&context, session, permission)?;
            tracing::info!(exit = ?exit, "TUI shell stopped");

            if exit == Some(ExitRequest::Logout) {
                logout(&HttpChatApi::new(&context.config))?;
            }
        }
        Command::Logout => logout(&HttpChatApi::new(&context.config))?,
    }

    Ok(())
}

/// Runs the TUI until it stops. The workers are joined before returning.
fn run_shell(
    context: &AppContext,
    session: domain::session::SessionIdentity,
    permission: domain::notification::NotificationPermission,
) -> Result<Option<ExitRequest>> {
    let mut shell = bootstrap::compose_shell(context, session, permission)?;
    ui::shell::start(
        context,
        shell.event_source.as_mut(),
        shell.orchestrator.as_mut(),
    )?;

    Ok(shell.orchestrator.state().exit_request())
}

fn logout(api: &dyn ChatApi) -> Result<()> {
    match api.logout() {
        Ok(()) => {
            tracing::info!("server session ended");
            println!("Logged out. Log in through the web page and update [session] to use quack again.");
            Ok(())
        }
        Err(error) => {
            tracing::warn!(code = LOGOUT_FAILED, error = %error, "logout request failed");
            Err(anyhow::anyhow!("logout failed: {}", error.notice()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            conversation::{Conversation, ConversationId, UserId, UserSummary},
            message::Message,
            modal_state::GroupDraft,
        },
        usecases::api::{ApiError, ConversationRef},
    };

    struct LogoutApi(Result<(), ApiError>);

    impl ChatApi for LogoutApi {
        fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
            Ok(Vec::new())
        }

        fn list_messages(&self, _: ConversationId) -> Result<Vec<Message>, ApiError> {
            Ok(Vec::new())
        }

        fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
            Ok(Vec::new())
        }

        fn create_group(&self, _: &GroupDraft) -> Result<ConversationRef, ApiError> {
            Err(ApiError::NotFound)
        }

        fn start_direct_chat(&self, _: UserId) -> Result<ConversationRef, ApiError> {
            Err(ApiError::NotFound)
        }

        fn logout(&self) -> Result<(), ApiError> {
            self.0.clone()
        }
    }

    #[test]
    fn logout_succeeds_when_server_accepts() {
        assert!(logout(&LogoutApi(Ok(()))).is_ok());
    }

    #[test]
    fn logout_failure_carries_short_notice() {
        let error = logout(&LogoutApi(Err(ApiError::Transport(
            "connection refused".to_owned(),
        ))))
        .expect_err("transport failure must surface");

        assert_eq!(error.to_string(), "logout failed: server unreachable");
    }
}
