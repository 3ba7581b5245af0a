use anyhow::Result;

use crate::domain::{
    conversation::{Conversation, ConversationId},
    conversation_store::direct_counterparts,
    events::{AppEvent, ConnectivityStatus, KeyInput},
    modal_state::{direct_chat_candidates, GroupFormField, ModalCloseTrigger, ModalState},
    shell_state::{ActivePane, ExitRequest, ShellState},
};

use super::{
    api::{ApiDispatcher, ApiError, ApiRequest, ApiResponse, ConversationsPurpose},
    contracts::ShellOrchestrator,
    realtime::{apply_inbound, InboundOutcome, RealtimeClient, RealtimeTransport},
    send_message::{send_message, SendMessageCommand, SendMessageError},
};

const API_DISPATCH_FAILED: &str = "API_DISPATCH_FAILED";
const API_REQUEST_FAILED: &str = "API_REQUEST_FAILED";
const REALTIME_EMIT_FAILED: &str = "REALTIME_EMIT_FAILED";
const STALE_RESPONSE_DISCARDED: &str = "STALE_RESPONSE_DISCARDED";
const SEND_MESSAGE_FAILED: &str = "SEND_MESSAGE_FAILED";

/// Interaction controller: owns the session state and turns key, pointer,
/// API and realtime events into state transitions and outbound calls.
pub struct DefaultShellOrchestrator<D, T>
where
    D: ApiDispatcher,
    T: RealtimeTransport,
{
    state: ShellState,
    api: D,
    realtime: RealtimeClient<T>,
    pending_open: Option<ConversationId>,
}

/// Side effect chosen while a modal form is borrowed.
enum ModalAction {
    None,
    Dispatch(ApiRequest),
    Close(ModalCloseTrigger),
    Notice(&'static str),
}

impl<D, T> DefaultShellOrchestrator<D, T>
where
    D: ApiDispatcher,
    T: RealtimeTransport,
{
    pub fn new(state: ShellState, api: D, transport: T) -> Self {
        Self {
            state,
            api,
            realtime: RealtimeClient::new(transport),
            pending_open: None,
        }
    }

    fn dispatch(&mut self, request: ApiRequest) {
        let name = request.name();
        if let Err(error) = self.api.dispatch(request) {
            tracing::error!(
                code = API_DISPATCH_FAILED,
                request = name,
                error = %error,
                "failed to queue api request"
            );
            self.state.set_notice(error.notice());
        }
    }

    fn report_api_failure(&mut self, action: &str, error: &ApiError) {
        tracing::warn!(
            code = API_REQUEST_FAILED,
            action,
            error = %error,
            "api request failed"
        );
        self.state
            .set_notice(format!("{action} failed: {}", error.notice()));
    }

    fn reload_sidebar(&mut self) {
        self.dispatch(ApiRequest::ListConversations {
            purpose: ConversationsPurpose::Sidebar,
        });
    }

    /// Makes `conversation_id` the Active Selection: resets its unread
    /// count, moves channel membership and reloads its messages.
    fn open_conversation(&mut self, conversation_id: ConversationId) {
        let Some(title) = self
            .state
            .conversations()
            .find(conversation_id)
            .map(|conversation| conversation.name.clone())
        else {
            return;
        };

        self.state.sidebar_mut().0.set_cursor(conversation_id);
        self.state.set_active_pane(ActivePane::Composer);
        self.state.conversations_mut().reset_unread(conversation_id);

        if self.state.open_chat().is_active(conversation_id) {
            return;
        }

        let generation = self.state.open_chat_mut().set_loading(conversation_id, title);
        if let Err(error) = self.realtime.switch_to(conversation_id) {
            tracing::warn!(
                code = REALTIME_EMIT_FAILED,
                conversation_id = %conversation_id,
                error = %error,
                "channel switch not delivered; will rejoin on reconnect"
            );
        }

        self.dispatch(ApiRequest::ListMessages {
            conversation_id,
            generation,
        });
    }

    fn close_modal(&mut self, trigger: ModalCloseTrigger) {
        if self.state.modal_mut().close() {
            tracing::debug!(trigger = ?trigger, "modal closed");
        }
        self.state.set_modal_area(None);
    }

    fn handle_key(&mut self, key: KeyInput) {
        self.state.clear_toast();

        if key.ctrl && key.key == "c" {
            self.state.stop(ExitRequest::Quit);
            return;
        }

        if self.state.modal().is_open() {
            self.handle_modal_key(&key);
            return;
        }

        match self.state.active_pane() {
            ActivePane::Sidebar => self.handle_sidebar_key(&key),
            ActivePane::Composer => self.handle_composer_key(&key),
        }
    }

    fn handle_sidebar_key(&mut self, key: &KeyInput) {
        if key.ctrl {
            return;
        }

        match key.key.as_str() {
            "j" | "down" => {
                let (sidebar, store) = self.state.sidebar_mut();
                sidebar.move_cursor(store, true);
            }
            "k" | "up" => {
                let (sidebar, store) = self.state.sidebar_mut();
                sidebar.move_cursor(store, false);
            }
            "enter" => {
                if let Some(conversation_id) = self.state.sidebar().cursor() {
                    self.open_conversation(conversation_id);
                }
            }
            "tab" | "i" => {
                if self.state.open_chat().is_open() {
                    self.state.set_active_pane(ActivePane::Composer);
                }
            }
            "1" => {
                let (sidebar, store) = self.state.sidebar_mut();
                sidebar.toggle_direct();
                sidebar.resolve_cursor(store);
            }
            "2" => {
                let (sidebar, store) = self.state.sidebar_mut();
                sidebar.toggle_groups();
                sidebar.resolve_cursor(store);
            }
            "g" => {
                self.state.modal_mut().open_new_group();
                self.dispatch(ApiRequest::ListConversations {
                    purpose: ConversationsPurpose::GroupMemberPicker,
                });
            }
            "n" => {
                self.state.modal_mut().open_new_direct_chat();
                self.dispatch(ApiRequest::ListConversations {
                    purpose: ConversationsPurpose::DirectChatPicker,
                });
            }
            "r" => self.reload_sidebar(),
            "q" => self.state.stop(ExitRequest::Quit),
            "L" => self.state.stop(ExitRequest::Logout),
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: &KeyInput) {
        if key.ctrl {
            return;
        }

        match key.key.as_str() {
            "esc" | "tab" => self.state.set_active_pane(ActivePane::Sidebar),
            "enter" => self.submit_composer(),
            other => {
                self.state.composer_mut().apply_key(other);
            }
        }
    }

    /// Sends the composer text; the input is cleared only once the message
    /// has been handed to the realtime connection.
    fn submit_composer(&mut self) {
        let Some(conversation_id) = self.state.open_chat().conversation_id() else {
            return;
        };

        let command = SendMessageCommand {
            conversation_id,
            text: self.state.composer().text().to_owned(),
        };

        match send_message(&mut self.realtime, command) {
            Ok(()) => self.state.composer_mut().clear(),
            Err(SendMessageError::EmptyMessage) => {}
            Err(error) => {
                tracing::warn!(
                    code = SEND_MESSAGE_FAILED,
                    conversation_id = %conversation_id,
                    error = ?error,
                    "message was not sent"
                );
                self.state.set_notice(error.notice());
            }
        }
    }

    fn handle_modal_key(&mut self, key: &KeyInput) {
        if key.key == "esc" {
            self.close_modal(ModalCloseTrigger::Escape);
            return;
        }
        if key.ctrl {
            return;
        }

        let session = self.state.session();
        let action = match self.state.modal_mut() {
            ModalState::NewGroup(form) => match key.key.as_str() {
                "tab" => {
                    form.focus_next();
                    ModalAction::None
                }
                "enter" => match form.draft() {
                    Some(draft) => ModalAction::Dispatch(ApiRequest::CreateGroup(draft)),
                    None => ModalAction::Notice("group name is required"),
                },
                other if form.focus() == GroupFormField::Members => match other {
                    "j" | "down" => {
                        form.member_cursor_down();
                        ModalAction::None
                    }
                    "k" | "up" => {
                        form.member_cursor_up();
                        ModalAction::None
                    }
                    " " => {
                        form.toggle_member_at_cursor();
                        ModalAction::None
                    }
                    "q" => ModalAction::Close(ModalCloseTrigger::Cancel),
                    _ => ModalAction::None,
                },
                other => {
                    if let Some(input) = form.focused_input_mut() {
                        input.apply_key(other);
                    }
                    ModalAction::None
                }
            },
            ModalState::NewDirectChat(picker) => match key.key.as_str() {
                "j" | "down" => {
                    picker.select_next();
                    ModalAction::None
                }
                "k" | "up" => {
                    picker.select_previous();
                    ModalAction::None
                }
                "enter" => match picker.selected() {
                    Some(user) if !session.is(user.id) => {
                        ModalAction::Dispatch(ApiRequest::StartDirectChat { user_id: user.id })
                    }
                    _ => ModalAction::Notice("select a user first"),
                },
                "q" => ModalAction::Close(ModalCloseTrigger::Cancel),
                _ => ModalAction::None,
            },
            ModalState::Closed => ModalAction::None,
        };

        match action {
            ModalAction::None => {}
            ModalAction::Dispatch(request) => self.dispatch(request),
            ModalAction::Close(trigger) => self.close_modal(trigger),
            ModalAction::Notice(notice) => self.state.set_notice(notice),
        }
    }

    fn handle_pointer(&mut self, column: u16, row: u16) {
        if !self.state.modal().is_open() {
            return;
        }

        if let Some(area) = self.state.modal_area() {
            if !area.contains(column, row) {
                self.close_modal(ModalCloseTrigger::OutsideClick);
            }
        }
    }

    fn handle_api(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::Conversations { purpose, result } => {
                self.apply_conversations(purpose, result)
            }
            ApiResponse::Messages {
                conversation_id,
                generation,
                result,
            } => match result {
                Ok(messages) => {
                    if !self.state.open_chat_mut().set_ready(generation, messages) {
                        tracing::debug!(
                            code = STALE_RESPONSE_DISCARDED,
                            conversation_id = %conversation_id,
                            generation = generation.0,
                            "discarded messages for a superseded selection"
                        );
                    }
                }
                Err(error) => {
                    if self.state.open_chat_mut().set_error(generation) {
                        self.report_api_failure("loading messages", &error);
                    }
                }
            },
            ApiResponse::Users { exclude, result } => {
                let session = self.state.session();
                let Some(picker) = self.state.modal_mut().direct_chat_mut() else {
                    return;
                };
                match result {
                    Ok(users) => {
                        picker.set_candidates(direct_chat_candidates(users, &exclude, session))
                    }
                    Err(error) => {
                        picker.set_error();
                        self.report_api_failure("loading users", &error);
                    }
                }
            }
            ApiResponse::GroupCreated(result) => match result {
                Ok(group) => {
                    tracing::info!(
                        conversation_id = %group.id,
                        name = %group.name,
                        "group created"
                    );
                    if let Some(form) = self.state.modal_mut().new_group_mut() {
                        form.reset();
                    }
                    self.state.modal_mut().close();
                    self.state.set_modal_area(None);
                    self.state.clear_notice();
                    self.reload_sidebar();
                }
                Err(error) => self.report_api_failure("creating group", &error),
            },
            ApiResponse::DirectChatStarted(result) => match result {
                Ok(conversation) => {
                    tracing::info!(conversation_id = %conversation.id, "direct chat started");
                    self.state.modal_mut().close();
                    self.state.set_modal_area(None);
                    self.state.clear_notice();
                    self.pending_open = Some(conversation.id);
                    self.reload_sidebar();
                }
                Err(error) => self.report_api_failure("starting chat", &error),
            },
        }
    }

    fn apply_conversations(
        &mut self,
        purpose: ConversationsPurpose,
        result: Result<Vec<Conversation>, ApiError>,
    ) {
        match (purpose, result) {
            (ConversationsPurpose::Sidebar, Ok(conversations)) => {
                tracing::debug!(count = conversations.len(), "conversation list loaded");
                self.state.conversations_mut().load(conversations);
                if let Some(open) = self.state.open_chat().conversation_id() {
                    self.state.conversations_mut().reset_unread(open);
                }
                let (sidebar, store) = self.state.sidebar_mut();
                sidebar.resolve_cursor(store);

                if let Some(conversation_id) = self.pending_open.take() {
                    self.open_conversation(conversation_id);
                }
            }
            (ConversationsPurpose::Sidebar, Err(error)) => {
                self.pending_open = None;
                self.state.conversations_mut().set_error();
                self.report_api_failure("loading conversations", &error);
            }
            (ConversationsPurpose::GroupMemberPicker, result) => {
                let Some(form) = self.state.modal_mut().new_group_mut() else {
                    return;
                };
                match result {
                    Ok(conversations) => form.set_members(direct_counterparts(&conversations)),
                    Err(error) => {
                        form.set_members_error();
                        self.report_api_failure("loading members", &error);
                    }
                }
            }
            (ConversationsPurpose::DirectChatPicker, result) => {
                let Some(picker) = self.state.modal_mut().direct_chat_mut() else {
                    return;
                };
                match result {
                    Ok(conversations) => {
                        let exclude = conversations
                            .iter()
                            .filter_map(|conversation| conversation.counterpart())
                            .collect();
                        self.dispatch(ApiRequest::ListUsers { exclude });
                    }
                    Err(error) => {
                        picker.set_error();
                        self.report_api_failure("loading users", &error);
                    }
                }
            }
        }
    }

    fn handle_connectivity(&mut self, status: ConnectivityStatus) {
        let previous = self.state.connectivity_status();
        self.state.set_connectivity_status(status);

        if status == ConnectivityStatus::Connected && previous != ConnectivityStatus::Connected {
            if let Err(error) = self.realtime.rejoin() {
                tracing::warn!(
                    code = REALTIME_EMIT_FAILED,
                    error = %error,
                    "failed to rejoin channel after reconnect"
                );
            }
        }
    }
}

impl<D, T> ShellOrchestrator for DefaultShellOrchestrator<D, T>
where
    D: ApiDispatcher,
    T: RealtimeTransport,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn start(&mut self) -> Result<()> {
        self.reload_sidebar();
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::PointerDown { column, row } => self.handle_pointer(column, row),
            AppEvent::Api(response) => self.handle_api(response),
            AppEvent::Realtime(event) => match apply_inbound(&mut self.state, event) {
                InboundOutcome::Appended {
                    mark_read: Some(message_id),
                } => {
                    if let Err(error) = self.realtime.mark_read(message_id) {
                        tracing::warn!(
                            code = REALTIME_EMIT_FAILED,
                            message_id = %message_id,
                            error = %error,
                            "failed to emit mark_read"
                        );
                    }
                }
                outcome => tracing::trace!(outcome = ?outcome, "inbound event applied"),
            },
            AppEvent::ConnectivityChanged(status) => self.handle_connectivity(status),
        }

        Ok(())
    }
}
