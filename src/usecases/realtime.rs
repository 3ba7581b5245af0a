//! Realtime channel membership and the inbound event policy.

use thiserror::Error;

use crate::domain::{
    conversation::ConversationId,
    events::InboundEvent,
    message::MessageId,
    notification::Notification,
    shell_state::ShellState,
};

/// Events the client emits over the realtime connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    JoinRoom {
        room: String,
    },
    LeaveRoom {
        room: String,
    },
    SendMessage {
        conversation_id: ConversationId,
        content: String,
    },
    MarkRead {
        message_id: MessageId,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::SendMessage { .. } => "send_message",
            Self::MarkRead { .. } => "mark_read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    #[error("realtime connection is not established")]
    NotConnected,
    #[error("realtime worker has stopped")]
    Closed,
}

/// Sink for outbound events; implemented by the realtime worker handle.
pub trait RealtimeTransport {
    fn emit(&mut self, event: OutboundEvent) -> Result<(), RealtimeError>;
}

/// Tracks the single joined channel and emits the join/leave traffic that
/// keeps it equal to the Active Selection.
#[derive(Debug)]
pub struct RealtimeClient<T>
where
    T: RealtimeTransport,
{
    transport: T,
    joined: Option<ConversationId>,
}

impl<T> RealtimeClient<T>
where
    T: RealtimeTransport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            joined: None,
        }
    }

    #[cfg(test)]
    pub fn joined(&self) -> Option<ConversationId> {
        self.joined
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Moves channel membership to `conversation_id`: the previous channel
    /// is left before the new one is joined. Re-selecting the joined
    /// conversation emits nothing.
    ///
    /// Membership is recorded even when an emit fails, so a later
    /// [`rejoin`](Self::rejoin) restores it once the connection is back.
    pub fn switch_to(&mut self, conversation_id: ConversationId) -> Result<(), RealtimeError> {
        if self.joined == Some(conversation_id) {
            return Ok(());
        }

        let previous = self.joined.replace(conversation_id);
        let left = match previous {
            Some(previous) => self.transport.emit(OutboundEvent::LeaveRoom {
                room: previous.channel_name(),
            }),
            None => Ok(()),
        };
        let joined = self.transport.emit(OutboundEvent::JoinRoom {
            room: conversation_id.channel_name(),
        });

        left.and(joined)
    }

    /// Joins the current channel again after a reconnect; the server drops
    /// room membership when the socket goes away.
    pub fn rejoin(&mut self) -> Result<(), RealtimeError> {
        match self.joined {
            Some(conversation_id) => self.transport.emit(OutboundEvent::JoinRoom {
                room: conversation_id.channel_name(),
            }),
            None => Ok(()),
        }
    }

    pub fn send_message(
        &mut self,
        conversation_id: ConversationId,
        content: &str,
    ) -> Result<(), RealtimeError> {
        self.transport.emit(OutboundEvent::SendMessage {
            conversation_id,
            content: content.to_owned(),
        })
    }

    pub fn mark_read(&mut self, message_id: MessageId) -> Result<(), RealtimeError> {
        self.transport.emit(OutboundEvent::MarkRead { message_id })
    }
}

/// What applying an inbound event did to the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Appended to the open conversation. Carries the message to mark read
    /// when it was authored by someone else.
    Appended { mark_read: Option<MessageId> },
    UnreadIncremented(ConversationId),
    /// Unread bumped and, with permission granted, a toast raised.
    Notified { conversation_id: ConversationId, toast: bool },
    StatusUpdated,
    ReceiptApplied,
    Ignored,
}

/// Applies one inbound event to the session state.
///
/// `new_message` for the open conversation is appended; for any other
/// conversation only its unread counter moves. `message_notification` for
/// the open conversation is ignored since the message itself arrives on the
/// joined channel.
pub fn apply_inbound(state: &mut ShellState, event: InboundEvent) -> InboundOutcome {
    match event {
        InboundEvent::NewMessage(message) => {
            let conversation_id = message.conversation_id;
            if !state.open_chat().is_active(conversation_id) {
                state.conversations_mut().increment_unread(conversation_id);
                return InboundOutcome::UnreadIncremented(conversation_id);
            }

            let message_id = message.id;
            let self_authored = message.is_sent_by(state.session());
            if !state.open_chat_mut().append(message) {
                return InboundOutcome::Ignored;
            }

            InboundOutcome::Appended {
                mark_read: (!self_authored).then_some(message_id),
            }
        }
        InboundEvent::MessageNotification {
            conversation_id,
            sender_name,
            preview,
        } => {
            if state.open_chat().is_active(conversation_id) {
                return InboundOutcome::Ignored;
            }

            state.conversations_mut().increment_unread(conversation_id);
            let toast = state.notification_permission().is_granted();
            if toast {
                state.set_toast(Notification::new_message(&sender_name, &preview));
            }
            InboundOutcome::Notified {
                conversation_id,
                toast,
            }
        }
        InboundEvent::StatusChanged { user_id, status } => {
            tracing::debug!(user_id = %user_id, status = status.as_label(), "presence changed");
            state.conversations_mut().update_status(user_id, status);
            InboundOutcome::StatusUpdated
        }
        InboundEvent::MessageRead {
            message_id,
            reader_name,
        } => {
            if state.open_chat_mut().mark_read_by(message_id, &reader_name) {
                InboundOutcome::ReceiptApplied
            } else {
                InboundOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        domain::{
            conversation::{Conversation, ConversationKind, PresenceStatus, UserId},
            message::{Message, ReadState},
            notification::NotificationPermission,
            session::SessionIdentity,
        },
        infra::stubs::RecordingTransport,
    };

    fn connected() -> RealtimeClient<RecordingTransport> {
        RealtimeClient::new(RecordingTransport::connected())
    }

    fn join(id: i64) -> OutboundEvent {
        OutboundEvent::JoinRoom {
            room: format!("group_{id}"),
        }
    }

    fn leave(id: i64) -> OutboundEvent {
        OutboundEvent::LeaveRoom {
            room: format!("group_{id}"),
        }
    }

    fn state(permission: NotificationPermission) -> ShellState {
        let mut state = ShellState::new(SessionIdentity::new(UserId(1)), permission);
        state.conversations_mut().load(vec![
            Conversation {
                id: ConversationId(10),
                name: "bob".to_owned(),
                kind: ConversationKind::Direct {
                    counterpart: UserId(2),
                    presence: PresenceStatus::Offline,
                },
                unread_count: 0,
            },
            Conversation {
                id: ConversationId(20),
                name: "ducks".to_owned(),
                kind: ConversationKind::Group,
                unread_count: 0,
            },
        ]);
        state
    }

    fn message(id: i64, conversation: i64, sender: i64) -> Message {
        Message {
            id: MessageId(id),
            conversation_id: ConversationId(conversation),
            sender_id: UserId(sender),
            sender_name: format!("user{sender}"),
            body: "quack".to_owned(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            read_state: ReadState::Unread,
        }
    }

    fn open(state: &mut ShellState, id: i64) {
        let generation = state
            .open_chat_mut()
            .set_loading(ConversationId(id), "open".to_owned());
        state.open_chat_mut().set_ready(generation, Vec::new());
    }

    fn unread(state: &ShellState, id: i64) -> u32 {
        state
            .conversations()
            .find(ConversationId(id))
            .map(|c| c.unread_count)
            .unwrap_or_default()
    }

    #[test]
    fn switching_leaves_previous_channel_before_joining_next() {
        let mut client = connected();

        client.switch_to(ConversationId(1)).unwrap();
        client.switch_to(ConversationId(2)).unwrap();

        assert_eq!(client.joined(), Some(ConversationId(2)));
        assert_eq!(client.transport().emitted, vec![join(1), leave(1), join(2)]);
    }

    #[test]
    fn reselecting_joined_conversation_emits_nothing() {
        let mut client = connected();

        client.switch_to(ConversationId(1)).unwrap();
        client.switch_to(ConversationId(1)).unwrap();

        assert_eq!(client.transport().emitted, vec![join(1)]);
    }

    #[test]
    fn membership_survives_disconnected_switch_and_rejoins() {
        let mut client = RealtimeClient::new(RecordingTransport::default());

        assert_eq!(
            client.switch_to(ConversationId(3)),
            Err(RealtimeError::NotConnected)
        );
        assert_eq!(client.joined(), Some(ConversationId(3)));

        client.transport.connected = true;
        client.rejoin().unwrap();

        assert_eq!(client.transport().emitted, vec![join(3)]);
    }

    #[test]
    fn rejoin_without_selection_is_a_no_op() {
        let mut client = connected();

        client.rejoin().unwrap();

        assert!(client.transport().emitted.is_empty());
    }

    #[test]
    fn new_message_for_other_conversation_only_bumps_unread() {
        let mut state = state(NotificationPermission::Granted);
        open(&mut state, 20);

        let outcome = apply_inbound(&mut state, InboundEvent::NewMessage(message(5, 10, 2)));

        assert_eq!(outcome, InboundOutcome::UnreadIncremented(ConversationId(10)));
        assert_eq!(unread(&state, 10), 1);
        assert!(state.open_chat().messages().is_empty());
    }

    #[test]
    fn new_message_for_open_conversation_requests_mark_read_once() {
        let mut state = state(NotificationPermission::Granted);
        open(&mut state, 10);

        let first = apply_inbound(&mut state, InboundEvent::NewMessage(message(5, 10, 2)));
        let duplicate = apply_inbound(&mut state, InboundEvent::NewMessage(message(5, 10, 2)));

        assert_eq!(
            first,
            InboundOutcome::Appended {
                mark_read: Some(MessageId(5))
            }
        );
        assert_eq!(duplicate, InboundOutcome::Ignored);
        assert_eq!(state.open_chat().messages().len(), 1);
        assert_eq!(unread(&state, 10), 0);
    }

    #[test]
    fn own_message_is_appended_without_mark_read() {
        let mut state = state(NotificationPermission::Granted);
        open(&mut state, 10);

        let outcome = apply_inbound(&mut state, InboundEvent::NewMessage(message(6, 10, 1)));

        assert_eq!(outcome, InboundOutcome::Appended { mark_read: None });
    }

    #[test]
    fn notification_raises_toast_only_with_permission() {
        let mut granted = state(NotificationPermission::Granted);
        let mut denied = state(NotificationPermission::Denied);
        let event = InboundEvent::MessageNotification {
            conversation_id: ConversationId(20),
            sender_name: "carol".to_owned(),
            preview: "hi".to_owned(),
        };

        apply_inbound(&mut granted, event.clone());
        apply_inbound(&mut denied, event);

        assert_eq!(
            granted.toast().map(|toast| toast.title.as_str()),
            Some("New message from carol")
        );
        assert_eq!(denied.toast(), None);
        assert_eq!(unread(&granted, 20), 1);
        assert_eq!(unread(&denied, 20), 1);
    }

    #[test]
    fn notification_for_open_conversation_is_ignored() {
        let mut state = state(NotificationPermission::Granted);
        open(&mut state, 20);

        let outcome = apply_inbound(
            &mut state,
            InboundEvent::MessageNotification {
                conversation_id: ConversationId(20),
                sender_name: "carol".to_owned(),
                preview: "hi".to_owned(),
            },
        );

        assert_eq!(outcome, InboundOutcome::Ignored);
        assert_eq!(unread(&state, 20), 0);
        assert_eq!(state.toast(), None);
    }

    #[test]
    fn status_change_updates_direct_counterpart() {
        let mut state = state(NotificationPermission::Denied);

        apply_inbound(
            &mut state,
            InboundEvent::StatusChanged {
                user_id: UserId(2),
                status: PresenceStatus::Online,
            },
        );

        assert_eq!(
            state
                .conversations()
                .find(ConversationId(10))
                .and_then(|c| c.presence()),
            Some(&PresenceStatus::Online)
        );
    }

    #[test]
    fn unknown_read_receipt_is_ignored() {
        let mut state = state(NotificationPermission::Denied);
        open(&mut state, 10);

        let outcome = apply_inbound(
            &mut state,
            InboundEvent::MessageRead {
                message_id: MessageId(404),
                reader_name: "bob".to_owned(),
            },
        );

        assert_eq!(outcome, InboundOutcome::Ignored);
    }
}
