use super::{
    conversation::{ConversationId, PresenceStatus, UserId},
    message::{Message, MessageId},
};

/// Everything the shell loop reacts to. Key and pointer input come from the
/// terminal; the rest are continuations from the API and realtime workers.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Tick,
    InputKey(KeyInput),
    PointerDown { column: u16, row: u16 },
    Api(crate::usecases::api::ApiResponse),
    Realtime(InboundEvent),
    ConnectivityChanged(ConnectivityStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectivityStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Events pushed by the backend over the realtime connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    NewMessage(Message),
    MessageNotification {
        conversation_id: ConversationId,
        sender_name: String,
        preview: String,
    },
    StatusChanged {
        user_id: UserId,
        status: PresenceStatus,
    },
    MessageRead {
        message_id: MessageId,
        reader_name: String,
    },
}
