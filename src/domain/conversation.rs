use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub i64);

impl ConversationId {
    /// Realtime channel name for this conversation. Direct and group chats
    /// share the same naming scheme.
    pub fn channel_name(self) -> String {
        format!("group_{}", self.0)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presence of a direct-chat counterpart as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
    /// Any status string the client does not know about. Kept verbatim so
    /// the indicator can still be rendered.
    Other(String),
}

impl PresenceStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "online" => Self::Online,
            "offline" => Self::Offline,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationKind {
    /// 1:1 conversation with another user.
    Direct {
        counterpart: UserId,
        presence: PresenceStatus,
    },
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub name: String,
    pub kind: ConversationKind,
    pub unread_count: u32,
}

impl Conversation {
    pub fn is_direct(&self) -> bool {
        matches!(self.kind, ConversationKind::Direct { .. })
    }

    pub fn counterpart(&self) -> Option<UserId> {
        match self.kind {
            ConversationKind::Direct { counterpart, .. } => Some(counterpart),
            ConversationKind::Group => None,
        }
    }

    pub fn presence(&self) -> Option<&PresenceStatus> {
        match &self.kind {
            ConversationKind::Direct { presence, .. } => Some(presence),
            ConversationKind::Group => None,
        }
    }
}

/// A user as listed by the users endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}
