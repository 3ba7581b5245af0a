use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    conversation::{ConversationId, UserId},
    session::SessionIdentity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read state of a message as seen by this client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadState {
    #[default]
    Unread,
    /// Marked read by the backend, reader unknown (fetched history).
    Read,
    /// Read receipt received live for this message.
    ReadBy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub read_state: ReadState,
}

impl Message {
    /// Whether this message was authored by the session user.
    pub fn is_sent_by(&self, session: SessionIdentity) -> bool {
        session.is(self.sender_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn msg(sender: i64) -> Message {
        Message {
            id: MessageId(1),
            conversation_id: ConversationId(3),
            sender_id: UserId(sender),
            sender_name: "User".to_owned(),
            body: "hello".to_owned(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 10, 0, 0).unwrap(),
            read_state: ReadState::Unread,
        }
    }

    #[test]
    fn sent_tagging_compares_sender_with_session_identity() {
        let session = SessionIdentity::new(UserId(7));

        assert!(msg(7).is_sent_by(session));
        assert!(!msg(8).is_sent_by(session));
    }
}
