//! JSON shapes exchanged with the chat backend and their mapping onto
//! domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{
        conversation::{
            Conversation, ConversationId, ConversationKind, PresenceStatus, UserId, UserSummary,
        },
        message::{Message, MessageId, ReadState},
        modal_state::GroupDraft,
    },
    usecases::api::ConversationRef,
};

/// Server timestamps may omit the offset; such values are UTC.
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
    #[error("direct conversation {0} has no counterpart user")]
    MissingCounterpart(i64),
    #[error("message {0} has no conversation id")]
    MissingConversation(i64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_direct: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
}

impl ConversationDto {
    pub fn into_domain(self) -> Result<Conversation, WireError> {
        let kind = if self.is_direct {
            let counterpart = self.user_id.ok_or(WireError::MissingCounterpart(self.id))?;
            ConversationKind::Direct {
                counterpart: UserId(counterpart),
                presence: self
                    .status
                    .as_deref()
                    .map(PresenceStatus::parse)
                    .unwrap_or_default(),
            }
        } else {
            ConversationKind::Group
        };

        Ok(Conversation {
            id: ConversationId(self.id),
            name: self.name,
            kind,
            unread_count: self.unread_count,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub content: String,
    pub sender_id: i64,
    pub sender_name: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl MessageDto {
    /// History responses omit `group_id`; the caller passes the
    /// conversation the list was requested for.
    pub fn into_domain(self, fallback: Option<ConversationId>) -> Result<Message, WireError> {
        let conversation_id = self
            .group_id
            .map(ConversationId)
            .or(fallback)
            .ok_or(WireError::MissingConversation(self.id))?;

        Ok(Message {
            id: MessageId(self.id),
            conversation_id,
            sender_id: UserId(self.sender_id),
            sender_name: self.sender_name,
            body: self.content,
            timestamp: parse_timestamp(&self.timestamp)?,
            read_state: if self.is_read {
                ReadState::Read
            } else {
                ReadState::Unread
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
}

impl From<UserDto> for UserSummary {
    fn from(dto: UserDto) -> Self {
        Self {
            id: UserId(dto.id),
            username: dto.username,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRefDto {
    pub id: i64,
    pub name: String,
}

impl From<ConversationRefDto> for ConversationRef {
    fn from(dto: ConversationRefDto) -> Self {
        Self {
            id: ConversationId(dto.id),
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub members: Vec<i64>,
}

impl<'a> From<&'a GroupDraft> for CreateGroupBody<'a> {
    fn from(draft: &'a GroupDraft) -> Self {
        Self {
            name: &draft.name,
            description: &draft.description,
            members: draft.members.iter().map(|member| member.0).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDto {
    pub group_id: i64,
    pub sender_name: String,
    #[serde(default)]
    pub content_preview: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusDto {
    pub user_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadReceiptDto {
    pub message_id: i64,
    pub reader_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomPayload<'a> {
    pub room: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessagePayload<'a> {
    pub group_id: i64,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadPayload {
    pub message_id: i64,
}

/// Parses an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, WireError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| WireError::InvalidTimestamp(raw.to_owned()))
}
