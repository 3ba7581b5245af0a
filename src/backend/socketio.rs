//! Minimal Engine.IO v4 / Socket.IO v5 framing over a websocket text
//! channel, default namespace only.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    domain::{
        conversation::{ConversationId, PresenceStatus, UserId},
        events::InboundEvent,
        message::MessageId,
    },
    usecases::realtime::OutboundEvent,
};

use super::wire::{
    MarkReadPayload, MessageDto, NotificationDto, ReadReceiptDto, RoomPayload,
    SendMessagePayload, StatusDto, WireError,
};

pub const ENGINE_PONG: &str = "3";
pub const NAMESPACE_CONNECT: &str = "40";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("unknown packet type in frame `{0}`")]
    UnknownPacket(String),
    #[error("malformed event frame: {0}")]
    MalformedEvent(String),
    #[error("invalid event payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// A decoded text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    EngineOpen,
    EngineClose,
    Ping,
    Pong,
    Noop,
    NamespaceConnected,
    NamespaceDisconnected,
    ConnectError(String),
    Event(InboundEvent),
    /// Event name the client does not consume.
    UnhandledEvent(String),
}

pub fn decode(frame: &str) -> Result<Frame, CodecError> {
    let mut chars = frame.chars();
    let engine_type = chars.next().ok_or(CodecError::Empty)?;

    match engine_type {
        '0' => Ok(Frame::EngineOpen),
        '1' => Ok(Frame::EngineClose),
        '2' => Ok(Frame::Ping),
        '3' => Ok(Frame::Pong),
        '6' => Ok(Frame::Noop),
        '4' => decode_socket_packet(chars.as_str()),
        _ => Err(CodecError::UnknownPacket(frame.to_owned())),
    }
}

fn decode_socket_packet(packet: &str) -> Result<Frame, CodecError> {
    let mut chars = packet.chars();
    match chars.next() {
        Some('0') => Ok(Frame::NamespaceConnected),
        Some('1') => Ok(Frame::NamespaceDisconnected),
        Some('2') => decode_event(chars.as_str()),
        Some('4') => Ok(Frame::ConnectError(chars.as_str().to_owned())),
        _ => Err(CodecError::UnknownPacket(format!("4{packet}"))),
    }
}

fn decode_event(body: &str) -> Result<Frame, CodecError> {
    // Ack ids and namespaces precede the array; neither is used here.
    let start = body
        .find('[')
        .ok_or_else(|| CodecError::MalformedEvent(body.to_owned()))?;
    let Value::Array(mut items) = serde_json::from_str::<Value>(&body[start..])? else {
        return Err(CodecError::MalformedEvent(body.to_owned()));
    };
    if items.is_empty() {
        return Err(CodecError::MalformedEvent(body.to_owned()));
    }

    let payload = if items.len() > 1 {
        items.swap_remove(1)
    } else {
        Value::Null
    };
    let Value::String(name) = items.swap_remove(0) else {
        return Err(CodecError::MalformedEvent(body.to_owned()));
    };

    let event = match name.as_str() {
        "new_message" => {
            InboundEvent::NewMessage(payload_as::<MessageDto>(payload)?.into_domain(None)?)
        }
        "message_notification" => {
            let dto: NotificationDto = payload_as(payload)?;
            InboundEvent::MessageNotification {
                conversation_id: ConversationId(dto.group_id),
                sender_name: dto.sender_name,
                preview: dto.content_preview,
            }
        }
        "status_change" => {
            let dto: StatusDto = payload_as(payload)?;
            InboundEvent::StatusChanged {
                user_id: UserId(dto.user_id),
                status: PresenceStatus::parse(&dto.status),
            }
        }
        "message_read" => {
            let dto: ReadReceiptDto = payload_as(payload)?;
            InboundEvent::MessageRead {
                message_id: MessageId(dto.message_id),
                reader_name: dto.reader_name,
            }
        }
        _ => return Ok(Frame::UnhandledEvent(name)),
    };

    Ok(Frame::Event(event))
}

fn payload_as<T: DeserializeOwned>(payload: Value) -> Result<T, CodecError> {
    Ok(serde_json::from_value(payload)?)
}

/// Encodes an outbound event as a Socket.IO EVENT packet.
pub fn encode(event: &OutboundEvent) -> Result<String, CodecError> {
    let name = event.name();
    match event {
        OutboundEvent::JoinRoom { room } | OutboundEvent::LeaveRoom { room } => {
            event_packet(name, &RoomPayload { room })
        }
        OutboundEvent::SendMessage {
            conversation_id,
            content,
        } => event_packet(
            name,
            &SendMessagePayload {
                group_id: conversation_id.0,
                content,
            },
        ),
        OutboundEvent::MarkRead { message_id } => event_packet(
            name,
            &MarkReadPayload {
                message_id: message_id.0,
            },
        ),
    }
}

fn event_packet<T: Serialize>(name: &str, payload: &T) -> Result<String, CodecError> {
    Ok(format!("42{}", serde_json::to_string(&(name, payload))?))
}
