//! Use case for sending a composer message to a conversation.
//!
//! Messages travel over the realtime connection; the REST API has no send
//! endpoint.

use crate::domain::conversation::ConversationId;

use super::realtime::{RealtimeClient, RealtimeError, RealtimeTransport};

/// Command to send a message to a specific conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub conversation_id: ConversationId,
    pub text: String,
}

/// Domain-level errors for send message operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    /// Realtime connection is down; the text stays in the composer.
    NotConnected,
    /// Realtime worker is gone.
    ChannelClosed,
}

impl SendMessageError {
    pub fn notice(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "message is empty",
            Self::NotConnected => "not connected, message not sent",
            Self::ChannelClosed => "realtime connection closed",
        }
    }
}

/// Trait for sending messages to conversations.
pub trait MessageSender {
    fn send_message(
        &mut self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<(), RealtimeError>;
}

impl<T> MessageSender for RealtimeClient<T>
where
    T: RealtimeTransport,
{
    fn send_message(
        &mut self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<(), RealtimeError> {
        RealtimeClient::send_message(self, conversation_id, text)
    }
}

/// Sends a message to the specified conversation.
///
/// Rejects text that is empty after trimming; otherwise the body is handed
/// to the `MessageSender` exactly as typed.
pub fn send_message(
    sender: &mut dyn MessageSender,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    if command.text.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    sender
        .send_message(command.conversation_id, &command.text)
        .map_err(map_source_error)
}

fn map_source_error(error: RealtimeError) -> SendMessageError {
    match error {
        RealtimeError::NotConnected => SendMessageError::NotConnected,
        RealtimeError::Closed => SendMessageError::ChannelClosed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSender {
        result: Result<(), RealtimeError>,
        captured: Option<(ConversationId, String)>,
    }

    impl StubSender {
        fn with_result(result: Result<(), RealtimeError>) -> Self {
            Self {
                result,
                captured: None,
            }
        }
    }

    impl MessageSender for StubSender {
        fn send_message(
            &mut self,
            conversation_id: ConversationId,
            text: &str,
        ) -> Result<(), RealtimeError> {
            self.captured = Some((conversation_id, text.to_owned()));
            self.result.clone()
        }
    }

    fn command(text: &str) -> SendMessageCommand {
        SendMessageCommand {
            conversation_id: ConversationId(42),
            text: text.to_owned(),
        }
    }

    #[test]
    fn rejects_whitespace_only_message() {
        let mut sender = StubSender::with_result(Ok(()));

        let result = send_message(&mut sender, command("   \n\t  "));

        assert_eq!(result, Err(SendMessageError::EmptyMessage));
        assert!(sender.captured.is_none());
    }

    #[test]
    fn sends_body_with_surrounding_whitespace_intact() {
        let mut sender = StubSender::with_result(Ok(()));

        let result = send_message(&mut sender, command("    indented code  "));

        assert_eq!(result, Ok(()));
        assert_eq!(
            sender.captured,
            Some((ConversationId(42), "    indented code  ".to_owned()))
        );
    }

    #[test]
    fn maps_not_connected_error() {
        let mut sender = StubSender::with_result(Err(RealtimeError::NotConnected));

        let result = send_message(&mut sender, command("hello"));

        assert_eq!(result, Err(SendMessageError::NotConnected));
    }

    #[test]
    fn maps_closed_error() {
        let mut sender = StubSender::with_result(Err(RealtimeError::Closed));

        let result = send_message(&mut sender, command("hello"));

        assert_eq!(result, Err(SendMessageError::ChannelClosed));
    }
}
