use super::{
    conversation::ConversationId,
    message::{Message, MessageId, ReadState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenChatUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Counter bumped on every Active Selection switch. Responses tagged with an
/// older generation belong to a superseded selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct SelectionGeneration(pub u64);

/// The Active Selection and its message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChatState {
    conversation_id: Option<ConversationId>,
    title: String,
    messages: Vec<Message>,
    ui_state: OpenChatUiState,
    generation: SelectionGeneration,
}

impl Default for OpenChatState {
    fn default() -> Self {
        Self {
            conversation_id: None,
            title: String::new(),
            messages: Vec::new(),
            ui_state: OpenChatUiState::Empty,
            generation: SelectionGeneration::default(),
        }
    }
}

impl OpenChatState {
    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.conversation_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ui_state(&self) -> OpenChatUiState {
        self.ui_state.clone()
    }

    #[cfg(test)]
    pub fn generation(&self) -> SelectionGeneration {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.conversation_id.is_some()
    }

    pub fn is_active(&self, conversation_id: ConversationId) -> bool {
        self.conversation_id == Some(conversation_id)
    }

    /// Index of the newest message; the message view is anchored here.
    pub fn newest_index(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }

    /// Switches the Active Selection and clears the message list. Returns
    /// the generation that the message reload must be tagged with.
    pub fn set_loading(
        &mut self,
        conversation_id: ConversationId,
        title: String,
    ) -> SelectionGeneration {
        self.generation = SelectionGeneration(self.generation.0 + 1);
        self.conversation_id = Some(conversation_id);
        self.title = title;
        self.messages.clear();
        self.ui_state = OpenChatUiState::Loading;
        self.generation
    }

    /// Applies a message fetch. Returns false (and changes nothing) when
    /// the fetch belongs to a superseded selection. Live messages appended
    /// while the fetch was in flight and missing from it stay after the
    /// history, in arrival order.
    pub fn set_ready(&mut self, generation: SelectionGeneration, messages: Vec<Message>) -> bool {
        if generation != self.generation {
            return false;
        }
        let live = std::mem::replace(&mut self.messages, messages);
        for message in live {
            if !self.messages.iter().any(|fetched| fetched.id == message.id) {
                self.messages.push(message);
            }
        }
        self.ui_state = OpenChatUiState::Ready;
        true
    }

    pub fn set_error(&mut self, generation: SelectionGeneration) -> bool {
        if generation != self.generation {
            return false;
        }
        self.ui_state = OpenChatUiState::Error;
        true
    }

    /// Appends a live message to the open conversation. Messages for other
    /// conversations and ids already present are ignored.
    pub fn append(&mut self, message: Message) -> bool {
        if !self.is_active(message.conversation_id) {
            return false;
        }
        if self.messages.iter().any(|existing| existing.id == message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Records a read receipt. Unknown message ids are ignored.
    pub fn mark_read_by(&mut self, message_id: MessageId, reader_name: &str) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
        {
            Some(message) => {
                message.read_state = ReadState::ReadBy(reader_name.to_owned());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::conversation::UserId;

    fn message(id: i64, conversation: i64) -> Message {
        Message {
            id: MessageId(id),
            conversation_id: ConversationId(conversation),
            sender_id: UserId(2),
            sender_name: "bob".to_owned(),
            body: format!("message {id}"),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 10, 0, 0).unwrap(),
            read_state: ReadState::Unread,
        }
    }

    #[test]
    fn default_state_is_empty_without_selection() {
        let state = OpenChatState::default();

        assert_eq!(state.ui_state(), OpenChatUiState::Empty);
        assert!(!state.is_open());
        assert_eq!(state.newest_index(), None);
    }

    #[test]
    fn set_loading_switches_selection_and_bumps_generation() {
        let mut state = OpenChatState::default();

        let first = state.set_loading(ConversationId(1), "ops".to_owned());
        let second = state.set_loading(ConversationId(2), "dev".to_owned());

        assert!(second > first);
        assert_eq!(state.conversation_id(), Some(ConversationId(2)));
        assert_eq!(state.title(), "dev");
        assert_eq!(state.ui_state(), OpenChatUiState::Loading);
    }

    #[test]
    fn set_ready_applies_current_generation() {
        let mut state = OpenChatState::default();
        let generation = state.set_loading(ConversationId(1), "ops".to_owned());

        assert!(state.set_ready(generation, vec![message(1, 1), message(2, 1)]));

        assert_eq!(state.ui_state(), OpenChatUiState::Ready);
        assert_eq!(state.newest_index(), Some(1));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut state = OpenChatState::default();
        let stale = state.set_loading(ConversationId(1), "ops".to_owned());
        state.set_loading(ConversationId(2), "dev".to_owned());

        assert!(!state.set_ready(stale, vec![message(1, 1)]));
        assert!(!state.set_error(stale));

        assert!(state.messages().is_empty());
        assert_eq!(state.ui_state(), OpenChatUiState::Loading);
    }

    #[test]
    fn append_only_accepts_messages_for_the_open_conversation() {
        let mut state = OpenChatState::default();
        let generation = state.set_loading(ConversationId(1), "ops".to_owned());
        state.set_ready(generation, vec![]);

        assert!(state.append(message(5, 1)));
        assert!(!state.append(message(6, 2)));
        assert!(!state.append(message(5, 1)));

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.newest_index(), Some(0));
    }

    #[test]
    fn live_messages_survive_history_that_predates_them() {
        let mut state = OpenChatState::default();
        let generation = state.set_loading(ConversationId(1), "ops".to_owned());
        assert!(state.append(message(7, 1)));
        assert!(state.append(message(8, 1)));

        assert!(state.set_ready(generation, vec![message(6, 1), message(8, 1)]));

        let ids: Vec<_> = state.messages().iter().map(|message| message.id).collect();
        assert_eq!(ids, vec![MessageId(6), MessageId(8), MessageId(7)]);
        assert_eq!(state.ui_state(), OpenChatUiState::Ready);
    }

    #[test]
    fn mark_read_by_updates_known_message_only() {
        let mut state = OpenChatState::default();
        let generation = state.set_loading(ConversationId(1), "ops".to_owned());
        state.set_ready(generation, vec![message(1, 1)]);

        assert!(state.mark_read_by(MessageId(1), "carol"));
        assert!(!state.mark_read_by(MessageId(99), "carol"));

        assert_eq!(
            state.messages()[0].read_state,
            ReadState::ReadBy("carol".to_owned())
        );
    }
}
