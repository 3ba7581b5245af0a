use super::conversation::{Conversation, ConversationId, ConversationKind, PresenceStatus, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationListUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// In-memory set of conversations in fetch order.
///
/// Every mutation keyed by an identifier is a silent no-op when the
/// identifier is unknown: late events for conversations that disappeared in
/// a reload are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    ui_state: ConversationListUiState,
    conversations: Vec<Conversation>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self {
            ui_state: ConversationListUiState::Loading,
            conversations: Vec::new(),
        }
    }
}

impl ConversationStore {
    pub fn ui_state(&self) -> ConversationListUiState {
        self.ui_state.clone()
    }

    #[cfg(test)]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Replaces the full set with a fresh fetch.
    pub fn load(&mut self, conversations: Vec<Conversation>) {
        self.ui_state = if conversations.is_empty() {
            ConversationListUiState::Empty
        } else {
            ConversationListUiState::Ready
        };
        self.conversations = conversations;
    }

    /// Marks a failed initial load. Data from an earlier successful load is
    /// kept as is.
    pub fn set_error(&mut self) {
        if self.ui_state == ConversationListUiState::Loading {
            self.ui_state = ConversationListUiState::Error;
        }
    }

    pub fn find(&self, conversation_id: ConversationId) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == conversation_id)
    }

    pub fn increment_unread(&mut self, conversation_id: ConversationId) {
        if let Some(conversation) = self.find_mut(conversation_id) {
            conversation.unread_count = conversation.unread_count.saturating_add(1);
        }
    }

    pub fn reset_unread(&mut self, conversation_id: ConversationId) {
        if let Some(conversation) = self.find_mut(conversation_id) {
            conversation.unread_count = 0;
        }
    }

    /// Updates presence on every direct conversation with `user_id` as
    /// counterpart.
    pub fn update_status(&mut self, user_id: UserId, status: PresenceStatus) {
        for conversation in &mut self.conversations {
            if let ConversationKind::Direct {
                counterpart,
                presence,
            } = &mut conversation.kind
            {
                if *counterpart == user_id {
                    *presence = status.clone();
                }
            }
        }
    }

    pub fn direct(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter().filter(|c| c.is_direct())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter().filter(|c| !c.is_direct())
    }

    fn find_mut(&mut self, conversation_id: ConversationId) -> Option<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|conversation| conversation.id == conversation_id)
    }
}

pub fn direct_counterparts(conversations: &[Conversation]) -> Vec<(UserId, String)> {
    conversations
        .iter()
        .filter_map(|conversation| {
            conversation
                .counterpart()
                .map(|user_id| (user_id, conversation.name.clone()))
        })
        .collect()
}
