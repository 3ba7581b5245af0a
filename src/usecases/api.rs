//! Request/response model for the chat REST API.
//!
//! The controller never calls the network directly: it hands an
//! [`ApiRequest`] to an [`ApiDispatcher`] and later receives the matching
//! [`ApiResponse`] as an `AppEvent::Api` continuation.

use thiserror::Error;

use crate::domain::{
    conversation::{Conversation, ConversationId, UserId, UserSummary},
    message::Message,
    modal_state::GroupDraft,
    open_chat_state::SelectionGeneration,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("session is not authorized")]
    Unauthorized,
    #[error("access to the resource is forbidden")]
    Forbidden,
    #[error("resource was not found")]
    NotFound,
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("response data is invalid: {0}")]
    InvalidData(String),
}

impl ApiError {
    /// Short text for the status-bar failure notice.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::Unauthorized => "session expired, log in again",
            Self::Forbidden => "access denied",
            Self::NotFound => "not found",
            Self::Status(_) => "server error",
            Self::Transport(_) => "server unreachable",
            Self::InvalidData(_) => "unexpected server response",
        }
    }
}

/// Who asked for the conversation list; decides where the result lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationsPurpose {
    Sidebar,
    GroupMemberPicker,
    DirectChatPicker,
}

/// Minimal conversation reference returned by create/start endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRef {
    pub id: ConversationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListConversations {
        purpose: ConversationsPurpose,
    },
    ListMessages {
        conversation_id: ConversationId,
        generation: SelectionGeneration,
    },
    ListUsers {
        exclude: Vec<UserId>,
    },
    CreateGroup(GroupDraft),
    StartDirectChat {
        user_id: UserId,
    },
}

impl ApiRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListConversations { .. } => "list_conversations",
            Self::ListMessages { .. } => "list_messages",
            Self::ListUsers { .. } => "list_users",
            Self::CreateGroup(_) => "create_group",
            Self::StartDirectChat { .. } => "start_direct_chat",
        }
    }
}

/// Completion of an [`ApiRequest`], carrying back the request context
/// needed to apply or discard the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Conversations {
        purpose: ConversationsPurpose,
        result: Result<Vec<Conversation>, ApiError>,
    },
    Messages {
        conversation_id: ConversationId,
        generation: SelectionGeneration,
        result: Result<Vec<Message>, ApiError>,
    },
    Users {
        exclude: Vec<UserId>,
        result: Result<Vec<UserSummary>, ApiError>,
    },
    GroupCreated(Result<ConversationRef, ApiError>),
    DirectChatStarted(Result<ConversationRef, ApiError>),
}

/// Blocking access to the REST API.
pub trait ChatApi {
    fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>, ApiError>;

    fn list_users(&self) -> Result<Vec<UserSummary>, ApiError>;

    fn create_group(&self, draft: &GroupDraft) -> Result<ConversationRef, ApiError>;

    fn start_direct_chat(&self, user_id: UserId) -> Result<ConversationRef, ApiError>;

    fn logout(&self) -> Result<(), ApiError>;
}

impl<T> ChatApi for &T
where
    T: ChatApi + ?Sized,
{
    fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        (*self).list_conversations()
    }

    fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>, ApiError> {
        (*self).list_messages(conversation_id)
    }

    fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        (*self).list_users()
    }

    fn create_group(&self, draft: &GroupDraft) -> Result<ConversationRef, ApiError> {
        (*self).create_group(draft)
    }

    fn start_direct_chat(&self, user_id: UserId) -> Result<ConversationRef, ApiError> {
        (*self).start_direct_chat(user_id)
    }

    fn logout(&self) -> Result<(), ApiError> {
        (*self).logout()
    }
}

/// Queues a request for off-thread execution.
pub trait ApiDispatcher {
    fn dispatch(&mut self, request: ApiRequest) -> Result<(), ApiError>;
}

/// Runs one request to completion against `api`.
pub fn execute(api: &dyn ChatApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::ListConversations { purpose } => ApiResponse::Conversations {
            purpose,
            result: api.list_conversations(),
        },
        ApiRequest::ListMessages {
            conversation_id,
            generation,
        } => ApiResponse::Messages {
            conversation_id,
            generation,
            result: api.list_messages(conversation_id),
        },
        ApiRequest::ListUsers { exclude } => {
            let result = api.list_users();
            ApiResponse::Users { exclude, result }
        }
        ApiRequest::CreateGroup(draft) => ApiResponse::GroupCreated(api.create_group(&draft)),
        ApiRequest::StartDirectChat { user_id } => {
            ApiResponse::DirectChatStarted(api.start_direct_chat(user_id))
        }
    }
}
