use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::{http::Response, Agent, Body};

use crate::{
    domain::{
        conversation::{Conversation, ConversationId, UserId, UserSummary},
        message::Message,
        modal_state::GroupDraft,
    },
    infra::{config::AppConfig, secrets::redact_text},
    usecases::api::{ApiError, ChatApi, ConversationRef},
};

use super::wire::{ConversationDto, ConversationRefDto, CreateGroupBody, MessageDto, UserDto};

/// Blocking REST client authenticated with the session cookie.
pub struct HttpChatApi {
    agent: Agent,
    base_url: String,
    cookie: String,
}

impl std::fmt::Debug for HttpChatApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatApi")
            .field("base_url", &self.base_url)
            .field("cookie", &"<redacted>")
            .finish()
    }
}

impl HttpChatApi {
    pub fn new(config: &AppConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(config.server.request_timeout_ms)))
            .http_status_as_error(false)
            // A redirect means the login page; surfaced as Unauthorized.
            .max_redirects(0)
            .build();

        Self {
            agent: agent_config.into(),
            base_url: config.server.base_url.trim_end_matches('/').to_owned(),
            cookie: config.session.cookie.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .agent
            .get(&self.endpoint(path))
            .header("Cookie", self.cookie.as_str())
            .call()
            .map_err(map_transport_error)?;

        read_json(response)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .agent
            .post(&self.endpoint(path))
            .header("Cookie", self.cookie.as_str())
            .send_json(body)
            .map_err(map_transport_error)?;

        read_json(response)
    }
}

impl ChatApi for HttpChatApi {
    fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let dtos: Vec<ConversationDto> = self.get_json("/api/conversations")?;
        dtos.into_iter()
            .map(|dto| dto.into_domain().map_err(invalid_data))
            .collect()
    }

    fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>, ApiError> {
        let dtos: Vec<MessageDto> = self.get_json(&format!("/api/messages/{conversation_id}"))?;
        dtos.into_iter()
            .map(|dto| dto.into_domain(Some(conversation_id)).map_err(invalid_data))
            .collect()
    }

    fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let dtos: Vec<UserDto> = self.get_json("/api/users")?;
        Ok(dtos.into_iter().map(UserSummary::from).collect())
    }

    fn create_group(&self, draft: &GroupDraft) -> Result<ConversationRef, ApiError> {
        let created: ConversationRefDto =
            self.post_json("/api/create_group", CreateGroupBody::from(draft))?;
        Ok(created.into())
    }

    fn start_direct_chat(&self, user_id: UserId) -> Result<ConversationRef, ApiError> {
        let started: ConversationRefDto =
            self.get_json(&format!("/api/start_direct_chat/{user_id}"))?;
        Ok(started.into())
    }

    fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .agent
            .get(&self.endpoint("/logout"))
            .header("Cookie", self.cookie.as_str())
            .call()
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        // The server answers a successful logout with a redirect.
        if (300..400).contains(&status) {
            return Ok(());
        }
        check_status(status)
    }
}

fn read_json<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T, ApiError> {
    check_status(response.status().as_u16())?;
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|error| ApiError::InvalidData(redact_text(&error.to_string())))
}

fn check_status(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        300..=399 | 401 => Err(ApiError::Unauthorized),
        403 => Err(ApiError::Forbidden),
        404 => Err(ApiError::NotFound),
        other => Err(ApiError::Status(other)),
    }
}

fn map_transport_error(error: ureq::Error) -> ApiError {
    ApiError::Transport(redact_text(&error.to_string()))
}

fn invalid_data(error: super::wire::WireError) -> ApiError {
    ApiError::InvalidData(error.to_string())
}
