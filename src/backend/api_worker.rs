use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use crate::{
    domain::events::AppEvent,
    usecases::api::{execute, ApiDispatcher, ApiError, ApiRequest, ChatApi},
};

const API_WORKER_SHUTDOWN_FAILED: &str = "API_WORKER_SHUTDOWN_FAILED";

/// Runs REST requests off the control thread, one at a time, and posts each
/// result back as `AppEvent::Api`.
#[derive(Debug)]
pub struct ApiWorker {
    request_tx: Option<Sender<ApiRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl ApiWorker {
    pub fn start<A>(api: A, events: Sender<AppEvent>) -> std::io::Result<Self>
    where
        A: ChatApi + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<ApiRequest>();
        let worker = thread::Builder::new()
            .name("quack-api".to_owned())
            .spawn(move || run_worker(api, request_rx, events))?;

        Ok(Self {
            request_tx: Some(request_tx),
            worker: Some(worker),
        })
    }
}

impl ApiDispatcher for ApiWorker {
    fn dispatch(&mut self, request: ApiRequest) -> Result<(), ApiError> {
        let stopped = || ApiError::Transport("api worker stopped".to_owned());

        self.request_tx
            .as_ref()
            .ok_or_else(stopped)?
            .send(request)
            .map_err(|_| stopped())
    }
}

impl Drop for ApiWorker {
    fn drop(&mut self) {
        // Closing the queue ends the worker after its current request.
        self.request_tx.take();

        if let Some(worker) = self.worker.take() {
            if let Err(error) = worker.join() {
                tracing::warn!(
                    code = API_WORKER_SHUTDOWN_FAILED,
                    error = ?error,
                    "api worker panicked on shutdown"
                );
            }
        }
    }
}

fn run_worker<A: ChatApi>(api: A, requests: Receiver<ApiRequest>, events: Sender<AppEvent>) {
    while let Ok(request) = requests.recv() {
        let name = request.name();
        let response = execute(&api, request);
        tracing::debug!(request = name, "api request completed");

        if events.send(AppEvent::Api(response)).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{
            conversation::{Conversation, ConversationId, UserId, UserSummary},
            message::Message,
            modal_state::GroupDraft,
        },
        usecases::api::{ApiResponse, ConversationRef, ConversationsPurpose},
    };

    struct CannedApi;

    impl ChatApi for CannedApi {
        fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
            Ok(Vec::new())
        }

        fn list_messages(&self, _: ConversationId) -> Result<Vec<Message>, ApiError> {
            Err(ApiError::Forbidden)
        }

        fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
            Ok(Vec::new())
        }

        fn create_group(&self, _: &GroupDraft) -> Result<ConversationRef, ApiError> {
            Err(ApiError::Status(400))
        }

        fn start_direct_chat(&self, _: UserId) -> Result<ConversationRef, ApiError> {
            Err(ApiError::NotFound)
        }

        fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[test]
    fn dispatched_request_comes_back_as_api_event() {
        let (events_tx, events_rx) = mpsc::channel();
        let mut worker = ApiWorker::start(CannedApi, events_tx).expect("worker starts");

        worker
            .dispatch(ApiRequest::ListConversations {
                purpose: ConversationsPurpose::Sidebar,
            })
            .expect("dispatch succeeds");

        let event = events_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("response arrives");
        assert_eq!(
            event,
            AppEvent::Api(ApiResponse::Conversations {
                purpose: ConversationsPurpose::Sidebar,
                result: Ok(Vec::new()),
            })
        );
    }

    #[test]
    fn responses_keep_dispatch_order() {
        let (events_tx, events_rx) = mpsc::channel();
        let mut worker = ApiWorker::start(CannedApi, events_tx).expect("worker starts");

        worker
            .dispatch(ApiRequest::StartDirectChat { user_id: UserId(3) })
            .expect("dispatch succeeds");
        worker
            .dispatch(ApiRequest::ListUsers { exclude: Vec::new() })
            .expect("dispatch succeeds");

        let first = events_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = events_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        assert_eq!(
            first,
            AppEvent::Api(ApiResponse::DirectChatStarted(Err(ApiError::NotFound)))
        );
        assert!(matches!(second, AppEvent::Api(ApiResponse::Users { .. })));
    }
}
