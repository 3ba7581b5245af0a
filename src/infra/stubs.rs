//! In-memory fakes for the seam traits, used by unit tests.

use anyhow::Result;

use crate::{
    domain::notification::NotificationPermission,
    infra::contracts::PermissionStore,
    usecases::{
        api::{ApiDispatcher, ApiError, ApiRequest},
        realtime::{OutboundEvent, RealtimeError, RealtimeTransport},
    },
};

/// Collects dispatched requests instead of running them.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    pub requests: Vec<ApiRequest>,
    pub fail: bool,
}

impl RecordingDispatcher {
    pub fn take(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl ApiDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, request: ApiRequest) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Transport("api worker stopped".to_owned()));
        }
        self.requests.push(request);
        Ok(())
    }
}

/// Records emitted events; rejects them while `connected` is false.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    pub emitted: Vec<OutboundEvent>,
    pub connected: bool,
}

impl RecordingTransport {
    pub fn connected() -> Self {
        Self {
            emitted: Vec::new(),
            connected: true,
        }
    }
}

impl RealtimeTransport for RecordingTransport {
    fn emit(&mut self, event: OutboundEvent) -> Result<(), RealtimeError> {
        if !self.connected {
            return Err(RealtimeError::NotConnected);
        }
        self.emitted.push(event);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    pub saved: std::cell::RefCell<Option<NotificationPermission>>,
}

impl PermissionStore for MemoryPermissionStore {
    fn save_permission(&self, permission: NotificationPermission) -> Result<()> {
        *self.saved.borrow_mut() = Some(permission);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_transport_rejects_emits() {
        let mut transport = RecordingTransport::default();

        let result = transport.emit(OutboundEvent::MarkRead {
            message_id: crate::domain::message::MessageId(1),
        });

        assert_eq!(result, Err(RealtimeError::NotConnected));
        assert!(transport.emitted.is_empty());
    }
}
