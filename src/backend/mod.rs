//! Chat backend integration: REST client, realtime socket, and the worker
//! threads that keep both off the control thread.

pub mod api_worker;
pub mod http;
pub mod realtime_worker;
pub mod socketio;
pub mod wire;

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}
