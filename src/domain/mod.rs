//! Domain layer: core entities and business rules.

pub mod conversation;
pub mod conversation_store;
pub mod events;
pub mod message;
pub mod modal_state;
pub mod notification;
pub mod open_chat_state;
pub mod session;
pub mod shell_state;
pub mod text_input;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
