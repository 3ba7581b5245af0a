mod adapter;
mod app_config;
mod file_config;
mod loader;
mod writer;

pub use adapter::{FileConfigAdapter, FilePermissionStore};
pub use app_config::{
    AppConfig, LogConfig, NotificationConfig, RealtimeConfig, ServerConfig, SessionConfig,
};
pub use loader::{load, resolve_path};
pub use writer::save_permission;
