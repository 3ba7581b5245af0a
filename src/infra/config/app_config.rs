use serde::{Deserialize, Serialize};

use crate::domain::notification::NotificationPermission;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub realtime: RealtimeConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_owned(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Credentials of an already logged-in web session.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub user_id: i64,
    pub cookie: String,
}

impl SessionConfig {
    pub fn is_configured(&self) -> bool {
        self.user_id > 0 && !self.cookie.trim().is_empty()
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_id", &self.user_id)
            .field("cookie", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeConfig {
    pub socket_path: String,
    pub reconnect_delay_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            socket_path: "/socket.io/".to_owned(),
            reconnect_delay_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationConfig {
    pub permission: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            permission: NotificationPermission::Default.as_str().to_owned(),
        }
    }
}

impl NotificationConfig {
    /// Unknown values fall back to "not asked yet".
    pub fn permission(&self) -> NotificationPermission {
        NotificationPermission::parse(&self.permission).unwrap_or_default()
    }
}
