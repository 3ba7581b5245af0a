use anyhow::Result;

use crate::{domain::notification::NotificationPermission, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

pub trait PermissionStore {
    fn save_permission(&self, permission: NotificationPermission) -> Result<()>;
}
