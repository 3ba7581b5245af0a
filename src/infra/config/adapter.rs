use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    domain::notification::NotificationPermission,
    infra::{
        config::{load, resolve_path, save_permission, AppConfig},
        contracts::{ConfigAdapter, PermissionStore},
    },
};

#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(load(self.path.as_deref())?)
    }
}

/// Persists the notification answer into the same config file it was read
/// from.
#[derive(Debug, Clone)]
pub struct FilePermissionStore {
    path: PathBuf,
}

impl FilePermissionStore {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: resolve_path(path),
        }
    }
}

impl PermissionStore for FilePermissionStore {
    fn save_permission(&self, permission: NotificationPermission) -> Result<()> {
        Ok(save_permission(&self.path, permission)?)
    }
}
