//! Format-preserving updates to the config file.

use std::{fs, io::ErrorKind, path::Path};

use toml_edit::{value, DocumentMut};

use crate::{domain::notification::NotificationPermission, infra::error::AppError};

/// Sets `[notifications] permission`, keeping comments and layout of the
/// rest of the file. Creates the file when it does not exist yet.
pub fn save_permission(path: &Path, permission: NotificationPermission) -> Result<(), AppError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(AppError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut document = raw
        .parse::<DocumentMut>()
        .map_err(|source| AppError::ConfigEdit {
            path: path.to_path_buf(),
            source,
        })?;
    document["notifications"]["permission"] = value(permission.as_str());

    fs::write(path, document.to_string()).map_err(|source| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}
