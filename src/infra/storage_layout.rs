use std::{fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "quack";
const LOG_FILE_NAME: &str = "quack.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let cache_base = dirs::cache_dir().ok_or_else(|| AppError::StoragePathResolution {
            details: "unable to resolve user cache directory".into(),
        })?;

        Ok(Self::under(cache_base))
    }

    fn under(cache_base: PathBuf) -> Self {
        let cache_dir = cache_base.join(APP_DIR_NAME);
        let log_dir = cache_dir.join("logs");

        Self { cache_dir, log_dir }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.cache_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn log_file_name(&self) -> &'static str {
        LOG_FILE_NAME
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_live_under_app_cache_dir() {
        let base = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under(base.path().to_path_buf());

        assert!(layout.log_dir.starts_with(&layout.cache_dir));
        assert!(layout.cache_dir.ends_with("quack"));
        assert_eq!(layout.log_file(), layout.log_dir.join("quack.log"));
    }

    #[test]
    fn ensure_dirs_creates_log_dir() {
        let base = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under(base.path().to_path_buf());

        layout.ensure_dirs().expect("dirs must be created");

        assert!(layout.log_dir.is_dir());
    }
}
