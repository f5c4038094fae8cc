use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::errors::InjectionError;

/// Filesystem layout of the loader inside the host's data directory.
///
/// - `<data>/cache`: the cached main bundle and its disabled marker
/// - `<data>/files`: loader-owned files
/// - `<data>/files/preloads`: loose preload scripts, swept recursively
///
/// Paths are derived fresh from the data dir on every accessor call; nothing
/// here caches filesystem state, so operators can drop or remove files while
/// the host is running and the next intercepted call sees the change.
#[derive(Debug, Clone)]
pub struct InjectionPaths {
    data_dir: PathBuf,
    main_script_file: String,
}

impl InjectionPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_main_script_file(data_dir, constants::MAIN_SCRIPT_FILE)
    }

    pub fn with_main_script_file(data_dir: impl Into<PathBuf>, main_script_file: &str) -> Self {
        Self {
            data_dir: data_dir.into(),
            main_script_file: main_script_file.to_string(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join(constants::CACHE_DIR)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join(constants::FILES_DIR)
    }

    pub fn preloads_dir(&self) -> PathBuf {
        self.files_dir().join(constants::PRELOADS_DIR)
    }

    /// Path of the cached main bundle.
    pub fn main_script(&self) -> PathBuf {
        self.cache_dir().join(&self.main_script_file)
    }

    /// Marker file next to the cached bundle. Its existence (not content)
    /// turns the whole injection path off.
    pub fn disabled_marker(&self) -> PathBuf {
        self.cache_dir().join(format!(
            "{}{}",
            self.main_script_file,
            constants::DISABLED_SUFFIX
        ))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Create the cache and preload directories if missing. Idempotent.
    pub fn ensure_layout(&self) -> Result<(), InjectionError> {
        for dir in [self.cache_dir(), self.preloads_dir()] {
            fs::create_dir_all(&dir).map_err(|source| InjectionError::Layout {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
