use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::paths::InjectionPaths;
use crate::constants;

/// Loader configuration.
///
/// Normally the loader runs inside a host process and is pointed at the
/// host's data directory by whoever installs the hooks. The standalone CLI
/// falls back to a per-user data directory when none is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Data directory the loader operates in (default: per-user data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// File name of the cached main bundle (default: bundle.js)
    #[serde(default = "default_main_script_file")]
    pub main_script_file: String,

    /// Whether the CLI also logs to a file under the data dir
    #[serde(default)]
    pub file_logging: bool,
}

fn default_main_script_file() -> String {
    constants::MAIN_SCRIPT_FILE.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            main_script_file: default_main_script_file(),
            file_logging: false,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file. A missing file is not an error;
    /// it yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Get the data directory (configured or default).
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            use directories::ProjectDirs;
            ProjectDirs::from("", "", constants::LOADER_NAME)
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(format!(".{}", constants::LOADER_NAME)))
        })
    }

    /// Derive the filesystem layout from this configuration.
    pub fn paths(&self) -> InjectionPaths {
        InjectionPaths::with_main_script_file(self.data_dir(), &self.main_script_file)
    }
}
