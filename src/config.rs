use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_TITLE;
use crate::manifest::Manifest;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "allcode.toml";

/// Output file name used when none is configured.
pub const DEFAULT_OUTPUT: &str = "RobotWars_app_code.md";

/// Main configuration for an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Project root the manifest entries are resolved against
    pub root: PathBuf,
    /// Output document path (relative paths are resolved against `root`)
    pub output: PathBuf,
    /// Title line written before the first section
    pub title: String,
    /// Manifest entries; `None` uses the compiled-in file list
    pub files: Option<Vec<String>>,
    /// Print every processed entry, not just warnings
    pub verbose: bool,
}

impl ExportConfig {
    /// Validates the configuration, ensuring the project root is a directory.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.root.is_dir() {
            anyhow::bail!("Project root is not a directory: {:?}", self.root);
        }
        Ok(())
    }

    /// Attempts to load configuration from `allcode.toml` in `root`.
    pub fn load_from_file(root: &Path) -> Option<Self> {
        let path = root.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path).ok()?;

        let mut config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "ignoring invalid config file");
                return None;
            }
        };
        if config.root.is_relative() {
            config.root = root.join(&config.root).components().collect();
        }
        Some(config)
    }

    pub fn output_path(&self) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            self.root.join(&self.output)
        }
    }

    /// The effective manifest: configured entries if present, the built-in list otherwise.
    pub fn manifest(&self) -> anyhow::Result<Manifest> {
        match &self.files {
            Some(files) => Ok(Manifest::new(files.iter().cloned())?),
            None => Ok(Manifest::robotwars()),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            files: None,
            verbose: false,
        }
    }
}
