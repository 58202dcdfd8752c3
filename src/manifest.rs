//! Ordered list of project-relative files to export.
//!
//! Entries are opaque slash-separated strings. Order is significant and
//! duplicates are kept; each duplicate produces its own section.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Files exported when no manifest is configured, in output order.
const ROBOTWARS_FILES: &[&str] = &[
    "package.json",
    "client/css/main.css",
    "client/js/engine/arena.js",
    "client/js/engine/collision.js",
    "client/js/engine/audio.js",
    "client/js/engine/game.js",
    "client/js/engine/interpreter.js",
    "client/js/engine/robot.js",
    "client/js/ui/controls.js",
    "client/js/ui/dashboard.js",
    "client/js/ui/history.js",
    "client/js/ui/editor.js",
    "client/js/ui/lobby.js",
    "client/js/main.js",
    "client/js/network.js",
    "client/index.html",
    "server/game-instance.js",
    "server/game-manager.js",
    "server/index.js",
    "server/server-collision.js",
    "server/server-interpreter.js",
    "server/server-robot.js",
    "server/socket-handler.js",
    "server/dummy-bit-ai.js",
];

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest entry is empty")]
    Empty,

    #[error("manifest entry must be relative to the project root: {0}")]
    Absolute(String),

    #[error("manifest entry escapes the project root: {0}")]
    ParentTraversal(String),

    #[error("manifest entry must use '/' separators: {0}")]
    Backslash(String),

    #[error("failed to read manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Checks that a single entry is a well-formed project-relative file path.
pub fn validate_entry(entry: &str) -> Result<(), ManifestError> {
    if entry.trim().is_empty() {
        return Err(ManifestError::Empty);
    }
    if entry.contains('\\') {
        return Err(ManifestError::Backslash(entry.to_string()));
    }
    if entry.starts_with('/') || Path::new(entry).is_absolute() {
        return Err(ManifestError::Absolute(entry.to_string()));
    }

    let components: Vec<&str> = entry.split('/').collect();
    if components.iter().any(|c| *c == "..") {
        return Err(ManifestError::ParentTraversal(entry.to_string()));
    }

    Ok(())
}

/// Returns the directory component that looks like `stem.ext`, if any.
///
/// Two adjacent entries that lose the separator between them produce this
/// shape (`audio.jsclient/js/...`). Real directories such as `conf.d` look the
/// same, so this is only a hint for entries that turned out not to exist.
pub fn suspected_fusion(entry: &str) -> Option<&str> {
    let components: Vec<&str> = entry.split('/').collect();
    let dirs = &components[..components.len() - 1];
    dirs.iter().copied().find(|c| looks_like_file_name(c))
}

fn looks_like_file_name(component: &str) -> bool {
    if component.starts_with('.') {
        return false;
    }
    match component.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty() && ext.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Builds a manifest, rejecting the first malformed entry.
    pub fn new<I, S>(entries: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        for entry in &entries {
            validate_entry(entry)?;
        }
        Ok(Self { entries })
    }

    /// The compiled-in RobotWars file set.
    pub fn robotwars() -> Self {
        Self {
            entries: ROBOTWARS_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Loads a plain-text manifest: one entry per line, `#` starts a comment line.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::robotwars()
    }
}
