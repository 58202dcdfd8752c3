//! Core types shared across export modules

/// Events emitted while an export is running, in manifest order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    /// Export has started with this many manifest entries
    Started { entries: usize },
    /// A section with the file's content was written
    FileWritten(String),
    /// The entry does not exist; no section was written
    NotFound(String),
    /// The entry exists but could not be read; a placeholder section was written
    ReadFailed { entry: String, message: String },
}

/// Outcome of one export pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Entries embedded with their content
    pub written: Vec<String>,
    /// Entries embedded with an error placeholder
    pub read_failures: Vec<String>,
    /// Entries skipped because they do not exist
    pub not_found: Vec<String>,
}

impl ExportReport {
    /// Number of sections in the output document.
    pub fn sections(&self) -> usize {
        self.written.len() + self.read_failures.len()
    }

    pub fn skipped(&self) -> usize {
        self.not_found.len()
    }
}
