pub mod config;
pub mod core;
pub mod format;
pub mod manifest;
pub mod runner;

// Re-export key items for convenience
pub use config::ExportConfig;
pub use crate::core::{ExportEvent, ExportReport};
pub use manifest::{Manifest, ManifestError};
pub use runner::{check, export, export_to_file, run};
