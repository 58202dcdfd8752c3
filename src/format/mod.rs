//! Output format for exported documents

pub mod markdown;

pub use markdown::MarkdownFormatter;

/// Title written at the top of every export unless configured otherwise.
pub const DEFAULT_TITLE: &str = "RobotWars App Code Export";

/// Fence tag used for every code block, regardless of the file's language.
pub const FENCE_TAG: &str = "code";
