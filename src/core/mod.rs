//! Core types for the export pipeline

mod types;

pub use types::*;
