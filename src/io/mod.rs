/// Command-line interface and file processing
pub mod cli;
/// Constants and analysis options
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Image loading from disk
pub mod image;
/// Diagnostic sinks and logging backend setup
pub mod logging;
/// Terminal progress bars
pub mod progress;
