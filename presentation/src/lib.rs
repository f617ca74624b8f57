//! Presentation layer for duet
//!
//! This crate contains CLI definitions, output formatters, the console
//! response panels and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DEFAULT_HISTORY_LIMIT, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
pub use output::panel::ConsolePanel;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
