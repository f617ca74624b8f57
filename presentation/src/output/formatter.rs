//! Output formatter trait

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;
use crate::cli::commands::OutputFormat;
use duet_domain::ConversationRecord;

/// Trait for formatting conversation records
pub trait OutputFormatter {
    /// Format one conversation with both answers
    fn format_record(&self, record: &ConversationRecord) -> String;

    /// Format a list of saved conversations
    fn format_history(&self, records: &[ConversationRecord]) -> String;
}

/// Formatter for the selected `--output` format.
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Panels => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
