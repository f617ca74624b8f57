//! Console output formatter for conversation records

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use duet_domain::core::string::{single_line, truncate};
use duet_domain::{ConversationRecord, ProviderId};

/// Width of query previews in history listings
const PREVIEW_WIDTH: usize = 60;

/// Formats conversation records for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete exchange: the question and one panel per provider
    pub fn format(record: &ConversationRecord) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("duet"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            record.query
        ));
        output.push_str(&format!(
            "{} {}  {}\n",
            "Id:".dimmed(),
            record.id.dimmed(),
            Self::format_time(record.timestamp).dimmed()
        ));

        output.push_str(&Self::panel(
            ProviderId::Primary,
            &record.primary_response,
        ));
        output.push_str(&Self::panel(
            ProviderId::SearchAugmented,
            &record.secondary_response,
        ));

        output.push_str(&Self::footer());
        output
    }

    /// One provider's answer under a titled rule.
    pub fn panel(provider: ProviderId, text: &str) -> String {
        let title = format!("── {} ──", provider.display_name());
        format!("\n{}\n{}\n", title.yellow().bold(), Self::indent(text, "  "))
    }

    /// One line per conversation: id, time and a query preview
    pub fn format_history(records: &[ConversationRecord]) -> String {
        if records.is_empty() {
            return format!("{}\n", "No saved conversations.".dimmed());
        }

        let mut output = Self::section_header("Recent conversations");
        for record in records {
            output.push_str(&format!(
                "{}  {}  {}\n",
                record.id.cyan(),
                Self::format_time(record.timestamp).dimmed(),
                truncate(&single_line(&record.query), PREVIEW_WIDTH)
            ));
        }
        output
    }

    /// Local time for an epoch-millisecond timestamp
    pub fn format_time(timestamp: i64) -> String {
        chrono::DateTime::from_timestamp_millis(timestamp)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| timestamp.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_record(&self, record: &ConversationRecord) -> String {
        Self::format(record)
    }

    fn format_history(&self, records: &[ConversationRecord]) -> String {
        Self::format_history(records)
    }
}
