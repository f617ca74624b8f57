//! JSON output formatter

use super::formatter::OutputFormatter;
use duet_domain::ConversationRecord;

/// Formats records as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_record(&self, record: &ConversationRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_history(&self, records: &[ConversationRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }
}
