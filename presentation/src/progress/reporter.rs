//! Progress reporting for a dispatched query

use crate::output::panel::ConsolePanel;
use colored::Colorize;
use duet_application::{CallState, DispatchProgress};
use duet_domain::{ConversationRecord, ProviderId, Query};
use std::sync::Arc;

/// Status line shown next to a provider's spinner
pub fn describe_state(state: &CallState, max_attempts: u32) -> String {
    match state {
        CallState::Idle => "queued".to_string(),
        CallState::Attempting { attempt: 1 } => "asking...".to_string(),
        CallState::Attempting { attempt } => {
            format!("asking (attempt {}/{})...", attempt, max_attempts)
        }
        CallState::WaitingToRetry { attempt, delay } => format!(
            "attempt {}/{} failed, retrying in {:.1}s",
            attempt,
            max_attempts,
            delay.as_secs_f64()
        ),
        CallState::Succeeded => "done".to_string(),
        CallState::FailedFinal => "failed".to_string(),
    }
}

/// Reports call progress on the spinners of the console panels
pub struct ProgressReporter {
    primary: Arc<ConsolePanel>,
    secondary: Arc<ConsolePanel>,
    max_attempts: u32,
}

impl ProgressReporter {
    pub fn new(
        primary: Arc<ConsolePanel>,
        secondary: Arc<ConsolePanel>,
        max_attempts: u32,
    ) -> Self {
        Self {
            primary,
            secondary,
            max_attempts,
        }
    }

    fn panel(&self, provider: ProviderId) -> &ConsolePanel {
        match provider {
            ProviderId::Primary => &self.primary,
            ProviderId::SearchAugmented => &self.secondary,
        }
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_call_state(&self, provider: ProviderId, state: &CallState) {
        self.panel(provider)
            .set_status(&describe_state(state, self.max_attempts));
    }

    fn on_record_saved(&self, record: &ConversationRecord, saved: bool) {
        if !saved {
            eprintln!(
                "{} conversation {} could not be saved to history",
                "warning:".yellow().bold(),
                record.id
            );
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress {
    max_attempts: u32,
}

impl SimpleProgress {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl DispatchProgress for SimpleProgress {
    fn on_dispatch_start(&self, query: &Query) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            duet_domain::core::string::truncate(query.content(), 60).bold()
        );
    }

    fn on_call_state(&self, provider: ProviderId, state: &CallState) {
        if let CallState::WaitingToRetry { .. } = state {
            eprintln!(
                "  {} {}: {}",
                "~".yellow(),
                provider.display_name(),
                describe_state(state, self.max_attempts)
            );
        }
    }

    fn on_provider_settled(&self, provider: ProviderId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), provider.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), provider.display_name());
        }
    }

    fn on_record_saved(&self, record: &ConversationRecord, saved: bool) {
        if !saved {
            eprintln!("  {} history not saved ({})", "!".yellow(), record.id);
        }
    }
}
