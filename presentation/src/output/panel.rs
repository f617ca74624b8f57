//! Console response panel
//!
//! One [`ConsolePanel`] per provider implements the
//! [`ResponseView`](duet_application::ResponseView) port. While a query is
//! in flight it shows a spinner; when the answer arrives the spinner is
//! cleared and the answer printed under the provider's title.

use super::console::ConsoleFormatter;
use duet_application::ResponseView;
use duet_domain::ProviderId;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Terminal panel for one provider's answer
pub struct ConsolePanel {
    provider: ProviderId,
    multi: Option<MultiProgress>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsolePanel {
    /// Panel with a spinner drawn on `multi` while loading.
    pub fn new(provider: ProviderId, multi: MultiProgress) -> Self {
        Self {
            provider,
            multi: Some(multi),
            spinner: Mutex::new(None),
        }
    }

    /// Panel without any progress indicator (`--quiet`).
    pub fn quiet(provider: ProviderId) -> Self {
        Self {
            provider,
            multi: None,
            spinner: Mutex::new(None),
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Update the spinner text, if a spinner is running.
    pub fn set_status(&self, status: &str) {
        if let Some(spinner) = self.lock().as_ref() {
            spinner.set_message(status.to_string());
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.lock().take() {
            spinner.finish_and_clear();
        }
    }
}

impl ResponseView for ConsolePanel {
    fn display(&self, _query: &str, text: &str) {
        self.clear_spinner();
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", ConsoleFormatter::panel(self.provider, text));
        let _ = stdout.flush();
    }

    fn set_loading(&self, loading: bool) {
        if !loading {
            self.clear_spinner();
            return;
        }

        let Some(multi) = &self.multi else {
            return;
        };

        let spinner = multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(self.provider.display_name());
        spinner.set_message("waiting for answer...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.lock().replace(spinner) {
            previous.finish_and_clear();
        }
    }
}
