//! Provider client
//!
//! One [`ProviderClient`] exists per provider slot. Both instances share this
//! code and differ only in their [`ProviderProfile`]: the retry policy, the
//! credential check and the response cleanup are identical for every
//! provider.

use crate::config::{ProviderProfile, RetryPolicy};
use crate::ports::chat_gateway::{ChatGateway, GatewayError};
use crate::ports::progress::{CallState, DispatchProgress};
use duet_domain::{ProviderId, ProviderResult, Query, normalize};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Client for one chat-completion provider
pub struct ProviderClient {
    profile: ProviderProfile,
    gateway: Arc<dyn ChatGateway>,
    retry: RetryPolicy,
    credential: RwLock<Option<String>>,
}

impl ProviderClient {
    pub fn new(profile: ProviderProfile, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            profile,
            gateway,
            retry: RetryPolicy::default(),
            credential: RwLock::new(None),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_credential(self, secret: impl Into<String>) -> Self {
        self.set_credential(secret);
        self
    }

    pub fn id(&self) -> ProviderId {
        self.profile.id
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Replace the credential. Takes effect on the next call.
    pub fn set_credential(&self, secret: impl Into<String>) {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(secret.into());
    }

    /// Whether a non-empty credential is configured.
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<String> {
        let guard = self
            .credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn missing_credential(&self) -> ProviderResult {
        ProviderResult::failure(format!(
            "API key not set. Please configure the {} API key.",
            self.profile.id.display_name()
        ))
    }

    /// Issue a single request and normalize the outcome.
    pub async fn call_once(&self, query: &Query) -> ProviderResult {
        let Some(credential) = self.credential() else {
            return self.missing_credential();
        };

        let request = self.profile.request_for(query);
        let outcome = self
            .gateway
            .complete(&self.profile.endpoint, &credential, &request)
            .await;

        match outcome {
            Ok(body) => {
                debug!(
                    "{} responded with {} bytes",
                    self.profile.id,
                    body.len()
                );
                ProviderResult::success(normalize(&body))
            }
            Err(GatewayError::Api { status, body }) => {
                debug!("{} returned status {}", self.profile.id, status);
                ProviderResult::failure(format!("API Error: {}", body))
            }
            Err(e) => ProviderResult::failure(e.to_string()),
        }
    }

    /// Call the provider, retrying failed attempts with exponential backoff.
    ///
    /// Without a credential this returns a failure immediately and makes no
    /// request. Cancelling `cancel` while a request or a backoff wait is in
    /// progress ends the call with a `"call interrupted: ..."` failure.
    pub async fn call_with_retry(
        &self,
        query: &Query,
        cancel: &CancellationToken,
        progress: &dyn DispatchProgress,
    ) -> ProviderResult {
        let id = self.profile.id;
        progress.on_call_state(id, &CallState::Idle);

        if !self.has_credential() {
            warn!("{} has no API key, skipping request", id);
            progress.on_call_state(id, &CallState::FailedFinal);
            return self.missing_credential();
        }

        let max_attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            progress.on_call_state(id, &CallState::Attempting { attempt });

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("{} call cancelled during attempt {}", id, attempt);
                    progress.on_call_state(id, &CallState::FailedFinal);
                    return ProviderResult::failure("call interrupted: request aborted");
                }
                result = self.call_once(query) => result,
            };

            if result.is_success() {
                info!("{} answered on attempt {}/{}", id, attempt, max_attempts);
                progress.on_call_state(id, &CallState::Succeeded);
                return result;
            }

            if attempt >= max_attempts {
                warn!(
                    "{} failed after {} attempts: {}",
                    id,
                    attempt,
                    result.text()
                );
                progress.on_call_state(id, &CallState::FailedFinal);
                return result;
            }

            let delay = self.retry.delay_after(attempt);
            warn!(
                "{} call failed, retrying in {}ms ({}/{}): {}",
                id,
                delay.as_millis(),
                attempt,
                max_attempts,
                result.text()
            );
            progress.on_call_state(id, &CallState::WaitingToRetry { attempt, delay });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    progress.on_call_state(id, &CallState::FailedFinal);
                    return ProviderResult::failure(format!(
                        "call interrupted: {}",
                        result.text()
                    ));
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::test_support::{RecordingProgress, ScriptedGateway, connection_refused, ok_body};
    use std::time::Duration;
    use tokio::time::Instant;

    fn client(gateway: &Arc<ScriptedGateway>) -> ProviderClient {
        ProviderClient::new(ProviderProfile::primary(), gateway.clone())
    }

    fn query(text: &str) -> Query {
        Query::try_new(text).unwrap()
    }

    #[test]
    fn test_credential_presence() {
        let gateway = Arc::new(ScriptedGateway::always(Ok(ok_body("x"))));
        let client = client(&gateway);
        assert!(!client.has_credential());

        client.set_credential("   ");
        assert!(!client.has_credential());

        client.set_credential("sk-test");
        assert!(client.has_credential());
    }

    #[tokio::test]
    async fn test_call_once_success_is_normalized() {
        let gateway = Arc::new(ScriptedGateway::always(Ok(ok_body("**Rust** is a language"))));
        let client = client(&gateway).with_credential("sk-test");

        let result = client.call_once(&query("What is Rust?")).await;

        assert_eq!(result, ProviderResult::success("Rust is a language"));
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "https://api.openai.com/v1/chat/completions");
        assert_eq!(requests[0].1, "sk-test");
        assert_eq!(requests[0].2.messages[1].content, "What is Rust?");
    }

    #[tokio::test]
    async fn test_call_once_api_error_carries_body() {
        let gateway = Arc::new(ScriptedGateway::always(Err(GatewayError::Api {
            status: 401,
            body: r#"{"error":"bad key"}"#.to_string(),
        })));
        let client = client(&gateway).with_credential("sk-test");

        let result = client.call_once(&query("q")).await;
        assert_eq!(result, ProviderResult::failure(r#"API Error: {"error":"bad key"}"#));
    }

    #[tokio::test]
    async fn test_call_once_transport_error_uses_message() {
        let gateway = Arc::new(ScriptedGateway::always(Err(connection_refused())));
        let client = client(&gateway).with_credential("sk-test");

        let result = client.call_once(&query("q")).await;
        assert_eq!(
            result,
            ProviderResult::failure("Connection error: connection refused")
        );
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let gateway = Arc::new(ScriptedGateway::always(Ok(ok_body("x"))));
        let client = client(&gateway);

        let result = client
            .call_with_retry(&query("q"), &CancellationToken::new(), &NoProgress)
            .await;

        assert!(!result.is_success());
        assert!(result.text().contains("API key not set"));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_budget_and_backoff_schedule() {
        let gateway = Arc::new(ScriptedGateway::always(Err(connection_refused())));
        let client = client(&gateway).with_credential("sk-test");
        let progress = RecordingProgress::default();

        let result = client
            .call_with_retry(&query("q"), &CancellationToken::new(), &progress)
            .await;

        assert_eq!(
            result,
            ProviderResult::failure("Connection error: connection refused")
        );
        assert_eq!(gateway.calls(), 3);

        let times = gateway.call_times();
        let first_gap = times[1] - times[0];
        let second_gap = times[2] - times[1];
        assert!(first_gap >= Duration::from_millis(1000));
        assert!(first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_millis(2000));
        assert!(second_gap < Duration::from_millis(2100));

        assert_eq!(
            progress.states_for(ProviderId::Primary),
            vec![
                CallState::Idle,
                CallState::Attempting { attempt: 1 },
                CallState::WaitingToRetry {
                    attempt: 1,
                    delay: Duration::from_millis(1000)
                },
                CallState::Attempting { attempt: 2 },
                CallState::WaitingToRetry {
                    attempt: 2,
                    delay: Duration::from_millis(2000)
                },
                CallState::Attempting { attempt: 3 },
                CallState::FailedFinal,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_second_attempt() {
        let gateway = Arc::new(ScriptedGateway::scripted(
            vec![Err(GatewayError::Timeout("read".to_string()))],
            Ok(ok_body("second time lucky")),
        ));
        let client = client(&gateway).with_credential("sk-test");

        let result = client
            .call_with_retry(&query("q"), &CancellationToken::new(), &NoProgress)
            .await;

        assert_eq!(result, ProviderResult::success("second time lucky"));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_backoff() {
        let gateway = Arc::new(ScriptedGateway::always(Err(connection_refused())));
        let client = client(&gateway).with_credential("sk-test");
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let result = client.call_with_retry(&query("q"), &cancel, &NoProgress).await;

        assert!(!result.is_success());
        assert!(result.text().starts_with("call interrupted:"));
        assert!(result.text().contains("connection refused"));
        assert_eq!(gateway.calls(), 1);
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_in_flight_request() {
        let gateway = Arc::new(
            ScriptedGateway::always(Ok(ok_body("too late")))
                .with_latency(Duration::from_secs(30)),
        );
        let client = client(&gateway).with_credential("sk-test");
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = client.call_with_retry(&query("q"), &cancel, &NoProgress).await;
        assert_eq!(
            result,
            ProviderResult::failure("call interrupted: request aborted")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_one_call_leaves_sibling_running() {
        let primary_gateway = Arc::new(ScriptedGateway::always(Err(connection_refused())));
        let search_gateway = Arc::new(
            ScriptedGateway::scripted(
                vec![Err(GatewayError::Timeout("read".to_string()))],
                Ok(ok_body("still here")),
            )
            .with_latency(Duration::from_millis(200)),
        );
        let primary = client(&primary_gateway).with_credential("sk-test");
        let search =
            ProviderClient::new(ProviderProfile::search_augmented(), search_gateway.clone())
                .with_credential("pplx-test");

        let parent = CancellationToken::new();
        let primary_cancel = parent.child_token();
        let search_cancel = parent.child_token();

        let trigger = primary_cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let primary_query = query("q");
        let search_query = query("q");
        let (primary_result, search_result) = tokio::join!(
            primary.call_with_retry(&primary_query, &primary_cancel, &NoProgress),
            search.call_with_retry(&search_query, &search_cancel, &NoProgress),
        );

        assert!(primary_result.text().starts_with("call interrupted:"));
        assert_eq!(primary_gateway.calls(), 1);

        assert_eq!(search_result, ProviderResult::success("still here"));
        assert_eq!(search_gateway.calls(), 2);
        assert!(!search_cancel.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_credential_update_applies_to_next_call() {
        let gateway = Arc::new(ScriptedGateway::always(Ok(ok_body("ok"))));
        let client = client(&gateway).with_credential("old-key");

        client.call_once(&query("q")).await;
        client.set_credential("new-key");
        client.call_once(&query("q")).await;

        let credentials: Vec<String> = gateway.requests().into_iter().map(|r| r.1).collect();
        assert_eq!(credentials, vec!["old-key", "new-key"]);
    }
}
