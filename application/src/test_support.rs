//! Test doubles shared by the application-layer tests.

use crate::ports::chat_gateway::{ChatGateway, ChatRequest, GatewayError};
use crate::ports::conversation_repository::ConversationRepository;
use crate::ports::credential_store::CredentialStore;
use crate::ports::progress::{CallState, DispatchProgress};
use crate::ports::response_view::ResponseView;
use async_trait::async_trait;
use duet_domain::{ConversationRecord, ProviderId};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Chat-completion body with the given answer text.
pub(crate) fn ok_body(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
    })
    .to_string()
}

pub(crate) fn connection_refused() -> GatewayError {
    GatewayError::ConnectionError("connection refused".to_string())
}

/// Gateway that replays scripted outcomes, then repeats a fallback.
pub(crate) struct ScriptedGateway {
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: Result<String, GatewayError>,
    latency: Duration,
    calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
    requests: Mutex<Vec<(String, String, ChatRequest)>>,
}

impl ScriptedGateway {
    pub(crate) fn always(outcome: Result<String, GatewayError>) -> Self {
        Self::scripted(Vec::new(), outcome)
    }

    pub(crate) fn scripted(
        script: Vec<Result<String, GatewayError>>,
        fallback: Result<String, GatewayError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    /// `(endpoint, credential, request)` for every call made.
    pub(crate) fn requests(&self) -> Vec<(String, String, ChatRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn complete(
        &self,
        endpoint: &str,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        self.requests.lock().unwrap().push((
            endpoint.to_string(),
            credential.to_string(),
            request.clone(),
        ));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Progress notifier that records every event.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub(crate) states: Mutex<Vec<(ProviderId, CallState)>>,
    pub(crate) settled: Mutex<Vec<(ProviderId, bool)>>,
    pub(crate) saved: Mutex<Vec<bool>>,
}

impl RecordingProgress {
    pub(crate) fn states_for(&self, provider: ProviderId) -> Vec<CallState> {
        self.states
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == provider)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

impl DispatchProgress for RecordingProgress {
    fn on_call_state(&self, provider: ProviderId, state: &CallState) {
        self.states.lock().unwrap().push((provider, state.clone()));
    }

    fn on_provider_settled(&self, provider: ProviderId, success: bool) {
        self.settled.lock().unwrap().push((provider, success));
    }

    fn on_record_saved(&self, _record: &ConversationRecord, saved: bool) {
        self.saved.lock().unwrap().push(saved);
    }
}

/// View that records what it was asked to show.
#[derive(Default)]
pub(crate) struct RecordingView {
    pub(crate) displayed: Mutex<Vec<(String, String)>>,
    pub(crate) loading: Mutex<Vec<bool>>,
}

impl ResponseView for RecordingView {
    fn display(&self, query: &str, text: &str) {
        self.displayed
            .lock()
            .unwrap()
            .push((query.to_string(), text.to_string()));
    }

    fn set_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }
}

/// In-memory repository; `rejecting()` simulates a failing store.
pub(crate) struct MemoryRepository {
    pub(crate) records: Mutex<Vec<ConversationRecord>>,
    accept: bool,
}

impl MemoryRepository {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            accept: true,
        }
    }

    pub(crate) fn rejecting() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            accept: false,
        }
    }

    pub(crate) fn with_records(records: Vec<ConversationRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            accept: true,
        }
    }
}

impl ConversationRepository for MemoryRepository {
    fn save(&self, record: &ConversationRecord) -> bool {
        if self.accept {
            self.records.lock().unwrap().push(record.clone());
        }
        self.accept
    }

    fn list_recent(&self, limit: usize) -> Vec<ConversationRecord> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        records
    }

    fn get_by_id(&self, id: &str) -> Option<ConversationRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

/// In-memory credential store.
#[derive(Default)]
pub(crate) struct MemoryCredentials {
    pub(crate) secrets: Mutex<HashMap<ProviderId, String>>,
}

impl CredentialStore for MemoryCredentials {
    fn set_credential(&self, provider: ProviderId, secret: &str) -> bool {
        self.secrets
            .lock()
            .unwrap()
            .insert(provider, secret.to_string());
        true
    }

    fn get_credential(&self, provider: ProviderId) -> Option<String> {
        self.secrets.lock().unwrap().get(&provider).cloned()
    }
}
