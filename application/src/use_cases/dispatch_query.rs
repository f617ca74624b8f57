//! Dispatch Query use case
//!
//! Sends one query to both providers concurrently, waits for both to settle,
//! and hands the joined record to the repository and both views.

use crate::ports::conversation_repository::ConversationRepository;
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::ports::response_view::{NoView, ResponseView};
use crate::provider_client::ProviderClient;
use crate::worker_pool::{PoolError, WorkerPool};
use duet_domain::{ConversationRecord, ProviderId, ProviderResult, Query};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Reasons a query is rejected before anything is dispatched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Please enter a query.")]
    EmptyQuery,

    #[error("API keys are not configured for: {}", join_ids(.0))]
    MissingCredentials(Vec<ProviderId>),
}

fn join_ids(ids: &[ProviderId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Use case coordinating one dual-provider exchange
pub struct DispatchQueryUseCase {
    primary: Arc<ProviderClient>,
    secondary: Arc<ProviderClient>,
    primary_view: Arc<dyn ResponseView>,
    secondary_view: Arc<dyn ResponseView>,
    repository: Arc<dyn ConversationRepository>,
    pool: WorkerPool,
    progress: Arc<dyn DispatchProgress>,
}

impl DispatchQueryUseCase {
    pub fn new(
        primary: Arc<ProviderClient>,
        secondary: Arc<ProviderClient>,
        repository: Arc<dyn ConversationRepository>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            primary,
            secondary,
            primary_view: Arc::new(NoView),
            secondary_view: Arc::new(NoView),
            repository,
            pool,
            progress: Arc::new(NoProgress),
        }
    }

    /// Attach the views that show each provider's answer.
    pub fn with_views(
        mut self,
        primary_view: Arc<dyn ResponseView>,
        secondary_view: Arc<dyn ResponseView>,
    ) -> Self {
        self.primary_view = primary_view;
        self.secondary_view = secondary_view;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Check that a query can be dispatched.
    ///
    /// The query must be non-empty and both providers must have a
    /// credential.
    pub fn validate(&self, raw: &str) -> Result<Query, DispatchError> {
        let query = Query::try_new(raw).map_err(|_| DispatchError::EmptyQuery)?;

        let missing: Vec<ProviderId> = [&self.primary, &self.secondary]
            .into_iter()
            .filter(|client| !client.has_credential())
            .map(|client| client.id())
            .collect();

        if !missing.is_empty() {
            return Err(DispatchError::MissingCredentials(missing));
        }

        Ok(query)
    }

    /// Send a query to both providers and persist the joined result.
    ///
    /// Provider failures do not fail the dispatch: their reason becomes the
    /// provider's response text. Only validation can reject a query.
    pub async fn submit(&self, raw: &str) -> Result<ConversationRecord, DispatchError> {
        let query = self.validate(raw)?;

        info!("Dispatching query to both providers");
        self.progress.on_dispatch_start(&query);

        let _loading = LoadingGuard::engage(vec![
            Arc::clone(&self.primary_view),
            Arc::clone(&self.secondary_view),
        ]);

        let primary = self.dispatch(&self.primary, &query);
        let secondary = self.dispatch(&self.secondary, &query);

        // Both sides always settle before the record is built.
        let (primary, secondary) = tokio::join!(
            self.settle(ProviderId::Primary, primary),
            self.settle(ProviderId::SearchAugmented, secondary),
        );

        let record = ConversationRecord::new(
            uuid::Uuid::new_v4().to_string(),
            &query,
            primary,
            secondary,
            chrono::Utc::now().timestamp_millis(),
        );

        let saved = self.repository.save(&record);
        if saved {
            info!("Saved conversation {}", record.id);
        } else {
            warn!("Could not save conversation {}", record.id);
        }
        self.progress.on_record_saved(&record, saved);

        self.primary_view
            .display(&record.query, &record.primary_response);
        self.secondary_view
            .display(&record.query, &record.secondary_response);

        Ok(record)
    }

    fn dispatch(
        &self,
        client: &Arc<ProviderClient>,
        query: &Query,
    ) -> Result<JoinHandle<ProviderResult>, PoolError> {
        let client = Arc::clone(client);
        let query = query.clone();
        let progress = Arc::clone(&self.progress);

        self.pool.spawn(move |cancel| async move {
            client
                .call_with_retry(&query, &cancel, progress.as_ref())
                .await
        })
    }

    async fn settle(
        &self,
        id: ProviderId,
        handle: Result<JoinHandle<ProviderResult>, PoolError>,
    ) -> ProviderResult {
        let result = match handle {
            Ok(handle) => match handle.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => {
                    ProviderResult::failure("call interrupted: task cancelled")
                }
                Err(e) => {
                    warn!("{} task failed: {}", id, e);
                    ProviderResult::failure(format!(
                        "{} call crashed: {}",
                        id.display_name(),
                        e
                    ))
                }
            },
            Err(e) => ProviderResult::failure(format!(
                "{} call not started: {}",
                id.display_name(),
                e
            )),
        };

        self.progress.on_provider_settled(id, result.is_success());
        result
    }
}

/// Sets both views loading on creation and clears them exactly once on drop,
/// including when the dispatch future is dropped early.
struct LoadingGuard {
    views: Vec<Arc<dyn ResponseView>>,
}

impl LoadingGuard {
    fn engage(views: Vec<Arc<dyn ResponseView>>) -> Self {
        for view in &views {
            view.set_loading(true);
        }
        Self { views }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        for view in &self.views {
            view.set_loading(false);
        }
    }
}
