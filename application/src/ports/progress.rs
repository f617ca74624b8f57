//! Progress notification port
//!
//! Defines the interface for observing a dispatch while it runs.

use duet_domain::{ConversationRecord, ProviderId, Query};
use std::time::Duration;

/// Lifecycle of one provider call.
///
/// `Idle -> Attempting -> Succeeded`, or
/// `Attempting -> WaitingToRetry -> Attempting ...` until the attempt budget
/// runs out, ending in `FailedFinal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Attempting { attempt: u32 },
    WaitingToRetry { attempt: u32, delay: Duration },
    Succeeded,
    FailedFinal,
}

/// Callback for progress updates during a dispatch
///
/// Every method has a no-op default so implementations only override what
/// they display.
pub trait DispatchProgress: Send + Sync {
    /// Called once a query passed validation and both calls are about to start.
    fn on_dispatch_start(&self, _query: &Query) {}

    /// Called on every state change of a provider call.
    fn on_call_state(&self, _provider: ProviderId, _state: &CallState) {}

    /// Called when a provider's result is final.
    fn on_provider_settled(&self, _provider: ProviderId, _success: bool) {}

    /// Called after the record was handed to the repository.
    fn on_record_saved(&self, _record: &ConversationRecord, _saved: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {}
