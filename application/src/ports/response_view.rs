//! Port for the surface that shows one provider's answer.
//!
//! There is one view per provider. The dispatch use case calls
//! `set_loading(true)` when a query is accepted, `display` once when both
//! answers are in, and `set_loading(false)` exactly once afterwards.

/// Display surface for one provider slot
pub trait ResponseView: Send + Sync {
    /// Show the answer (or failure text) for a query.
    fn display(&self, query: &str, text: &str);

    /// Toggle the busy indicator.
    fn set_loading(&self, loading: bool);
}

/// View that discards everything.
pub struct NoView;

impl ResponseView for NoView {
    fn display(&self, _query: &str, _text: &str) {}
    fn set_loading(&self, _loading: bool) {}
}
