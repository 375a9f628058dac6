//! Stage notifications for a running search.
//!
//! [`PipelineObserver`] keeps progress reporting separate from any
//! rendering backend. The CLI drives a spinner with it, and everything else
//! uses [`NullObserver`].

use std::sync::Arc;

use case_lookup_case_models::SearchOutcome;

use crate::Stage;

/// Receives pipeline progress.
///
/// Implementations must be `Send + Sync` so a single observer can be shared
/// behind an [`Arc`].
pub trait PipelineObserver: Send + Sync {
    /// Called when `stage` starts.
    fn on_stage(&self, stage: Stage);

    /// Called once with the terminal outcome.
    fn on_finish(&self, outcome: &SearchOutcome);
}

/// Ignores every notification.
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_stage(&self, _stage: Stage) {}
    fn on_finish(&self, _outcome: &SearchOutcome) {}
}

/// Returns a shared [`NullObserver`].
#[must_use]
pub fn null_observer() -> Arc<dyn PipelineObserver> {
    Arc::new(NullObserver)
}
