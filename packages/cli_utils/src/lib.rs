#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the case lookup tools.
//!
//! Provides an `indicatif` spinner behind the scraper's
//! [`PipelineObserver`] trait, plus [`init_logger`] which sets up
//! `indicatif-log-bridge` so that `log::info!` and friends are suspended
//! while the spinner redraws.

use std::sync::Arc;
use std::time::Duration;

use case_lookup_case_models::SearchOutcome;
use case_lookup_scraper::{Stage, progress::PipelineObserver};
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` spinner that shows the current search stage.
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    /// Adds a spinner to `multi` labelled with `message` until the first
    /// stage starts.
    #[must_use]
    pub fn new(multi: &MultiProgress, message: &str) -> Arc<Self> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        Arc::new(Self { bar })
    }

    /// The message currently shown next to the spinner.
    #[must_use]
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Whether [`PipelineObserver::on_finish`] has been called.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl PipelineObserver for StageSpinner {
    fn on_stage(&self, stage: Stage) {
        self.bar.set_message(format!("{}...", stage.label()));
    }

    fn on_finish(&self, outcome: &SearchOutcome) {
        let summary = match outcome {
            SearchOutcome::Success { records } => format!("Found {} case(s)", records.len()),
            SearchOutcome::NoResults { .. } => "No cases found".to_string(),
            SearchOutcome::Error { .. } => "Search failed".to_string(),
        };
        self.bar.finish_with_message(summary);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while the spinner redraws.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Already set (e.g. in tests)

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn stage_updates_message() {
        let spinner = StageSpinner::new(&hidden(), "Starting");
        assert_eq!(spinner.message(), "Starting");

        spinner.on_stage(Stage::Validate);
        assert_eq!(spinner.message(), "Validating CAPTCHA...");
    }

    #[test]
    fn finish_summarizes_outcome() {
        let spinner = StageSpinner::new(&hidden(), "Starting");
        spinner.on_finish(&SearchOutcome::NoResults {
            reason: "No records found".to_string(),
        });

        assert!(spinner.is_finished());
        assert_eq!(spinner.message(), "No cases found");
    }
}
