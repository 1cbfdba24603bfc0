//! Progress notification port
//!
//! Defines the interface for reporting progress during an experiment batch.

use crate::use_cases::run_experiment::ExperimentOutcome;
use probe_domain::{ExperimentConfig, ItemPhase};

/// Callback for progress updates during an experiment run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called once the dataset is loaded and sampled
    fn on_experiment_start(&self, config: &ExperimentConfig, total_items: usize);

    /// Called when an item moves to a new phase
    fn on_item_phase(&self, _index: usize, _phase: ItemPhase) {}

    /// Called when an item is recorded or skipped
    fn on_item_complete(&self, index: usize, recorded: bool);

    /// Called after the results have been written (or failed to write)
    fn on_experiment_complete(&self, outcome: &ExperimentOutcome);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_experiment_start(&self, _config: &ExperimentConfig, _total_items: usize) {}
    fn on_item_complete(&self, _index: usize, _recorded: bool) {}
    fn on_experiment_complete(&self, _outcome: &ExperimentOutcome) {}
}
