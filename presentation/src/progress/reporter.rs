//! Progress reporting for experiment runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use probe_application::{ExperimentOutcome, ProgressNotifier};
use probe_domain::{ExperimentConfig, ItemPhase};
use std::sync::Mutex;

/// Reports progress with one progress bar per experiment
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_experiment_start(&self, config: &ExperimentConfig, total_items: usize) {
        let bar = ProgressBar::new(total_items as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix(config.name.clone());
        bar.set_message("Starting...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_item_phase(&self, index: usize, phase: ItemPhase) {
        if !phase.is_terminal() {
            self.with_bar(|bar| bar.set_message(format!("item {} {}", index, phase)));
        }
    }

    fn on_item_complete(&self, index: usize, recorded: bool) {
        self.with_bar(|bar| {
            let status = if recorded {
                format!("{} item {}", "v".green(), index)
            } else {
                format!("{} item {}", "x".red(), index)
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_experiment_complete(&self, outcome: &ExperimentOutcome) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            let message = if outcome.cancelled {
                "cancelled".yellow().to_string()
            } else {
                format!(
                    "{} ({} skipped)",
                    "done".green(),
                    outcome.skipped.len()
                )
            };
            bar.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_experiment_start(&self, config: &ExperimentConfig, total_items: usize) {
        println!(
            "{} {} ({} items)",
            "->".cyan(),
            config.name.bold(),
            total_items
        );
    }

    fn on_item_complete(&self, index: usize, recorded: bool) {
        if recorded {
            println!("  {} item {}", "v".green(), index);
        } else {
            println!("  {} item {} (skipped)", "x".red(), index);
        }
    }

    fn on_experiment_complete(&self, _outcome: &ExperimentOutcome) {
        println!();
    }
}
