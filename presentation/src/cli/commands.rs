//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON summary
    Json,
}

/// CLI arguments for consistency-probe
#[derive(Parser, Debug)]
#[command(name = "consistency-probe")]
#[command(author, version, about = "Probe language models for logically consistent probability estimates")]
#[command(long_about = r#"
Consistency Probe asks a model logically related questions (a statement and
its negation, or the four terms of Bayes' rule), extracts the probability it
gives for each, and measures how far the answers violate the identity that
should hold between them.

Configuration files are loaded from (in priority order):
1. PROBE_* environment variables (PROBE_RUN__CONCURRENCY=4)
2. --config <path>     Explicit config file
3. ./probe.toml        Project-level config
4. ~/.config/consistency-probe/config.toml   Global config

Example:
  consistency-probe run
  consistency-probe run --only bayes_gpt-4_T-0.0 --seed 42
  consistency-probe report results/output_bayes_gpt-4_T-0.0.json
  consistency-probe extract "I think so. [Answer] 0.7"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the resolved configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the configured experiments
    Run {
        /// Only run experiments with this name (can be specified multiple times)
        #[arg(long, value_name = "NAME")]
        only: Vec<String>,

        /// Seed for dataset sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Queries of one item in flight at once
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Directory for result files
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Summarise result files
    Report {
        /// Result files written by `run`
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Extract the numeric answer from a response text
    Extract {
        /// Response text containing an `[Answer]` marker
        text: String,
    },
}
