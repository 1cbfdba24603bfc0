//! CLI entrypoint for Consistency Probe
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use probe_application::{
    ConversationLogger, ExperimentRunner, NoConversationLogger, NoProgress, ProgressNotifier,
    QueryClient, ReportResults,
};
use probe_domain::extract_answer;
use probe_infrastructure::{
    ConfigIssue, ConfigLoader, FileConfig, FileExperimentConfig, JsonDatasetLoader,
    JsonResultStore, JsonlQueryLogger, OpenRouterGateway, TokioSleeper,
};
use probe_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting consistency-probe");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    match cli.command {
        Some(Command::Run {
            only,
            seed,
            concurrency,
            output_dir,
        }) => {
            let mut config = config;
            if seed.is_some() {
                config.run.seed = seed;
            }
            if let Some(concurrency) = concurrency {
                config.run.concurrency = concurrency;
            }
            if let Some(output_dir) = output_dir {
                config.run.output_dir = output_dir;
            }
            run(config, &only, cli.quiet).await
        }
        Some(Command::Report { files, output }) => report(&files, output),
        Some(Command::Extract { text }) => {
            println!("{}", ConsoleFormatter::format_extraction(extract_answer(&text)));
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Install the tracing subscriber: stderr always, plus an optional log file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Log warnings and fail on errors
fn check_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("Config: {}", issue);
    }
    if ConfigIssue::has_errors(issues) {
        let errors: Vec<String> = issues
            .iter()
            .filter(|i| i.is_error())
            .map(|i| format!("  {}", i))
            .collect();
        bail!("Invalid configuration:\n{}", errors.join("\n"));
    }
    Ok(())
}

/// Keep only experiments named by `--only`, in configuration order
fn select_experiments(
    experiments: Vec<FileExperimentConfig>,
    only: &[String],
) -> Result<Vec<FileExperimentConfig>> {
    if only.is_empty() {
        return Ok(experiments);
    }
    if let Some(unknown) = only
        .iter()
        .find(|name| !experiments.iter().any(|e| &e.name == *name))
    {
        bail!("No experiment named '{}' in the configuration", unknown);
    }
    Ok(experiments
        .into_iter()
        .filter(|e| only.contains(&e.name))
        .collect())
}

async fn run(mut config: FileConfig, only: &[String], quiet: bool) -> Result<()> {
    // Experiments left out by --only are not validated
    config.experiments = select_experiments(std::mem::take(&mut config.experiments), only)?;
    check_issues(&config.validate())?;
    let (experiments, _) = config.parse_experiments();

    // === Dependency Injection ===
    let gateway = OpenRouterGateway::from_env(
        &config.service.api_key_env,
        config.service.base_url.clone(),
        config.service.timeout(),
    )?;

    let logger: Arc<dyn ConversationLogger> = match &config.run.conversation_log {
        Some(path) => {
            let logger = JsonlQueryLogger::open(path)
                .with_context(|| format!("Cannot open query log {}", path.display()))?;
            info!("Logging queries to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    let client = QueryClient::new(Arc::new(gateway), Arc::new(TokioSleeper))
        .with_policy(config.retry.to_policy())
        .with_logger(logger);

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let token = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; writing recorded results");
                token.cancel();
            }
        }
    });

    let runner = ExperimentRunner::new(
        Arc::new(client),
        Arc::new(JsonDatasetLoader),
        Arc::new(JsonResultStore::new(&config.run.output_dir)),
    )
    .with_options(config.run.to_options())
    .with_cancellation(cancellation);

    let progress: Box<dyn ProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let entries = runner.run_all(&experiments, progress.as_ref()).await;
    println!("{}", ConsoleFormatter::format_batch(&entries));

    Ok(())
}

fn report(files: &[PathBuf], output: OutputFormat) -> Result<()> {
    let use_case = ReportResults::new(Arc::new(JsonResultStore::new(".")));

    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0;
    for file in files {
        match use_case.execute(file) {
            Ok(report) => reports.push((file.as_path(), report)),
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    match output {
        OutputFormat::Text => {
            for (path, report) in &reports {
                println!("{}", ConsoleFormatter::format_report(path, report));
            }
        }
        OutputFormat::Json => {
            let refs: Vec<_> = reports.iter().map(|(path, r)| (*path, r)).collect();
            println!("{}", ConsoleFormatter::format_reports_json(&refs));
        }
    }

    if failed > 0 {
        bail!("Could not read {} of {} result files", failed, files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_domain::{ExperimentConfig, Model};

    fn experiments() -> Vec<FileExperimentConfig> {
        [
            ExperimentConfig::new("a", "a.json", Model::Gpt4, 0.0, 1),
            ExperimentConfig::new("b", "b.json", Model::Gpt4, 0.0, 1),
        ]
        .iter()
        .map(FileExperimentConfig::from)
        .collect()
    }

    #[test]
    fn test_select_all_by_default() {
        assert_eq!(select_experiments(experiments(), &[]).unwrap().len(), 2);
    }

    #[test]
    fn test_select_only() {
        let selected = select_experiments(experiments(), &["b".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "b");
    }

    #[test]
    fn test_select_unknown_name_fails() {
        assert!(select_experiments(experiments(), &["c".to_string()]).is_err());
    }

    #[test]
    fn test_unselected_experiment_does_not_block_run() {
        let mut broken = experiments();
        broken[0].run = 0;
        let config = FileConfig {
            experiments: select_experiments(broken, &["b".to_string()]).unwrap(),
            ..FileConfig::default()
        };
        assert!(check_issues(&config.validate()).is_ok());
    }

    #[test]
    fn test_unsupported_model_only_warns() {
        let mut entries = experiments();
        entries[0].model = "llama-2-70b".into();
        let config = FileConfig {
            experiments: entries,
            ..FileConfig::default()
        };
        assert!(check_issues(&config.validate()).is_ok());
        assert_eq!(config.parse_experiments().0.len(), 2);
    }

    #[test]
    fn test_check_issues() {
        assert!(check_issues(&[ConfigIssue::warning("run.concurrency", "0")]).is_ok());
        assert!(check_issues(&[ConfigIssue::error("experiments", "empty")]).is_err());
    }
}
