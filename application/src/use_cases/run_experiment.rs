//! Run Experiment use case
//!
//! Drives one or more experiment configurations: load the dataset, sample
//! items, query every question slot `repeats` times, extract and aggregate
//! the answers, score the item and persist the records.
//!
//! Failures are isolated at two levels. A per-item failure (query timeout,
//! no parseable answer in a slot) skips that item. A per-dataset failure
//! (unreadable file, mode/arity mismatch, unsupported model) aborts only that
//! configuration; the batch moves on to the next one.

use crate::config::RunOptions;
use crate::ports::dataset_source::{DatasetError, DatasetSource};
use crate::ports::llm_gateway::{ChatRequest, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_store::{ResultStore, StoreError};
use crate::use_cases::query_model::{QueryClient, QueryError};
use crate::use_cases::sampling::sample_items;
use futures::{StreamExt, TryStreamExt, stream};
use probe_domain::{
    AggregatedSlots, DomainError, ExperimentConfig, ItemPhase, QuestionItem, ReportEntry,
    ResultRecord, ScoringMode, SlotSamples, ViolationSummary, summarize,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a whole experiment configuration
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] DomainError),

    #[error("Dataset {path} is empty")]
    EmptyDataset { path: PathBuf },

    #[error("Dataset {path} mixes item sizes: item {index} has {found} questions, expected {expected}")]
    MixedArity {
        path: PathBuf,
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors that skip a single item
#[derive(Error, Debug)]
pub enum ItemError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Scoring(#[from] DomainError),

    #[error("Cancelled")]
    Cancelled,
}

/// An item that produced no record
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    /// Position in the source dataset
    pub index: usize,
    /// Truncated first question
    pub preview: String,
    pub reason: String,
}

/// Result of running one experiment configuration
#[derive(Debug)]
pub struct ExperimentOutcome {
    pub name: String,
    pub mode: ScoringMode,
    pub records: Vec<ResultRecord>,
    pub skipped: Vec<SkippedItem>,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
    /// Where the records were written, or why they could not be.
    ///
    /// `None` when nothing was recorded: an earlier results file for the
    /// same name is left as it was.
    pub saved_to: Option<Result<PathBuf, StoreError>>,
}

impl ExperimentOutcome {
    /// Summary of the in-memory records, even when writing them failed
    pub fn summary(&self) -> Option<ViolationSummary> {
        summarize(self.records.iter().map(ReportEntry::from))
    }
}

/// Outcome of one configuration within a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub name: String,
    pub result: Result<ExperimentOutcome, ExperimentError>,
}

/// Use case for running experiment configurations
pub struct ExperimentRunner<G: LlmGateway + ?Sized> {
    client: Arc<QueryClient<G>>,
    datasets: Arc<dyn DatasetSource>,
    store: Arc<dyn ResultStore>,
    options: RunOptions,
    cancellation: Option<CancellationToken>,
}

impl<G: LlmGateway + ?Sized> ExperimentRunner<G> {
    pub fn new(
        client: Arc<QueryClient<G>>,
        datasets: Arc<dyn DatasetSource>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            client,
            datasets,
            store,
            options: RunOptions::default(),
            cancellation: None,
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop between items (and abandon the current one) once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Run every configuration top to bottom.
    ///
    /// A failed configuration is reported in its [`BatchEntry`] and does not
    /// stop the batch. Cancellation stops the batch after the configuration
    /// in flight has written its records.
    pub async fn run_all(
        &self,
        configs: &[ExperimentConfig],
        progress: &dyn ProgressNotifier,
    ) -> Vec<BatchEntry> {
        let mut entries = Vec::with_capacity(configs.len());

        for config in configs {
            if self.is_cancelled() {
                info!("Cancelled; skipping remaining configurations");
                break;
            }

            let result = self.run_with_progress(config, progress).await;
            if let Err(e) = &result {
                warn!("Experiment {} aborted: {}", config.name, e);
            }
            entries.push(BatchEntry {
                name: config.name.clone(),
                result,
            });
        }

        entries
    }

    /// Run one configuration without progress callbacks
    pub async fn run(&self, config: &ExperimentConfig) -> Result<ExperimentOutcome, ExperimentError> {
        self.run_with_progress(config, &NoProgress).await
    }

    /// Run one configuration with progress callbacks
    pub async fn run_with_progress(
        &self,
        config: &ExperimentConfig,
        progress: &dyn ProgressNotifier,
    ) -> Result<ExperimentOutcome, ExperimentError> {
        config.validate()?;

        let items = self.datasets.load(&config.dataset)?;
        let arity = check_arity(&config.dataset, &items)?;
        let mode = config.resolve_mode(arity)?;
        let sampled = sample_items(
            &items,
            config.resolve_sample_size(arity),
            self.options.seed,
        );

        info!(
            "Experiment {}: {} of {} items, {} mode, model {} at T={}, {} repeats",
            config.name,
            sampled.len(),
            items.len(),
            mode.as_str(),
            config.model,
            config.temperature,
            config.repeats
        );
        progress.on_experiment_start(config, sampled.len());

        let mut records = Vec::with_capacity(sampled.len());
        let mut skipped = Vec::new();
        let mut cancelled = false;

        for item in &sampled {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            let mut phase = PhaseTracker::new(item.index(), progress);
            let result = match &self.cancellation {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => Err(ItemError::Cancelled),
                    result = self.run_item(item, config, mode, &mut phase) => result,
                },
                None => self.run_item(item, config, mode, &mut phase).await,
            };

            match result {
                Ok(record) => {
                    debug!(
                        "Item {} recorded: violation {:.4}{}",
                        item.index(),
                        record.violation_metric(),
                        if record.is_strong() { " (strong)" } else { "" }
                    );
                    phase.advance(ItemPhase::Recorded);
                    progress.on_item_complete(item.index(), true);
                    records.push(record);
                }
                Err(ItemError::Cancelled) => {
                    info!("Cancelled during item {}", item.index());
                    cancelled = true;
                    break;
                }
                Err(e) => {
                    warn!("Skipping item {} '{}': {}", item.index(), item.preview(), e);
                    phase.advance(ItemPhase::Skipped);
                    progress.on_item_complete(item.index(), false);
                    skipped.push(SkippedItem {
                        index: item.index(),
                        preview: item.preview(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let saved_to = if records.is_empty() {
            warn!(
                "Experiment {}: no records ({} skipped), results file not written",
                config.name,
                skipped.len()
            );
            None
        } else {
            let saved = self.store.save(&config.name, &records);
            match &saved {
                Ok(path) => info!(
                    "Experiment {}: wrote {} records to {} ({} skipped)",
                    config.name,
                    records.len(),
                    path.display(),
                    skipped.len()
                ),
                Err(e) => warn!("Experiment {}: {}", config.name, e),
            }
            Some(saved)
        };

        let outcome = ExperimentOutcome {
            name: config.name.clone(),
            mode,
            records,
            skipped,
            cancelled,
            saved_to,
        };
        progress.on_experiment_complete(&outcome);
        Ok(outcome)
    }

    /// Query, extract, aggregate and score one item.
    async fn run_item(
        &self,
        item: &QuestionItem,
        config: &ExperimentConfig,
        mode: ScoringMode,
        phase: &mut PhaseTracker<'_>,
    ) -> Result<ResultRecord, ItemError> {
        phase.advance(ItemPhase::Querying);

        // Repeat-major order: every slot once, then every slot again.
        let requests: Vec<(usize, ChatRequest)> = (0..config.repeats)
            .flat_map(|_| item.questions().iter().enumerate())
            .map(|(slot, question)| {
                let request = ChatRequest::new(
                    config.model.clone(),
                    config.prompt.text(),
                    question.clone(),
                    config.temperature,
                )
                .with_max_tokens(config.max_tokens);
                (slot, request)
            })
            .collect();

        let client = &self.client;
        let responses: Vec<(usize, String)> = stream::iter(requests)
            .map(|(slot, request)| async move {
                let text = client.query(&request).await?;
                Ok::<_, QueryError>((slot, text))
            })
            .buffered(self.options.concurrency.max(1))
            .try_collect()
            .await?;

        phase.advance(ItemPhase::Extracting);
        let mut slots = vec![SlotSamples::new(); item.arity()];
        for (slot, text) in responses {
            if slots[slot].push(text).is_none() {
                debug!("Item {} slot {}: no parseable answer", item.index(), slot);
            }
        }

        phase.advance(ItemPhase::Aggregating);
        let aggregated = AggregatedSlots::aggregate(slots)?;

        phase.advance(ItemPhase::Scoring);
        Ok(ResultRecord::score(item, mode, aggregated)?)
    }
}

/// Current phase of one item, forwarded to the progress notifier
struct PhaseTracker<'a> {
    index: usize,
    phase: ItemPhase,
    progress: &'a dyn ProgressNotifier,
}

impl<'a> PhaseTracker<'a> {
    fn new(index: usize, progress: &'a dyn ProgressNotifier) -> Self {
        progress.on_item_phase(index, ItemPhase::Pending);
        Self {
            index,
            phase: ItemPhase::Pending,
            progress,
        }
    }

    fn advance(&mut self, next: ItemPhase) {
        if !self.phase.can_advance_to(next) {
            debug!("Item {}: ignoring {} -> {}", self.index, self.phase, next);
            return;
        }
        self.phase = next;
        self.progress.on_item_phase(self.index, next);
    }
}

/// Common arity of all items; datasets must not mix pairs and quadruples
fn check_arity(path: &std::path::Path, items: &[QuestionItem]) -> Result<usize, ExperimentError> {
    let Some(first) = items.first() else {
        return Err(ExperimentError::EmptyDataset {
            path: path.to_path_buf(),
        });
    };
    let expected = first.arity();
    if let Some(item) = items.iter().find(|i| i.arity() != expected) {
        return Err(ExperimentError::MixedArity {
            path: path.to_path_buf(),
            index: item.index(),
            expected,
            found: item.arity(),
        });
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::ports::llm_gateway::GatewayError;
    use crate::ports::sleeper::Sleeper;
    use crate::use_cases::report_results::report;
    use async_trait::async_trait;
    use probe_domain::Model;
    use serde_json::Value;
    use std::collections::{HashMap, HashSet};
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Gateway answering from a prompt -> reply table
    struct CannedGateway {
        replies: HashMap<String, String>,
        rate_limited: HashSet<String>,
        calls: AtomicUsize,
    }

    impl CannedGateway {
        fn new(replies: &[(&str, &str)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(q, a)| (q.to_string(), a.to_string()))
                    .collect(),
                rate_limited: HashSet::new(),
                calls: AtomicUsize::new(0),
            }
        }

        /// Answer `prompt` with a rate-limit error forever
        fn with_rate_limit(mut self, prompt: &str) -> Self {
            self.rate_limited.insert(prompt.to_string());
            self
        }
    }

    #[async_trait]
    impl LlmGateway for CannedGateway {
        async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.rate_limited.contains(&request.prompt) {
                return Err(GatewayError::RateLimited("HTTP 429: slow down".into()));
            }
            match self.replies.get(&request.prompt) {
                Some(reply) => Ok(reply.clone()),
                None => Err(GatewayError::Unauthorized("unknown prompt".into())),
            }
        }
    }

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    struct InMemoryDatasets {
        datasets: HashMap<PathBuf, Vec<Vec<&'static str>>>,
    }

    impl DatasetSource for InMemoryDatasets {
        fn load(&self, path: &Path) -> Result<Vec<QuestionItem>, DatasetError> {
            let entries = self.datasets.get(path).ok_or_else(|| DatasetError::Io {
                path: path.to_path_buf(),
                message: "not found".into(),
            })?;
            entries
                .iter()
                .enumerate()
                .map(|(index, qs)| {
                    QuestionItem::new(index, qs.iter().map(|q| q.to_string()).collect()).map_err(
                        |e| DatasetError::Format {
                            path: path.to_path_buf(),
                            index,
                            message: e.to_string(),
                        },
                    )
                })
                .collect()
        }
    }

    #[derive(Default)]
    struct InMemoryStore {
        saved: Mutex<HashMap<String, Value>>,
        fail: bool,
    }

    impl ResultStore for InMemoryStore {
        fn save(&self, name: &str, records: &[ResultRecord]) -> Result<PathBuf, StoreError> {
            let path = PathBuf::from(format!("results/output_{name}.json"));
            if self.fail {
                return Err(StoreError::Write {
                    path,
                    message: "read-only file system".into(),
                });
            }
            let value = serde_json::to_value(records).unwrap();
            self.saved.lock().unwrap().insert(name.to_string(), value);
            Ok(path)
        }

        fn load_raw(&self, path: &Path) -> Result<Vec<Value>, StoreError> {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_prefix("output_"))
                .unwrap_or_default();
            match self.saved.lock().unwrap().get(name) {
                Some(Value::Array(records)) => Ok(records.clone()),
                _ => Err(StoreError::Read {
                    path: path.to_path_buf(),
                    message: "missing".into(),
                }),
            }
        }
    }

    fn negation_datasets() -> InMemoryDatasets {
        InMemoryDatasets {
            datasets: HashMap::from([(
                PathBuf::from("negated.json"),
                vec![
                    vec!["Will A happen?", "Will A not happen?"],
                    vec!["Will B happen?", "Will B not happen?"],
                    vec!["Will C happen?", "Will C not happen?"],
                ],
            )]),
        }
    }

    fn negation_gateway() -> CannedGateway {
        CannedGateway::new(&[
            ("Will A happen?", "Likely. [Answer] 0.7"),
            ("Will A not happen?", "[Answer] 0.2"),
            ("Will B happen?", "I cannot estimate that."),
            ("Will B not happen?", "Hard to say."),
            ("Will C happen?", "[Answer] 0.9"),
            ("Will C not happen?", "[Answer] 0.9"),
        ])
    }

    fn runner(
        gateway: Arc<CannedGateway>,
        datasets: InMemoryDatasets,
        store: Arc<InMemoryStore>,
    ) -> ExperimentRunner<CannedGateway> {
        let client = Arc::new(QueryClient::new(gateway, Arc::new(NoSleep)));
        ExperimentRunner::new(client, Arc::new(datasets), store)
    }

    fn negation_config() -> ExperimentConfig {
        ExperimentConfig::new("negated_gpt-4_T-0.0", "negated.json", Model::Gpt4, 0.0, 3)
    }

    #[tokio::test]
    async fn test_end_to_end_skips_unparseable_item() {
        let gateway = Arc::new(negation_gateway());
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(gateway.clone(), negation_datasets(), store.clone());

        let outcome = runner.run(&negation_config()).await.unwrap();

        assert_eq!(outcome.mode, ScoringMode::Negation);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert_eq!(outcome.skipped[0].preview, "Will B happen?");
        assert!(!outcome.cancelled);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3 * 2 * 3);

        let first = &outcome.records[0];
        assert_eq!(first.answers()[0].len(), 3);
        assert_eq!(first.median(), &[0.7, 0.2]);
        assert!((first.violation_metric() - 0.1).abs() < 1e-9);
        assert!(!first.is_strong());
        assert!(outcome.records[1].is_strong());

        let path = outcome.saved_to.as_ref().unwrap().as_ref().unwrap().clone();
        let raw = store.load_raw(&path).unwrap();
        assert_eq!(raw.len(), 2);
        let written = report(&raw);
        let summary = written.summary.unwrap();
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.strong, 1);
        assert!((summary.percent_strong - 50.0).abs() < 1e-9);
        assert!((summary.mean_violation - 0.45).abs() < 1e-9);
        assert_eq!(Some(summary), outcome.summary());
    }

    #[tokio::test]
    async fn test_query_timeout_skips_only_that_item() {
        let gateway = Arc::new(negation_gateway().with_rate_limit("Will C happen?"));
        let policy = RetryPolicy::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_total_wait(Duration::from_millis(3));
        let client = Arc::new(QueryClient::new(gateway, Arc::new(NoSleep)).with_policy(policy));
        let datasets = InMemoryDatasets {
            datasets: HashMap::from([(
                PathBuf::from("negated.json"),
                vec![
                    vec!["Will A happen?", "Will A not happen?"],
                    vec!["Will C happen?", "Will C not happen?"],
                ],
            )]),
        };
        let runner = ExperimentRunner::new(
            client,
            Arc::new(datasets),
            Arc::new(InMemoryStore::default()),
        );

        let outcome = runner.run(&negation_config()).await.unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].questions()[0], "Will A happen?");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert!(
            outcome.skipped[0].reason.starts_with("Timed out waiting for"),
            "{}",
            outcome.skipped[0].reason
        );
    }

    #[tokio::test]
    async fn test_no_records_keeps_previous_results() {
        let store = Arc::new(InMemoryStore::default());
        let previous = serde_json::json!([{"violation_metric": 0.5}]);
        store
            .saved
            .lock()
            .unwrap()
            .insert("negated_gpt-4_T-0.0".into(), previous.clone());
        // No canned replies: every query is rejected as unauthorized
        let gateway = Arc::new(CannedGateway::new(&[]));
        let runner = runner(gateway, negation_datasets(), store.clone());

        let outcome = runner.run(&negation_config()).await.unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped.len(), 3);
        assert!(outcome.saved_to.is_none());
        assert_eq!(store.saved.lock().unwrap()["negated_gpt-4_T-0.0"], previous);
    }

    /// Notifier recording every phase change
    #[derive(Default)]
    struct PhaseLog {
        phases: Mutex<Vec<(usize, ItemPhase)>>,
    }

    impl ProgressNotifier for PhaseLog {
        fn on_experiment_start(&self, _config: &ExperimentConfig, _total_items: usize) {}
        fn on_item_phase(&self, index: usize, phase: ItemPhase) {
            self.phases.lock().unwrap().push((index, phase));
        }
        fn on_item_complete(&self, _index: usize, _recorded: bool) {}
        fn on_experiment_complete(&self, _outcome: &ExperimentOutcome) {}
    }

    #[tokio::test]
    async fn test_items_move_through_phases_in_order() {
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(Arc::new(negation_gateway()), negation_datasets(), store);
        let log = PhaseLog::default();

        runner.run_with_progress(&negation_config(), &log).await.unwrap();

        let phases_of = |index: usize| -> Vec<ItemPhase> {
            log.phases
                .lock()
                .unwrap()
                .iter()
                .filter(|(i, _)| *i == index)
                .map(|(_, phase)| *phase)
                .collect()
        };
        use ItemPhase::*;
        assert_eq!(
            phases_of(0),
            vec![Pending, Querying, Extracting, Aggregating, Scoring, Recorded]
        );
        assert_eq!(
            phases_of(1),
            vec![Pending, Querying, Extracting, Aggregating, Skipped]
        );
    }

    #[tokio::test]
    async fn test_bayes_slots_use_their_own_answers() {
        let datasets = InMemoryDatasets {
            datasets: HashMap::from([(
                PathBuf::from("bayes.json"),
                vec![vec!["P(A)?", "P(B)?", "P(A and B)?", "P(B and A)?"]],
            )]),
        };
        let gateway = Arc::new(CannedGateway::new(&[
            ("P(A)?", "[Answer] 0.4"),
            ("P(B)?", "[Answer] 0.5"),
            ("P(A and B)?", "[Answer] 0.3"),
            ("P(B and A)?", "[Answer] 0.2"),
        ]));
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(gateway, datasets, store);

        let config = ExperimentConfig::new("bayes", "bayes.json", Model::Gpt35Turbo, 0.5, 2);
        let outcome = runner.run(&config).await.unwrap();

        assert_eq!(outcome.mode, ScoringMode::Bayes);
        let record = &outcome.records[0];
        assert_eq!(record.median(), &[0.4, 0.5, 0.3, 0.2]);
        assert!((record.violation_metric() - 0.07f64.sqrt()).abs() < 1e-9);
        assert!(record.is_strong());
    }

    #[tokio::test]
    async fn test_concurrent_queries_match_sequential() {
        let store = Arc::new(InMemoryStore::default());
        let sequential = runner(Arc::new(negation_gateway()), negation_datasets(), store.clone())
            .run(&negation_config())
            .await
            .unwrap();
        let concurrent = runner(Arc::new(negation_gateway()), negation_datasets(), store)
            .with_options(RunOptions::default().with_concurrency(4))
            .run(&negation_config())
            .await
            .unwrap();

        assert_eq!(sequential.records, concurrent.records);
    }

    #[tokio::test]
    async fn test_mode_arity_mismatch_aborts_configuration() {
        let gateway = Arc::new(negation_gateway());
        let runner = runner(
            gateway.clone(),
            negation_datasets(),
            Arc::new(InMemoryStore::default()),
        );

        let config = negation_config().with_mode(ScoringMode::Bayes);
        let err = runner.run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::Config(DomainError::ArityMismatch {
                expected: 4,
                actual: 2,
                ..
            })
        ));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_model_checked_before_any_query() {
        let gateway = Arc::new(negation_gateway());
        let runner = runner(
            gateway.clone(),
            negation_datasets(),
            Arc::new(InMemoryStore::default()),
        );

        let mut config = negation_config();
        config.model = Model::Custom("llama-2-70b".into());
        let err = runner.run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::Config(DomainError::UnsupportedModel(_))
        ));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_continues_after_dataset_error() {
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(Arc::new(negation_gateway()), negation_datasets(), store);

        let missing = ExperimentConfig::new("missing", "missing.json", Model::Gpt4, 0.0, 1);
        let entries = runner
            .run_all(&[missing, negation_config()], &NoProgress)
            .await;

        assert_eq!(entries.len(), 2);
        assert!(matches!(
            entries[0].result,
            Err(ExperimentError::Dataset(DatasetError::Io { .. }))
        ));
        assert_eq!(entries[1].result.as_ref().unwrap().records.len(), 2);
    }

    #[tokio::test]
    async fn test_sample_size_limits_items() {
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(Arc::new(negation_gateway()), negation_datasets(), store)
            .with_options(RunOptions::default().with_seed(Some(7)));

        let config = negation_config().with_sample_size(2);
        let outcome = runner.run(&config).await.unwrap();
        assert_eq!(outcome.records.len() + outcome.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_records() {
        let store = Arc::new(InMemoryStore {
            fail: true,
            ..Default::default()
        });
        let runner = runner(Arc::new(negation_gateway()), negation_datasets(), store);

        let outcome = runner.run(&negation_config()).await.unwrap();
        assert!(matches!(outcome.saved_to, Some(Err(StoreError::Write { .. }))));
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.summary().unwrap().evaluated, 2);
    }

    #[tokio::test]
    async fn test_cancelled_run_without_records_leaves_file() {
        let token = CancellationToken::new();
        token.cancel();
        let gateway = Arc::new(negation_gateway());
        let store = Arc::new(InMemoryStore::default());
        let runner = runner(gateway.clone(), negation_datasets(), store.clone())
            .with_cancellation(token);

        let outcome = runner.run(&negation_config()).await.unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.records.is_empty());
        assert!(outcome.saved_to.is_none());
        assert!(store.saved.lock().unwrap().is_empty());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        let entries = runner.run_all(&[negation_config()], &NoProgress).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_arity_dataset_rejected() {
        let datasets = InMemoryDatasets {
            datasets: HashMap::from([(
                PathBuf::from("mixed.json"),
                vec![
                    vec!["Will A happen?", "Will A not happen?"],
                    vec!["P(A)?", "P(B)?", "P(A and B)?", "P(B and A)?"],
                ],
            )]),
        };
        let runner = runner(
            Arc::new(negation_gateway()),
            datasets,
            Arc::new(InMemoryStore::default()),
        );

        let config = ExperimentConfig::new("mixed", "mixed.json", Model::Gpt4, 0.0, 1);
        let err = runner.run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::MixedArity {
                index: 1,
                expected: 2,
                found: 4,
                ..
            }
        ));
    }
}
