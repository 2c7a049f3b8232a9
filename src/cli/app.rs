//! Runner for the `run` subcommand

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::ports::ConfigStore;
use crate::application::{BatchOutput, ExecutionLoop, TranscribeCallbacks};
use crate::domain::config::{ApiConfig, AppConfig};
use crate::domain::input::OutputRecord;
use crate::domain::operation::{Operation, Resource};
use crate::domain::timing::Duration;
use crate::infrastructure::{FsBinaryStore, SonioxClient, XdgConfigStore};

use super::args::RunArgs;
use super::input::load_records;
use super::presenter::{poll_message, summary, Presenter};
use super::signals::interrupted;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

/// How long background deletions may finish after all output is written
const CLEANUP_GRACE: StdDuration = StdDuration::from_secs(10);

/// Run one operation over every input record
pub async fn run_batch(args: RunArgs) -> ExitCode {
    let mut presenter = Presenter::new();

    let resource = Resource::from(args.resource);
    let operation = match Operation::resolve(resource, &args.operation) {
        Ok(op) => op,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let cli_config = match cli_config(&args) {
        Ok(config) => config,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let config = load_merged_config(cli_config).await;

    let Some(api_config) = ApiConfig::from_app_config(&config) else {
        presenter.error(
            "Missing API key. Set SONIOX_API_KEY environment variable or run 'soniox-batch config set api_key <key>'",
        );
        return ExitCode::from(EXIT_ERROR);
    };

    let mut defaults = args.parameters();
    defaults.model = defaults.model.or_else(|| config.model.clone());

    let records = match load_records(args.input.as_deref(), &args.files, &defaults).await {
        Ok(records) => records,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    debug!(?operation, records = records.len(), base_url = %api_config.base_url, "Starting run");

    let client = Arc::new(SonioxClient::new(api_config));
    let store = Arc::new(FsBinaryStore::new());
    let runner = ExecutionLoop::new(client, store, config.poll_policy())
        .continue_on_fail(args.continue_on_fail);

    presenter.start_spinner(&format!("Running {} {}", resource, args.operation));
    let callbacks = spinner_callbacks(&presenter);

    let result = tokio::select! {
        result = runner.run(operation, &records, &callbacks) => result,
        _ = interrupted() => {
            presenter.spinner_fail("Interrupted");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    match result {
        Ok(batch) => {
            let failed = batch.records.iter().filter(|r| r.is_error()).count();
            let message = summary(batch.records.len(), failed);
            if failed == 0 {
                presenter.spinner_success(&message);
            } else {
                presenter.spinner_fail(&message);
            }
            finish(&presenter, batch).await;
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&format!("Record {} failed", e.index));
            let source = e.source.to_string();
            finish(&presenter, e.completed).await;
            presenter.error(&format!("Record {}: {}", e.index, source));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Write output records, then give background cleanup a bounded grace period
async fn finish(presenter: &Presenter, batch: BatchOutput) {
    for record in &batch.records {
        presenter.output(&render(record));
    }
    drain_cleanup(presenter, batch.pending_cleanup).await;
}

fn render(record: &OutputRecord) -> String {
    serde_json::to_string(&record.json).unwrap_or_else(|_| record.json.to_string())
}

async fn drain_cleanup(presenter: &Presenter, handles: Vec<JoinHandle<()>>) {
    if handles.is_empty() {
        return;
    }

    debug!(count = handles.len(), "Waiting for background cleanup");
    if tokio::time::timeout(CLEANUP_GRACE, join_all(handles))
        .await
        .is_err()
    {
        warn!("Background cleanup did not finish in time");
        presenter.warn("Some server-side resources may not have been deleted");
    }
}

fn spinner_callbacks(presenter: &Presenter) -> TranscribeCallbacks {
    let Some(spinner) = presenter.spinner_handle() else {
        return TranscribeCallbacks::default();
    };
    let poll_spinner = spinner.clone();

    TranscribeCallbacks {
        on_stage: Some(Box::new(move |stage| {
            spinner.set_message(stage.to_string());
        })),
        on_poll: Some(Box::new(move |status, elapsed| {
            poll_spinner.set_message(poll_message(&status.to_string(), elapsed));
        })),
    }
}

/// Config layer from command-line flags; durations are validated here
/// because later layers fall back to defaults on unparsable values
fn cli_config(args: &RunArgs) -> Result<AppConfig, String> {
    let duration = |value: &Option<String>, flag: &str| -> Result<Option<String>, String> {
        match value {
            Some(raw) => raw
                .parse::<Duration>()
                .map(|_| Some(raw.clone()))
                .map_err(|e| format!("Invalid --{}: {}", flag, e)),
            None => Ok(None),
        }
    };

    Ok(AppConfig {
        api_key: args.api_key.clone().filter(|s| !s.trim().is_empty()),
        api_url: args.api_url.clone(),
        model: args.model.clone(),
        check_interval: duration(&args.check_interval, "check-interval")?,
        max_wait: duration(&args.max_wait, "max-wait")?,
        ..Default::default()
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

fn env_config() -> AppConfig {
    let var = |name: &str| env::var(name).ok().filter(|s| !s.trim().is_empty());
    AppConfig {
        api_key: var("SONIOX_API_KEY"),
        api_url: var("SONIOX_API_URL"),
        ..Default::default()
    }
}
