use std::fs::{self, OpenOptions};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use healthdeck_api::{HealthClient, HealthClientOptions};
use healthdeck_engine::{CycleOutcome, DashboardViewState, PollerSettings, PollingController};
use healthdeck_tui::{DashboardView, SessionInfo};
use healthdeck_util::{ConfigOverrides, DashboardConfig, UserPreferences, default_log_path};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Terminal dashboard for a service's `/health` endpoint.
#[derive(Parser, Debug)]
#[command(name = "healthdeck", version, about)]
struct Cli {
    #[command(flatten)]
    options: DashboardArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
struct DashboardArgs {
    /// Service base URL, e.g. http://10.0.0.5:8080
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Host the service runs on; the base URL becomes <scheme>://<host>:8080
    #[arg(long, global = true, value_name = "HOST")]
    host: Option<String>,

    /// Delay between health checks in milliseconds [default: 5000]
    #[arg(long, global = true, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds [default: 3000]
    #[arg(long, global = true, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Treat reports with missing sections as failures
    #[arg(long, global = true)]
    strict_payload: bool,

    /// Apply late responses even when a newer cycle has already completed
    #[arg(long, global = true)]
    keep_late_responses: bool,

    /// Color theme (dracula, dracula_hc, nord, ansi256)
    #[arg(long, global = true, value_name = "NAME")]
    theme: Option<String>,
}

impl From<DashboardArgs> for ConfigOverrides {
    fn from(args: DashboardArgs) -> Self {
        Self {
            base_url: args.base_url,
            host: args.host,
            interval_ms: args.interval_ms,
            timeout_ms: args.timeout_ms,
            strict_payload: args.strict_payload,
            keep_late_responses: args.keep_late_responses,
            theme: args.theme,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the service once, print the result and exit (1 when unreachable)
    Status {
        /// Print the raw health report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let Cli { options, command } = Cli::parse();

    match command {
        Some(Command::Status { .. }) => init_stderr_tracing(),
        None => init_file_tracing(),
    }

    let preferences = Arc::new(open_preferences());
    let config = DashboardConfig::resolve(&options.into(), &preferences).context("invalid configuration")?;

    match command {
        Some(Command::Status { json }) => run_status(&config, json).await,
        None => {
            run_dashboard(config, preferences).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The dashboard owns the screen, so diagnostics go to a file instead.
fn init_file_tracing() {
    let log_path = default_log_path();
    if let Some(parent) = log_path.parent()
        && let Err(error) = fs::create_dir_all(parent)
    {
        eprintln!("healthdeck: cannot create log directory {}: {error}", parent.display());
        return;
    }

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("healthdeck: cannot open log file {}: {error}", log_path.display());
            return;
        }
    };

    let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
    let _ = tracing_subscriber::registry().with(env_filter()).with(layer).try_init();
}

fn open_preferences() -> UserPreferences {
    UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; changes will not be saved");
        UserPreferences::ephemeral()
    })
}

fn client_for(config: &DashboardConfig) -> Result<HealthClient> {
    let options = HealthClientOptions {
        timeout: config.request_timeout,
        payload_policy: config.payload_policy,
    };
    HealthClient::new(&config.base_url, options).context("failed to create health client")
}

async fn run_dashboard(config: DashboardConfig, preferences: Arc<UserPreferences>) -> Result<()> {
    let client = client_for(&config)?;
    let settings = PollerSettings {
        interval: config.poll_interval,
        overlap_policy: config.overlap_policy,
    };
    let theme = healthdeck_tui::load_theme(config.theme.as_deref());
    info!(base_url = %config.base_url, theme = theme.definition.id, "starting dashboard");

    let poller = PollingController::new(client, settings).start();
    let session = SessionInfo {
        base_url: config.base_url,
        poll_interval: config.poll_interval,
    };
    healthdeck_tui::run(poller, session, theme, preferences).await
}

async fn run_status(config: &DashboardConfig, json: bool) -> Result<ExitCode> {
    let client = client_for(config)?;
    let result = client.fetch_health().await;
    let reachable = result.is_ok();

    if json {
        match &result {
            Ok(report) => println!("{}", serde_json::to_string_pretty(report)?),
            Err(error) => eprintln!("{}: {error}", config.base_url),
        }
    } else {
        let mut state = DashboardViewState::default();
        state.apply(CycleOutcome::new(1, result), config.overlap_policy);
        println!("Service: {}", config.base_url);
        print!("{}", DashboardView::from_state(&state));
    }

    Ok(if reachable { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_runs_dashboard() {
        let cli = Cli::try_parse_from(["healthdeck", "--base-url", "http://10.0.0.5:9000", "--interval-ms", "2000"]).expect("parse");
        assert!(cli.command.is_none());
        let overrides = ConfigOverrides::from(cli.options);
        assert_eq!(overrides.base_url.as_deref(), Some("http://10.0.0.5:9000"));
        assert_eq!(overrides.interval_ms, Some(2000));
        assert!(!overrides.strict_payload);
    }

    #[test]
    fn global_flags_follow_status_subcommand() {
        let cli = Cli::try_parse_from(["healthdeck", "status", "--json", "--host", "ops.example.com", "--strict-payload"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::Status { json: true })));
        let overrides = ConfigOverrides::from(cli.options);
        assert_eq!(overrides.host.as_deref(), Some("ops.example.com"));
        assert!(overrides.strict_payload);
    }

    #[test]
    fn rejects_non_numeric_interval() {
        assert!(Cli::try_parse_from(["healthdeck", "--interval-ms", "soon"]).is_err());
    }
}
