/*
[INPUT]:  CLI arguments, layered configuration, OS shutdown signals
[OUTPUT]: One-shot todo / market commands, the TUI, init and demo runs
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use arc_task::{AppConfig, Session};
use arc_task_adapter::MiningMode;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::Command;
use tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

const LOG_FILE_NAME: &str = "arc-task.log";

#[derive(Parser, Debug)]
#[command(
    name = "arc-task",
    version,
    about = "Client for the on-chain todo list and USDC bounty marketplace"
)]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: String,
    /// Use the in-process ledger seeded with sample data
    #[arg(long, global = true)]
    simulated: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let log_buffer = LogBuffer::handle(LOG_BUFFER_CAPACITY);
    let _log_guard = match &args.command {
        Command::Tui { .. } => Some(init_tui_tracing(&args.log_level, log_buffer.clone())?),
        _ => {
            init_tracing(&args.log_level)?;
            None
        }
    };

    if let Command::Init { output } = args.command {
        cli::init::run_init(output)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        rpc_url = %config.network.rpc_url,
        simulated = args.simulated,
        "configuration loaded"
    );

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    match args.command {
        Command::Demo => cli::demo::run_demo(&config, shutdown).await,
        Command::Todo { command } => {
            let session = open_session(&config, args.simulated).await?;
            Ok(cli::commands::run_todo(&session, &config, command, shutdown).await)
        }
        Command::Market { command } => {
            let session = open_session(&config, args.simulated).await?;
            Ok(cli::commands::run_market(&session, &config, command, shutdown).await)
        }
        Command::Tui { screen } => {
            let session = open_session(&config, args.simulated).await?;
            tui::run_tui(session, config, screen.into(), log_buffer, shutdown)
                .await
                .context("run tui")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}

async fn open_session(config: &AppConfig, simulated: bool) -> Result<Session> {
    if simulated {
        return Session::simulated(MiningMode::AfterPolls(2)).await;
    }
    let session = Session::connect(config)?;
    session.verify_chain(config.network.chain_id).await;
    Ok(session)
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// The terminal belongs to the UI: logs go to a file and to the Logs tab
fn init_tui_tracing(log_level: &str, buffer: LogBufferHandle) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("arc-task"))
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(LogWriterFactory::new(buffer))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
