//! countdown - named countdown timers in the terminal
//!
//! This is the main entry point. It wires together:
//! - Configuration loading
//! - Store initialization
//! - Core engine
//! - Terminal notifier and alert player
//! - The session loop (stdin commands, stdout events, heartbeat, signals)

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use countdown::{App, open_engine, render_payload};
use countdown_api::{Command, Event, EventPayload, TimerView};
use countdown_config::{Settings, load_or_default};
use countdown_host_term::{SoundAlertPlayer, TerminalNotifier};
use countdown_util::{COUNTDOWN_CONFIG_ENV, TimerId, default_config_path, is_mock_time_active};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const HEARTBEAT: Duration = Duration::from_secs(1);

/// countdown - named countdown timers, persisted between sessions
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(about = "Named countdown timers in the terminal", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/countdown/config.toml)
    #[arg(short, long, env = COUNTDOWN_CONFIG_ENV, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override
    #[arg(short, long, env = "COUNTDOWN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run an interactive session: JSON commands on stdin, JSON events on stdout (default)
    Run,

    /// List saved timers
    List {
        /// Print the timers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a timer
    Add {
        title: String,
        #[arg(short = 'D', long, default_value = "")]
        description: String,
        #[arg(short = 'H', long, default_value_t = 0, allow_negative_numbers = true)]
        hours: i64,
        #[arg(short = 'M', long, default_value_t = 0, allow_negative_numbers = true)]
        minutes: i64,
        #[arg(short = 'S', long, default_value_t = 0, allow_negative_numbers = true)]
        seconds: i64,
    },

    /// Edit a timer; unspecified fields keep their value
    Edit {
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
        #[arg(short = 'H', long, allow_negative_numbers = true)]
        hours: Option<i64>,
        #[arg(short = 'M', long, allow_negative_numbers = true)]
        minutes: Option<i64>,
        #[arg(short = 'S', long, allow_negative_numbers = true)]
        seconds: Option<i64>,
    },

    /// Delete a timer
    Delete { id: String },
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let settings = match &args.data_dir {
        Some(dir) => settings.with_data_dir(dir.clone()),
        None => settings,
    };

    info!(
        config_path = %args.config.display(),
        data_dir = %settings.storage.data_dir.display(),
        slot = %settings.storage.slot,
        "Configuration loaded"
    );
    Ok(settings)
}

fn build_app(settings: &Settings) -> Result<(App, Arc<SoundAlertPlayer>)> {
    let engine = open_engine(settings)?;

    let notifier = Arc::new(TerminalNotifier::stderr(settings.notifications_enabled));
    let player = Arc::new(SoundAlertPlayer::new(
        settings.alerts.sound.clone(),
        &settings.alerts.player,
        settings.alerts.bell,
    ));
    if let Some(argv) = player.argv() {
        debug!(argv = ?argv, "Alert sound configured");
    }

    Ok((App::new(engine, notifier, player.clone()), player))
}

async fn emit(stdout: &mut Stdout, payload: EventPayload) -> Result<()> {
    let mut line = Event::new(payload)
        .to_line()
        .context("Failed to serialize event")?;
    line.push('\n');
    stdout
        .write_all(line.as_bytes())
        .await
        .context("Failed to write event")?;
    stdout.flush().await.context("Failed to flush stdout")?;
    Ok(())
}

async fn emit_all(stdout: &mut Stdout, payloads: Vec<EventPayload>) -> Result<()> {
    for payload in payloads {
        emit(stdout, payload).await?;
    }
    Ok(())
}

/// The interactive session loop
async fn run_session(mut app: App, player: Arc<SoundAlertPlayer>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    // Set up signal handlers
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

    let mut heartbeat = tokio::time::interval(HEARTBEAT);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut was_active = false;

    emit(
        &mut stdout,
        EventPayload::Timers {
            timers: app.engine().list(),
        },
    )
    .await?;

    info!("Session running");

    loop {
        // The first decrement lands one full period after going active
        let active = app.needs_heartbeat();
        if active && !was_active {
            heartbeat.reset();
        }
        was_active = active;

        if !stdin_open && !active {
            info!("Input closed and no timers running");
            break;
        }

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully");
                break;
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, shutting down gracefully");
                break;
            }

            _ = heartbeat.tick(), if active => {
                let payloads = app.heartbeat().await;
                emit_all(&mut stdout, payloads).await?;
            }

            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let payloads = app.handle_line(&line).await;
                        emit_all(&mut stdout, payloads).await?;
                    }
                    Ok(None) => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    info!("Shutting down countdown");
    player.shutdown().await;
    if let Err(e) = emit(&mut stdout, EventPayload::Shutdown).await {
        warn!(error = %e, "Failed to announce shutdown");
    }
    info!("Shutdown complete");
    Ok(())
}

/// Run a single command and print the outcome for a person
async fn run_once(mut app: App, command: Command) -> Result<()> {
    let payloads = app.handle_command(command).await;
    let mut failure = None;

    for payload in &payloads {
        match payload {
            EventPayload::ValidationFailed { message } => failure = Some(message.clone()),
            EventPayload::StorageWarning { message } => eprintln!("Warning: {}", message),
            other => {
                if let Some(text) = render_payload(other) {
                    println!("{}", text);
                }
            }
        }
    }

    if let Some(message) = failure {
        bail!("Invalid timer: {}", message);
    }
    Ok(())
}

fn require_timer(app: &App, id: &str) -> Result<TimerId> {
    let id = TimerId::new(id);
    if app.engine().get(&id).is_none() {
        bail!("No timer with id {}", id);
    }
    Ok(id)
}

fn print_json(timers: &[TimerView]) -> Result<()> {
    let json = serde_json::to_string_pretty(timers).context("Failed to serialize timers")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the event protocol
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "countdown starting");
    if is_mock_time_active() {
        warn!("Mock time is active; timestamps are shifted");
    }

    let settings = load_settings(&args)?;
    let (app, player) = build_app(&settings)?;

    let result = match args.command.unwrap_or(Cmd::Run) {
        Cmd::Run => run_session(app, player).await,
        Cmd::List { json: true } => print_json(&app.engine().list()),
        Cmd::List { json: false } => run_once(app, Command::List).await,
        Cmd::Add {
            title,
            description,
            hours,
            minutes,
            seconds,
        } => {
            run_once(
                app,
                Command::Add {
                    title,
                    description,
                    hours,
                    minutes,
                    seconds,
                },
            )
            .await
        }
        Cmd::Edit {
            id,
            title,
            description,
            hours,
            minutes,
            seconds,
        } => {
            let id = require_timer(&app, &id)?;
            run_once(
                app,
                Command::Edit {
                    id,
                    title,
                    description,
                    hours,
                    minutes,
                    seconds,
                },
            )
            .await
        }
        Cmd::Delete { id } => {
            let id = require_timer(&app, &id)?;
            run_once(app, Command::Delete { id }).await
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "countdown failed");
    }
    result
}
