//! apprate - drive the rating prompt engine from the command line
//!
//! Wires together:
//! - Configuration loading
//! - Store initialization (SQLite, in-memory fallback)
//! - The rating engine
//!
//! Each invocation is one engine call against the installation's data directory,
//! so a host application (or a developer) can script launches and responses.

use anyhow::{Context, Result};
use apprate_api::{ResponseEvent, StarRating};
use apprate_config::{Policy, load_config};
use apprate_core::{EngineEvent, RatingEngine};
use apprate_store::{CounterStore, MemoryStore, SqliteStore};
use apprate_util::{default_config_path, format_datetime_full};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// apprate - decides when to ask for an app rating
#[derive(Parser, Debug)]
#[command(name = "apprate")]
#[command(about = "Decides when to ask for an app rating", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/apprate/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set APPRATE_DATA_DIR env var)
    #[arg(short, long, env = "APPRATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count an application start and print whether to show the prompt
    Launch {
        /// Skip launch and day thresholds (development builds only)
        #[arg(long)]
        debug_bypass: bool,
    },

    /// Report what the user did with the prompt and print the next action
    Respond {
        #[command(subcommand)]
        response: Response,
    },

    /// Print the stored counters and the current evaluation
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear all counters and decisions
    Reset,
}

#[derive(Subcommand, Debug)]
enum Response {
    /// Confirmed a star rating (0-5, half steps)
    Rate { stars: StarRating },
    /// "Rate later"
    Later,
    /// "Never ask again"
    Never,
    /// Feedback was sent
    FeedbackSubmitted,
    /// Dialog cancelled or feedback abandoned
    Dismissed,
}

impl From<Response> for ResponseEvent {
    fn from(response: Response) -> Self {
        match response {
            Response::Rate { stars } => ResponseEvent::Rate { stars },
            Response::Later => ResponseEvent::RemindLater,
            Response::Never => ResponseEvent::Never,
            Response::FeedbackSubmitted => ResponseEvent::FeedbackSubmitted,
            Response::Dismissed => ResponseEvent::Dismissed,
        }
    }
}

fn load_policy(path: &Path) -> Result<Policy> {
    if !path.exists() {
        info!(config_path = %path.display(), "No configuration file, using defaults");
        return Ok(Policy::default());
    }

    let policy = load_config(path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;
    info!(config_path = %path.display(), "Configuration loaded");
    Ok(policy)
}

/// Open the counter database. An unusable database degrades to a
/// non-durable in-memory store rather than failing the host.
fn open_store(data_dir: &Path) -> Arc<dyn CounterStore> {
    let db_path = data_dir.join(apprate_util::DB_FILENAME);

    let opened = std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))
        .and_then(|_| {
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))
        });

    match opened {
        Ok(store) if store.is_healthy() => {
            info!(db_path = %db_path.display(), "Store initialized");
            Arc::new(store)
        }
        Ok(_) => {
            warn!(
                db_path = %db_path.display(),
                "Store failed health check, state will not persist"
            );
            Arc::new(MemoryStore::new())
        }
        Err(e) => {
            let error = format!("{:#}", e);
            warn!(error = %error, "Store unavailable, state will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let policy = load_policy(&args.config)?;

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| policy.storage.data_dir.clone());
    let store = open_store(&data_dir);
    let now = apprate_util::now();

    match args.command {
        Command::Launch { debug_bypass } => {
            let mut engine = if debug_bypass {
                RatingEngine::with_debug_bypass(policy, store)
            } else {
                RatingEngine::new(policy, store)
            };

            if engine.on_launch(now) {
                println!("show");
            } else {
                let reasons: Vec<String> = engine
                    .drain_events()
                    .into_iter()
                    .find_map(|event| match event {
                        EngineEvent::PromptSkipped { reasons } => Some(reasons),
                        _ => None,
                    })
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if reasons.is_empty() {
                    println!("skip");
                } else {
                    println!("skip: {}", reasons.join("; "));
                }
            }
        }
        Command::Respond { response } => {
            let mut engine = RatingEngine::new(policy, store);
            match engine.on_response(response.into(), now) {
                Some(action) => println!("{}", action),
                None => println!("none"),
            }
        }
        Command::Status { json } => {
            let engine = RatingEngine::new(policy, store);
            let status = engine.status(now).context("Failed to read counter state")?;

            if json {
                let value = serde_json::json!({
                    "state": status.state,
                    "evaluation": status.decision,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let state = &status.state;
                let stamp = |dt: Option<DateTime<Local>>| {
                    dt.as_ref()
                        .map(format_datetime_full)
                        .unwrap_or_else(|| "-".to_string())
                };
                println!("Launches:          {}", state.launch_count);
                println!("First launch:      {}", stamp(state.first_launch_at));
                println!("Last prompt:       {}", stamp(state.last_prompt_at));
                println!(
                    "Launches at prompt: {}",
                    state
                        .launch_count_at_last_prompt
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                println!("Decision:          {}", state.user_decision);
                println!("Last deferral:     {}", stamp(state.last_decline_at));
                if status.decision.is_show() {
                    println!("Next launch:       would prompt");
                } else {
                    for reason in status.decision.reasons() {
                        println!("Blocked by:        {}", reason);
                    }
                }
            }
        }
        Command::Reset => {
            let mut engine = RatingEngine::new(policy, store);
            engine.reset();
            println!("reset");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "apprate starting");

    run(args)
}
