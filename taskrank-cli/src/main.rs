use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use taskrank_core::{LeaderboardRanker, PriorityRanker, RankError};
use taskrank_ingest::{MemberSource, PrioritizeResponse, parse_prioritize_request};
use tracing::{error, info};

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "taskrank", version, about = "Task prioritization and team leaderboard")]
struct Cli {
    /// Config file (default: ~/.taskrank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Order a task batch: reads `{"tasks": [...]}` and prints the ranked tasks
    ///
    /// Deadlines may be written as YYYY-MM-DD, YYYY/MM/DD, a date with a
    /// HH:MM or HH:MM:SS time (space or `T` separated), or an RFC 3339
    /// timestamp. Any other deadline rejects the whole batch.
    Prioritize {
        /// Request file; `-` or omitted reads stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Rank team members from their task history
    Leaderboard {
        /// Read members from a database export instead of the configured store
        #[arg(long, conflicts_with = "url")]
        members_file: Option<PathBuf>,

        /// Read members from this realtime database base URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Print static service identity
    Discovery,

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,

    /// Print the effective config
    Show,
}

#[derive(Debug, Serialize)]
struct Discovery {
    service: String,
    host: String,
    port: u16,
    version: &'static str,
    build: &'static str,
    endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    leaderboard: &'static str,
    prioritize: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Prioritize { input } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let body = read_input(input)?;
            let result = parse_prioritize_request(&body).and_then(|tasks| {
                let now = chrono::Local::now().naive_local();
                PriorityRanker::new(cfg.priority_model)
                    .prioritize(&tasks, now)
                    .map(|tasks| PrioritizeResponse { tasks })
            });
            emit("prioritize", result, cli.pretty)?;
        }

        Command::Leaderboard { members_file, url } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let source = match (members_file, url) {
                (Some(path), _) => MemberSource::File(path),
                (None, Some(base_url)) => MemberSource::Rest {
                    base_url,
                    auth_token: cfg.store.auth_token.clone(),
                    timeout_secs: cfg.store.timeout_secs,
                },
                (None, None) => cfg.member_source()?,
            };

            let result = match source.fetch().await {
                Ok(members) => LeaderboardRanker::new(cfg.leaderboard_model).rank(&members),
                Err(e) => Err(e),
            };
            emit("leaderboard", result, cli.pretty)?;
        }

        Command::Discovery => {
            let cfg = config::load_config(cli.config.as_deref())?;
            print_json(&discovery(&cfg), cli.pretty)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(p) if p.as_os_str() != "-" => {
            std::fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))
        }
        _ => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read stdin")?;
            Ok(s)
        }
    }
}

fn discovery(cfg: &Config) -> Discovery {
    Discovery {
        service: cfg.service.name.clone(),
        host: std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string()),
        port: cfg.service.port,
        version: env!("CARGO_PKG_VERSION"),
        build: env!("TASKRANK_BUILD"),
        endpoints: Endpoints {
            leaderboard: "/leaderboard",
            prioritize: "/prioritize",
        },
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{s}");
    Ok(())
}

/// Print the success payload, or the `{ "error": ... }` payload and exit
/// with 2 for bad input, 1 for everything else.
fn emit<T: Serialize>(op: &str, result: Result<T, RankError>, pretty: bool) -> Result<()> {
    match result {
        Ok(value) => {
            info!(op, "request completed");
            print_json(&value, pretty)
        }
        Err(e) => {
            let status = e.status_code();
            error!(op, status, error = %e, "request failed");
            print_json(&e.to_payload(), pretty)?;
            std::process::exit(if status == 400 { 2 } else { 1 });
        }
    }
}
