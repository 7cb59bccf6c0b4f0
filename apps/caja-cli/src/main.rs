//! # Caja Back Office CLI
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments                                                     │
//! │  2. Load configuration (defaults → caja.toml → CAJA_* env)              │
//! │  3. Initialize logging (RUST_LOG, else configured filter)               │
//! │  4. Connect to database & run migrations (skipped for offline commands) │
//! │  5. Run command, print JSON                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A failed command prints its error as JSON on stderr and exits with 1.

mod commands;
mod config;
mod error;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use caja_db::Database;

use crate::commands::{run, run_offline, Cli};
use crate::config::AppConfig;
use crate::error::ApiError;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.log_filter);

    let result = if cli.command.is_offline() {
        run_offline(&cli.command)
    } else {
        info!(database = %config.database_path.display(), "Opening database");
        if let Some(dir) = config.database_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Could not create {}", dir.display()))?;
            }
        }

        let db = Database::new(config.db_config())
            .await
            .context("Failed to open database")?;
        let result = run(&cli.command, &db).await;
        db.close().await;
        result
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report(&e)),
    }
}

fn report(err: &ApiError) -> ExitCode {
    error!(code = ?err.code, status = err.status, "{}", err.message);
    match serde_json::to_string_pretty(err) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `CAJA_LOG` / `log_filter` in caja.toml - Used when `RUST_LOG` is unset
/// - Default: `info,caja=debug,sqlx=warn`
fn init_tracing(fallback: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
