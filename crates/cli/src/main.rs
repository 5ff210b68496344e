// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw - charge-monitoring task supervisor

mod color;
mod commands;
mod exit_error;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cw_supervisor::Config;

use crate::commands::{payload, resume, task};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "cw", version = VERSION, styles = color::styles())]
#[command(about = "Supervise per-vehicle charge-monitoring workers")]
struct Cli {
    /// State directory (default: $CW_STATE_DIR, then ~/.local/state/cw)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Task registry file (default: <state-dir>/charge_tasks.json)
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relaunch workers for every in-flight task (run once at startup)
    Resume,
    /// Launch a worker for a new task
    Start {
        /// Task details as a JSON object (must include vin and monitoringMode)
        #[arg(long, value_name = "JSON")]
        details: String,
    },
    /// Terminate a task's worker and remove its record
    Stop {
        /// Vehicle identifier
        vin: String,
    },
    /// Show the in-flight task for a vehicle
    Status {
        /// Vehicle identifier
        vin: String,
    },
    /// List every task in the registry
    List,
    /// Set one key inside a task's details
    SetDetail {
        /// Vehicle identifier
        vin: String,
        /// Detail key (e.g. liveActivityPushToken)
        key: String,
        /// New value; parsed as JSON, otherwise stored as a string
        value: String,
    },
    /// Decode a worker payload argument back into task details
    DecodePayload {
        /// Base64 payload as passed to the worker
        payload: String,
    },
}

#[tokio::main]
async fn main() {
    let log_guard = logging::init();
    let result = run().await;
    drop(log_guard);

    if let Err(e) = result {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("Error: {}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    // Decoding needs no state directory
    if let Commands::DecodePayload { payload } = &cli.command {
        return payload::decode(payload, format);
    }

    let config = load_config(cli.state_dir, cli.registry)?;
    match cli.command {
        Commands::Resume => resume::handle(&config, format).await,
        Commands::Start { details } => task::start(&config, &details, format).await,
        Commands::Stop { vin } => task::stop(&config, &vin, format),
        Commands::Status { vin } => task::status(&config, &vin, format),
        Commands::List => task::list(&config, format),
        Commands::SetDetail { vin, key, value } => {
            task::set_detail(&config, &vin, &key, &value, format)
        }
        Commands::DecodePayload { .. } => Ok(()),
    }
}

fn load_config(state_dir: Option<PathBuf>, registry: Option<PathBuf>) -> Result<Config> {
    let mut config = match state_dir {
        Some(dir) => Config::load_in(dir),
        None => Config::load()?,
    };
    if let Some(path) = registry {
        config.registry_path = path;
    }
    Ok(config)
}
