// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the supervisor crate.

use std::path::PathBuf;
use std::time::Duration;

use cw_core::BreakerConfig;

use crate::adapters::WorkerCommand;
use crate::lifecycle::LifecycleError;

/// Registry file name inside the state directory.
pub const REGISTRY_FILE: &str = "charge_tasks.json";

/// Worker script launched when `CW_WORKER_SCRIPT` is unset, relative to the working directory.
pub const DEFAULT_WORKER_SCRIPT: &str = "cli/tasks/charge-monitoring-workflow.js";

/// Resolve state directory: CW_STATE_DIR > XDG_STATE_HOME/cw > ~/.local/state/cw
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = non_empty("CW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("cw"));
    }
    let home = non_empty("HOME").ok_or(LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/cw"))
}

/// Registry path override
pub fn registry_path() -> Option<PathBuf> {
    non_empty("CW_REGISTRY_PATH").map(PathBuf::from)
}

/// Worker command: `CW_WORKER_PROGRAM` (default `node`) followed by
/// `CW_WORKER_SCRIPT` unless that is set to an empty string.
pub fn worker_command() -> WorkerCommand {
    let program = non_empty("CW_WORKER_PROGRAM").unwrap_or_else(|| "node".to_string());
    let command = WorkerCommand::new(program);
    match std::env::var("CW_WORKER_SCRIPT") {
        Ok(script) if script.is_empty() => command,
        Ok(script) => command.arg(script),
        Err(_) => {
            let cwd = std::env::current_dir().unwrap_or_default();
            command.arg(cwd.join(DEFAULT_WORKER_SCRIPT).to_string_lossy())
        }
    }
}

/// Vehicle-data breaker preset with `CW_VEHICLE_BREAKER_*` overrides.
pub fn vehicle_breaker() -> BreakerConfig {
    breaker_overrides(BreakerConfig::vehicle_data(), "CW_VEHICLE_BREAKER")
}

/// Push breaker preset with `CW_PUSH_BREAKER_*` overrides.
pub fn push_breaker() -> BreakerConfig {
    breaker_overrides(BreakerConfig::push(), "CW_PUSH_BREAKER")
}

fn breaker_overrides(base: BreakerConfig, prefix: &str) -> BreakerConfig {
    let mut config = base;
    if let Some(threshold) = parsed::<u32>(&format!("{prefix}_THRESHOLD")) {
        config = config.with_failure_threshold(threshold);
    }
    if let Some(ms) = parsed::<u64>(&format!("{prefix}_RESET_MS")) {
        config = config.with_reset_timeout(Duration::from_millis(ms));
    }
    config
}

/// Tracing filter directive for the CLI (default `info`).
pub fn log_filter() -> String {
    non_empty("CW_LOG").unwrap_or_else(|| "info".to_string())
}

/// Directory for the rolling supervisor log file, when file logging is wanted.
pub fn log_dir() -> Option<PathBuf> {
    non_empty("CW_LOG_DIR").map(PathBuf::from)
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
