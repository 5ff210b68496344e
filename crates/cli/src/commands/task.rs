// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task trigger command handlers

use anyhow::{Context, Result};
use cw_core::{TaskDetails, Vin};
use cw_supervisor::{worker_log_path, Config, Supervisor};
use serde_json::{json, Value};

use crate::color;
use crate::exit_error::{from_task_error, ExitError, EXIT_NOT_FOUND};
use crate::output::{print_json, task_line, OutputFormat};

pub async fn start(config: &Config, details: &str, format: OutputFormat) -> Result<()> {
    let details: TaskDetails =
        serde_json::from_str(details).context("--details must be a JSON object")?;
    let supervisor = Supervisor::from_config(config);
    let vin = details.vin();
    let pid = supervisor.start_task(details).await.map_err(from_task_error)?;

    match format {
        OutputFormat::Json => print_json(&json!({ "vin": vin, "pid": pid })),
        OutputFormat::Text => {
            // start_task has already rejected details without a vin
            if let Some(vin) = vin {
                println!("Started {} (pid {})", color::header(vin.as_str()), pid);
                let log = worker_log_path(&config.logs_dir, &vin);
                println!("{}", color::muted(&format!("worker log: {}", log.display())));
            }
            Ok(())
        }
    }
}

pub fn stop(config: &Config, vin: &str, format: OutputFormat) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let stopped = supervisor.stop_task(&Vin::from(vin)).map_err(from_task_error)?;

    match format {
        OutputFormat::Json => print_json(&stopped),
        OutputFormat::Text => {
            if stopped.signalled {
                println!("Stopped {} (pid {})", color::header(vin), stopped.pid);
            } else {
                println!(
                    "Removed {} {}",
                    color::header(vin),
                    color::muted(&format!("(pid {} could not be signalled)", stopped.pid))
                );
            }
            Ok(())
        }
    }
}

pub fn status(config: &Config, vin: &str, format: OutputFormat) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let vin = Vin::from(vin);
    let record = supervisor.task_status(&vin).map_err(from_task_error)?;

    match (format, record) {
        (OutputFormat::Json, record) => print_json(&record),
        (OutputFormat::Text, Some(record)) => {
            println!("{}", task_line(&vin, &record));
            Ok(())
        }
        (OutputFormat::Text, None) => {
            Err(ExitError::new(EXIT_NOT_FOUND, format!("no running task for {vin}")).into())
        }
    }
}

pub fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let registry = supervisor.list_tasks().map_err(from_task_error)?;

    match format {
        OutputFormat::Json => print_json(&registry),
        OutputFormat::Text => {
            if registry.is_empty() {
                println!("No tasks");
            }
            for (vin, record) in &registry {
                println!("{}", task_line(vin, record));
            }
            Ok(())
        }
    }
}

pub fn set_detail(
    config: &Config,
    vin: &str,
    key: &str,
    value: &str,
    format: OutputFormat,
) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let value = parse_value(value);
    supervisor
        .update_task_detail(&Vin::from(vin), key, value.clone())
        .map_err(from_task_error)?;

    match format {
        OutputFormat::Json => print_json(&json!({ "vin": vin, "key": key, "value": value })),
        OutputFormat::Text => {
            println!("Updated {} {}", color::header(vin), color::muted(key));
            Ok(())
        }
    }
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
