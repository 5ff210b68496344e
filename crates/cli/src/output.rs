// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use cw_core::{TaskRecord, Vin};
use serde::Serialize;

use crate::color;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary of a registry record: VIN, status, pid, start time, mode.
pub fn task_line(vin: &Vin, record: &TaskRecord) -> String {
    let label = record.status_label().unwrap_or("UNKNOWN");
    let mut line = format!("{}  {}", color::header(vin.as_str()), color::status(label));
    match record.pid() {
        Some(pid) => line.push_str(&format!("  pid {pid}")),
        None => line.push_str(&format!("  {}", color::muted("no pid"))),
    }
    if let Some(started) = record.start_time() {
        line.push_str(&format!("  {}", color::muted(&format!("started {started}"))));
    }
    let details = record.task_details();
    if let Some(mode) = details.as_ref().and_then(|d| d.str_field("monitoringMode")) {
        line.push_str(&format!("  {}", color::muted(mode)));
    }
    line
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
