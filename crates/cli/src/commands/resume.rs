// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume command handler

use anyhow::Result;
use cw_supervisor::{Config, ResumeReport, Supervisor};

use crate::color;
use crate::exit_error::from_lifecycle_error;
use crate::output::{print_json, OutputFormat};

pub async fn handle(config: &Config, format: OutputFormat) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let report = supervisor.resume_in_flight_tasks().await.map_err(from_lifecycle_error)?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_report(&report);
            Ok(())
        }
    }
}

fn print_report(report: &ResumeReport) {
    if report.resumed.is_empty() && report.failed.is_empty() {
        println!("No tasks to resume");
        return;
    }
    for task in &report.resumed {
        println!("Resumed {} (pid {})", color::header(task.vin.as_str()), task.pid);
    }
    for failure in &report.failed {
        println!("Failed {}: {}", color::header(failure.vin.as_str()), color::muted(&failure.error));
    }
    println!(
        "\n{} resumed, {} failed, {} skipped",
        report.resumed.len(),
        report.failed.len(),
        report.skipped.len()
    );
}
