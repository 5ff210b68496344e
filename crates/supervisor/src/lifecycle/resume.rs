// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup resume of tasks left in flight by an unclean exit.
//!
//! One synchronous pass over the registry: every PREPARING/RUNNING record
//! with task details gets a fresh worker carrying the same payload a first
//! launch would have used, and its `pid` is overwritten in place. Nothing
//! else in the record changes, not even key order or the status label. A
//! launch failure only affects its own VIN. The registry is written back
//! once, and only if some pid changed.

use cw_core::{Clock, TaskDetails, TaskPayload, Vin};
use cw_storage::RegistryLock;
use serde::Serialize;
use tracing::{error, info};

use super::{LifecycleError, Supervisor};
use crate::adapters::{LaunchError, ProcessSignaller, WorkerLauncher};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumedTask {
    pub vin: Vin,
    pub pid: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchFailure {
    pub vin: Vin,
    pub error: String,
}

/// Outcome of a resume pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeReport {
    pub resumed: Vec<ResumedTask>,
    pub failed: Vec<LaunchFailure>,
    /// Terminal records and records without task details
    pub skipped: Vec<Vin>,
    /// Whether the registry file was rewritten
    pub persisted: bool,
}

impl<L: WorkerLauncher, S: ProcessSignaller, C: Clock> Supervisor<L, S, C> {
    /// Relaunch every in-flight task. Holds the registry lock for the whole
    /// pass and fails with `Locked` if another pass or mutation holds it.
    pub async fn resume_in_flight_tasks(&self) -> Result<ResumeReport, LifecycleError> {
        let _lock = RegistryLock::try_acquire(self.lock_path())?;
        info!(registry = %self.store().path().display(), "checking for tasks to resume");

        let mut registry = self.load_registry()?;
        let mut report = ResumeReport::default();

        for (vin, record) in registry.iter_mut() {
            let details = match record.task_details() {
                Some(details) if record.is_in_flight() => details,
                _ => {
                    report.skipped.push(vin.clone());
                    continue;
                }
            };

            let status = record.status_label().unwrap_or_default();
            info!(%vin, status, previous_pid = ?record.pid(), "resuming task");
            match self.relaunch(vin, &details).await {
                Ok(pid) => {
                    info!(%vin, pid, "task relaunched");
                    record.set_pid(pid);
                    report.resumed.push(ResumedTask { vin: vin.clone(), pid });
                }
                Err(e) => {
                    error!(%vin, error = %e, "failed to relaunch task");
                    report.failed.push(LaunchFailure { vin: vin.clone(), error: e.to_string() });
                }
            }
        }

        if report.resumed.is_empty() {
            info!("no tasks needed resuming");
        } else {
            self.store().save(&registry)?;
            report.persisted = true;
            info!(resumed = report.resumed.len(), failed = report.failed.len(), "registry updated");
        }

        Ok(report)
    }

    async fn relaunch(&self, vin: &Vin, details: &TaskDetails) -> Result<u32, LaunchError> {
        let payload = TaskPayload::encode(details)?;
        self.launcher().launch(vin, &payload).await
    }
}

#[cfg(test)]
#[path = "resume_tests.rs"]
mod tests;
