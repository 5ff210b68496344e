// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry mutations driven by external triggers (start, stop, token
//! refresh) and read-only queries.
//!
//! Every mutation is a whole-file read-modify-write under the registry lock.

use chrono::{DateTime, SecondsFormat, Utc};
use cw_core::{Clock, TaskDetails, TaskPayload, TaskRecord, Vin};
use cw_storage::{Registry, RegistryError, RegistryLock};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::adapters::{LaunchError, ProcessSignaller, WorkerLauncher};
use crate::lifecycle::Supervisor;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("a monitoring task is already running for {0}")]
    AlreadyRunning(Vin),
    #[error("no task found for {0}")]
    NotFound(Vin),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoppedTask {
    pub vin: Vin,
    pub pid: u32,
    /// False when the termination signal could not be delivered
    pub signalled: bool,
}

impl<L: WorkerLauncher, S: ProcessSignaller, C: Clock> Supervisor<L, S, C> {
    /// Launch a worker for a new task and record it as PREPARING.
    ///
    /// `details` must carry `vin` and `monitoringMode`. A terminal record for
    /// the same VIN is replaced; an in-flight one is refused. If the record
    /// cannot be written, the new worker is sent SIGTERM before the error is
    /// returned.
    pub async fn start_task(&self, details: TaskDetails) -> Result<u32, TaskError> {
        let vin = details.vin().ok_or(TaskError::MissingField("vin"))?;
        if details.str_field("monitoringMode").is_none() {
            return Err(TaskError::MissingField("monitoringMode"));
        }

        let _lock = RegistryLock::acquire(self.lock_path())?;
        let mut registry = self.store().load()?;
        if registry.get(&vin).is_some_and(TaskRecord::is_in_flight) {
            return Err(TaskError::AlreadyRunning(vin));
        }

        let payload = TaskPayload::encode(&details).map_err(LaunchError::from)?;
        let pid = self.launcher().launch(&vin, &payload).await?;

        registry.insert(vin.clone(), TaskRecord::started(pid, self.timestamp(), details));
        if let Err(e) = self.store().save(&registry) {
            // No record means nothing could ever stop or resume this worker
            error!(%vin, pid, error = %e, "registry write failed, stopping unrecorded worker");
            if let Err(kill) = self.signaller().terminate(pid) {
                error!(%vin, pid, error = %kill, "unrecorded worker left running");
            }
            return Err(e.into());
        }

        info!(%vin, pid, "task started");
        Ok(pid)
    }

    /// The record for `vin` if its task is in flight.
    ///
    /// An unreadable registry reads as "nothing running".
    pub fn task_status(&self, vin: &Vin) -> Result<Option<TaskRecord>, TaskError> {
        let registry = match self.store().load() {
            Ok(registry) => registry,
            Err(RegistryError::Parse { path, source }) => {
                debug!(path = %path.display(), error = %source, "registry unreadable, no task running");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(registry.get(vin).filter(|r| r.is_in_flight()).cloned())
    }

    /// Signal the task's worker to terminate and remove its record.
    ///
    /// A signal that cannot be delivered (e.g. the worker already exited) is
    /// logged; the record is removed regardless.
    pub fn stop_task(&self, vin: &Vin) -> Result<StoppedTask, TaskError> {
        let _lock = RegistryLock::acquire(self.lock_path())?;
        let mut registry = self.store().load()?;
        let pid = registry
            .get(vin)
            .and_then(TaskRecord::pid)
            .ok_or_else(|| TaskError::NotFound(vin.clone()))?;

        let signalled = match self.signaller().terminate(pid) {
            Ok(()) => {
                info!(%vin, pid, "termination signal sent");
                true
            }
            Err(e) => {
                warn!(%vin, pid, error = %e, "could not signal worker");
                false
            }
        };

        registry.shift_remove(vin);
        self.store().save(&registry)?;
        Ok(StoppedTask { vin: vin.clone(), pid, signalled })
    }

    /// Set one key inside a task's details (e.g. a refreshed push token).
    pub fn update_task_detail(&self, vin: &Vin, key: &str, value: Value) -> Result<(), TaskError> {
        let _lock = RegistryLock::acquire(self.lock_path())?;
        let mut registry = self.store().load()?;
        let record = registry.get_mut(vin).ok_or_else(|| TaskError::NotFound(vin.clone()))?;

        let previous = record.set_detail(key, value);
        self.store().save(&registry)?;

        info!(%vin, key, replaced = previous.is_some(), "task detail updated");
        Ok(())
    }

    /// Every record, in registry order.
    pub fn list_tasks(&self) -> Result<Registry, TaskError> {
        Ok(self.store().load()?)
    }

    fn timestamp(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.clock().epoch_ms() as i64)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
