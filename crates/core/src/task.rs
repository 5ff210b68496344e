// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task registry records: one per monitored vehicle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;

/// Vehicle identifier, the registry's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vin(pub String);

impl Vin {
    pub fn new(vin: impl Into<String>) -> Self {
        Self(vin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Vin {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Vin {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for Vin {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Vin {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Worker launched, waiting for the workflow to get going
    Preparing,
    /// Workflow in progress. Older workers wrote `CHARGING`.
    #[serde(alias = "CHARGING")]
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Classify a stored status label. Unrecognized labels are `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PREPARING" => Some(TaskStatus::Preparing),
            "RUNNING" | "CHARGING" => Some(TaskStatus::Running),
            "COMPLETED" => Some(TaskStatus::Completed),
            "FAILED" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Preparing => "PREPARING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        }
    }

    /// PREPARING and RUNNING tasks are eligible for resume.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TaskStatus::Preparing | TaskStatus::Running)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque worker parameters. Only the worker interprets the fields; key
/// order is preserved so the bundle round-trips exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDetails(pub Map<String, Value>);

impl TaskDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Non-empty string field, if present.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn vin(&self) -> Option<Vin> {
        self.str_field("vin").map(Vin::from)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TaskDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

const PID: &str = "pid";
const STATUS: &str = "status";
const TASK_DETAILS: &str = "taskDetails";
const START_TIME: &str = "startTime";
const LATEST_VEHICLE_DATA: &str = "latestVehicleData";

/// A registry entry, held as the JSON object it was read from.
///
/// Keys keep their stored order and spelling. The supervisor only ever
/// rewrites `pid` (in place) and keys inside `taskDetails`; `status` and
/// whatever a worker adds pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRecord(Map<String, Value>);

impl TaskRecord {
    /// Record for a freshly launched worker, keyed in launch order:
    /// `pid`, `status`, `startTime`, `taskDetails`, `latestVehicleData`.
    pub fn started(pid: u32, start_time: impl Into<String>, details: TaskDetails) -> Self {
        let mut map = Map::new();
        map.insert(PID.to_string(), Value::from(pid));
        map.insert(STATUS.to_string(), Value::from(TaskStatus::Preparing.as_str()));
        map.insert(START_TIME.to_string(), Value::String(start_time.into()));
        map.insert(TASK_DETAILS.to_string(), Value::Object(details.0));
        map.insert(LATEST_VEHICLE_DATA.to_string(), Value::Null);
        Self(map)
    }

    /// Most recently spawned worker. Advisory; never checked for liveness.
    pub fn pid(&self) -> Option<u32> {
        self.0.get(PID).and_then(Value::as_u64).and_then(|p| u32::try_from(p).ok())
    }

    /// Overwrite `pid` where it stands, or append it if absent.
    pub fn set_pid(&mut self, pid: u32) {
        self.0.insert(PID.to_string(), Value::from(pid));
    }

    /// The stored status label, verbatim.
    pub fn status_label(&self) -> Option<&str> {
        self.0.get(STATUS).and_then(Value::as_str)
    }

    /// Classified status; `None` when missing or unrecognized, which the
    /// supervisor treats as terminal.
    pub fn status(&self) -> Option<TaskStatus> {
        self.status_label().and_then(TaskStatus::from_label)
    }

    pub fn is_in_flight(&self) -> bool {
        self.status().is_some_and(|s| s.is_in_flight())
    }

    pub fn task_details(&self) -> Option<TaskDetails> {
        self.0.get(TASK_DETAILS).and_then(Value::as_object).cloned().map(TaskDetails)
    }

    /// In flight and carrying the parameters needed to relaunch.
    pub fn is_resumable(&self) -> bool {
        self.is_in_flight() && self.0.get(TASK_DETAILS).is_some_and(Value::is_object)
    }

    /// Set one key inside `taskDetails`, creating the object if needed.
    pub fn set_detail(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let details =
            self.0.entry(TASK_DETAILS).or_insert_with(|| Value::Object(Map::new()));
        if !details.is_object() {
            *details = Value::Object(Map::new());
        }
        details.as_object_mut().and_then(|map| map.insert(key.into(), value))
    }

    pub fn start_time(&self) -> Option<&str> {
        self.0.get(START_TIME).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TaskRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
