// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use cw_storage::RegistryError;
use cw_supervisor::{LifecycleError, TaskError};

/// A task is already in flight for the VIN, or another process holds the
/// registry lock.
pub const EXIT_CONFLICT: i32 = 2;
/// No task exists for the VIN.
pub const EXIT_NOT_FOUND: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Map trigger errors with a dedicated exit code; everything else exits 1.
pub fn from_task_error(err: TaskError) -> anyhow::Error {
    match err {
        TaskError::AlreadyRunning(_) => ExitError::new(EXIT_CONFLICT, err.to_string()).into(),
        TaskError::NotFound(_) => ExitError::new(EXIT_NOT_FOUND, err.to_string()).into(),
        other => other.into(),
    }
}

/// A resume pass refused because the lock is held exits with [`EXIT_CONFLICT`].
pub fn from_lifecycle_error(err: LifecycleError) -> anyhow::Error {
    match err {
        LifecycleError::Registry(RegistryError::Locked(_)) => {
            ExitError::new(EXIT_CONFLICT, err.to_string()).into()
        }
        other => other.into(),
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
