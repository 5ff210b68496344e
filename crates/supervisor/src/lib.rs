// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Task supervisor: worker launch, crash resume, and task triggers.

pub mod adapters;
pub mod env;
pub mod lifecycle;
mod tasks;

#[cfg(test)]
mod test_helpers;

pub use adapters::{
    worker_log_path, LaunchError, NixSignaller, ProcessLauncher, ProcessSignaller, SignalError, WorkerCommand,
    WorkerLauncher,
};
#[cfg(any(test, feature = "test-support"))]
pub use adapters::{FakeLauncher, FakeSignaller, LaunchCall};
pub use lifecycle::{Config, LaunchFailure, LifecycleError, ResumeReport, ResumedTask, Supervisor};
pub use tasks::{StoppedTask, TaskError};
