// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for the OS surfaces the supervisor touches.

mod launcher;
mod signal;

pub use launcher::{worker_log_path, LaunchError, ProcessLauncher, WorkerCommand, WorkerLauncher};
pub use signal::{NixSignaller, ProcessSignaller, SignalError};

#[cfg(any(test, feature = "test-support"))]
pub use launcher::{FakeLauncher, LaunchCall};
#[cfg(any(test, feature = "test-support"))]
pub use signal::FakeSignaller;
