// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process launch.
//!
//! A worker is an independent OS process started as
//! `<program> [args...] <payload>`, where `<payload>` is the only task input.
//! Launches are fire-and-forget: the exit status is logged by a detached
//! waiter task and never reported back to the caller.

use async_trait::async_trait;
use cw_core::{PayloadError, TaskPayload, Vin};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn worker for {vin}: {source}")]
    Spawn {
        vin: Vin,
        #[source]
        source: std::io::Error,
    },
    #[error("worker for {0} exited before reporting a pid")]
    NoPid(Vin),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Fixed part of the worker command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl std::fmt::Display for WorkerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Starts workers for tasks.
#[async_trait]
pub trait WorkerLauncher: Clone + Send + Sync + 'static {
    /// Spawn a worker for `vin` and return its process id.
    async fn launch(&self, vin: &Vin, payload: &TaskPayload) -> Result<u32, LaunchError>;
}

/// Launches workers as child processes.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    command: WorkerCommand,
    logs_dir: Option<PathBuf>,
}

impl ProcessLauncher {
    pub fn new(command: WorkerCommand) -> Self {
        Self { command, logs_dir: None }
    }

    /// Append each worker's stdout/stderr to `<dir>/<vin>.log`.
    pub fn with_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &WorkerCommand {
        &self.command
    }

    fn output_for(&self, vin: &Vin) -> (Stdio, Stdio) {
        let Some(dir) = &self.logs_dir else {
            return (Stdio::null(), Stdio::null());
        };
        match open_worker_log(dir, vin) {
            Ok((out, err)) => (Stdio::from(out), Stdio::from(err)),
            Err(e) => {
                tracing::warn!(%vin, error = %e, "cannot open worker log, discarding output");
                (Stdio::null(), Stdio::null())
            }
        }
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn launch(&self, vin: &Vin, payload: &TaskPayload) -> Result<u32, LaunchError> {
        let (stdout, stderr) = self.output_for(vin);
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(payload.as_str())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| LaunchError::Spawn { vin: vin.clone(), source })?;

        let pid = child.id().ok_or_else(|| LaunchError::NoPid(vin.clone()))?;
        tracing::debug!(%vin, pid, command = %self.command, "worker spawned");

        let vin = vin.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => tracing::info!(%vin, pid, "worker exited"),
                Ok(status) => tracing::warn!(%vin, pid, %status, "worker exited with failure"),
                Err(e) => tracing::error!(%vin, pid, error = %e, "failed to wait on worker"),
            }
        });

        Ok(pid)
    }
}

/// Path of the log file a worker's output is appended to.
pub fn worker_log_path(dir: &Path, vin: &Vin) -> PathBuf {
    let name: String =
        vin.as_str().chars().map(|c| if c == '/' || c == '\\' { '_' } else { c }).collect();
    dir.join(format!("{name}.log"))
}

fn open_worker_log(dir: &Path, vin: &Vin) -> std::io::Result<(File, File)> {
    std::fs::create_dir_all(dir)?;
    let out = OpenOptions::new().create(true).append(true).open(worker_log_path(dir, vin))?;
    let err = out.try_clone()?;
    Ok((out, err))
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{LaunchError, WorkerLauncher};
    use async_trait::async_trait;
    use cw_core::{TaskPayload, Vin};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// Recorded launch
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LaunchCall {
        pub vin: Vin,
        pub payload: String,
    }

    struct FakeLauncherState {
        calls: Vec<LaunchCall>,
        next_pid: u32,
        failing: HashSet<Vin>,
    }

    /// Fake launcher handing out sequential pids starting at 4000.
    #[derive(Clone)]
    pub struct FakeLauncher {
        inner: Arc<Mutex<FakeLauncherState>>,
    }

    impl Default for FakeLauncher {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeLauncherState {
                    calls: Vec::new(),
                    next_pid: 4000,
                    failing: HashSet::new(),
                })),
            }
        }
    }

    impl FakeLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every launch for `vin` fail with a spawn error.
        pub fn fail_for(&self, vin: impl Into<Vin>) {
            self.inner.lock().failing.insert(vin.into());
        }

        /// All launch attempts, including failed ones
        pub fn calls(&self) -> Vec<LaunchCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl WorkerLauncher for FakeLauncher {
        async fn launch(&self, vin: &Vin, payload: &TaskPayload) -> Result<u32, LaunchError> {
            let mut state = self.inner.lock();
            state.calls.push(LaunchCall { vin: vin.clone(), payload: payload.to_string() });
            if state.failing.contains(vin) {
                return Err(LaunchError::Spawn {
                    vin: vin.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such worker"),
                });
            }
            let pid = state.next_pid;
            state.next_pid += 1;
            Ok(pid)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, LaunchCall};

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
