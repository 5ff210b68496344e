// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid pid {0}")]
    InvalidPid(u32),
    #[error("failed to signal pid {pid}: {source}")]
    Kill {
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },
}

/// Sends termination requests to worker processes.
pub trait ProcessSignaller: Clone + Send + Sync + 'static {
    fn terminate(&self, pid: u32) -> Result<(), SignalError>;
}

/// SIGTERM via kill(2).
#[derive(Clone, Copy, Debug, Default)]
pub struct NixSignaller;

impl ProcessSignaller for NixSignaller {
    fn terminate(&self, pid: u32) -> Result<(), SignalError> {
        let raw = i32::try_from(pid).ok().filter(|p| *p > 0).ok_or(SignalError::InvalidPid(pid))?;
        kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|source| SignalError::Kill { pid, source })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ProcessSignaller, SignalError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records terminated pids; can be told to fail.
    #[derive(Clone, Default)]
    pub struct FakeSignaller {
        terminated: Arc<Mutex<Vec<u32>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl FakeSignaller {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock() = fail;
        }

        pub fn terminated(&self) -> Vec<u32> {
            self.terminated.lock().clone()
        }
    }

    impl ProcessSignaller for FakeSignaller {
        fn terminate(&self, pid: u32) -> Result<(), SignalError> {
            if *self.fail.lock() {
                return Err(SignalError::Kill { pid, source: nix::errno::Errno::ESRCH });
            }
            self.terminated.lock().push(pid);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSignaller;

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
