// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration, construction, and crash recovery.

mod resume;

pub use resume::{LaunchFailure, ResumeReport, ResumedTask};

use std::path::{Path, PathBuf};

use cw_core::{BreakerConfig, Clock, DependencyGuards, SystemClock};
use cw_storage::{Registry, RegistryError, RegistryStore};
use thiserror::Error;

use crate::adapters::{NixSignaller, ProcessLauncher, ProcessSignaller, WorkerCommand, WorkerLauncher};
use crate::env;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory (set CW_STATE_DIR or HOME)")]
    NoStateDir,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Supervisor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/cw)
    pub state_dir: PathBuf,
    /// Task registry file
    pub registry_path: PathBuf,
    /// Lock file serializing registry mutations and resume passes
    pub lock_path: PathBuf,
    /// Per-VIN worker output logs
    pub logs_dir: PathBuf,
    /// Worker command line, before the payload argument
    pub worker: WorkerCommand,
    pub vehicle_breaker: BreakerConfig,
    pub push_breaker: BreakerConfig,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::load_in(env::state_dir()?))
    }

    /// Environment overrides applied to an explicit state directory.
    pub fn load_in(state_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::for_state_dir(state_dir);
        if let Some(path) = env::registry_path() {
            config.registry_path = path;
        }
        config.worker = env::worker_command();
        config.vehicle_breaker = env::vehicle_breaker();
        config.push_breaker = env::push_breaker();
        config
    }

    /// Default layout under `state_dir` with the stock worker command.
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            registry_path: state_dir.join(env::REGISTRY_FILE),
            lock_path: state_dir.join("registry.lock"),
            logs_dir: state_dir.join("logs"),
            worker: WorkerCommand::new("node").arg(env::DEFAULT_WORKER_SCRIPT),
            vehicle_breaker: BreakerConfig::vehicle_data(),
            push_breaker: BreakerConfig::push(),
            state_dir,
        }
    }

    /// Breakers for the outbound dependencies, built from this configuration.
    pub fn guards(&self) -> DependencyGuards {
        DependencyGuards::with_configs(self.vehicle_breaker, self.push_breaker, SystemClock)
    }
}

/// Owns the registry and the adapters used to launch and stop workers.
pub struct Supervisor<L = ProcessLauncher, S = NixSignaller, C = SystemClock> {
    store: RegistryStore,
    lock_path: PathBuf,
    launcher: L,
    signaller: S,
    clock: C,
}

impl Supervisor {
    /// Supervisor backed by real processes and the system clock.
    pub fn from_config(config: &Config) -> Self {
        let launcher =
            ProcessLauncher::new(config.worker.clone()).with_logs_dir(config.logs_dir.clone());
        Self::new(config, launcher, NixSignaller, SystemClock)
    }
}

impl<L: WorkerLauncher, S: ProcessSignaller, C: Clock> Supervisor<L, S, C> {
    pub fn new(config: &Config, launcher: L, signaller: S, clock: C) -> Self {
        Self {
            store: RegistryStore::new(config.registry_path.clone()),
            lock_path: config.lock_path.clone(),
            launcher,
            signaller,
            clock,
        }
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Read the persisted registry; an absent file is an empty registry.
    pub fn load_registry(&self) -> Result<Registry, LifecycleError> {
        Ok(self.store.load()?)
    }

    pub(crate) fn launcher(&self) -> &L {
        &self.launcher
    }

    pub(crate) fn signaller(&self) -> &S {
        &self.signaller
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
