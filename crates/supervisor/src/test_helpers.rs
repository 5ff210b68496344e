// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for supervisor tests.

pub use crate::adapters::{FakeLauncher, FakeSignaller};
pub use crate::lifecycle::{Config, Supervisor};
pub use cw_core::{FakeClock, TaskDetails, TaskRecord, TaskStatus, Vin};
pub use cw_storage::{Registry, RegistryStore};
pub use serde_json::json;
pub use tempfile::{tempdir, TempDir};

pub type TestSupervisor = Supervisor<FakeLauncher, FakeSignaller, FakeClock>;

pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
    pub launcher: FakeLauncher,
    pub signaller: FakeSignaller,
    pub clock: FakeClock,
    pub supervisor: TestSupervisor,
}

pub fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());
    let launcher = FakeLauncher::new();
    let signaller = FakeSignaller::new();
    let clock = FakeClock::at_epoch_ms(1_751_356_800_000);
    let supervisor = Supervisor::new(&config, launcher.clone(), signaller.clone(), clock.clone());
    Fixture { dir, config, launcher, signaller, clock, supervisor }
}

pub fn details(value: serde_json::Value) -> TaskDetails {
    serde_json::from_value(value).unwrap()
}

impl Fixture {
    /// Write raw registry JSON, bypassing the store.
    pub fn write_registry(&self, value: &serde_json::Value) {
        std::fs::create_dir_all(&self.config.state_dir).unwrap();
        let json = serde_json::to_string_pretty(value).unwrap();
        std::fs::write(&self.config.registry_path, json).unwrap();
    }

    pub fn read_registry(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.config.registry_path).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub fn registry_bytes(&self) -> Option<Vec<u8>> {
        std::fs::read(&self.config.registry_path).ok()
    }
}
