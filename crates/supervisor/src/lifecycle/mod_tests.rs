// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::time::Duration;

const OVERRIDES: &[&str] = &[
    "CW_REGISTRY_PATH",
    "CW_WORKER_PROGRAM",
    "CW_WORKER_SCRIPT",
    "CW_VEHICLE_BREAKER_THRESHOLD",
    "CW_PUSH_BREAKER_RESET_MS",
];

fn clear_overrides() {
    for key in OVERRIDES {
        std::env::remove_var(key);
    }
}

#[test]
fn state_dir_layout() {
    let config = Config::for_state_dir("/srv/cw");
    assert_eq!(config.registry_path, PathBuf::from("/srv/cw/charge_tasks.json"));
    assert_eq!(config.lock_path, PathBuf::from("/srv/cw/registry.lock"));
    assert_eq!(config.logs_dir, PathBuf::from("/srv/cw/logs"));
    assert_eq!(config.worker.program, PathBuf::from("node"));
    assert_eq!(config.vehicle_breaker, BreakerConfig::vehicle_data());
    assert_eq!(config.push_breaker, BreakerConfig::push());
}

#[test]
#[serial]
fn load_in_applies_environment_overrides() {
    clear_overrides();
    std::env::set_var("CW_REGISTRY_PATH", "/data/tasks.json");
    std::env::set_var("CW_WORKER_PROGRAM", "/usr/local/bin/worker");
    std::env::set_var("CW_WORKER_SCRIPT", "");
    std::env::set_var("CW_VEHICLE_BREAKER_THRESHOLD", "8");
    std::env::set_var("CW_PUSH_BREAKER_RESET_MS", "2500");

    let config = Config::load_in("/srv/cw");
    assert_eq!(config.registry_path, PathBuf::from("/data/tasks.json"));
    assert_eq!(config.lock_path, PathBuf::from("/srv/cw/registry.lock"));
    assert_eq!(config.worker.program, PathBuf::from("/usr/local/bin/worker"));
    assert!(config.worker.args.is_empty());
    assert_eq!(config.vehicle_breaker.failure_threshold, 8);
    assert_eq!(config.push_breaker.reset_timeout, Duration::from_millis(2_500));
    clear_overrides();
}

#[test]
fn guards_use_configured_breakers() {
    let mut config = Config::for_state_dir("/srv/cw");
    config.push_breaker = BreakerConfig::push().with_failure_threshold(1);

    let guards = config.guards();
    assert_eq!(guards.vehicle_data.config().failure_threshold, 5);
    assert_eq!(guards.push.config().failure_threshold, 1);
}
