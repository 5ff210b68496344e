// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear(keys: &[&str]) {
    for key in keys {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("CW_STATE_DIR", "/srv/cw");
    std::env::set_var("XDG_STATE_HOME", "/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/srv/cw"));

    std::env::remove_var("CW_STATE_DIR");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/xdg/cw"));
    clear(&["XDG_STATE_HOME"]);
}

#[test]
#[serial]
fn worker_command_uses_program_and_script() {
    std::env::set_var("CW_WORKER_PROGRAM", "/usr/bin/node");
    std::env::set_var("CW_WORKER_SCRIPT", "/opt/worker.js");
    let command = worker_command();
    assert_eq!(command.program, PathBuf::from("/usr/bin/node"));
    assert_eq!(command.args, ["/opt/worker.js"]);

    std::env::set_var("CW_WORKER_SCRIPT", "");
    assert!(worker_command().args.is_empty());
    clear(&["CW_WORKER_PROGRAM", "CW_WORKER_SCRIPT"]);
}

#[test]
#[serial]
fn default_worker_script_is_relative_to_cwd() {
    clear(&["CW_WORKER_PROGRAM", "CW_WORKER_SCRIPT"]);
    let command = worker_command();
    assert_eq!(command.program, PathBuf::from("node"));
    assert!(command.args[0].ends_with(DEFAULT_WORKER_SCRIPT));
}

#[test]
#[serial]
fn breaker_overrides_apply_on_top_of_presets() {
    std::env::set_var("CW_PUSH_BREAKER_THRESHOLD", "7");
    std::env::set_var("CW_PUSH_BREAKER_RESET_MS", "not-a-number");
    let push = push_breaker();
    assert_eq!(push.failure_threshold, 7);
    assert_eq!(push.reset_timeout, Duration::from_secs(30));

    std::env::set_var("CW_VEHICLE_BREAKER_RESET_MS", "1500");
    assert_eq!(vehicle_breaker().reset_timeout, Duration::from_millis(1_500));
    assert_eq!(vehicle_breaker().failure_threshold, 5);
    clear(&[
        "CW_PUSH_BREAKER_THRESHOLD",
        "CW_PUSH_BREAKER_RESET_MS",
        "CW_VEHICLE_BREAKER_RESET_MS",
    ]);
}
