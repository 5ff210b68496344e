//! Startup resume

use crate::prelude::*;

#[test]
fn resume_with_no_registry_is_a_no_op() {
    let state = State::empty();
    state.cw().args(&["resume"]).passes().stdout_has("No tasks to resume");
    assert!(state.registry_text().is_none());
}

#[test]
fn resume_relaunches_in_flight_tasks_and_rewrites_pids() {
    let state = State::empty();
    state.write_registry(&json!({
        "VIN1": { "pid": 1, "status": "RUNNING", "taskDetails": { "vin": "VIN1", "monitoringMode": "time" } },
        "VIN2": { "pid": 2, "status": "COMPLETED", "taskDetails": { "vin": "VIN2" } }
    }));

    let run = state.cw().args(&["-o", "json", "resume"]).passes();
    let report = run.stdout_json();
    assert_eq!(report["resumed"].as_array().unwrap().len(), 1);
    assert_eq!(report["skipped"], json!(["VIN2"]));
    assert_eq!(report["persisted"], json!(true));

    let registry = state.registry();
    let new_pid = report["resumed"][0]["pid"].clone();
    assert_eq!(registry["VIN1"]["pid"], new_pid);
    assert_ne!(registry["VIN1"]["pid"], json!(1));
    assert_eq!(registry["VIN1"]["status"], "RUNNING");
    assert_eq!(registry["VIN2"]["pid"], 2);
}

#[test]
fn resume_leaves_terminal_only_registry_untouched() {
    let state = State::empty();
    state.write_registry(&json!({
        "VIN1": { "pid": 1, "status": "FAILED", "taskDetails": { "vin": "VIN1" } }
    }));
    let before = state.registry_text();

    state.cw().args(&["resume"]).passes().stdout_has("No tasks to resume");
    assert_eq!(state.registry_text(), before);
}

#[test]
fn resume_with_corrupt_registry_fails() {
    let state = State::empty();
    std::fs::write(state.registry_path(), "{not json").unwrap();

    state.cw().args(&["resume"]).fails_with(1).stderr_has("charge_tasks.json");
    assert_eq!(state.registry_text().as_deref(), Some("{not json"));
}
