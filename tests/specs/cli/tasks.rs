//! Task triggers from the command line

use crate::prelude::*;

fn start_details(vin: &str) -> String {
    json!({ "vin": vin, "monitoringMode": "time", "targetTime": 30 }).to_string()
}

#[test]
fn list_on_empty_state_dir() {
    let state = State::empty();
    state.cw().args(&["list"]).passes().stdout_has("No tasks");
}

#[test]
fn state_dir_flag_overrides_environment() {
    let state = State::empty();
    let other = State::empty();
    other.write_registry(&json!({ "VIN9": { "status": "COMPLETED" } }));

    state
        .cw()
        .args(&["--state-dir", other.path().to_str().unwrap(), "list"])
        .passes()
        .stdout_has("VIN9");
}

#[test]
fn start_records_preparing_task() {
    let state = State::empty();
    state
        .cw()
        .args(&["start", "--details", &start_details("VIN1")])
        .passes()
        .stdout_has("Started VIN1");

    let record = &state.registry()["VIN1"];
    assert_eq!(record["status"], "PREPARING");
    assert!(record["pid"].as_u64().is_some());
    assert!(record["startTime"].as_str().unwrap().ends_with('Z'));
    assert_eq!(record["latestVehicleData"], Value::Null);
    assert_eq!(record["taskDetails"]["targetTime"], 30);
}

#[test]
fn start_twice_is_a_conflict() {
    let state = State::empty();
    state.cw().args(&["start", "--details", &start_details("VIN1")]).passes();
    state
        .cw()
        .args(&["start", "--details", &start_details("VIN1")])
        .fails_with(2)
        .stderr_has("already running");
}

#[test]
fn start_without_monitoring_mode_fails() {
    let state = State::empty();
    state
        .cw()
        .args(&["start", "--details", r#"{"vin":"VIN1"}"#])
        .fails_with(1)
        .stderr_has("monitoringMode");
    assert!(state.registry_text().is_none());
}

#[test]
fn status_shows_in_flight_task_only() {
    let state = State::empty();
    state.write_registry(&json!({
        "VIN1": { "pid": 77, "status": "CHARGING", "taskDetails": { "vin": "VIN1", "monitoringMode": "range" } },
        "VIN2": { "pid": 78, "status": "COMPLETED", "taskDetails": { "vin": "VIN2" } }
    }));

    state
        .cw()
        .args(&["status", "VIN1"])
        .passes()
        .stdout_has("CHARGING")
        .stdout_has("pid 77")
        .stdout_has("range");
    state.cw().args(&["status", "VIN2"]).fails_with(3);
    let run = state.cw().args(&["-o", "json", "status", "VIN2"]).passes();
    assert_eq!(run.stdout_json(), Value::Null);
}

#[test]
fn set_detail_updates_task_details() {
    let state = State::empty();
    state.write_registry(&json!({
        "VIN1": { "pid": 77, "status": "RUNNING", "taskDetails": { "vin": "VIN1" } }
    }));

    state.cw().args(&["set-detail", "VIN1", "liveActivityPushToken", "abc"]).passes();
    state.cw().args(&["set-detail", "VIN1", "targetTime", "60"]).passes();

    let details = &state.registry()["VIN1"]["taskDetails"];
    assert_eq!(details["liveActivityPushToken"], "abc");
    assert_eq!(details["targetTime"], 60);
    state.cw().args(&["set-detail", "VIN9", "k", "v"]).fails_with(3);
}

#[test]
fn stop_removes_task() {
    let state = State::empty();
    // A pid that cannot belong to a live process
    state.write_registry(&json!({
        "VIN1": { "pid": 2147483646u32, "status": "RUNNING", "taskDetails": { "vin": "VIN1" } },
        "VIN2": { "pid": 2147483645u32, "status": "RUNNING", "taskDetails": { "vin": "VIN2" } }
    }));

    state.cw().args(&["stop", "VIN1"]).passes().stdout_has("VIN1");

    let registry = state.registry();
    assert!(registry.get("VIN1").is_none());
    assert!(registry.get("VIN2").is_some());
    state.cw().args(&["stop", "VIN1"]).fails_with(3);
}

#[test]
fn registry_flag_points_at_alternate_file() {
    let state = State::empty();
    let alt = state.path().join("alt.json");
    std::fs::write(&alt, r#"{"VIN5": {"status": "FAILED"}}"#).unwrap();

    state
        .cw()
        .args(&["--registry", alt.to_str().unwrap(), "list"])
        .passes()
        .stdout_has("VIN5")
        .stdout_has("FAILED");
}
