//! Worker payload decoding

use crate::prelude::*;

const PAYLOAD: &str = "eyJ2aW4iOiJWSU4xIiwibW9uaXRvcmluZ01vZGUiOiJ0aW1lIiwidGFyZ2V0VGltZSI6NDV9";

#[test]
fn decode_payload_prints_fields() {
    cli()
        .args(&["decode-payload", PAYLOAD])
        .passes()
        .stdout_has("vin: VIN1")
        .stdout_has("monitoringMode: time")
        .stdout_has("targetTime: 45");
}

#[test]
fn decode_payload_json_preserves_key_order() {
    let run = cli().args(&["-o", "json", "decode-payload", PAYLOAD]).passes();
    let keys: Vec<String> = run.stdout_json().as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["vin", "monitoringMode", "targetTime"]);
}

#[test]
fn decode_payload_rejects_garbage() {
    cli().args(&["decode-payload", "%%%"]).fails_with(1).stderr_has("invalid worker payload");
}
