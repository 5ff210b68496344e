// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cw_core::Vin;

#[yare::parameterized(
    already_running = { TaskError::AlreadyRunning(Vin::from("VIN1")), Some(EXIT_CONFLICT) },
    not_found       = { TaskError::NotFound(Vin::from("VIN1")), Some(EXIT_NOT_FOUND) },
    missing_field   = { TaskError::MissingField("vin"), None },
)]
fn task_errors_map_to_exit_codes(err: TaskError, code: Option<i32>) {
    let message = err.to_string();
    let mapped = from_task_error(err);
    let exit = mapped.downcast_ref::<ExitError>();
    assert_eq!(exit.map(|e| e.code), code);
    assert_eq!(mapped.to_string(), message);
}

#[test]
fn locked_registry_is_a_conflict() {
    let err = LifecycleError::Registry(RegistryError::Locked("/tmp/registry.lock".into()));
    let mapped = from_lifecycle_error(err);
    let exit = mapped.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, EXIT_CONFLICT);
    assert!(exit.message.contains("/tmp/registry.lock"));
}

#[test]
fn other_lifecycle_errors_exit_generically() {
    let mapped = from_lifecycle_error(LifecycleError::NoStateDir);
    assert!(mapped.downcast_ref::<ExitError>().is_none());
}
