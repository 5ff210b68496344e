//! Help and version output

use crate::prelude::*;

#[test]
fn cw_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn cw_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("resume")
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status")
        .stdout_has("list")
        .stdout_has("set-detail")
        .stdout_has("decode-payload");
}

#[test]
fn cw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn cw_unknown_command_fails() {
    cli().args(&["bogus"]).fails_with(2).stderr_has("Usage:");
}
