//! Shared helpers for driving the `cw` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub use serde_json::{json, Value};

/// `cw` with no state directory configured.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new() -> Self {
        let mut cmd = Command::cargo_bin("cw").unwrap();
        cmd.env("NO_COLOR", "1")
            .env("CW_LOG", "warn")
            .env_remove("CW_LOG_DIR")
            .env_remove("CW_REGISTRY_PATH")
            .env_remove("COLOR");
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        RunAssert { assert: self.cmd.assert().success() }
    }

    pub fn fails_with(mut self, code: i32) -> RunAssert {
        RunAssert { assert: self.cmd.assert().code(code) }
    }
}

pub struct RunAssert {
    assert: assert_cmd::assert::Assert,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let out = self.stdout();
        assert!(out.contains(needle), "stdout missing {needle:?}:\n{out}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let err = self.stderr();
        assert!(err.contains(needle), "stderr missing {needle:?}:\n{err}");
        self
    }

    pub fn stdout_json(&self) -> Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}

/// A scratch state directory whose workers are `true`, so launches
/// succeed and exit immediately.
pub struct State {
    dir: TempDir,
}

impl State {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn registry_path(&self) -> PathBuf {
        self.path().join("charge_tasks.json")
    }

    pub fn write_registry(&self, value: &Value) {
        std::fs::write(self.registry_path(), serde_json::to_string_pretty(value).unwrap())
            .unwrap();
    }

    pub fn registry(&self) -> Value {
        serde_json::from_str(&std::fs::read_to_string(self.registry_path()).unwrap()).unwrap()
    }

    pub fn registry_text(&self) -> Option<String> {
        std::fs::read_to_string(self.registry_path()).ok()
    }

    pub fn cw(&self) -> CliBuilder {
        cli()
            .env("CW_STATE_DIR", self.path())
            .env("CW_WORKER_PROGRAM", "true")
            .env("CW_WORKER_SCRIPT", "")
    }
}
