// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock serializing registry read-modify-write cycles.
//!
//! Held for the lifetime of the guard; the OS releases it when the file
//! handle closes, including on crash.

use crate::registry::RegistryError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RegistryLock {
    file: File,
    path: PathBuf,
}

impl RegistryLock {
    /// Take the lock or fail immediately with [`RegistryError::Locked`].
    pub fn try_acquire(path: &Path) -> Result<Self, RegistryError> {
        let file = open_lock_file(path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(RegistryError::Locked(path.to_path_buf()));
        }
        Self::stamp(file, path)
    }

    /// Block until the lock is available.
    pub fn acquire(path: &Path) -> Result<Self, RegistryError> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()?;
        Self::stamp(file, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Truncate only once held, so a waiting process never wipes the holder's PID.
    fn stamp(mut file: File, path: &Path) -> Result<Self, RegistryError> {
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Self { file, path: path.to_path_buf() })
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> Result<File, RegistryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().write(true).create(true).truncate(false).open(path)?)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
