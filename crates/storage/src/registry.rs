// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry file persistence.
//!
//! The registry is a single JSON object keyed by VIN, read and written as a
//! whole. Writes go to a sibling temp file that is fsynced and renamed over
//! the original, so a reader sees either the old or the new snapshot.

use cw_core::{TaskRecord, Vin};
use indexmap::IndexMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// VIN to task record, in file order.
pub type Registry = IndexMap<Vin, TaskRecord>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed registry {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("registry is locked by another process ({})", .0.display())]
    Locked(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole registry. A missing file reads as empty; anything else
    /// that prevents a full parse is an error.
    pub fn load(&self) -> Result<Registry, RegistryError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "registry file absent, treating as empty");
                return Ok(Registry::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data)
            .map_err(|source| RegistryError::Parse { path: self.path.clone(), source })
    }

    /// Atomically replace the registry with `registry`.
    pub fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(registry).map_err(RegistryError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.tmp_path();
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), tasks = registry.len(), "registry saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
