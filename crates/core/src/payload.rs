// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker transport encoding.
//!
//! A worker receives its parameters as a single positional argument: the
//! task details serialized as compact JSON, then base64-encoded (standard
//! alphabet, padded) so the bundle survives as one command-line token.

use crate::task::TaskDetails;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encoded worker argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPayload(String);

impl TaskPayload {
    pub fn encode(details: &TaskDetails) -> Result<Self, PayloadError> {
        let json = serde_json::to_string(details)?;
        Ok(Self(STANDARD.encode(json)))
    }

    /// Decode a worker argument back into task details.
    pub fn decode(arg: &str) -> Result<TaskDetails, PayloadError> {
        let bytes = STANDARD.decode(arg.trim())?;
        let json = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TaskPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
