// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decode a worker payload argument

use anyhow::{Context, Result};
use cw_core::TaskPayload;

use crate::output::{print_json, OutputFormat};

pub fn decode(payload: &str, format: OutputFormat) -> Result<()> {
    let details = TaskPayload::decode(payload.trim()).context("invalid worker payload")?;
    match format {
        OutputFormat::Json => print_json(&details),
        OutputFormat::Text => {
            for (key, value) in details.as_map() {
                match value.as_str() {
                    Some(s) => println!("{key}: {s}"),
                    None => println!("{key}: {value}"),
                }
            }
            Ok(())
        }
    }
}
