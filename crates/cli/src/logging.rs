// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: stderr always, plus a daily-rolling file under `CW_LOG_DIR`.

use std::path::Path;

use cw_supervisor::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "cw.log";

/// Install the global subscriber. The returned guard flushes the file
/// writer when dropped and must outlive every log call.
pub fn init() -> Option<WorkerGuard> {
    let filter = env::log_filter();
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(&filter));

    let (file, guard) = match env::log_dir() {
        Some(dir) => {
            let (layer, guard) = file_layer(&dir, &filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Already initialized (e.g. in tests) is fine
    let _ = tracing_subscriber::registry().with(stderr).with(file).try_init();
    guard
}

fn file_layer<S>(dir: &Path, filter: &str) -> (impl Layer<S>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false).with_filter(env_filter(filter));
    (layer, guard)
}

/// An unparsable directive falls back to `info` rather than silencing output.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
