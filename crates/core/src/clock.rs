// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time capability injected into breakers and task triggers.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of "now" for cooldown arithmetic (monotonic) and reporting (wall clock).
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;

    /// Wall-clock milliseconds corresponding to a monotonic instant.
    fn epoch_ms_at(&self, instant: Instant) -> u64 {
        let now = self.now();
        let now_ms = self.epoch_ms();
        if instant >= now {
            now_ms.saturating_add(instant.duration_since(now).as_millis() as u64)
        } else {
            now_ms.saturating_sub(now.duration_since(instant).as_millis() as u64)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

/// Manually driven clock. Clones share the same elapsed offset.
#[derive(Clone, Debug)]
pub struct FakeClock {
    origin: Instant,
    origin_epoch_ms: u64,
    elapsed: Arc<Mutex<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at_epoch_ms(1_700_000_000_000)
    }

    /// Start the clock at a fixed wall-clock time.
    pub fn at_epoch_ms(epoch_ms: u64) -> Self {
        Self {
            origin: Instant::now(),
            origin_epoch_ms: epoch_ms,
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }

    fn epoch_ms(&self) -> u64 {
        self.origin_epoch_ms + self.elapsed.lock().as_millis() as u64
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
