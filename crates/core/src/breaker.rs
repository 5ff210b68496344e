// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit breaker guarding outbound calls to a flaky dependency.
//!
//! ```text
//! CLOSED --(failures >= threshold)--> OPEN
//! OPEN   --(cooldown elapsed, next call)--> HALF_OPEN
//! HALF_OPEN --(3 consecutive successes)--> CLOSED
//! HALF_OPEN --(any failure)--> OPEN
//! ```
//!
//! One breaker exists per guarded dependency and is shared by handle. State
//! lives behind a mutex that is taken before and after the wrapped operation,
//! never across its await point, so concurrent callers serialize their
//! transitions in the order they observe the counters.

use crate::clock::{Clock, SystemClock};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Consecutive half-open successes needed to close the breaker.
pub const HALF_OPEN_SUCCESS_THRESHOLD: u32 = 3;

const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MONITORING_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakerState {
    /// Calls pass through
    Closed,
    /// Calls fail fast until the cooldown elapses
    Open,
    /// Trial traffic allowed to detect recovery
    HalfOpen,
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BreakerState::Closed => "CLOSED",
            BreakerState::Open => "OPEN",
            BreakerState::HalfOpen => "HALF_OPEN",
        })
    }
}

/// Thresholds for one guarded dependency.
///
/// Serialized with millisecond durations under the keys `failureThreshold`,
/// `resetTimeout` and `monitoringPeriod`. Missing or zero values fall back to
/// the vehicle-data defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBreakerConfig", into = "RawBreakerConfig")]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
    /// Advisory only; transitions do not consult it.
    pub monitoring_period: Duration,
}

impl BreakerConfig {
    pub fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self::from(RawBreakerConfig {
            failure_threshold: Some(failure_threshold),
            reset_timeout: Some(reset_timeout.as_millis() as u64),
            monitoring_period: None,
        })
    }

    /// Preset for the vehicle telemetry API.
    pub fn vehicle_data() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
            monitoring_period: DEFAULT_MONITORING_PERIOD,
        }
    }

    /// Preset for the push-notification gateway.
    pub fn push() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
            monitoring_period: Duration::from_secs(5),
        }
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        if threshold > 0 {
            self.failure_threshold = threshold;
        }
        self
    }

    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.reset_timeout = timeout;
        }
        self
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self::vehicle_data()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBreakerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reset_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monitoring_period: Option<u64>,
}

impl From<RawBreakerConfig> for BreakerConfig {
    fn from(raw: RawBreakerConfig) -> Self {
        let nonzero_ms = |v: Option<u64>| v.filter(|ms| *ms > 0).map(Duration::from_millis);
        Self {
            failure_threshold: raw
                .failure_threshold
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_FAILURE_THRESHOLD),
            reset_timeout: nonzero_ms(raw.reset_timeout).unwrap_or(DEFAULT_RESET_TIMEOUT),
            monitoring_period: nonzero_ms(raw.monitoring_period)
                .unwrap_or(DEFAULT_MONITORING_PERIOD),
        }
    }
}

impl From<BreakerConfig> for RawBreakerConfig {
    fn from(config: BreakerConfig) -> Self {
        Self {
            failure_threshold: Some(config.failure_threshold),
            reset_timeout: Some(config.reset_timeout.as_millis() as u64),
            monitoring_period: Some(config.monitoring_period.as_millis() as u64),
        }
    }
}

/// Error returned by [`CircuitBreaker::execute`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// Fast-fail: the dependency is presumed unhealthy and the operation was not invoked.
    #[error("{label}: circuit breaker open, retry in {}s", round_secs(.remaining))]
    Open { label: String, remaining: Duration },
    /// The wrapped operation failed; the error is passed through untouched.
    #[error("{0}")]
    Operation(E),
}

impl<E> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }

    /// The underlying operation error, if the operation ran and failed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Operation(e) => Some(e),
            BreakerError::Open { .. } => None,
        }
    }
}

fn round_secs(d: &Duration) -> u64 {
    (d.as_millis() as u64 + 500) / 1000
}

/// Point-in-time view of a breaker, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakerStatus {
    pub state: BreakerState,
    pub failure_count: u32,
    pub success_count: u32,
    /// Epoch milliseconds of the most recent failure
    pub last_failure_time: Option<u64>,
    /// Epoch milliseconds after which an OPEN breaker admits a trial call
    pub next_attempt: u64,
    pub is_available: bool,
}

#[derive(Debug)]
struct Counters {
    state: BreakerState,
    failure_count: u32,
    success_count: u32,
    last_failure: Option<Instant>,
    next_attempt: Instant,
}

pub struct CircuitBreaker<C: Clock = SystemClock> {
    config: BreakerConfig,
    clock: C,
    counters: Mutex<Counters>,
}

impl CircuitBreaker<SystemClock> {
    pub fn new(config: BreakerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    pub fn with_clock(config: BreakerConfig, clock: C) -> Self {
        let now = clock.now();
        Self {
            config,
            clock,
            counters: Mutex::new(Counters {
                state: BreakerState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure: None,
                next_attempt: now,
            }),
        }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    pub fn state(&self) -> BreakerState {
        self.counters.lock().state
    }

    /// Run `operation` under the breaker.
    ///
    /// Fails with [`BreakerError::Open`] without invoking `operation` while the
    /// breaker is open and cooling down. Any error from `operation` is
    /// recorded and returned as [`BreakerError::Operation`]. No retries and no
    /// timeout are applied here.
    pub async fn execute<T, E, F, Fut>(&self, operation: F, label: &str) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit(label)?;

        match operation().await {
            Ok(value) => {
                self.on_success(label);
                Ok(value)
            }
            Err(e) => {
                self.on_failure(label);
                Err(BreakerError::Operation(e))
            }
        }
    }

    fn admit<E>(&self, label: &str) -> Result<(), BreakerError<E>> {
        let mut c = self.counters.lock();
        if c.state != BreakerState::Open {
            return Ok(());
        }

        let now = self.clock.now();
        if now < c.next_attempt {
            let remaining = c.next_attempt.duration_since(now);
            debug!(label, remaining_ms = remaining.as_millis() as u64, "circuit open, failing fast");
            return Err(BreakerError::Open { label: label.to_string(), remaining });
        }

        c.state = BreakerState::HalfOpen;
        c.success_count = 0;
        info!(label, "circuit half-open, trying dependency");
        Ok(())
    }

    fn on_success(&self, label: &str) {
        let mut c = self.counters.lock();
        c.failure_count = 0;

        if c.state == BreakerState::HalfOpen {
            c.success_count += 1;
            debug!(label, success_count = c.success_count, "half-open trial call succeeded");
            if c.success_count >= HALF_OPEN_SUCCESS_THRESHOLD {
                c.state = BreakerState::Closed;
                c.success_count = 0;
                info!(label, "circuit closed, dependency recovered");
            }
        }
    }

    fn on_failure(&self, label: &str) {
        let mut c = self.counters.lock();
        let now = self.clock.now();
        c.failure_count = c.failure_count.saturating_add(1);
        c.last_failure = Some(now);

        match c.state {
            BreakerState::HalfOpen => {
                c.state = BreakerState::Open;
                c.next_attempt = now + self.config.reset_timeout;
                warn!(label, "half-open trial call failed, circuit re-opened");
            }
            BreakerState::Closed if c.failure_count >= self.config.failure_threshold => {
                c.state = BreakerState::Open;
                c.next_attempt = now + self.config.reset_timeout;
                warn!(
                    label,
                    failure_count = c.failure_count,
                    reset_secs = self.config.reset_timeout.as_secs(),
                    "failure threshold reached, circuit opened"
                );
            }
            // A call admitted before the breaker opened settled late; the
            // cooldown is not extended.
            BreakerState::Open | BreakerState::Closed => {}
        }
    }

    pub fn status(&self) -> BreakerStatus {
        let c = self.counters.lock();
        let now = self.clock.now();
        BreakerStatus {
            state: c.state,
            failure_count: c.failure_count,
            success_count: c.success_count,
            last_failure_time: c.last_failure.map(|t| self.clock.epoch_ms_at(t)),
            next_attempt: self.clock.epoch_ms_at(c.next_attempt),
            is_available: match c.state {
                BreakerState::Closed => true,
                BreakerState::Open => now >= c.next_attempt,
                BreakerState::HalfOpen => false,
            },
        }
    }

    pub fn is_available(&self) -> bool {
        self.status().is_available
    }

    /// Force the breaker closed and clear all counters.
    pub fn reset(&self) {
        let mut c = self.counters.lock();
        c.state = BreakerState::Closed;
        c.failure_count = 0;
        c.success_count = 0;
        c.last_failure = None;
        c.next_attempt = self.clock.now();
        info!("circuit manually reset");
    }

    /// Guard a vehicle telemetry fetch, labelled by VIN.
    pub async fn execute_vehicle_fetch<T, E, F, Fut>(
        &self,
        operation: F,
        vin: &str,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute(operation, &format!("vehicle-data[{vin}]")).await
    }

    /// Guard a push delivery, labelled by a device-token prefix.
    pub async fn execute_push<T, E, F, Fut>(
        &self,
        operation: F,
        device_token: &str,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let prefix: String = device_token.chars().take(8).collect();
        self.execute(operation, &format!("push[{prefix}...]")).await
    }
}

impl<C: Clock> std::fmt::Debug for CircuitBreaker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("counters", &*self.counters.lock())
            .finish()
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
