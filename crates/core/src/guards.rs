// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One breaker per outbound dependency, shared by handle.

use crate::breaker::{BreakerConfig, BreakerStatus, CircuitBreaker};
use crate::clock::{Clock, SystemClock};
use std::sync::Arc;

/// Breakers for the vehicle telemetry API and the push gateway.
///
/// Constructed once per process and cloned into every call site; clones share
/// the same breakers.
#[derive(Debug)]
pub struct DependencyGuards<C: Clock = SystemClock> {
    pub vehicle_data: Arc<CircuitBreaker<C>>,
    pub push: Arc<CircuitBreaker<C>>,
}

impl<C: Clock> Clone for DependencyGuards<C> {
    fn clone(&self) -> Self {
        Self { vehicle_data: Arc::clone(&self.vehicle_data), push: Arc::clone(&self.push) }
    }
}

impl DependencyGuards<SystemClock> {
    pub fn new() -> Self {
        Self::with_configs(BreakerConfig::vehicle_data(), BreakerConfig::push(), SystemClock)
    }
}

impl Default for DependencyGuards<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DependencyGuards<C> {
    pub fn with_configs(vehicle_data: BreakerConfig, push: BreakerConfig, clock: C) -> Self {
        Self {
            vehicle_data: Arc::new(CircuitBreaker::with_clock(vehicle_data, clock.clone())),
            push: Arc::new(CircuitBreaker::with_clock(push, clock)),
        }
    }

    /// Status of both breakers as `(vehicle_data, push)`.
    pub fn statuses(&self) -> (BreakerStatus, BreakerStatus) {
        (self.vehicle_data.status(), self.push.status())
    }

    pub fn reset_all(&self) {
        self.vehicle_data.reset();
        self.push.reset();
    }
}

#[cfg(test)]
#[path = "guards_tests.rs"]
mod tests;
