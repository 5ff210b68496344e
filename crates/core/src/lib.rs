// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-core: call guarding and task data model for charge-watch

pub mod breaker;
pub mod clock;
pub mod guards;
pub mod payload;
pub mod task;

pub use breaker::{BreakerConfig, BreakerError, BreakerState, BreakerStatus, CircuitBreaker};
pub use clock::{Clock, FakeClock, SystemClock};
pub use guards::DependencyGuards;
pub use payload::{PayloadError, TaskPayload};
pub use task::{TaskDetails, TaskRecord, TaskStatus, Vin};
