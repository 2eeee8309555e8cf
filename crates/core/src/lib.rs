// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kx-core: Domain types for the klaxon failure-alerting pipeline

pub mod macros;

pub mod clock;
pub mod criteria;
pub mod event;
pub mod health;
pub mod id;
pub mod record;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use criteria::MatchCriteria;
pub use event::{
    ContainerDetail, FailedJob, JobAttempt, JobDetail, JobEvent, JobStatus, MalformedEvent,
};
pub use health::{HealthMetric, HealthSnapshot, InvocationOutcome};
pub use id::DeliveryId;
pub use record::FailureNotice;
