// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kx-daemon: Runtime for the klaxon failure-alerting daemon
//!
//! Wires the intake stream through the event filter into spawned delivery
//! tasks, and keeps the self-monitor evaluating processor health alongside.

pub mod config;
pub mod engine;
pub mod env;
pub mod intake;

pub use config::{Config, ConfigError};
pub use engine::delivery::RetryPolicy;
pub use engine::monitor::MonitorSettings;
pub use engine::Engine;
