// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kx-adapters: Delivery boundaries for the klaxon pipeline
//!
//! The [`ChannelAdapter`] trait is the only seam the daemon publishes
//! through; [`PipeMailer`] is the production transport and `FakeChannel`
//! (behind the `test-support` feature) stands in for tests.

pub mod channel;
pub mod mailer;

pub use channel::{ChannelAdapter, PublishAck, PublishError};
pub use mailer::{PipeMailer, Topic};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use channel::{FakeChannel, PublishCall};
