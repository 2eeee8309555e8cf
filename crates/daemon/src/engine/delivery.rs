// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! At-least-once delivery of one matched event.
//!
//! The dispatcher side of the retry contract: the processor makes a single
//! attempt, and this loop redelivers after transient outcomes (publish
//! rejection, invocation timeout) with bounded exponential backoff. Every
//! failed attempt is recorded as one invocation error in the health metric;
//! malformed events are permanent and never redelivered.

use crate::engine::processor::{ErrorProcessor, ProcessError};
use kx_adapters::ChannelAdapter;
use kx_core::{Clock, DeliveryId, HealthMetric, InvocationOutcome, JobEvent};
use std::time::Duration;

/// Redelivery policy for transient invocation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Redeliveries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first redelivery; doubles per attempt.
    pub base_backoff: Duration,
    /// Time budget for one processing invocation.
    pub invocation_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_secs(1),
            invocation_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff before redelivering after failed attempt number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1 << doublings)
    }
}

/// Run the delivery loop for one matched event to completion.
///
/// Returns the final outcome; intermediate outcomes are already recorded in
/// the metric by the time this returns.
pub async fn deliver<N, C>(
    processor: &ErrorProcessor<N, C>,
    policy: &RetryPolicy,
    metric: &HealthMetric,
    clock: &C,
    id: &DeliveryId,
    event: &JobEvent,
) -> InvocationOutcome
where
    N: ChannelAdapter,
    C: Clock,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let outcome = invoke(processor, policy, id, event, attempt).await;
        metric.record(outcome, clock.epoch_ms());

        match outcome {
            InvocationOutcome::Delivered | InvocationOutcome::Malformed => return outcome,
            InvocationOutcome::Rejected | InvocationOutcome::TimedOut => {
                if attempt > policy.max_retries {
                    tracing::error!(
                        delivery = %id,
                        attempts = attempt,
                        outcome = %outcome,
                        "delivery abandoned after final attempt"
                    );
                    return outcome;
                }
                let backoff = policy.backoff(attempt);
                tracing::warn!(
                    delivery = %id,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "redelivering after transient failure"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// One invocation under the time budget, classified as an outcome.
async fn invoke<N, C>(
    processor: &ErrorProcessor<N, C>,
    policy: &RetryPolicy,
    id: &DeliveryId,
    event: &JobEvent,
    attempt: u32,
) -> InvocationOutcome
where
    N: ChannelAdapter,
    C: Clock,
{
    match tokio::time::timeout(policy.invocation_timeout, processor.process(event)).await {
        Ok(Ok(ack)) => {
            tracing::info!(
                delivery = %id,
                attempt,
                job_name = %ack.notice.job_name,
                subscribers = ack.subscribers,
                "notification delivered"
            );
            InvocationOutcome::Delivered
        }
        Ok(Err(error @ ProcessError::Malformed(_))) => {
            tracing::error!(delivery = %id, %error, "event rejected, not redelivering");
            InvocationOutcome::Malformed
        }
        Ok(Err(error)) => {
            tracing::warn!(delivery = %id, attempt, %error, "invocation failed");
            InvocationOutcome::Rejected
        }
        Err(_) => {
            tracing::warn!(
                delivery = %id,
                attempt,
                budget_ms = policy.invocation_timeout.as_millis() as u64,
                "invocation timed out"
            );
            InvocationOutcome::TimedOut
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
