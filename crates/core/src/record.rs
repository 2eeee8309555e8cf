// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification record handed to the channel adapter.

use crate::event::FailedJob;

/// Everything the operator notification needs about one failed job.
///
/// Built fresh for each processing invocation and dropped once the publish
/// completes; nothing here persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub job_name: String,
    pub job_id: String,
    pub failure_reason: String,
    pub occurred_at_ms: u64,
    pub job_queue: Option<String>,
    pub log_stream: Option<String>,
    pub exit_code: Option<i32>,
    pub command: Vec<String>,
}

impl FailureNotice {
    /// Derive the notice from a validated failure.
    ///
    /// The reason is resolved here via [`FailedJob::failure_reason`], so a
    /// notice always carries a non-empty reason.
    pub fn from_failure(job: &FailedJob, occurred_at_ms: u64) -> Self {
        Self {
            job_name: job.job_name.clone(),
            job_id: job.job_id.clone(),
            failure_reason: job.failure_reason(),
            occurred_at_ms,
            job_queue: job.job_queue.clone(),
            log_stream: job.log_stream.clone(),
            exit_code: job.exit_code,
            command: job.command.clone(),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
