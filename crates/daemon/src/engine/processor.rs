// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error processor: one matched failure event in, one operator
//! notification out.
//!
//! `process` is the pipeline's only business logic: validate, derive the
//! failure reason, log, publish. It never retries and never suppresses a
//! failure; the dispatcher owns redelivery and records every outcome into
//! the health metric, so a suppressed error here would be invisible to the
//! self-monitor.

use kx_adapters::{ChannelAdapter, PublishError};
use kx_core::{Clock, FailureNotice, JobEvent, MalformedEvent};
use thiserror::Error;

/// Immutable processor configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Job-failure topic to publish to.
    pub topic: String,
    /// Optional link to recovery documentation, appended to the message body.
    pub docs_url: Option<String>,
}

/// Successful processing outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessAck {
    pub notice: FailureNotice,
    pub subscribers: usize,
}

/// Ways one processing invocation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("malformed event: {0}")]
    Malformed(#[from] MalformedEvent),

    #[error("notification publish failed: {0}")]
    Publish(#[from] PublishError),
}

impl ProcessError {
    /// Whether redelivering the same event could succeed.
    ///
    /// A malformed event can never validate, so redelivering it would only
    /// inflate the error count.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Publish(_))
    }
}

/// Turns a matched failure event into a published operator notification.
pub struct ErrorProcessor<N, C> {
    channel: N,
    clock: C,
    config: ProcessorConfig,
}

impl<N, C> ErrorProcessor<N, C>
where
    N: ChannelAdapter,
    C: Clock,
{
    pub fn new(channel: N, clock: C, config: ProcessorConfig) -> Self {
        Self { channel, clock, config }
    }

    /// Process one matched event: validate, derive, log, publish.
    ///
    /// A single publish attempt; safe to invoke repeatedly for the same
    /// event under at-least-once delivery (no state beyond the log line and
    /// the publish itself).
    pub async fn process(&self, event: &JobEvent) -> Result<ProcessAck, ProcessError> {
        let failure = event.to_failure()?;
        let notice = FailureNotice::from_failure(&failure, self.clock.epoch_ms());

        tracing::info!(
            job_name = %notice.job_name,
            job_id = %notice.job_id,
            status = %failure.status,
            reason = %notice.failure_reason,
            queue = notice.job_queue.as_deref().unwrap_or("-"),
            log_stream = notice.log_stream.as_deref().unwrap_or("-"),
            "batch job failed"
        );

        let subject = subject_line(&notice);
        let body = render_body(&notice, self.config.docs_url.as_deref());
        let ack = self.channel.publish(&self.config.topic, &subject, &body).await?;

        Ok(ProcessAck { notice, subscribers: ack.subscribers })
    }
}

fn subject_line(notice: &FailureNotice) -> String {
    format!("Batch job failure: {}", notice.job_name)
}

/// Operator message body: job context first, then the error, then what to
/// do about it.
fn render_body(notice: &FailureNotice, docs_url: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("A batch job has FAILED. Manual intervention required.\n\n");

    body.push_str("JOB INFORMATION:\n");
    body.push_str(&format!("Job name: {}\n", notice.job_name));
    body.push_str(&format!("Job identifier: {}\n", notice.job_id));
    if let Some(queue) = &notice.job_queue {
        body.push_str(&format!("Job queue: {queue}\n"));
    }
    if let Some(log_stream) = &notice.log_stream {
        body.push_str(&format!("Log stream: {log_stream}\n"));
    }
    if !notice.command.is_empty() {
        body.push_str(&format!("Container command: {}\n", notice.command.join(" ")));
    }
    if let Some(exit_code) = notice.exit_code {
        body.push_str(&format!("Container exit code: {exit_code}\n"));
    }
    body.push_str(&format!("Failed at: {}\n", render_timestamp(notice.occurred_at_ms)));

    body.push_str("\nERROR INFORMATION:\n");
    body.push_str(&format!("Error message:\n\t'{}'\n", notice.failure_reason));

    body.push_str(
        "\nThe job was not retried by this pipeline; resubmit it once the \
         cause is resolved.\n",
    );
    if let Some(url) = docs_url {
        body.push_str(&format!("\nDiagnosis and recovery steps: {url}\n"));
    }
    body
}

fn render_timestamp(epoch_ms: u64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(epoch_ms as i64)
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("{epoch_ms}ms since epoch"))
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
