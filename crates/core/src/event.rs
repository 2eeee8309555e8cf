// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch job lifecycle events as they arrive off the wire.
//!
//! Everything below the envelope is optional at the boundary: the event bus
//! forwards whatever the scheduler emitted, and partial events must still
//! parse so the filter can reject them instead of the decoder erroring out.
//! [`JobEvent::to_failure`] is the pipeline's single validation step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder reason when neither the job nor any attempt recorded one.
pub const FALLBACK_REASON: &str = "No failure reason reported by the scheduler";

/// Envelope for one event consumed from the intake stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEvent {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "detail-type")]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub detail: Option<JobDetail>,
}

/// Scheduler-reported job state carried in the event `detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_queue: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub container: Option<ContainerDetail>,
    #[serde(default)]
    pub attempts: Vec<JobAttempt>,
}

/// Container state for the job or for one of its attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetail {
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub log_stream_name: Option<String>,
}

/// One scheduler retry of the job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAttempt {
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub container: Option<ContainerDetail>,
}

impl JobAttempt {
    /// Reason recorded for this attempt, container reason preferred.
    pub fn reason(&self) -> Option<&str> {
        self.container
            .as_ref()
            .and_then(|c| non_blank(c.reason.as_deref()))
            .or_else(|| non_blank(self.status_reason.as_deref()))
    }
}

/// Lifecycle states reported by the batch scheduler.
///
/// Unknown states parse as [`JobStatus::Other`] so a scheduler upgrade cannot
/// break event decoding; the filter simply never matches them unless
/// configured to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Pending,
    Runnable,
    Starting,
    Running,
    Succeeded,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Pending => "PENDING",
            Self::Runnable => "RUNNABLE",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "SUBMITTED" => Self::Submitted,
            "PENDING" => Self::Pending,
            "RUNNABLE" => Self::Runnable,
            "STARTING" => Self::Starting,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A required field was missing when promoting an event to a [`FailedJob`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event is missing required field `{field}`")]
pub struct MalformedEvent {
    pub field: &'static str,
}

/// A failure event that passed boundary validation.
///
/// Built by [`JobEvent::to_failure`], the only validation step in the
/// pipeline; everything downstream takes the data as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedJob {
    pub job_name: String,
    pub job_id: String,
    pub status: JobStatus,
    pub status_reason: Option<String>,
    pub job_queue: Option<String>,
    pub exit_code: Option<i32>,
    pub log_stream: Option<String>,
    pub command: Vec<String>,
    pub attempts: Vec<JobAttempt>,
}

impl FailedJob {
    /// Failure reason fallback chain: the job's own `statusReason`, then the
    /// last attempt's reason, then [`FALLBACK_REASON`]. Blank strings count
    /// as missing, so the result is never empty.
    pub fn failure_reason(&self) -> String {
        non_blank(self.status_reason.as_deref())
            .or_else(|| self.attempts.last().and_then(JobAttempt::reason))
            .unwrap_or(FALLBACK_REASON)
            .to_string()
    }
}

impl JobEvent {
    /// Parse one line of the intake stream.
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Short single-line description for logs.
    pub fn summary(&self) -> String {
        let source = self.source.as_deref().unwrap_or("?");
        let kind = self.detail_type.as_deref().unwrap_or("?");
        let (name, status) = match &self.detail {
            Some(d) => (
                d.job_name.as_deref().unwrap_or("?"),
                d.status.as_ref().map(JobStatus::as_str).unwrap_or("?"),
            ),
            None => ("?", "?"),
        };
        format!("{source}/{kind} job={name} status={status}")
    }

    /// Promote the event to a validated [`FailedJob`].
    ///
    /// Requires `detail`, `jobName`, `jobId`, and `status`; optional context
    /// fields pass through untouched. The log stream is resolved here, last
    /// attempt preferred over the job-level container.
    pub fn to_failure(&self) -> Result<FailedJob, MalformedEvent> {
        let detail = self.detail.as_ref().ok_or(MalformedEvent { field: "detail" })?;
        let job_name =
            detail.job_name.clone().ok_or(MalformedEvent { field: "jobName" })?;
        let job_id = detail.job_id.clone().ok_or(MalformedEvent { field: "jobId" })?;
        let status = detail.status.clone().ok_or(MalformedEvent { field: "status" })?;
        let log_stream = detail
            .attempts
            .iter()
            .rev()
            .find_map(|a| a.container.as_ref().and_then(|c| c.log_stream_name.clone()))
            .or_else(|| {
                detail.container.as_ref().and_then(|c| c.log_stream_name.clone())
            });
        Ok(FailedJob {
            job_name,
            job_id,
            status,
            status_reason: detail.status_reason.clone(),
            job_queue: detail.job_queue.clone(),
            exit_code: detail.container.as_ref().and_then(|c| c.exit_code),
            log_stream,
            command: detail
                .container
                .as_ref()
                .map(|c| c.command.clone())
                .unwrap_or_default(),
            attempts: detail.attempts.clone(),
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
