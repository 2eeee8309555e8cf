// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{ContainerDetail, JobAttempt, JobDetail, JobEvent, JobStatus};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies over partial wire events.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Submitted),
            Just(JobStatus::Pending),
            Just(JobStatus::Runnable),
            Just(JobStatus::Starting),
            Just(JobStatus::Running),
            Just(JobStatus::Succeeded),
            Just(JobStatus::Failed),
            "[A-Z_]{1,12}".prop_map(|s| JobStatus::from(s.as_str())),
        ]
    }

    fn arb_container() -> impl Strategy<Value = ContainerDetail> {
        (
            prop::option::of(-1i32..256),
            prop::option::of("[A-Za-z ]{0,24}"),
            prop::collection::vec("[a-z_.]{1,12}", 0..3),
            prop::option::of("[a-z/0-9-]{1,24}"),
        )
            .prop_map(|(exit_code, reason, command, log_stream_name)| ContainerDetail {
                exit_code,
                reason,
                command,
                log_stream_name,
            })
    }

    fn arb_attempt() -> impl Strategy<Value = JobAttempt> {
        (
            prop::option::of("[A-Za-z ]{0,24}"),
            prop::option::of(arb_container()),
        )
            .prop_map(|(status_reason, container)| JobAttempt { status_reason, container })
    }

    fn arb_detail() -> impl Strategy<Value = JobDetail> {
        (
            prop::option::of(prop_oneof![
                Just("gen-batch-job-1".to_string()),
                "[a-z0-9-]{1,20}",
            ]),
            prop::option::of("[a-f0-9-]{1,16}"),
            prop::option::of("[a-z-]{1,16}"),
            prop::option::of(arb_status()),
            prop::option::of("[A-Za-z ]{0,24}"),
            prop::option::of(arb_container()),
            prop::collection::vec(arb_attempt(), 0..3),
        )
            .prop_map(
                |(job_name, job_id, job_queue, status, status_reason, container, attempts)| {
                    JobDetail {
                        job_name,
                        job_id,
                        job_queue,
                        status,
                        status_reason,
                        container,
                        attempts,
                    }
                },
            )
    }

    /// Arbitrary partial event, biased toward values that can match the
    /// canonical batch-failure criteria.
    pub fn arb_job_event() -> impl Strategy<Value = JobEvent> {
        (
            prop::option::of("[0-9]{12}"),
            prop::option::of("[a-z]{2}-[a-z]{4,9}-[1-9]"),
            prop::option::of(prop_oneof![
                Just("aws.batch".to_string()),
                "[a-z.]{1,12}",
            ]),
            prop::option::of(prop_oneof![
                Just("Batch Job State Change".to_string()),
                "[A-Za-z ]{1,24}",
            ]),
            prop::option::of(arb_detail()),
        )
            .prop_map(|(account, region, source, detail_type, detail)| JobEvent {
                account,
                region,
                source,
                detail_type,
                detail,
            })
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

/// Canonical terminal-failure event as the batch scheduler emits it.
pub fn failed_event(job_name: &str) -> JobEvent {
    event_with_status(job_name, JobStatus::Failed)
}

/// Canonical event with the given lifecycle status.
pub fn event_with_status(job_name: &str, status: JobStatus) -> JobEvent {
    JobEvent {
        account: Some("123456789012".to_string()),
        region: Some("us-west-2".to_string()),
        source: Some("aws.batch".to_string()),
        detail_type: Some("Batch Job State Change".to_string()),
        detail: Some(JobDetail {
            job_name: Some(job_name.to_string()),
            job_id: Some("4c7599ae-0a82-49aa-ba5a-4409fa583937".to_string()),
            job_queue: Some("gen-queue-aqua".to_string()),
            status: Some(status),
            status_reason: Some("Essential container in task exited".to_string()),
            container: Some(ContainerDetail {
                exit_code: Some(1),
                reason: None,
                command: vec!["run_job.sh".to_string(), "input_1745.json".to_string()],
                log_stream_name: Some("gen-batch/default/abc123".to_string()),
            }),
            attempts: Vec::new(),
        }),
    }
}

/// Event that parses but cannot be promoted to a failure (no job id).
pub fn malformed_event(job_name: &str) -> JobEvent {
    let mut event = failed_event(job_name);
    if let Some(detail) = event.detail.as_mut() {
        detail.job_id = None;
    }
    event
}
