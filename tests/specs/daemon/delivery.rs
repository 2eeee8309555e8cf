// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification delivery specs
//!
//! A matched failure event ends up as composed mail in the job-failure
//! topic's outbox, carrying the job identity and the derived reason.

use crate::prelude::*;

#[test]
fn matched_failure_lands_in_the_operator_outbox() {
    let pipeline = Pipeline::new();
    pipeline.run(&[failure_event("gen-batch-job-1745", "OutOfMemoryError: Container killed")]);

    let outbox = pipeline.failures_outbox();
    assert!(outbox.contains("To: ops@example.com\n"), "outbox: {outbox}");
    assert!(outbox.contains("Subject: Batch job failure: gen-batch-job-1745\n"));
    assert!(outbox.contains("Job name: gen-batch-job-1745\n"));
    assert!(outbox.contains("Job identifier: 4c7599ae-0a82-49aa-ba5a-4409fa583937\n"));
    assert!(outbox.contains("Job queue: gen-queue-aqua\n"));
    assert!(outbox.contains("Log stream: gen-batch/default/abc123\n"));
    assert!(outbox.contains("'OutOfMemoryError: Container killed'"));
    assert_eq!(pipeline.alerts_outbox(), "", "healthy run must not alarm");
}

#[test]
fn the_prefix_family_scenario_end_to_end() {
    // The canonical scenario: prefix- criteria, OutOfMemory reason.
    let pipeline = Pipeline::empty();
    pipeline.config(&format!(
        r#"
[criteria]
source = "aws.batch"
detail_type = "Batch Job State Change"
status = "FAILED"
job_name_prefix = "prefix-"

{topics}
"#,
        topics = pipeline.outbox_topics(),
    ));
    pipeline.run(&[event_with(|event| {
        event["detail"]["jobName"] = "prefix-job-123".into();
        event["detail"]["jobId"] = "abc".into();
        event["detail"]["statusReason"] = "OutOfMemory".into();
    })]);

    let outbox = pipeline.failures_outbox();
    assert!(outbox.contains("Job name: prefix-job-123\n"));
    assert!(outbox.contains("Job identifier: abc\n"));
    assert!(outbox.contains("'OutOfMemory'"));
}

#[test]
fn the_same_event_twice_mails_twice() {
    // At-least-once redelivery of an identical event is not deduplicated.
    let pipeline = Pipeline::new();
    let line = failure_event("gen-batch-job-1745", "Essential container exited");
    pipeline.run(&[line.clone(), line]);

    let outbox = pipeline.failures_outbox();
    assert_eq!(outbox.matches("Subject: Batch job failure: gen-batch-job-1745\n").count(), 2);
}

#[test]
fn reason_falls_back_to_the_last_attempt() {
    let pipeline = Pipeline::new();
    pipeline.run(&[event_with(|event| {
        let detail = &mut event["detail"];
        detail["statusReason"] = serde_json::Value::Null;
        detail["attempts"] = serde_json::json!([
            { "statusReason": "first try failed" },
            { "container": { "reason": "CannotPullContainerError" } }
        ]);
    })]);

    assert!(pipeline.failures_outbox().contains("'CannotPullContainerError'"));
}

#[test]
fn configured_docs_link_is_included() {
    let pipeline = Pipeline::empty();
    let mut config = pipeline.standard_config();
    config.push_str(
        "\n[notify]\ndocs_url = \"https://wiki.example.com/batch-recovery\"\n",
    );
    pipeline.config(&config);
    pipeline.run(&[failure_event("gen-batch-job-1745", "boom")]);

    assert!(pipeline
        .failures_outbox()
        .contains("Diagnosis and recovery steps: https://wiki.example.com/batch-recovery"));
}
