// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event filtering specs
//!
//! Only events satisfying every criteria condition reach the processor;
//! near-misses and junk lines flow past the daemon without effect.

use crate::prelude::*;

#[test]
fn near_miss_events_are_ignored() {
    let pipeline = Pipeline::new();
    pipeline.run(&[
        // Wrong source.
        event_with(|event| event["source"] = "aws.ecs".into()),
        // Wrong detail type.
        event_with(|event| event["detail-type"] = "ECS Task State Change".into()),
        // Non-terminal status.
        event_with(|event| event["detail"]["status"] = "RUNNING".into()),
        // Other job family.
        event_with(|event| event["detail"]["jobName"] = "etl-batch-job-1745".into()),
    ]);

    assert_eq!(pipeline.failures_outbox(), "");
    assert_eq!(pipeline.alerts_outbox(), "");
}

#[test]
fn events_missing_fields_are_non_matching_not_errors() {
    let pipeline = Pipeline::new();
    pipeline.run(&[
        event_with(|event| {
            event.as_object_mut().unwrap().remove("source");
        }),
        event_with(|event| {
            event["detail"].as_object_mut().unwrap().remove("status");
        }),
        event_with(|event| {
            event.as_object_mut().unwrap().remove("detail");
        }),
    ]);

    assert_eq!(pipeline.failures_outbox(), "");
    // Non-matching events never count against processor health.
    assert_eq!(pipeline.alerts_outbox(), "");
}

#[test]
fn a_junk_line_does_not_stall_the_stream() {
    let pipeline = Pipeline::new();
    pipeline.run(&[
        "this is not json".to_string(),
        failure_event("gen-batch-job-1745", "boom"),
    ]);

    assert!(pipeline.failures_outbox().contains("Job name: gen-batch-job-1745\n"));
}

#[test]
fn an_empty_prefix_tracks_every_job_family() {
    let pipeline = Pipeline::empty();
    let config = pipeline.standard_config().replace(
        r#"job_name_prefix = "gen-batch""#,
        r#"job_name_prefix = """#,
    );
    pipeline.config(&config);
    pipeline.run(&[failure_event("etl-batch-job-9", "boom")]);

    assert!(pipeline.failures_outbox().contains("Job name: etl-batch-job-9\n"));
}
