// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-monitoring specs
//!
//! Processor invocation failures must surface on the processor-failure
//! topic; the final evaluation at shutdown covers errors in the tail
//! window.

use crate::prelude::*;

#[test]
fn broken_transport_raises_the_processor_alarm() {
    let pipeline = Pipeline::empty();
    pipeline.config(&format!(
        r#"
[criteria]
source = "aws.batch"
detail_type = "Batch Job State Change"
status = "FAILED"
job_name_prefix = "gen-batch"

{topics}

[delivery]
max_retries = 0
base_backoff = "10ms"
"#,
        topics = pipeline.broken_failures_topics(),
    ));
    pipeline.run(&[failure_event("gen-batch-job-1745", "boom")]);

    let alerts = pipeline.alerts_outbox();
    assert!(alerts.contains("To: oncall@example.com\n"), "alerts: {alerts}");
    assert!(alerts.contains("Subject: Failure notifier is unhealthy\n"));
    assert!(alerts.contains("Errors in the last 60s: 1"));
    assert_eq!(pipeline.failures_outbox(), "", "broken transport delivers nothing");
}

#[test]
fn failed_redeliveries_each_count_toward_the_alarm() {
    let pipeline = Pipeline::empty();
    pipeline.config(&format!(
        r#"
[criteria]
source = "aws.batch"
detail_type = "Batch Job State Change"
status = "FAILED"
job_name_prefix = "gen-batch"

{topics}

[delivery]
max_retries = 2
base_backoff = "10ms"
"#,
        topics = pipeline.broken_failures_topics(),
    ));
    pipeline.run(&[failure_event("gen-batch-job-1745", "boom")]);

    // Initial attempt plus two redeliveries.
    assert!(pipeline.alerts_outbox().contains("Errors in the last 60s: 3"));
}

#[test]
fn a_malformed_matching_event_raises_the_alarm() {
    // With an empty prefix the envelope matches but validation fails; that
    // failure must be visible to operators even though no mail went out.
    let pipeline = Pipeline::empty();
    let config = pipeline.standard_config().replace(
        r#"job_name_prefix = "gen-batch""#,
        r#"job_name_prefix = """#,
    );
    pipeline.config(&config);
    pipeline.run(&[event_with(|event| {
        event["detail"].as_object_mut().unwrap().remove("jobId");
    })]);

    assert_eq!(pipeline.failures_outbox(), "");
    assert!(pipeline.alerts_outbox().contains("Subject: Failure notifier is unhealthy\n"));
}

#[test]
fn exactly_one_alert_per_alarm_transition() {
    let pipeline = Pipeline::empty();
    pipeline.config(&format!(
        r#"
[criteria]
source = "aws.batch"
detail_type = "Batch Job State Change"
status = "FAILED"
job_name_prefix = "gen-batch"

{topics}

[delivery]
max_retries = 0
base_backoff = "10ms"
"#,
        topics = pipeline.broken_failures_topics(),
    ));
    // Two failing deliveries in the same window: one transition, one alert.
    pipeline.run(&[
        failure_event("gen-batch-job-1745", "boom"),
        failure_event("gen-batch-job-1746", "boom"),
    ]);

    assert_eq!(
        pipeline.alerts_outbox().matches("Subject: Failure notifier is unhealthy\n").count(),
        1
    );
}
