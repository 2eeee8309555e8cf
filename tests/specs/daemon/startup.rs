// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup and configuration specs

use crate::prelude::*;

#[test]
fn a_rejected_config_exits_with_code_two() {
    let pipeline = Pipeline::empty();
    pipeline.config("[notify]\ntopic = \"nowhere\"\n");
    pipeline.klaxond().write_stdin("").assert().code(2);
}

#[test]
fn a_missing_config_file_exits_with_code_two() {
    let pipeline = Pipeline::empty();
    // No klaxon.toml written.
    pipeline.klaxond().write_stdin("").assert().code(2);
}

#[test]
fn the_topic_environment_variable_retargets_notifications() {
    let pipeline = Pipeline::new();
    let mut cmd = pipeline.klaxond();
    cmd.env("TOPIC", "processor-alerts");
    cmd.write_stdin(failure_event("gen-batch-job-1745", "boom") + "\n").assert().success();

    // The notification went to the override topic's subscribers.
    assert_eq!(pipeline.failures_outbox(), "");
    let alerts = pipeline.alerts_outbox();
    assert!(alerts.contains("To: oncall@example.com\n"), "alerts: {alerts}");
    assert!(alerts.contains("Subject: Batch job failure: gen-batch-job-1745\n"));
}

#[test]
fn an_empty_stream_exits_cleanly_without_mail() {
    let pipeline = Pipeline::new();
    pipeline.run(&[]);
    assert_eq!(pipeline.failures_outbox(), "");
    assert_eq!(pipeline.alerts_outbox(), "");
}
