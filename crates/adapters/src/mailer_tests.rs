// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn outbox_topic(name: &str, dir: &Path, subscribers: &[&str]) -> Topic {
    Topic {
        name: name.to_string(),
        command: format!("cat >> {}", dir.join("outbox").display()),
        subscribers: subscribers.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn publishes_one_message_per_subscriber() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = PipeMailer::new(vec![outbox_topic(
        "job-failures",
        dir.path(),
        &["ops@example.com", "oncall@example.com"],
    )]);
    let ack = mailer.publish("job-failures", "job down", "the body").await.unwrap();
    assert_eq!(ack.topic, "job-failures");
    assert_eq!(ack.subscribers, 2);
    let outbox = std::fs::read_to_string(dir.path().join("outbox")).unwrap();
    assert_eq!(outbox.matches("Subject: job down").count(), 2);
    assert!(outbox.contains("To: ops@example.com\n"));
    assert!(outbox.contains("To: oncall@example.com\n"));
    assert!(outbox.contains("\n\nthe body\n"));
}

#[tokio::test]
async fn unknown_topic_is_an_error() {
    let mailer = PipeMailer::new(Vec::new());
    let err = mailer.publish("nope", "s", "b").await.unwrap_err();
    assert_eq!(err, PublishError::UnknownTopic("nope".to_string()));
}

#[tokio::test]
async fn failing_command_rejects_with_stderr() {
    let mailer = PipeMailer::new(vec![Topic {
        name: "job-failures".to_string(),
        command: "cat > /dev/null; echo transport broke >&2; exit 3".to_string(),
        subscribers: vec!["ops@example.com".to_string()],
    }]);
    let err = mailer.publish("job-failures", "s", "b").await.unwrap_err();
    match err {
        PublishError::Rejected { topic, reason } => {
            assert_eq!(topic, "job-failures");
            assert!(reason.contains("code 3"), "unexpected reason: {reason}");
            assert!(reason.contains("transport broke"), "unexpected reason: {reason}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn hung_command_times_out() {
    let mailer = PipeMailer::new(vec![Topic {
        name: "job-failures".to_string(),
        command: "sleep 5".to_string(),
        subscribers: vec!["ops@example.com".to_string()],
    }])
    .with_command_timeout(Duration::from_millis(100));
    let err = mailer.publish("job-failures", "s", "b").await.unwrap_err();
    match err {
        PublishError::Rejected { reason, .. } => {
            assert!(reason.contains("timed out"), "unexpected reason: {reason}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_subscriber_list_delivers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = PipeMailer::new(vec![outbox_topic("job-failures", dir.path(), &[])]);
    let ack = mailer.publish("job-failures", "s", "b").await.unwrap();
    assert_eq!(ack.subscribers, 0);
    assert!(!dir.path().join("outbox").exists());
}

#[tokio::test]
async fn command_sees_topic_and_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("env");
    let mailer = PipeMailer::new(vec![Topic {
        name: "alerts".to_string(),
        command: format!(
            "cat > /dev/null; printf '%s %s\\n' \"$KLAXON_TOPIC\" \"$KLAXON_RCPT\" >> {}",
            out.display()
        ),
        subscribers: vec!["oncall@example.com".to_string()],
    }]);
    mailer.publish("alerts", "s", "b").await.unwrap();
    let seen = std::fs::read_to_string(&out).unwrap();
    assert_eq!(seen, "alerts oncall@example.com\n");
}

#[test]
fn compose_renders_headers_then_body() {
    let message = compose("ops@example.com", "job down", "line one\nline two");
    assert_eq!(message, "To: ops@example.com\nSubject: job down\n\nline one\nline two\n");
}
