// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-pipe mail transport.
//!
//! Each topic names a sendmail-style command; a publish composes one message
//! per subscriber and pipes it to that command's stdin. The command's exit
//! status is the only delivery signal observed.

use crate::channel::{ChannelAdapter, PublishAck, PublishError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Hard ceiling on one transport command run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Named fan-out destination with its own transport command and subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub command: String,
    pub subscribers: Vec<String>,
}

/// Channel adapter piping composed mail through per-topic commands.
#[derive(Clone)]
pub struct PipeMailer {
    topics: Arc<HashMap<String, Topic>>,
    command_timeout: Duration,
}

impl PipeMailer {
    pub fn new(topics: Vec<Topic>) -> Self {
        let topics = topics.into_iter().map(|t| (t.name.clone(), t)).collect();
        Self { topics: Arc::new(topics), command_timeout: DEFAULT_COMMAND_TIMEOUT }
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    async fn send_one(
        &self,
        topic: &Topic,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), String> {
        let message = compose(to, subject, body);
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&topic.command)
            .env("KLAXON_TOPIC", &topic.name)
            .env("KLAXON_RCPT", to)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let mut child = cmd.spawn().map_err(|e| format!("spawn failed: {e}"))?;
        let interaction = async {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(message.as_bytes())
                    .await
                    .map_err(|e| format!("write to command failed: {e}"))?;
            }
            // stdin dropped above, so the command sees EOF
            child.wait_with_output().await.map_err(|e| format!("command failed: {e}"))
        };
        let output = tokio::time::timeout(self.command_timeout, interaction)
            .await
            .map_err(|_| format!("command timed out after {:?}", self.command_timeout))??;
        if output.status.success() {
            return Ok(());
        }
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(format!("command exited with code {code}"))
        } else {
            Err(format!("command exited with code {code}: {stderr}"))
        }
    }
}

#[async_trait]
impl ChannelAdapter for PipeMailer {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<PublishAck, PublishError> {
        let Some(dest) = self.topics.get(topic) else {
            return Err(PublishError::UnknownTopic(topic.to_string()));
        };
        if dest.subscribers.is_empty() {
            tracing::warn!(topic = %dest.name, "topic has no subscribers, nothing to deliver");
            return Ok(PublishAck { topic: dest.name.clone(), subscribers: 0 });
        }
        for to in &dest.subscribers {
            tracing::debug!(topic = %dest.name, %to, "piping message to transport command");
            self.send_one(dest, to, subject, body).await.map_err(|reason| {
                tracing::warn!(topic = %dest.name, %to, %reason, "transport command failed");
                PublishError::Rejected { topic: dest.name.clone(), reason }
            })?;
        }
        tracing::info!(
            topic = %dest.name,
            subscribers = dest.subscribers.len(),
            "published notification"
        );
        Ok(PublishAck { topic: dest.name.clone(), subscribers: dest.subscribers.len() })
    }
}

fn compose(to: &str, subject: &str, body: &str) -> String {
    format!("To: {to}\nSubject: {subject}\n\n{body}\n")
}

#[cfg(test)]
#[path = "mailer_tests.rs"]
mod tests;
