// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: TOML file plus environment overrides.

use crate::engine::delivery::RetryPolicy;
use crate::engine::monitor::MonitorSettings;
use kx_adapters::Topic;
use kx_core::{JobStatus, MatchCriteria};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Validated daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub criteria: MatchCriteria,
    pub topics: Vec<Topic>,
    pub notify_topic: String,
    pub alert_topic: String,
    pub docs_url: Option<String>,
    pub monitor: MonitorSettings,
    pub delivery: RetryPolicy,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration for {field}: {reason}")]
    Duration { field: &'static str, reason: String },

    #[error("[topics.{0}] is missing a transport command")]
    MissingCommand(String),

    #[error("notify topic `{0}` is not defined under [topics]")]
    UnknownNotifyTopic(String),

    #[error("alert topic `{0}` is not defined under [topics]")]
    UnknownAlertTopic(String),

    #[error("monitor threshold must be at least 1")]
    ZeroThreshold,
}

impl Config {
    /// Load from `KLAXON_CONFIG` (or `./klaxon.toml`) with environment
    /// overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let path = crate::env::config_path();
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        Self::parse(&text, crate::env::topic_override())
    }

    /// Parse and validate a config document.
    pub fn parse(text: &str, topic_override: Option<String>) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        raw.build(topic_override)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    criteria: CriteriaSection,
    topics: BTreeMap<String, TopicSection>,
    notify: NotifySection,
    monitor: MonitorSection,
    delivery: DeliverySection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CriteriaSection {
    source: String,
    detail_type: String,
    status: String,
    job_name_prefix: String,
}

impl Default for CriteriaSection {
    fn default() -> Self {
        Self {
            source: "aws.batch".to_string(),
            detail_type: "Batch Job State Change".to_string(),
            status: "FAILED".to_string(),
            job_name_prefix: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TopicSection {
    command: Option<String>,
    subscribers: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NotifySection {
    topic: String,
    alert_topic: String,
    docs_url: Option<String>,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            topic: "job-failures".to_string(),
            alert_topic: "processor-alerts".to_string(),
            docs_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MonitorSection {
    window: String,
    threshold: usize,
    tick: Option<String>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self { window: "60s".to_string(), threshold: 1, tick: None }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DeliverySection {
    max_retries: u32,
    base_backoff: String,
    invocation_timeout: String,
}

impl Default for DeliverySection {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: "1s".to_string(),
            invocation_timeout: "30s".to_string(),
        }
    }
}

impl RawConfig {
    fn build(self, topic_override: Option<String>) -> Result<Config, ConfigError> {
        let criteria = MatchCriteria {
            source: self.criteria.source,
            detail_type: self.criteria.detail_type,
            status: JobStatus::from(self.criteria.status.as_str()),
            job_name_prefix: self.criteria.job_name_prefix,
        };

        let mut topics = Vec::with_capacity(self.topics.len());
        for (name, section) in self.topics {
            let command =
                section.command.ok_or_else(|| ConfigError::MissingCommand(name.clone()))?;
            topics.push(Topic { name, command, subscribers: section.subscribers });
        }

        let notify_topic = topic_override.unwrap_or(self.notify.topic);
        if !topics.iter().any(|t| t.name == notify_topic) {
            return Err(ConfigError::UnknownNotifyTopic(notify_topic));
        }
        let alert_topic = self.notify.alert_topic;
        if !topics.iter().any(|t| t.name == alert_topic) {
            return Err(ConfigError::UnknownAlertTopic(alert_topic));
        }

        if self.monitor.threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        let window = parse_positive("monitor.window", &self.monitor.window)?;
        let tick = match &self.monitor.tick {
            Some(tick) => parse_positive("monitor.tick", tick)?,
            None => window,
        };
        let monitor = MonitorSettings { window, threshold: self.monitor.threshold, tick };

        let delivery = RetryPolicy {
            max_retries: self.delivery.max_retries,
            base_backoff: parse_duration("delivery.base_backoff", &self.delivery.base_backoff)?,
            invocation_timeout: parse_positive(
                "delivery.invocation_timeout",
                &self.delivery.invocation_timeout,
            )?,
        };

        Ok(Config {
            criteria,
            topics,
            notify_topic,
            alert_topic,
            docs_url: self.notify.docs_url,
            monitor,
            delivery,
        })
    }
}

fn parse_positive(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    let duration = parse_duration(field, s)?;
    if duration.is_zero() {
        return Err(ConfigError::Duration { field, reason: "must be positive".to_string() });
    }
    Ok(duration)
}

/// Parse a duration string like "500ms", "30s", "5m", "1h" into a Duration
fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    let err = |reason: String| ConfigError::Duration { field, reason };
    let s = s.trim();
    if s.is_empty() {
        return Err(err("empty duration string".to_string()));
    }

    // Find the numeric prefix
    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str.parse().map_err(|_| err(format!("invalid number in `{s}`")))?;

    let multiplier = match suffix.trim() {
        "ms" => return Ok(Duration::from_millis(num)),
        "" | "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 3600,
        other => return Err(err(format!("unknown duration suffix `{other}`"))),
    };

    let secs = num
        .checked_mul(multiplier)
        .ok_or_else(|| err(format!("`{s}` overflows the duration range")))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
