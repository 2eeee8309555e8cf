// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-monitor: the watcher that watches the processor.
//!
//! A two-state threshold machine over the windowed invocation-error count.
//! `Ok → Alarm` publishes exactly one alert to the processor-failure topic;
//! `Alarm → Ok` is silent. An empty window reads as zero errors, so missing
//! data means healthy. The monitor never looks at job-failure content; its
//! only input is the processor's own outcome record.

use kx_adapters::ChannelAdapter;
use kx_core::HealthMetric;
use std::time::Duration;

/// Self-monitor tuning, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Sliding evaluation window over invocation errors.
    pub window: Duration,
    /// Errors in the window at or above which the monitor alarms.
    pub threshold: usize,
    /// How often the engine asks for an evaluation.
    pub tick: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self { window: Duration::from_secs(60), threshold: 1, tick: Duration::from_secs(60) }
    }
}

/// Monitor state, purely threshold-driven and self-resetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Ok,
    Alarm,
}

kx_core::simple_display! {
    MonitorState {
        Ok => "ok",
        Alarm => "alarm",
    }
}

/// Threshold rule over the processor's health metric.
pub struct SelfMonitor<N> {
    settings: MonitorSettings,
    metric: HealthMetric,
    channel: N,
    alert_topic: String,
    state: MonitorState,
    alarms: u64,
}

impl<N: ChannelAdapter> SelfMonitor<N> {
    pub fn new(
        settings: MonitorSettings,
        metric: HealthMetric,
        channel: N,
        alert_topic: String,
    ) -> Self {
        Self { settings, metric, channel, alert_topic, state: MonitorState::Ok, alarms: 0 }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Number of `Ok → Alarm` transitions so far.
    pub fn alarm_count(&self) -> u64 {
        self.alarms
    }

    /// Evaluate the threshold rule at `now_ms` and publish on a fresh alarm.
    ///
    /// An alert-publish failure is logged and swallowed: there is no third
    /// channel to escalate to, so the operational log is the last resort.
    pub async fn evaluate(&mut self, now_ms: u64) -> MonitorState {
        let window_ms = self.settings.window.as_millis() as u64;
        let errors = self.metric.errors_in_window(now_ms, window_ms);
        let breached = errors >= self.settings.threshold;

        match (self.state, breached) {
            (MonitorState::Ok, true) => {
                self.state = MonitorState::Alarm;
                self.alarms += 1;
                tracing::error!(
                    errors,
                    threshold = self.settings.threshold,
                    window_ms,
                    "processor unhealthy, raising alarm"
                );
                let body = alert_body(errors, &self.settings);
                if let Err(error) =
                    self.channel.publish(&self.alert_topic, ALERT_SUBJECT, &body).await
                {
                    tracing::error!(
                        %error,
                        topic = %self.alert_topic,
                        "failed to publish processor alarm"
                    );
                }
            }
            (MonitorState::Alarm, false) => {
                self.state = MonitorState::Ok;
                tracing::info!("processor healthy again, alarm cleared");
            }
            (MonitorState::Alarm, true) => {
                tracing::debug!(errors, "alarm still active");
            }
            (MonitorState::Ok, false) => {}
        }
        self.state
    }
}

const ALERT_SUBJECT: &str = "Failure notifier is unhealthy";

fn alert_body(errors: usize, settings: &MonitorSettings) -> String {
    format!(
        "The batch-job failure notifier has failing invocations.\n\n\
         Errors in the last {}s: {errors} (alarm threshold: {}).\n\n\
         Job-failure notifications may not be reaching operators. Check the \
         daemon log for the failing invocations and their causes.\n",
        settings.window.as_secs(),
        settings.threshold,
    )
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
