// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Klaxon engine: the select-loop tying intake, filter, deliveries, and the
//! self-monitor together.
//!
//! Each matched event runs on its own spawned delivery task; invocations are
//! fully independent and unordered. The monitor evaluates on a timer tick
//! and once more at shutdown, so failures in the tail window still alarm
//! before exit.

pub mod delivery;
pub mod monitor;
pub mod processor;

use crate::config::Config;
use delivery::RetryPolicy;
use kx_adapters::ChannelAdapter;
use kx_core::{
    Clock, DeliveryId, HealthMetric, HealthSnapshot, InvocationOutcome, JobEvent, MatchCriteria,
};
use monitor::SelfMonitor;
use processor::{ErrorProcessor, ProcessorConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Totals reported when the engine stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: u64,
    pub ignored: u64,
    pub alarms: u64,
    pub health: HealthSnapshot,
}

/// Event-driven runtime for the failure-alerting pipeline.
pub struct Engine<N, C> {
    criteria: MatchCriteria,
    processor: Arc<ErrorProcessor<N, C>>,
    monitor: SelfMonitor<N>,
    policy: RetryPolicy,
    metric: HealthMetric,
    clock: C,
    cancel: CancellationToken,
}

impl<N, C> Engine<N, C>
where
    N: ChannelAdapter,
    C: Clock + 'static,
{
    pub fn new(config: &Config, channel: N, clock: C, cancel: CancellationToken) -> Self {
        let metric = HealthMetric::new();
        let processor = Arc::new(ErrorProcessor::new(
            channel.clone(),
            clock.clone(),
            ProcessorConfig {
                topic: config.notify_topic.clone(),
                docs_url: config.docs_url.clone(),
            },
        ));
        let monitor = SelfMonitor::new(
            config.monitor.clone(),
            metric.clone(),
            channel,
            config.alert_topic.clone(),
        );
        Self {
            criteria: config.criteria.clone(),
            processor,
            monitor,
            policy: config.delivery.clone(),
            metric,
            clock,
            cancel,
        }
    }

    /// Run until the intake closes or the engine is cancelled.
    pub async fn run(mut self, mut events: mpsc::Receiver<JobEvent>) -> RunSummary {
        let mut deliveries = JoinSet::new();
        let period = self.monitor.settings().tick;
        let mut tick = interval_at(Instant::now() + period, period);
        let mut matched = 0u64;
        let mut ignored = 0u64;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("engine cancelled");
                    break;
                }
                _ = tick.tick() => {
                    self.monitor.evaluate(self.clock.epoch_ms()).await;
                }
                maybe = events.recv() => match maybe {
                    Some(event) => {
                        if self.criteria.matches(&event) {
                            matched += 1;
                            self.spawn_delivery(event, &mut deliveries);
                        } else {
                            ignored += 1;
                            tracing::debug!(event = %event.summary(), "event did not match criteria");
                        }
                    }
                    None => {
                        tracing::info!("intake closed");
                        break;
                    }
                },
                Some(joined) = deliveries.join_next(), if !deliveries.is_empty() => {
                    if let Err(error) = joined {
                        tracing::error!(%error, "delivery task panicked");
                    }
                }
            }
        }

        self.drain(&mut deliveries).await;
        // Failures in the tail window still alarm before exit.
        self.monitor.evaluate(self.clock.epoch_ms()).await;

        let health = self.metric.snapshot();
        let summary =
            RunSummary { matched, ignored, alarms: self.monitor.alarm_count(), health };
        tracing::info!(
            matched = summary.matched,
            ignored = summary.ignored,
            delivered = health.delivered,
            errors = health.errors,
            alarms = summary.alarms,
            "engine stopped"
        );
        summary
    }

    /// Spawn one independent delivery task for a matched event.
    fn spawn_delivery(&self, event: JobEvent, deliveries: &mut JoinSet<InvocationOutcome>) {
        let id = DeliveryId::new();
        tracing::info!(delivery = %id, event = %event.summary(), "failure event matched");
        let processor = Arc::clone(&self.processor);
        let policy = self.policy.clone();
        let metric = self.metric.clone();
        let clock = self.clock.clone();
        deliveries.spawn(async move {
            delivery::deliver(&processor, &policy, &metric, &clock, &id, &event).await
        });
    }

    /// Wait for in-flight deliveries, bounded by the drain budget.
    async fn drain(&self, deliveries: &mut JoinSet<InvocationOutcome>) {
        if deliveries.is_empty() {
            return;
        }
        tracing::info!(in_flight = deliveries.len(), "draining deliveries");
        let all = async {
            while let Some(joined) = deliveries.join_next().await {
                if let Err(error) = joined {
                    tracing::error!(%error, "delivery task panicked");
                }
            }
        };
        if tokio::time::timeout(crate::env::drain_timeout(), all).await.is_err() {
            tracing::warn!(
                abandoned = deliveries.len(),
                "drain budget elapsed, aborting in-flight deliveries"
            );
            deliveries.shutdown().await;
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
