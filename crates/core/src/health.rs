// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invocation health tracking for the self-monitor.

use parking_lot::Mutex;
use std::sync::Arc;

/// Outcome of one processing invocation, as recorded by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    Delivered,
    Malformed,
    Rejected,
    TimedOut,
}

crate::simple_display! {
    InvocationOutcome {
        Delivered => "delivered",
        Malformed => "malformed",
        Rejected => "rejected",
        TimedOut => "timed_out",
    }
}

impl InvocationOutcome {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

/// Sliding-window counter of processor invocation errors.
///
/// The dispatcher is the only writer; the self-monitor reads the windowed
/// count on its evaluation tick. Clones share the underlying state.
#[derive(Clone, Default)]
pub struct HealthMetric {
    inner: Arc<Mutex<HealthInner>>,
}

#[derive(Default)]
struct HealthInner {
    error_times_ms: Vec<u64>,
    delivered: u64,
    errors: u64,
}

impl HealthMetric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation outcome at the given time.
    pub fn record(&self, outcome: InvocationOutcome, now_ms: u64) {
        let mut inner = self.inner.lock();
        if outcome.is_error() {
            inner.errors += 1;
            inner.error_times_ms.push(now_ms);
        } else {
            inner.delivered += 1;
        }
    }

    /// Number of errors in the window `(now_ms - window_ms, now_ms]`.
    ///
    /// Entries that aged out of the window are pruned; an empty window
    /// reads as zero, so no data means healthy.
    pub fn errors_in_window(&self, now_ms: u64, window_ms: u64) -> usize {
        let cutoff = now_ms.saturating_sub(window_ms);
        let mut inner = self.inner.lock();
        inner.error_times_ms.retain(|&t| t > cutoff);
        inner.error_times_ms.len()
    }

    /// Lifetime totals for the shutdown summary.
    pub fn snapshot(&self) -> HealthSnapshot {
        let inner = self.inner.lock();
        HealthSnapshot { delivered: inner.delivered, errors: inner.errors }
    }
}

/// Lifetime delivery totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthSnapshot {
    pub delivered: u64,
    pub errors: u64,
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
