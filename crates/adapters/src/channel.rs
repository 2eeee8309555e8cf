// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use thiserror::Error;

/// Errors from publish operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("publish to {topic} rejected: {reason}")]
    Rejected { topic: String, reason: String },
}

/// Acknowledgement for one accepted publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAck {
    pub topic: String,
    pub subscribers: usize,
}

/// Adapter for fanning one notification out to a topic's subscribers.
#[async_trait]
pub trait ChannelAdapter: Clone + Send + Sync + 'static {
    /// Deliver subject and body to every subscriber of `topic`.
    ///
    /// One attempt; redelivery is the caller's concern.
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<PublishAck, PublishError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ChannelAdapter, PublishAck, PublishError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded publish
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PublishCall {
        pub topic: String,
        pub subject: String,
        pub body: String,
    }

    #[derive(Default)]
    struct FakeChannelState {
        calls: Vec<PublishCall>,
        rejections: HashMap<String, String>,
    }

    /// Fake channel adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeChannel {
        inner: Arc<Mutex<FakeChannelState>>,
    }

    impl FakeChannel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded publishes
        pub fn calls(&self) -> Vec<PublishCall> {
            self.inner.lock().calls.clone()
        }

        /// Recorded publishes for one topic
        pub fn calls_for(&self, topic: &str) -> Vec<PublishCall> {
            self.inner.lock().calls.iter().filter(|c| c.topic == topic).cloned().collect()
        }

        /// Make every publish to `topic` fail with the given reason
        pub fn reject_topic(&self, topic: &str, reason: &str) {
            self.inner.lock().rejections.insert(topic.to_string(), reason.to_string());
        }

        /// Let publishes to `topic` succeed again
        pub fn restore_topic(&self, topic: &str) {
            self.inner.lock().rejections.remove(topic);
        }
    }

    #[async_trait]
    impl ChannelAdapter for FakeChannel {
        async fn publish(
            &self,
            topic: &str,
            subject: &str,
            body: &str,
        ) -> Result<PublishAck, PublishError> {
            let mut state = self.inner.lock();
            if let Some(reason) = state.rejections.get(topic) {
                return Err(PublishError::Rejected {
                    topic: topic.to_string(),
                    reason: reason.clone(),
                });
            }
            state.calls.push(PublishCall {
                topic: topic.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(PublishAck { topic: topic.to_string(), subscribers: 1 })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeChannel, PublishCall};

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
