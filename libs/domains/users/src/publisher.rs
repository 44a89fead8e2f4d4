//! Change notifications for completed user mutations

use async_nats::jetstream::{Context, stream::Config as StreamConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::PublishError;

/// Publishes a human-readable event string to a topic
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, message: &str) -> Result<(), PublishError>;
}

/// NATS JetStream publisher. Every publish waits for the server ack.
pub struct NatsEventPublisher {
    jetstream: Arc<Context>,
    stream_name: String,
    subject: String,
}

impl NatsEventPublisher {
    pub fn new(
        jetstream: Context,
        stream_name: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            jetstream: Arc::new(jetstream),
            stream_name: stream_name.into(),
            subject: subject.into(),
        }
    }

    /// Create the backing stream if it does not exist yet
    pub async fn ensure_stream(&self) -> Result<(), PublishError> {
        if self.jetstream.get_stream(&self.stream_name).await.is_ok() {
            debug!(stream = %self.stream_name, "Stream already exists");
            return Ok(());
        }

        info!(stream = %self.stream_name, subject = %self.subject, "Creating stream");
        self.jetstream
            .create_stream(StreamConfig {
                name: self.stream_name.clone(),
                subjects: vec![self.subject.clone()],
                ..Default::default()
            })
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for NatsEventPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        let ack = self
            .jetstream
            .publish(self.subject.clone(), message.to_string().into())
            .await
            .map_err(|e| PublishError::Publish {
                subject: self.subject.clone(),
                details: e.to_string(),
            })?
            .await
            .map_err(|e| PublishError::Ack {
                subject: self.subject.clone(),
                details: e.to_string(),
            })?;

        debug!(
            stream = %self.stream_name,
            subject = %self.subject,
            sequence = ack.sequence,
            "Published event"
        );
        Ok(())
    }
}

/// Records published messages in memory (for development/testing)
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    messages: Arc<RwLock<Vec<String>>>,
    failing: Arc<RwLock<bool>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following publish fail (or succeed again)
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        if *self.failing.read().await {
            return Err(PublishError::Unavailable(
                "in-memory publisher is failing".to_string(),
            ));
        }

        self.messages.write().await.push(message.to_string());
        Ok(())
    }
}
