//! AMQP-backed event source.

use crate::error::{EventError, EventResult};
use crate::source::{EventHandler, EventSource};
use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};

/// Event source consuming from an AMQP 0.9.1 broker.
///
/// One connection per attachment: the supervision loop owns reconnect
/// policy, so any transport failure simply surfaces as an error here.
pub struct AmqpEventSource {
    url: String,
    consumer_tag: String,
}

impl AmqpEventSource {
    pub fn new(url: impl Into<String>, consumer_tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            consumer_tag: consumer_tag.into(),
        }
    }
}

#[async_trait]
impl EventSource for AmqpEventSource {
    async fn consume(&self, queue: &str, handler: &dyn EventHandler) -> EventResult<()> {
        let connection = Connection::connect(&self.url, ConnectionProperties::default())
            .await
            .map_err(|e| EventError::Connect(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| EventError::Connect(e.to_string()))?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| EventError::Connect(e.to_string()))?;

        let mut consumer = channel
            .basic_consume(
                queue,
                &self.consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| EventError::Consume(e.to_string()))?;

        tracing::info!(queue = queue, "Attached to event queue");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery.map_err(|e| EventError::Disconnected(e.to_string()))?;

            // Handler failures are terminal for this message only; the
            // message is acked either way (fire-and-forget, no requeue).
            if let Err(e) = handler.handle(&delivery.data).await {
                if e.is_rejection() {
                    tracing::warn!(queue = queue, error = %e, "Event rejected");
                } else {
                    tracing::error!(queue = queue, error = %e, "Event processing failed");
                }
            }

            delivery
                .ack(BasicAckOptions::default())
                .await
                .map_err(|e| EventError::Disconnected(e.to_string()))?;
        }

        Err(EventError::Disconnected(format!(
            "delivery stream for {queue} ended"
        )))
    }
}
