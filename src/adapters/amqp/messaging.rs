//! Topic-exchange protocol operations.
//!
//! Thin layer over an established channel, scoped to one exchange. The
//! exchange is durable so its definition survives broker restarts;
//! messages themselves are published non-persistently because replay of
//! missed events is a non-goal.

use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Consumer, ExchangeKind};

use crate::domain::{BridgeError, Envelope};

/// Broker-protocol operations scoped to one topic exchange.
#[derive(Clone)]
pub struct TopicChannel {
    channel: Channel,
    exchange: String,
}

impl TopicChannel {
    pub fn new(channel: Channel, exchange: impl Into<String>) -> Self {
        Self {
            channel,
            exchange: exchange.into(),
        }
    }

    /// The exchange this channel publishes to and binds against.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Declare the durable topic exchange.
    ///
    /// Re-declaring with identical parameters is a broker-side no-op;
    /// declaring with different parameters on an existing exchange is a
    /// broker error and propagates as [`BridgeError::Declare`].
    pub async fn setup_exchange(&self) -> Result<(), BridgeError> {
        self.channel
            .exchange_declare(
                &self.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(BridgeError::Declare)
    }

    /// Declare an instance's private queue.
    ///
    /// Non-durable and auto-deleting (the broker drops it when the
    /// instance disconnects), but not exclusive, so operational tooling
    /// can still inspect it. Returns the declared queue name.
    pub async fn declare_queue(&self, name: &str) -> Result<String, BridgeError> {
        let queue = self
            .channel
            .queue_declare(
                name,
                QueueDeclareOptions {
                    durable: false,
                    auto_delete: true,
                    exclusive: false,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(BridgeError::Declare)?;

        Ok(queue.name().as_str().to_string())
    }

    /// Bind a queue to a routing pattern on this exchange.
    pub async fn bind_queue(&self, queue: &str, pattern: &str) -> Result<(), BridgeError> {
        self.channel
            .queue_bind(
                queue,
                &self.exchange,
                pattern,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(BridgeError::Declare)
    }

    /// Publish an envelope with the given routing key.
    ///
    /// Delivery mode is non-persistent. The returned confirmation future
    /// resolves immediately when publisher confirms are not enabled, so
    /// callers never block indefinitely on broker back-pressure.
    pub async fn publish(&self, routing_key: &str, envelope: &Envelope) -> Result<(), BridgeError> {
        let body = envelope.encode().map_err(BridgeError::Encode)?;

        self.channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(1),
            )
            .await
            .map_err(BridgeError::Publish)?
            .await
            .map_err(BridgeError::Publish)?;

        tracing::trace!(routing_key, exchange = %self.exchange, "published envelope");
        Ok(())
    }

    /// Start a continuous subscription on a queue.
    ///
    /// The caller owns the returned stream and is responsible for the
    /// per-delivery acknowledge/reject decision.
    pub async fn consume(&self, queue: &str, tag: &str) -> Result<Consumer, BridgeError> {
        self.channel
            .basic_consume(
                queue,
                tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(BridgeError::Consume)
    }
}
