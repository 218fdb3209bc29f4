//! AMQP adapter layer.
//!
//! `BrokerLink` owns the physical connection and channel; `TopicChannel`
//! layers the exchange/queue/publish/consume protocol operations on top of
//! an established channel.

mod connection;
mod messaging;

pub use connection::BrokerLink;
pub use messaging::TopicChannel;
