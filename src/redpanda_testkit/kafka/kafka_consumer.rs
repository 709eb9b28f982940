//! Consumer shim over rdkafka's `StreamConsumer`.

use futures::StreamExt;
use log::debug;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer as _, StreamConsumer};
use std::time::Duration;

use super::config::Config;
use super::kafka_error::{ClientError, ClientResult};
use super::message::Message;

/// Thin consume wrapper subscribed to one topic.
pub struct Consumer {
    consumer: StreamConsumer,
}

impl Consumer {
    /// Create a consumer and subscribe it to `config.consumer.topic`.
    ///
    /// Offsets start from the earliest available message so a consumer
    /// created after the produce call still sees the message.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.bootstrap_servers())
            .set("group.id", &config.consumer.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "false")
            .set("allow.auto.create.topics", "true")
            .create()?;
        consumer.subscribe(&[config.consumer.topic.as_str()])?;
        Ok(Self { consumer })
    }

    /// Block until one message is available or `deadline` elapses.
    pub async fn consume(&self, deadline: Duration) -> ClientResult<Message> {
        let mut stream = self.consumer.stream();
        match tokio::time::timeout(deadline, stream.next()).await {
            Ok(Some(Ok(msg))) => {
                let message = Message::from_borrowed(&msg);
                debug!("consumed message from topic '{}'", message.topic);
                Ok(message)
            }
            Ok(Some(Err(e))) => Err(ClientError::Kafka(e)),
            Ok(None) | Err(_) => Err(ClientError::ConsumeTimeout { waited: deadline }),
        }
    }
}
