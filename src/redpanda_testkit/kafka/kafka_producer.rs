//! Producer shim over rdkafka's `FutureProducer`.

use log::debug;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;

use super::config::Config;
use super::kafka_error::{ClientError, ClientResult};
use super::message::Message;

/// Thin produce wrapper bound to one broker address list.
///
/// At-least-once delivery is entirely the client library's concern; the
/// shim adds no buffering or retry of its own.
pub struct Producer {
    producer: FutureProducer,
}

impl Producer {
    pub fn new(config: &Config) -> ClientResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.bootstrap_servers())
            .set("message.timeout.ms", "5000")
            .create()?;
        Ok(Self { producer })
    }

    /// Send one message and wait up to `deadline` for the delivery report.
    ///
    /// The topic does not need to exist beforehand when the broker runs
    /// with topic auto-creation enabled, as the harness containers do.
    pub async fn produce(&self, message: &Message, deadline: Duration) -> ClientResult<()> {
        let mut record: FutureRecord<'_, Vec<u8>, Vec<u8>> =
            FutureRecord::to(&message.topic).payload(&message.value);
        if let Some(key) = &message.key {
            record = record.key(key);
        }

        match self.producer.send(record, Timeout::After(deadline)).await {
            Ok(_delivery) => {
                debug!("message delivered to topic '{}'", message.topic);
                Ok(())
            }
            Err((err, _unsent)) => Err(ClientError::Produce {
                message: err.to_string(),
            }),
        }
    }
}
