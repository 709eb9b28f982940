//! Broker connectivity check.

use log::debug;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer as _};
use std::time::Duration;

use super::kafka_error::ClientResult;

/// Open a connection to the broker and fetch cluster metadata.
///
/// This is the lightweight handshake the readiness prober runs: any error
/// (connection refused, timeout, protocol error) means the broker is not
/// accepting clients yet. The call blocks up to `timeout`.
pub fn check_health(bootstrap_servers: &str, timeout: Duration) -> ClientResult<()> {
    let consumer: BaseConsumer = ClientConfig::new()
        .set("bootstrap.servers", bootstrap_servers)
        .set("socket.timeout.ms", timeout.as_millis().to_string())
        .create()?;

    let metadata = consumer.fetch_metadata(None, timeout)?;
    debug!(
        "broker {} answered metadata: {} broker(s), {} topic(s)",
        bootstrap_servers,
        metadata.brokers().len(),
        metadata.topics().len()
    );
    Ok(())
}
