//! Client shim configuration.

use serde::{Deserialize, Serialize};

/// Connection settings shared by the producer and consumer shims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Broker addresses in `host:port` form
    pub brokers: Vec<String>,
    pub consumer: ConsumerConfig,
}

/// Consumer-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    pub group_id: String,
    pub topic: String,
}

impl Config {
    pub fn new(brokers: Vec<String>, consumer: ConsumerConfig) -> Self {
        Self { brokers, consumer }
    }

    /// Comma-separated broker list as rdkafka expects it
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

impl ConsumerConfig {
    pub fn new(group_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            topic: topic.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_servers_joins_brokers() {
        let config = Config::new(
            vec!["127.0.0.1:9092".to_string(), "127.0.0.1:9093".to_string()],
            ConsumerConfig::new("group", "topic"),
        );
        assert_eq!(config.bootstrap_servers(), "127.0.0.1:9092,127.0.0.1:9093");
    }
}
