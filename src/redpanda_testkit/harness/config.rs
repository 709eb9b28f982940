//! Broker container configuration and readiness policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Redpanda image
pub const REDPANDA_IMAGE: &str = "docker.vectorized.io/vectorized/redpanda";

/// Default Redpanda image tag
pub const REDPANDA_TAG: &str = "v21.8.1";

/// Kafka protocol port inside the container
pub const KAFKA_PORT: u16 = 9092;

/// Immutable description of the broker container to start.
///
/// Built before container start and never mutated afterward. The start
/// command derived from it keeps the bind address and the advertised
/// address separate: the broker binds all interfaces inside the container,
/// but advertises the host-reachable `host:port` so that clients following
/// the broker's metadata do not end up on an unreachable internal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Broker image name
    pub image: String,
    /// Image version tag
    pub tag: String,
    /// Kafka protocol port the broker binds inside the container
    pub kafka_port: u16,
    /// Host the broker advertises to clients
    pub advertised_host: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            image: REDPANDA_IMAGE.to_string(),
            tag: REDPANDA_TAG.to_string(),
            kafka_port: KAFKA_PORT,
            advertised_host: "127.0.0.1".to_string(),
        }
    }
}

impl StrategyConfig {
    /// Full `image:tag` reference
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// Build the Redpanda start command.
    ///
    /// `bind_port` is the port the broker listens on inside the container;
    /// `advertised_port` is the host-side port clients will reach it on.
    /// Single-core developer-laptop tuning, and topic auto-creation is on so
    /// tests can produce to topics that do not exist yet.
    pub fn start_command(&self, bind_port: u16, advertised_port: u16) -> Vec<String> {
        vec![
            "redpanda".to_string(),
            "start".to_string(),
            "--smp".to_string(),
            "1".to_string(),
            "--reserve-memory".to_string(),
            "0M".to_string(),
            "--overprovisioned".to_string(),
            "--node-id".to_string(),
            "0".to_string(),
            "--set".to_string(),
            "redpanda.auto_create_topics_enabled=true".to_string(),
            "--kafka-addr".to_string(),
            format!("0.0.0.0:{}", bind_port),
            "--advertise-kafka-addr".to_string(),
            format!("{}:{}", self.advertised_host, advertised_port),
        ]
    }
}

/// How long and how often to poll the broker for readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    /// Maximum total wait before giving up
    pub max_wait: Duration,
    /// Pause between probe attempts
    pub interval: Duration,
    /// Budget for a single probe attempt
    pub probe_timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(30),
            interval: Duration::from_millis(500),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

impl ReadinessPolicy {
    pub fn new(max_wait: Duration, interval: Duration) -> Self {
        Self {
            max_wait,
            interval,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref() {
        let config = StrategyConfig::default();
        assert_eq!(
            config.image_ref(),
            "docker.vectorized.io/vectorized/redpanda:v21.8.1"
        );
    }

    #[test]
    fn test_start_command_separates_bind_and_advertise() {
        let config = StrategyConfig::default();
        let cmd = config.start_command(9092, 54321);

        let kafka_addr_pos = cmd.iter().position(|a| a == "--kafka-addr").unwrap();
        assert_eq!(cmd[kafka_addr_pos + 1], "0.0.0.0:9092");

        let advertise_pos = cmd
            .iter()
            .position(|a| a == "--advertise-kafka-addr")
            .unwrap();
        assert_eq!(cmd[advertise_pos + 1], "127.0.0.1:54321");
    }

    #[test]
    fn test_start_command_enables_topic_auto_creation() {
        let cmd = StrategyConfig::default().start_command(9092, 9092);
        assert!(cmd
            .iter()
            .any(|a| a == "redpanda.auto_create_topics_enabled=true"));
    }

    #[test]
    fn test_readiness_policy_new_keeps_probe_timeout_default() {
        let policy = ReadinessPolicy::new(Duration::from_secs(1), Duration::from_millis(100));
        assert_eq!(policy.max_wait, Duration::from_secs(1));
        assert_eq!(policy.interval, Duration::from_millis(100));
        assert_eq!(policy.probe_timeout, ReadinessPolicy::default().probe_timeout);
    }
}
