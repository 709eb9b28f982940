//! Ephemeral broker test harness.
//!
//! Manages the lifecycle of a single disposable Redpanda container for an
//! integration-test run:
//! - ephemeral host-port allocation ([`port`])
//! - interchangeable container backends ([`docker_api`], [`testcontainer`],
//!   selected via [`backend`])
//! - bounded readiness polling against the live broker ([`probe`])
//! - lifecycle facade with deterministic cleanup ([`facade`])
//!
//! ```rust,no_run
//! use redpanda_testkit::redpanda_testkit::harness::{Backend, BrokerHarness};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut harness = BrokerHarness::new(Backend::from_env());
//!     harness.start().await.expect("broker failed to start");
//!     let endpoint = harness.address().expect("harness is ready");
//!     println!("broker reachable at {}", endpoint);
//!     harness.stop().await;
//! }
//! ```

pub mod backend;
pub mod config;
pub mod docker_api;
pub mod error;
pub mod facade;
pub mod port;
pub mod probe;
pub mod testcontainer;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use backend::{Backend, BACKEND_ENV};
pub use config::{ReadinessPolicy, StrategyConfig, KAFKA_PORT, REDPANDA_IMAGE, REDPANDA_TAG};
pub use error::{HarnessError, HarnessResult};
pub use facade::{BrokerHarness, HarnessState};
pub use port::allocate_free_port;
pub use probe::{wait_until_ready, KafkaMetadataProbe, ReadinessProbe};

/// Host and port a started broker is reachable on.
///
/// Produced once per harness run after the readiness probe has succeeded;
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl BrokerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let endpoint = BrokerEndpoint::new("127.0.0.1", 9092);
        assert_eq!(endpoint.to_string(), "127.0.0.1:9092");
    }
}
