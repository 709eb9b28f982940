//! # redpanda-testkit
//!
//! Ephemeral Redpanda broker lifecycle management for Kafka integration
//! tests. The crate starts a single disposable broker container per test
//! run, hands back a reachable `host:port` address once the broker answers
//! a real protocol handshake, and tears everything down afterward.
//!
//! ## Features
//!
//! - **Interchangeable container backends**: a direct Docker API strategy
//!   and a testcontainers strategy, selected per run with the
//!   `TESTKIT_BACKEND` environment variable
//! - **Race-free startup**: ephemeral host-port allocation plus a bounded
//!   readiness-polling loop, so tests never see a half-started broker
//! - **Deterministic cleanup**: teardown is best-effort and never fails a
//!   test run, even when startup only partially succeeded
//! - **Minimal client shim**: byte-level produce/consume wrappers over
//!   `rdkafka` for driving round-trip scenarios against the harness
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redpanda_testkit::{Backend, BrokerHarness};
//! use redpanda_testkit::kafka::{Config, ConsumerConfig, Consumer, Message, Producer};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut harness = BrokerHarness::new(Backend::from_env());
//!     harness.start().await?;
//!
//!     let cfg = Config::new(
//!         harness.broker_addresses()?,
//!         ConsumerConfig::new("consumer-group-1", "test-consume"),
//!     );
//!     let producer = Producer::new(&cfg)?;
//!     let consumer = Consumer::new(&cfg)?;
//!
//!     let message = Message::new(None, br#"{ "say": "hello" }"#.to_vec(), "test-consume");
//!     producer.produce(&message, Duration::from_secs(5)).await?;
//!     let received = consumer.consume(Duration::from_secs(5)).await?;
//!     assert_eq!(message, received);
//!
//!     harness.stop().await;
//!     Ok(())
//! }
//! ```

pub mod redpanda_testkit;

// Re-export the harness surface at the crate root for convenience
pub use redpanda_testkit::harness::{
    Backend, BrokerEndpoint, BrokerHarness, HarnessError, HarnessResult, HarnessState,
    ReadinessPolicy, StrategyConfig,
};
pub use redpanda_testkit::kafka;
