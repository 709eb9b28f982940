//! Minimal broker client shim.
//!
//! Byte-level produce/consume wrappers over rdkafka, parameterized by the
//! harness's resolved address. Test scenarios use these; the harness itself
//! only uses [`health::check_health`] as its readiness probe.

pub mod config;
pub mod health;
pub mod kafka_consumer;
pub mod kafka_error;
pub mod kafka_producer;
pub mod message;

pub use config::{Config, ConsumerConfig};
pub use health::check_health;
pub use kafka_consumer::Consumer;
pub use kafka_error::{ClientError, ClientResult};
pub use kafka_producer::Producer;
pub use message::Message;
