//! Crate module tree.
//!
//! - [`harness`]: container-backed broker lifecycle (port allocation,
//!   container strategies, readiness polling, facade)
//! - [`kafka`]: minimal produce/consume client shim used by test scenarios

pub mod harness;
pub mod kafka;
