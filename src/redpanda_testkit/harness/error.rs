//! Error types for harness operations.

use std::fmt;
use std::time::Duration;

use super::facade::HarnessState;

/// Main error type for broker harness operations.
///
/// Port allocation and container start failures abort setup immediately.
/// Readiness failures are retried internally and only surface here once the
/// polling deadline has elapsed. Teardown never produces an error at all;
/// removal failures are logged and swallowed so a flaky cleanup cannot mask
/// the actual test outcome.
#[derive(Debug, Clone)]
pub enum HarnessError {
    /// The OS refused to bind an ephemeral listening socket
    PortAllocation { message: String },

    /// Image pull, container creation, or container start failed
    ContainerStart {
        message: String,
        source: Option<String>,
    },

    /// The broker never answered the readiness probe within the budget
    ReadinessTimeout { waited: Duration },

    /// API misuse: an operation that requires the `Ready` state was called
    /// while the harness was in some other state
    NotReady { state: HarnessState },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::PortAllocation { message } => {
                write!(f, "could not allocate a free host port: {}", message)
            }
            HarnessError::ContainerStart { message, source } => {
                if let Some(s) = source {
                    write!(f, "could not start broker container: {} ({})", message, s)
                } else {
                    write!(f, "could not start broker container: {}", message)
                }
            }
            HarnessError::ReadinessTimeout { waited } => {
                write!(
                    f,
                    "broker did not become ready within {}ms",
                    waited.as_millis()
                )
            }
            HarnessError::NotReady { state } => {
                write!(f, "harness is not ready (current state: {})", state)
            }
        }
    }
}

impl std::error::Error for HarnessError {}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
