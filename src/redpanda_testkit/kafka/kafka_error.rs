//! Error types for the broker client shim.

use rdkafka::error::KafkaError;
use std::fmt;
use std::time::Duration;

/// Unified error type for produce, consume, and health-check operations.
#[derive(Debug)]
pub enum ClientError {
    /// Underlying Kafka library error
    Kafka(KafkaError),
    /// The broker rejected the message or the delivery deadline elapsed
    Produce { message: String },
    /// No message arrived before the deadline
    ConsumeTimeout { waited: Duration },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Kafka(e) => write!(f, "Kafka error: {}", e),
            ClientError::Produce { message } => write!(f, "produce failed: {}", message),
            ClientError::ConsumeTimeout { waited } => {
                write!(f, "no message consumed within {}ms", waited.as_millis())
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Kafka(e) => Some(e),
            ClientError::Produce { .. } | ClientError::ConsumeTimeout { .. } => None,
        }
    }
}

impl From<KafkaError> for ClientError {
    fn from(err: KafkaError) -> Self {
        ClientError::Kafka(err)
    }
}

/// Result type alias for client shim operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_consume_timeout_display() {
        let err = ClientError::ConsumeTimeout {
            waited: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "no message consumed within 5000ms");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_produce_display() {
        let err = ClientError::Produce {
            message: "delivery timed out".to_string(),
        };
        assert_eq!(err.to_string(), "produce failed: delivery timed out");
    }
}
