//! Flat message record exchanged with the broker.

use rdkafka::message::{BorrowedMessage, Message as RdKafkaMessage};

/// A single Kafka message: optional key, value bytes, and topic.
///
/// No ordering or delivery guarantees beyond what the single-broker,
/// single-partition default topic configuration provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub key: Option<Vec<u8>>,
    pub value: Vec<u8>,
    pub topic: String,
}

impl Message {
    pub fn new(key: Option<Vec<u8>>, value: Vec<u8>, topic: impl Into<String>) -> Self {
        Self {
            key,
            value,
            topic: topic.into(),
        }
    }

    /// Copy a received rdkafka message into an owned record
    pub fn from_borrowed(msg: &BorrowedMessage<'_>) -> Self {
        Self {
            key: msg.key().map(|k| k.to_vec()),
            value: msg.payload().map(|p| p.to_vec()).unwrap_or_default(),
            topic: msg.topic().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_equality() {
        let a = Message::new(None, br#"{ "say": "hello" }"#.to_vec(), "test-topic");
        let b = Message::new(None, br#"{ "say": "hello" }"#.to_vec(), "test-topic");
        assert_eq!(a, b);
    }

    #[test]
    fn test_message_inequality_on_key() {
        let a = Message::new(None, b"v".to_vec(), "t");
        let b = Message::new(Some(b"k".to_vec()), b"v".to_vec(), "t");
        assert_ne!(a, b);
    }
}
