//! Bounded readiness polling against a live broker.

use log::{debug, info};
use std::time::{Duration, Instant};

use super::config::ReadinessPolicy;
use super::error::{HarnessError, HarnessResult};
use super::BrokerEndpoint;
use crate::redpanda_testkit::kafka::check_health;

/// One readiness attempt against a broker endpoint.
///
/// Implementations report failure as a plain reason string: every failure
/// is "not ready yet" to the polling loop, never fatal on its own.
pub trait ReadinessProbe {
    fn probe(&self, endpoint: &BrokerEndpoint, timeout: Duration) -> Result<(), String>;
}

/// The real probe: connect to the endpoint and fetch cluster metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaMetadataProbe;

impl ReadinessProbe for KafkaMetadataProbe {
    fn probe(&self, endpoint: &BrokerEndpoint, timeout: Duration) -> Result<(), String> {
        check_health(&endpoint.to_string(), timeout).map_err(|e| e.to_string())
    }
}

/// Poll the endpoint until a probe succeeds or `policy.max_wait` elapses.
///
/// Container start races (process up, protocol listener not yet bound) are
/// expected here, so probe errors are swallowed and retried; only the final
/// timeout surfaces. Returns [`HarnessError::ReadinessTimeout`] no earlier
/// than `max_wait` and no later than roughly `max_wait` plus one interval.
pub async fn wait_until_ready(
    endpoint: &BrokerEndpoint,
    policy: &ReadinessPolicy,
    probe: &dyn ReadinessProbe,
) -> HarnessResult<()> {
    let started = Instant::now();
    loop {
        match probe.probe(endpoint, policy.probe_timeout) {
            Ok(()) => {
                info!(
                    "broker at {} ready after {}ms",
                    endpoint,
                    started.elapsed().as_millis()
                );
                return Ok(());
            }
            Err(reason) => {
                debug!("broker at {} not ready yet: {}", endpoint, reason);
            }
        }
        if started.elapsed() >= policy.max_wait {
            return Err(HarnessError::ReadinessTimeout {
                waited: started.elapsed(),
            });
        }
        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysFailProbe;

    impl ReadinessProbe for AlwaysFailProbe {
        fn probe(&self, _endpoint: &BrokerEndpoint, _timeout: Duration) -> Result<(), String> {
            Err("connection refused".to_string())
        }
    }

    struct SucceedAfterProbe {
        attempts_before_success: usize,
        attempts: AtomicUsize,
    }

    impl ReadinessProbe for SucceedAfterProbe {
        fn probe(&self, _endpoint: &BrokerEndpoint, _timeout: Duration) -> Result<(), String> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.attempts_before_success {
                Err("not yet".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn endpoint() -> BrokerEndpoint {
        BrokerEndpoint::new("127.0.0.1", 1)
    }

    #[tokio::test]
    async fn test_timeout_respects_deadline_window() {
        let policy = ReadinessPolicy::new(Duration::from_secs(1), Duration::from_millis(100));

        let started = Instant::now();
        let result = wait_until_ready(&endpoint(), &policy, &AlwaysFailProbe).await;
        let elapsed = started.elapsed();

        match result {
            Err(HarnessError::ReadinessTimeout { waited }) => {
                assert!(waited >= policy.max_wait);
            }
            other => panic!("expected ReadinessTimeout, got {:?}", other),
        }
        assert!(elapsed >= policy.max_wait);
        // One extra interval of slack, plus scheduler jitter
        assert!(
            elapsed < policy.max_wait + 4 * policy.interval,
            "timed out too late: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_returns_ok_once_probe_succeeds() {
        let policy = ReadinessPolicy::new(Duration::from_secs(5), Duration::from_millis(10));
        let probe = SucceedAfterProbe {
            attempts_before_success: 3,
            attempts: AtomicUsize::new(0),
        };

        wait_until_ready(&endpoint(), &policy, &probe).await.unwrap();
        assert_eq!(probe.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_immediate_success_skips_sleeping() {
        let policy = ReadinessPolicy::new(Duration::from_secs(5), Duration::from_secs(5));
        let probe = SucceedAfterProbe {
            attempts_before_success: 0,
            attempts: AtomicUsize::new(0),
        };

        let started = Instant::now();
        wait_until_ready(&endpoint(), &policy, &probe).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
