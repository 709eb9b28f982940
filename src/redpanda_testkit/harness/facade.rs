//! Harness facade composing port allocation, a container strategy, and
//! readiness polling into one lifecycle object.

use log::{debug, info, warn};
use std::fmt;
use tokio::task::JoinHandle;

use super::backend::Backend;
use super::config::{ReadinessPolicy, StrategyConfig};
use super::docker_api::DockerApiBroker;
use super::error::{HarnessError, HarnessResult};
use super::port::allocate_free_port;
use super::probe::{wait_until_ready, KafkaMetadataProbe};
use super::testcontainer::TestcontainerBroker;
use super::BrokerEndpoint;

/// Lifecycle states of a [`BrokerHarness`].
///
/// `Created -> Starting -> Ready -> Stopped`, with `Errored` reachable from
/// `Starting` when allocation, container start, or readiness polling fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Created,
    Starting,
    Ready,
    Stopped,
    Errored,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarnessState::Created => "created",
            HarnessState::Starting => "starting",
            HarnessState::Ready => "ready",
            HarnessState::Stopped => "stopped",
            HarnessState::Errored => "errored",
        };
        write!(f, "{}", name)
    }
}

/// The running container, tagged by the backend that owns it.
enum BrokerContainer {
    DockerApi(DockerApiBroker),
    Testcontainers(TestcontainerBroker),
}

impl BrokerContainer {
    fn endpoint(&self) -> BrokerEndpoint {
        match self {
            BrokerContainer::DockerApi(broker) => broker.endpoint(),
            BrokerContainer::Testcontainers(broker) => broker.endpoint(),
        }
    }

    async fn stop(self) {
        match self {
            BrokerContainer::DockerApi(broker) => broker.stop().await,
            BrokerContainer::Testcontainers(broker) => broker.stop().await,
        }
    }
}

/// One disposable broker per test run.
///
/// The harness owns exactly one container at a time and exposes its address
/// only after the broker has answered a real protocol handshake. `stop` is
/// safe from any state, including after a failed start, and never raises.
pub struct BrokerHarness {
    backend: Backend,
    config: StrategyConfig,
    policy: ReadinessPolicy,
    state: HarnessState,
    container: Option<BrokerContainer>,
    endpoint: Option<BrokerEndpoint>,
    log_task: Option<JoinHandle<()>>,
}

impl BrokerHarness {
    /// Harness with default image, tag, and readiness policy.
    pub fn new(backend: Backend) -> Self {
        Self::with_config(backend, StrategyConfig::default(), ReadinessPolicy::default())
    }

    pub fn with_config(backend: Backend, config: StrategyConfig, policy: ReadinessPolicy) -> Self {
        Self {
            backend,
            config,
            policy,
            state: HarnessState::Created,
            container: None,
            endpoint: None,
            log_task: None,
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Allocate a host port, start the broker container, and poll it until
    /// it answers the readiness probe.
    ///
    /// On any step's failure the harness moves to `Errored` and the error
    /// is returned; there is no internal retry of the whole sequence. A
    /// container that started but never became ready is kept so `stop` can
    /// still tear it down. Calling `start` on an already-ready harness is a
    /// no-op.
    pub async fn start(&mut self) -> HarnessResult<()> {
        match self.state {
            HarnessState::Created => {}
            HarnessState::Ready => return Ok(()),
            state => return Err(HarnessError::NotReady { state }),
        }

        info!(
            "starting {} via {} backend",
            self.config.image_ref(),
            self.backend.name()
        );
        self.state = HarnessState::Starting;

        match self.start_sequence().await {
            Ok(endpoint) => {
                info!("broker ready at {}", endpoint);
                self.endpoint = Some(endpoint);
                self.state = HarnessState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!("broker startup failed: {}", e);
                self.state = HarnessState::Errored;
                Err(e)
            }
        }
    }

    async fn start_sequence(&mut self) -> HarnessResult<BrokerEndpoint> {
        let host_port = allocate_free_port()?;
        debug!("allocated host port {}", host_port);

        let container = match self.backend {
            Backend::DockerApi => {
                BrokerContainer::DockerApi(DockerApiBroker::run(host_port, &self.config).await?)
            }
            Backend::Testcontainers => BrokerContainer::Testcontainers(
                TestcontainerBroker::run(host_port, &self.config).await?,
            ),
        };

        let endpoint = container.endpoint();
        // Hold the handle before probing: a readiness timeout must still
        // leave the container reachable for stop()
        self.container = Some(container);

        wait_until_ready(&endpoint, &self.policy, &KafkaMetadataProbe).await?;
        Ok(endpoint)
    }

    /// The broker's resolved endpoint. Only valid while `Ready`.
    pub fn address(&self) -> HarnessResult<BrokerEndpoint> {
        match (self.state, &self.endpoint) {
            (HarnessState::Ready, Some(endpoint)) => Ok(endpoint.clone()),
            (state, _) => Err(HarnessError::NotReady { state }),
        }
    }

    /// Broker address list in `host:port` form, for client configs.
    pub fn broker_addresses(&self) -> HarnessResult<Vec<String>> {
        Ok(vec![self.address()?.to_string()])
    }

    /// Tear down the broker container.
    ///
    /// Valid from any state and idempotent: with no live handle this is a
    /// no-op, and a second call never re-attempts removal. Teardown errors
    /// are logged inside the strategy, never surfaced, so this cannot fail
    /// from the caller's perspective.
    pub async fn stop(&mut self) {
        if self.state == HarnessState::Stopped {
            return;
        }
        if let Some(container) = self.container.take() {
            info!("stopping broker");
            container.stop().await;
        } else {
            debug!("stop called with no broker container");
        }
        // The log forwarder is fire-and-forget: dropping the handle detaches
        // the task, which exits on its own once the stream closes
        self.log_task = None;
        self.endpoint = None;
        self.state = HarnessState::Stopped;
    }

    /// Forward container logs to this process's stdout/stderr.
    ///
    /// Only valid while `Ready`. Supported on the docker-api backend; the
    /// testcontainers backend does not expose a follow-mode stream here, so
    /// the call is accepted and does nothing. Calling it twice does not
    /// start a second forwarder.
    pub fn stream_logs(&mut self) -> HarnessResult<()> {
        if self.state != HarnessState::Ready {
            return Err(HarnessError::NotReady { state: self.state });
        }
        if self.log_task.is_some() {
            return Ok(());
        }
        match &self.container {
            Some(BrokerContainer::DockerApi(broker)) => {
                self.log_task = Some(broker.spawn_log_forwarder());
            }
            _ => debug!("log streaming is only available on the docker-api backend"),
        }
        Ok(())
    }

    #[cfg(test)]
    fn force_state(&mut self, state: HarnessState) {
        self.state = state;
    }
}

impl Drop for BrokerHarness {
    fn drop(&mut self) {
        if self.state == HarnessState::Ready {
            warn!("BrokerHarness dropped while ready; call stop() for clean container teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> BrokerHarness {
        BrokerHarness::new(Backend::DockerApi)
    }

    #[test]
    fn test_new_harness_is_created() {
        assert_eq!(harness().state(), HarnessState::Created);
    }

    #[test]
    fn test_address_fails_in_every_non_ready_state() {
        for state in [
            HarnessState::Created,
            HarnessState::Starting,
            HarnessState::Stopped,
            HarnessState::Errored,
        ] {
            let mut h = harness();
            h.force_state(state);
            match h.address() {
                Err(HarnessError::NotReady { state: reported }) => assert_eq!(reported, state),
                other => panic!("expected NotReady in state {}, got {:?}", state, other),
            }
        }
    }

    #[test]
    fn test_broker_addresses_propagates_not_ready() {
        assert!(matches!(
            harness().broker_addresses(),
            Err(HarnessError::NotReady { .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_without_start_is_a_noop() {
        let mut h = harness();
        h.stop().await;
        assert_eq!(h.state(), HarnessState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut h = harness();
        h.stop().await;
        h.stop().await;
        assert_eq!(h.state(), HarnessState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_from_errored_state() {
        let mut h = harness();
        h.force_state(HarnessState::Errored);
        h.stop().await;
        assert_eq!(h.state(), HarnessState::Stopped);
    }

    #[tokio::test]
    async fn test_start_after_stop_is_rejected() {
        let mut h = harness();
        h.stop().await;
        match h.start().await {
            Err(HarnessError::NotReady { state }) => assert_eq!(state, HarnessState::Stopped),
            other => panic!("expected NotReady, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_logs_requires_ready() {
        let mut h = harness();
        assert!(matches!(
            h.stream_logs(),
            Err(HarnessError::NotReady {
                state: HarnessState::Created
            })
        ));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HarnessState::Starting.to_string(), "starting");
        assert_eq!(HarnessState::Errored.to_string(), "errored");
    }
}
