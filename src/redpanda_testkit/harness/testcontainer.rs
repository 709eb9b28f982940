//! Broker container strategy driving the testcontainers runtime.

use log::{debug, info, warn};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

use super::config::StrategyConfig;
use super::error::{HarnessError, HarnessResult};
use super::BrokerEndpoint;

/// Log line Redpanda prints once its startup sequence has finished
const STARTED_LOG_LINE: &str = "Successfully started Redpanda!";

/// A broker container owned by the testcontainers runtime.
///
/// The declarative request carries a wait-for-log condition, so `run`
/// returns with the broker process up. That is a start-completion gate
/// only; protocol readiness is still the caller's probe to make.
pub struct TestcontainerBroker {
    container: ContainerAsync<GenericImage>,
    host_port: u16,
    advertised_host: String,
}

impl TestcontainerBroker {
    /// Start the broker from a declarative container request, then resolve
    /// the actual mapped host port.
    ///
    /// The runtime is allowed to renumber the requested binding, so the
    /// port is always re-read from the started container rather than
    /// assumed from the request.
    pub async fn run(host_port: u16, config: &StrategyConfig) -> HarnessResult<Self> {
        let request = GenericImage::new(config.image.clone(), config.tag.clone())
            .with_exposed_port(host_port.tcp())
            .with_wait_for(WaitFor::message_on_stderr(STARTED_LOG_LINE))
            .with_mapped_port(host_port, host_port.tcp())
            .with_cmd(config.start_command(host_port, host_port));

        let container = request
            .start()
            .await
            .map_err(|e| HarnessError::ContainerStart {
                message: "could not create broker container".to_string(),
                source: Some(e.to_string()),
            })?;

        let mapped_port = container
            .get_host_port_ipv4(host_port.tcp())
            .await
            .map_err(|e| HarnessError::ContainerStart {
                message: "could not resolve mapped broker port".to_string(),
                source: Some(e.to_string()),
            })?;
        if mapped_port != host_port {
            debug!(
                "requested host port {} was remapped to {}",
                host_port, mapped_port
            );
        }

        info!(
            "started broker container via testcontainers on host port {}",
            mapped_port
        );

        Ok(Self {
            container,
            host_port: mapped_port,
            advertised_host: config.advertised_host.clone(),
        })
    }

    /// The address clients reach the broker on: the runtime-reported mapped
    /// port, not the requested one.
    pub fn endpoint(&self) -> BrokerEndpoint {
        BrokerEndpoint::new(self.advertised_host.clone(), self.host_port)
    }

    /// Best-effort teardown; errors are logged and swallowed.
    pub async fn stop(self) {
        debug!("stopping testcontainers broker");
        if let Err(e) = self.container.stop().await {
            warn!("could not stop broker container: {}", e);
        }
        if let Err(e) = self.container.rm().await {
            warn!("could not remove broker container: {}", e);
        }
    }
}
