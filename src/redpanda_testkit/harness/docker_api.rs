//! Broker container strategy driving the Docker daemon directly.

use bollard::container::{
    Config, LogOutput, LogsOptions, RemoveContainerOptions, StopContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, PortBinding};
use bollard::Docker;
use futures::{StreamExt, TryStreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::Write;

use super::config::StrategyConfig;
use super::error::{HarnessError, HarnessResult};
use super::BrokerEndpoint;

/// A broker container owned by this strategy instance.
///
/// The container is created with auto-remove so a stopped container reaps
/// itself even if the explicit removal below never runs (say, the test
/// process was killed). The handle is never shared; [`DockerApiBroker::stop`]
/// consumes it, so stop+remove happens at most once.
pub struct DockerApiBroker {
    docker: Docker,
    container_id: String,
    host_port: u16,
    advertised_host: String,
}

impl DockerApiBroker {
    /// Pull the broker image, create the container with the host port bound
    /// to the broker's Kafka port, and start it.
    ///
    /// Returns once the daemon reports the container as started. That is
    /// not the same as protocol-ready; the caller still has to probe.
    pub async fn run(host_port: u16, config: &StrategyConfig) -> HarnessResult<Self> {
        let docker = Docker::connect_with_local_defaults().map_err(|e| start_error(
            "could not connect to the Docker daemon",
            e,
        ))?;

        let image_ref = config.image_ref();
        debug!("pulling image {}", image_ref);
        docker
            .create_image(
                Some(CreateImageOptions {
                    from_image: config.image.clone(),
                    tag: config.tag.clone(),
                    ..Default::default()
                }),
                None,
                None,
            )
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| start_error("could not pull broker image", e))?;

        let container_port = format!("{}/tcp", config.kafka_port);

        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            container_port.clone(),
            Some(vec![PortBinding {
                host_ip: Some(config.advertised_host.clone()),
                host_port: Some(host_port.to_string()),
            }]),
        );

        let mut exposed_ports = HashMap::new();
        exposed_ports.insert(container_port, HashMap::new());

        let container_config = Config {
            image: Some(image_ref.clone()),
            cmd: Some(config.start_command(config.kafka_port, host_port)),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                auto_remove: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let created = docker
            .create_container::<String, String>(None, container_config)
            .await
            .map_err(|e| start_error("could not create broker container", e))?;

        docker
            .start_container::<String>(&created.id, None)
            .await
            .map_err(|e| start_error("could not start broker container", e))?;

        info!(
            "started broker container {} ({}) on host port {}",
            short_id(&created.id),
            image_ref,
            host_port
        );

        Ok(Self {
            docker,
            container_id: created.id,
            host_port,
            advertised_host: config.advertised_host.clone(),
        })
    }

    /// The address clients reach the broker on: the host port chosen at
    /// allocation time.
    pub fn endpoint(&self) -> BrokerEndpoint {
        BrokerEndpoint::new(self.advertised_host.clone(), self.host_port)
    }

    /// Best-effort teardown: stop, then force-remove.
    ///
    /// Errors are logged and swallowed; a flaky removal must never fail the
    /// surrounding test teardown. Removal after a successful stop usually
    /// races the daemon's auto-remove reaper, so its failure is expected.
    pub async fn stop(self) {
        debug!("stopping broker container {}", short_id(&self.container_id));
        if let Err(e) = self
            .docker
            .stop_container(&self.container_id, Some(StopContainerOptions { t: 10 }))
            .await
        {
            warn!(
                "could not stop container {}: {}",
                short_id(&self.container_id),
                e
            );
        }
        if let Err(e) = self
            .docker
            .remove_container(
                &self.container_id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await
        {
            debug!(
                "container {} already removed: {}",
                short_id(&self.container_id),
                e
            );
        }
    }

    /// Forward the container's combined output to this process's stdout and
    /// stderr.
    ///
    /// Fire-and-forget: the returned task is not joined by anyone and may
    /// outlive container removal by a short window, at which point the log
    /// stream closes and the task exits quietly.
    pub fn spawn_log_forwarder(&self) -> tokio::task::JoinHandle<()> {
        let docker = self.docker.clone();
        let container_id = self.container_id.clone();
        tokio::spawn(async move {
            let options = LogsOptions::<String> {
                follow: true,
                stdout: true,
                stderr: true,
                timestamps: true,
                ..Default::default()
            };
            let mut stream = docker.logs(&container_id, Some(options));
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(LogOutput::StdErr { message }) => {
                        let _ = std::io::stderr().write_all(&message);
                    }
                    Ok(output) => {
                        let _ = std::io::stdout().write_all(&output.into_bytes());
                    }
                    Err(e) => {
                        debug!("log stream for {} ended: {}", short_id(&container_id), e);
                        break;
                    }
                }
            }
        })
    }
}

fn start_error(message: &str, source: impl std::fmt::Display) -> HarnessError {
    HarnessError::ContainerStart {
        message: message.to_string(),
        source: Some(source.to_string()),
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_truncates_long_ids() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_eq!(short_id(id), "0123456789ab");
    }

    #[test]
    fn test_short_id_keeps_short_ids() {
        assert_eq!(short_id("abc"), "abc");
    }
}
