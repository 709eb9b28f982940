//! Container backend selection.

/// Environment variable that selects the container backend for a test run.
///
/// Recognized values: `docker-api` (default) and `testcontainers`.
pub const BACKEND_ENV: &str = "TESTKIT_BACKEND";

/// Which container backend starts and stops the broker.
///
/// Read once at suite setup and passed into the harness constructor; the
/// harness never consults the environment again after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Drive the Docker daemon directly (create, start, stop, logs)
    #[default]
    DockerApi,
    /// Declarative container request through the testcontainers runtime
    Testcontainers,
}

impl Backend {
    /// Resolve the backend from the `TESTKIT_BACKEND` environment variable.
    ///
    /// Unset selects the default. Unrecognized values also select the
    /// default, with a warning rather than a failure, so a typo in CI
    /// configuration cannot break an entire suite.
    pub fn from_env() -> Self {
        match std::env::var(BACKEND_ENV)
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "testcontainers" => Backend::Testcontainers,
            "" | "docker-api" => Backend::DockerApi,
            other => {
                log::warn!(
                    "{}='{}' is not a recognized backend, falling back to docker-api",
                    BACKEND_ENV,
                    other
                );
                Backend::DockerApi
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::DockerApi => "docker-api",
            Backend::Testcontainers => "testcontainers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_default_when_unset() {
        std::env::remove_var(BACKEND_ENV);
        assert_eq!(Backend::from_env(), Backend::DockerApi);
    }

    #[test]
    #[serial]
    fn test_from_env_testcontainers() {
        std::env::set_var(BACKEND_ENV, "testcontainers");
        assert_eq!(Backend::from_env(), Backend::Testcontainers);
        std::env::remove_var(BACKEND_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_is_case_insensitive() {
        std::env::set_var(BACKEND_ENV, "Testcontainers");
        assert_eq!(Backend::from_env(), Backend::Testcontainers);
        std::env::remove_var(BACKEND_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_unrecognized_falls_back_to_default() {
        std::env::set_var(BACKEND_ENV, "podman");
        assert_eq!(Backend::from_env(), Backend::DockerApi);
        std::env::remove_var(BACKEND_ENV);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::DockerApi.name(), "docker-api");
        assert_eq!(Backend::Testcontainers.name(), "testcontainers");
    }
}
