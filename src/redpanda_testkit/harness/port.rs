//! Ephemeral host-port allocation.

use std::net::TcpListener;

use super::error::{HarnessError, HarnessResult};

/// Obtain an OS-assigned free TCP port without holding it.
///
/// Binds a listener on `127.0.0.1:0`, reads the port the OS picked, and
/// releases the listener before returning so the container runtime can bind
/// the same port. Known limitation: another process may claim the port in
/// the window between release and container binding. For a disposable
/// single-run harness that race is accepted rather than worked around with
/// a port-holding scheme that would change how the container is started.
///
/// Allocation failure is fatal to the caller; there are no retries.
pub fn allocate_free_port() -> HarnessResult<u16> {
    let listener =
        TcpListener::bind(("127.0.0.1", 0)).map_err(|e| HarnessError::PortAllocation {
            message: e.to_string(),
        })?;
    let port = listener
        .local_addr()
        .map_err(|e| HarnessError::PortAllocation {
            message: e.to_string(),
        })?
        .port();
    drop(listener);
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocated_port_is_nonzero() {
        let port = allocate_free_port().expect("allocation should succeed");
        assert!(port > 0);
    }

    #[test]
    fn test_allocated_port_is_bindable_after_release() {
        let port = allocate_free_port().expect("allocation should succeed");
        // The listener was dropped, so the port must be free again
        TcpListener::bind(("127.0.0.1", port)).expect("released port should be bindable");
    }

    #[test]
    fn test_allocation_skips_held_ports() {
        let a = allocate_free_port().unwrap();
        // Hold the first port so the OS cannot hand it out again
        let _held = TcpListener::bind(("127.0.0.1", a)).unwrap();
        let b = allocate_free_port().unwrap();
        assert_ne!(a, b);
    }
}
