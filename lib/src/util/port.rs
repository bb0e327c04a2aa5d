//! Local port checks for tunnels.
//!
//! This is a heuristic: another process may bind the port between the check
//! and its use by the tunnel.

use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::Error;
use crate::error::Result;

/// Ports handed out for ephemeral use.
pub const EPHEMERAL_PORTS: RangeInclusive<u16> = 49152..=65535;

/// Number of ports tried before giving up.
pub const MAX_ATTEMPTS: usize = 10;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(100);

/// Whether a local port is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Free,
    Occupied,
}

/// Picks a random ephemeral port that nothing on localhost answers on.
///
/// # Errors
///
/// - [`Error::NoFreePortFound`] after [`MAX_ATTEMPTS`] occupied ports.
pub async fn find_free_port(rng: &mut impl Rng) -> Result<u16> {
    for _ in 0..MAX_ATTEMPTS {
        let port = rng.random_range(EPHEMERAL_PORTS);
        match port_state(port).await {
            PortState::Free => return Ok(port),
            PortState::Occupied => debug!(port, "local port occupied"),
        }
    }
    Err(Error::NoFreePortFound {
        attempts: MAX_ATTEMPTS,
    })
}

/// Connects to `127.0.0.1:port`. Only a refused connection means free; a
/// timeout or an accepted connection both mean occupied.
pub async fn port_state(port: u16) -> PortState {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(Err(error)) if error.kind() == ErrorKind::ConnectionRefused => PortState::Free,
        Ok(Ok(_stream)) => PortState::Occupied,
        Ok(Err(error)) => {
            debug!(port, ?error, "unexpected connect failure");
            PortState::Occupied
        }
        Err(_elapsed) => PortState::Occupied,
    }
}
