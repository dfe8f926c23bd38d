//! Core UDP socket implementation

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use super::error::LocalSocketError;

/// Buffer size for incoming packets (GGRS packets are small)
const RECV_BUFFER_SIZE: usize = 4096;

/// Non-blocking UDP socket used as the session's transport adapter
///
/// Implements `NonBlockingSocket<SocketAddr>` for GGRS.
pub struct LocalSocket {
    pub(super) socket: UdpSocket,
    pub(super) local_addr: SocketAddr,
    /// Peer address (for point-to-point)
    pub(super) peer_addr: Option<SocketAddr>,
    /// Receive buffer
    pub(super) recv_buf: Vec<u8>,
}

impl LocalSocket {
    /// Bind to the specified address
    ///
    /// # Arguments
    ///
    /// * `addr` - Address to bind to (e.g., "127.0.0.1:55435" or "0.0.0.0:55435")
    pub fn bind(addr: &str) -> Result<Self, LocalSocketError> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| LocalSocketError::Bind(format!("Invalid address '{}': {}", addr, e)))?;

        let socket =
            UdpSocket::bind(socket_addr).map_err(|e| LocalSocketError::Bind(e.to_string()))?;

        socket
            .set_nonblocking(true)
            .map_err(|e| LocalSocketError::NonBlocking(e.to_string()))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| LocalSocketError::Bind(format!("Failed to get local addr: {}", e)))?;

        tracing::info!(port = local_addr.port(), "LocalSocket bound");

        Ok(Self {
            socket,
            local_addr,
            peer_addr: None,
            recv_buf: vec![0u8; RECV_BUFFER_SIZE],
        })
    }

    /// Bind to `port` on all interfaces (0 picks any free port)
    pub fn bind_port(port: u16) -> Result<Self, LocalSocketError> {
        Self::bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)).to_string())
    }

    /// Set the peer this socket talks to
    pub fn connect(&mut self, peer: SocketAddr) {
        tracing::info!(port = peer.port(), "LocalSocket connecting");
        self.peer_addr = Some(peer);
    }

    /// Get the local address this socket is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get the peer address if known
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Check if a peer is known
    pub fn is_connected(&self) -> bool {
        self.peer_addr.is_some()
    }

    /// Get a reference to the underlying UDP socket
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    /// Poll for a peer connection (non-blocking)
    ///
    /// Adopts the sender of the first pending GGRS message as the peer. That
    /// message stays queued so GGRS still receives it. Datagrams that do not
    /// decode as GGRS messages are discarded.
    pub fn poll_for_peer(&mut self) -> Option<SocketAddr> {
        loop {
            let (len, from) = self.socket.peek_from(&mut self.recv_buf).ok()?;

            if bincode::deserialize::<ggrs::Message>(&self.recv_buf[..len]).is_ok() {
                tracing::info!(%from, "Peer connected");
                self.peer_addr = Some(from);
                return Some(from);
            }

            tracing::debug!(%from, "Ignoring stray datagram while awaiting peer");
            self.socket.recv_from(&mut self.recv_buf).ok()?;
        }
    }

    /// Get local IP addresses to share with a joining peer
    ///
    /// Returns the routable non-loopback IPv4 address, if any, followed by
    /// localhost.
    pub fn get_local_ips() -> Vec<IpAddr> {
        let mut ips = Vec::new();

        // Connecting a UDP socket sends nothing; it only picks the route
        if let Ok(socket) = UdpSocket::bind("0.0.0.0:0")
            && socket.connect("8.8.8.8:80").is_ok()
            && let Ok(addr) = socket.local_addr()
            && let IpAddr::V4(ipv4) = addr.ip()
            && !ipv4.is_loopback()
        {
            ips.push(IpAddr::V4(ipv4));
        }

        ips.push(IpAddr::V4(Ipv4Addr::LOCALHOST));

        ips
    }
}

impl std::fmt::Debug for LocalSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSocket")
            .field("local_addr", &self.local_addr)
            .field("peer_addr", &self.peer_addr)
            .finish()
    }
}
