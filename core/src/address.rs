//! Remote address resolution and hostname decoding
//!
//! Turns user-supplied `host[:port]` strings into owned transport addresses
//! that the netcode engine can hand to its socket adapter.

use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// Default netplay port used when a hostname carries no `:port` suffix
pub const DEFAULT_NETPLAY_PORT: u16 = 55435;

/// Capacity of host/session string buffers handed to the frontend
pub const NETPLAY_HOST_STR_LEN: usize = 256;

/// Native `sockaddr_in` length
const SOCKADDR_IN_LEN: usize = 16;

/// Native `sockaddr_in6` length
const SOCKADDR_IN6_LEN: usize = 28;

const AF_INET: u16 = 2;
const AF_INET6: u16 = 10;

/// Error returned when a remote host cannot be turned into an address
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No host was given (only hosts may skip resolution)
    #[error("no remote host given")]
    EmptyHost,
    /// The system resolver rejected the lookup
    #[error("failed to resolve remote host '{host}:{port}': {source}")]
    Lookup {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    /// The lookup succeeded but produced no usable address
    #[error("remote host '{host}:{port}' resolved to no addresses")]
    NoAddresses { host: String, port: u16 },
}

/// A resolved remote transport address.
///
/// Holds the parsed socket address together with an owned copy of its
/// native sockaddr encoding, sized exactly to the address family's length.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    addr: SocketAddr,
    raw: Box<[u8]>,
}

impl RemoteAddress {
    /// Wrap an already-resolved socket address
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            raw: encode_sockaddr(&addr),
        }
    }

    /// The parsed socket address
    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Raw sockaddr bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Length of the raw sockaddr encoding
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl std::fmt::Debug for RemoteAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAddress")
            .field("addr", &self.addr)
            .field("len", &self.raw.len())
            .finish()
    }
}

/// Lay out a socket address the way the platform's `sockaddr_in`/`sockaddr_in6`
/// does: family, big-endian port, then the address body.
fn encode_sockaddr(addr: &SocketAddr) -> Box<[u8]> {
    let mut buf = Vec::with_capacity(SOCKADDR_IN6_LEN);
    match addr {
        SocketAddr::V4(v4) => {
            buf.extend_from_slice(&AF_INET.to_ne_bytes());
            buf.extend_from_slice(&v4.port().to_be_bytes());
            buf.extend_from_slice(&v4.ip().octets());
            buf.resize(SOCKADDR_IN_LEN, 0);
        }
        SocketAddr::V6(v6) => {
            buf.extend_from_slice(&AF_INET6.to_ne_bytes());
            buf.extend_from_slice(&v6.port().to_be_bytes());
            buf.extend_from_slice(&v6.flowinfo().to_be_bytes());
            buf.extend_from_slice(&v6.ip().octets());
            buf.extend_from_slice(&v6.scope_id().to_ne_bytes());
        }
    }
    buf.into_boxed_slice()
}

/// Resolve `server:port` into an owned remote address.
///
/// Only the first address returned by the system resolver is kept. Nothing
/// is allocated when the lookup fails.
pub fn resolve(server: &str, port: u16) -> Result<RemoteAddress, ResolutionError> {
    if server.is_empty() {
        return Err(ResolutionError::EmptyHost);
    }

    let mut addrs = (server, port)
        .to_socket_addrs()
        .map_err(|source| ResolutionError::Lookup {
            host: server.to_owned(),
            port,
            source,
        })?;

    let addr = addrs.next().ok_or_else(|| ResolutionError::NoAddresses {
        host: server.to_owned(),
        port,
    })?;

    tracing::debug!(%addr, "Resolved remote host");
    Ok(RemoteAddress::new(addr))
}

/// Error returned by [`decode_hostname`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostnameError {
    #[error("port '{0}' is out of range")]
    PortOutOfRange(String),
}

/// A `host[:port]` string split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHostname {
    pub address: String,
    pub port: u16,
    /// MITM session id; always empty with the current backend
    pub session: String,
}

/// Split `host[:port]` into address and port.
///
/// `len` is the capacity of the caller's destination buffer: the address is
/// truncated to at most `len - 1` bytes. Without a colon the port defaults
/// to [`DEFAULT_NETPLAY_PORT`].
pub fn decode_hostname(hostname: &str, len: usize) -> Result<DecodedHostname, HostnameError> {
    let (host, port) = match hostname.split_once(':') {
        Some((host, port_str)) => (host, parse_port(port_str)?),
        None => (hostname, DEFAULT_NETPLAY_PORT),
    };

    Ok(DecodedHostname {
        address: bounded_copy(host, len),
        port,
        session: String::new(),
    })
}

/// Leading decimal digits as a port; no digits yields 0.
fn parse_port(s: &str) -> Result<u16, HostnameError> {
    let digits_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    let digits = &s[..digits_end];

    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<u16>()
        .map_err(|_| HostnameError::PortOutOfRange(digits.to_owned()))
}

/// Copy at most `cap - 1` bytes of `s`, never splitting a character.
pub(crate) fn bounded_copy(s: &str, cap: usize) -> String {
    let max = cap.saturating_sub(1);
    if s.len() <= max {
        return s.to_owned();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_owned()
}
