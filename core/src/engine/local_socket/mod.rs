//! Non-blocking UDP transport adapter
//!
//! Wraps a UDP socket and implements GGRS's `NonBlockingSocket` trait so the
//! GGRS backend can exchange messages with a single peer.
//!
//! # Usage
//!
//! ```ignore
//! // Host: bind and wait for the first datagram to learn the peer
//! let mut socket = LocalSocket::bind_port(55435)?;
//! let peer = socket.poll_for_peer();
//!
//! // Guest: bind any port and point at the resolved host
//! let mut socket = LocalSocket::bind_port(0)?;
//! socket.connect(remote.socket_addr());
//! ```
//!
//! # Limitations
//!
//! - No NAT traversal
//! - Point-to-point only

mod error;
mod ggrs_impl;
mod socket;


pub use error::LocalSocketError;
pub use socket::LocalSocket;
