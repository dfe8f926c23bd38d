//! GGRS NonBlockingSocket trait implementation

use std::io;
use std::net::SocketAddr;

use ggrs::NonBlockingSocket;

use super::socket::LocalSocket;

impl NonBlockingSocket<SocketAddr> for LocalSocket {
    fn send_to(&mut self, msg: &ggrs::Message, addr: &SocketAddr) {
        let data = match bincode::serialize(msg) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize message");
                return;
            }
        };

        if let Err(e) = self.socket.send_to(&data, addr) {
            // WouldBlock is expected for non-blocking sockets when buffer is full
            if e.kind() != io::ErrorKind::WouldBlock {
                tracing::warn!(error = %e, %addr, "Failed to send message");
            }
        }
    }

    fn receive_all_messages(&mut self) -> Vec<(SocketAddr, ggrs::Message)> {
        let mut messages = Vec::new();

        loop {
            match self.socket.recv_from(&mut self.recv_buf) {
                Ok((len, from)) => {
                    match bincode::deserialize::<ggrs::Message>(&self.recv_buf[..len]) {
                        Ok(msg) => messages.push((from, msg)),
                        Err(e) => {
                            tracing::warn!(error = %e, %from, "Failed to deserialize message");
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                // ICMP port unreachable from a peer that went away
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "Receive error");
                    break;
                }
            }
        }

        messages
    }
}
