//! Network driver state shared with frontend startup
//!
//! Holds a connect target registered before content is loaded. Startup
//! sequencing consumes it later; nothing here opens a connection.

use crate::address::{NETPLAY_HOST_STR_LEN, bounded_copy};

bitflags::bitflags! {
    /// Driver state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DriverFlags: u8 {
        /// A deferred connect target is pending
        const DEFERRED = 1 << 0;
    }
}

/// A connect target waiting for frontend startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTarget {
    pub server: String,
    pub port: u16,
}

/// Frontend-visible driver state
#[derive(Debug, Clone, Default)]
pub struct NetDriverState {
    pub server_address_deferred: String,
    pub server_port_deferred: u16,
    pub flags: DriverFlags,
}

impl NetDriverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connect target for later and mark it pending.
    ///
    /// An absent server is stored as empty (host on startup).
    pub fn register_deferred(&mut self, server: Option<&str>, port: u16) {
        self.server_address_deferred =
            bounded_copy(server.unwrap_or_default(), NETPLAY_HOST_STR_LEN);
        self.server_port_deferred = port;
        self.flags.insert(DriverFlags::DEFERRED);
        tracing::debug!(
            server = %self.server_address_deferred,
            port,
            "Deferred netplay connect registered"
        );
    }

    pub fn is_deferred(&self) -> bool {
        self.flags.contains(DriverFlags::DEFERRED)
    }

    /// Consume the pending target, if any.
    pub fn take_deferred(&mut self) -> Option<DeferredTarget> {
        if !self.is_deferred() {
            return None;
        }
        self.flags.remove(DriverFlags::DEFERRED);
        Some(DeferredTarget {
            server: std::mem::take(&mut self.server_address_deferred),
            port: std::mem::take(&mut self.server_port_deferred),
        })
    }
}
