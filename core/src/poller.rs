//! Per-tick event polling
//!
//! Drives the engine's network step and drains its event queue once per
//! simulation tick, after local input for that tick has been submitted.

use crate::engine::{EngineError, EngineSession, GameEvent, NetworkEvent};

/// What one poll drained from the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Frames the engine advanced
    pub advanced: u32,
    /// Save requests drained
    pub saves: u32,
    /// Load requests drained
    pub loads: u32,
    /// Connection notifications drained
    pub network: u32,
    /// Whether a peer finished synchronizing during this poll
    pub synchronized: bool,
    /// Whether a desync was reported during this poll
    pub desync: bool,
}

impl PollSummary {
    /// Total number of events drained
    pub fn total(&self) -> u32 {
        self.advanced + self.saves + self.loads + self.network
    }

    /// Save/load requests that reached the core without being executed
    pub fn unhandled_state_requests(&self) -> u32 {
        self.saves + self.loads
    }
}

/// Run one network step and drain every pending event.
///
/// The drained events borrow the session and are gone once this returns.
/// Fails only when the network step reports the session dead.
pub fn poll_once<S: EngineSession + ?Sized>(session: &mut S) -> Result<PollSummary, EngineError> {
    session.network_poll()?;

    let mut summary = PollSummary::default();
    let events = session.update_session();
    tracing::trace!(count = events.len(), "Draining session events");

    for event in events {
        match event {
            // Inputs are applied inside the engine; nothing to re-apply here
            GameEvent::Advance { .. } => summary.advanced += 1,
            // Emulator save states are not wired to the engine yet
            GameEvent::Save { frame } => {
                tracing::trace!(frame, "Save state request not handled");
                summary.saves += 1;
            }
            GameEvent::Load { frame } => {
                tracing::trace!(frame, "Load state request not handled");
                summary.loads += 1;
            }
            GameEvent::Network(event) => {
                summary.network += 1;
                match &event {
                    NetworkEvent::Synchronized => summary.synchronized = true,
                    NetworkEvent::Desync { .. } => summary.desync = true,
                    _ => {}
                }
                log_network_event(&event);
            }
        }
    }

    Ok(summary)
}

fn log_network_event(event: &NetworkEvent) {
    match event {
        NetworkEvent::Synchronizing { count, total } => {
            tracing::debug!("Synchronizing: {}/{}", count, total);
        }
        NetworkEvent::Synchronized => tracing::info!("Peer synchronized"),
        NetworkEvent::Disconnected => tracing::warn!("Peer disconnected"),
        NetworkEvent::Interrupted {
            disconnect_timeout_ms,
        } => {
            tracing::warn!("Network interrupted, disconnect in {}ms", disconnect_timeout_ms);
        }
        NetworkEvent::Resumed => tracing::info!("Network resumed"),
        NetworkEvent::WaitRecommendation { skip_frames } => {
            tracing::debug!("Wait recommendation: skip {} frames", skip_frames);
        }
        NetworkEvent::Desync {
            frame,
            local_checksum,
            remote_checksum,
        } => {
            tracing::error!(
                "DESYNC at frame {}: local={:#x}, remote={:#x}",
                frame,
                local_checksum,
                remote_checksum
            );
        }
    }
}
