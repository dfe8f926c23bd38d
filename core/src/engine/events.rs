//! Events produced by the netcode engine and engine error types

use ggrs::GgrsError;
use thiserror::Error;

use crate::input::InputFrame;

/// An event drained from the engine during one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Advance the simulation by one frame with these inputs
    ///
    /// The engine has already applied the inputs; the session core does not
    /// re-apply them.
    Advance {
        /// Inputs for every player, in player order
        inputs: Vec<InputFrame>,
    },
    /// The engine wants the emulator state for `frame` saved
    Save { frame: i32 },
    /// The engine wants the emulator state for `frame` restored
    Load { frame: i32 },
    /// Connection notification
    Network(NetworkEvent),
}

/// Connection notifications reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Synchronization with a peer is in progress
    Synchronizing { count: u32, total: u32 },
    /// Connection synchronized with a peer
    Synchronized,
    /// A peer disconnected
    Disconnected,
    /// No packets from a peer for a while
    Interrupted {
        /// Time until the peer is dropped (ms)
        disconnect_timeout_ms: u64,
    },
    /// Packets from a peer arrive again
    Resumed,
    /// Local side is ahead; skipping frames is recommended
    WaitRecommendation { skip_frames: u32 },
    /// Peers computed different checksums for the same frame
    ///
    /// Game state has diverged and cannot be recovered.
    Desync {
        frame: i32,
        local_checksum: u128,
        remote_checksum: u128,
    },
}

/// Transport adapter creation failure
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter could not bind its port (e.g. already in use)
    #[error("failed to create transport adapter on port {port}: {reason}")]
    Bind { port: u16, reason: String },
}

/// Netcode engine failures
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not allocate a session
    #[error("failed to create engine session")]
    SessionCreate,
    /// `start` was called before a transport adapter was attached
    #[error("no transport adapter attached")]
    NoAdapter,
    /// Operation needs a started, connected session
    #[error("session is not running")]
    NotRunning,
    /// Actor handle unknown to this session
    #[error("unknown actor handle {0}")]
    UnknownActor(usize),
    /// Error reported by GGRS
    #[error("GGRS error: {0}")]
    Ggrs(String),
}

impl From<GgrsError> for EngineError {
    fn from(e: GgrsError) -> Self {
        Self::Ggrs(e.to_string())
    }
}
