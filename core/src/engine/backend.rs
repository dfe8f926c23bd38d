//! Netcode engine seam
//!
//! The session core never talks to a rollback library directly. It drives a
//! [`NetcodeEngine`] to create sessions and transport adapters, and an
//! [`EngineSession`] to register actors, submit input and drain events.

use crate::address::RemoteAddress;
use crate::input::InputFrame;

use super::config::SessionConfig;
use super::events::{AdapterError, EngineError, GameEvent};

/// Opaque identifier of a local or remote participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub usize);

/// Kind of actor being registered
#[derive(Debug, Clone, Copy)]
pub enum ActorKind<'a> {
    /// Player controlled on this machine
    Local,
    /// Player on a peer; `None` while awaiting an inbound connection
    Remote(Option<&'a RemoteAddress>),
}

/// Factory for engine sessions and their transport adapters
pub trait NetcodeEngine {
    /// Transport adapter (socket) type
    type Adapter;
    /// Session handle type; dropping it destroys the session
    type Session: EngineSession<Adapter = Self::Adapter>;

    /// Allocate an empty, unconfigured session
    fn create_session(&mut self) -> Result<Self::Session, EngineError>;

    /// Create a transport adapter bound to `port`
    fn create_adapter(&mut self, port: u16) -> Result<Self::Adapter, AdapterError>;
}

/// A live engine session
pub trait EngineSession {
    type Adapter;

    /// Hand the transport adapter to the session, which owns it from then on
    fn set_adapter(&mut self, adapter: Self::Adapter);

    /// Register a participant and return its handle
    fn add_actor(&mut self, kind: ActorKind<'_>) -> ActorHandle;

    /// Start the session with the given configuration
    fn start(&mut self, config: &SessionConfig) -> Result<(), EngineError>;

    /// Submit this tick's input for a local actor
    fn add_local_input(&mut self, actor: ActorHandle, input: InputFrame)
        -> Result<(), EngineError>;

    /// Process pending inbound datagrams without blocking.
    ///
    /// An error means the session can no longer run and must be torn down.
    fn network_poll(&mut self) -> Result<(), EngineError>;

    /// Advance the session and drain every event produced since the last
    /// call. The events are only valid while the returned iterator lives.
    fn update_session(&mut self) -> std::vec::Drain<'_, GameEvent>;
}
