//! Netcode engine integration
//!
//! The session core drives the external rollback engine through the
//! [`NetcodeEngine`] / [`EngineSession`] traits. The shipped backend wraps
//! GGRS over a non-blocking UDP socket.
//!
//! # Module Structure
//!
//! - `backend`: engine traits and actor handles
//! - `config`: session configuration and constants
//! - `events`: game events and engine error types
//! - `ggrs_backend`: GGRS implementation of the engine traits
//! - `local_socket`: UDP transport adapter

mod backend;
mod config;
mod events;
mod ggrs_backend;
mod local_socket;

pub use backend::{ActorHandle, ActorKind, EngineSession, NetcodeEngine};
pub use config::{DESYNC_CHECK_INTERVAL, INPUT_PREDICTION_WINDOW, SessionConfig};
pub use events::{AdapterError, EngineError, GameEvent, NetworkEvent};
pub use ggrs_backend::{GgrsConfig, GgrsEngine, GgrsSession};
pub use local_socket::{LocalSocket, LocalSocketError};
