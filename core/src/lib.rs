//! Netplay Core - Session management and control for rollback netplay
//!
//! This crate establishes a peer-to-peer host/guest session over UDP, submits
//! local input each frame, drains session events, and exposes a control
//! surface the frontend queries and drives without knowing session internals.
//!
//! # Architecture
//!
//! - [`Netplay`] - Control facade; dispatches [`ControlRequest`]s
//! - [`SessionManager`] - Owns the single live session and its lifecycle
//! - [`NetcodeEngine`] - Seam to the rollback engine ([`GgrsEngine`] ships)
//! - [`poll_once`] - Per-tick network step and event drain

pub mod address;
pub mod config;
pub mod control;
pub mod driver;
pub mod engine;
pub mod input;
#[cfg(test)]
mod integration;
pub mod mitm;
pub mod poller;
pub mod session;
#[cfg(test)]
pub mod test_utils;

pub use address::{
    DEFAULT_NETPLAY_PORT, DecodedHostname, HostnameError, RemoteAddress, ResolutionError,
    decode_hostname, resolve,
};
pub use config::{NetplaySettings, load as load_settings, save as save_settings};
pub use control::{ControlError, ControlRequest, Netplay};
pub use driver::{DriverFlags, NetDriverState};
pub use engine::{
    ActorHandle, ActorKind, EngineSession, GameEvent, GgrsEngine, GgrsSession, LocalSocket,
    NetcodeEngine, NetworkEvent, SessionConfig,
};
pub use input::{InputFrame, InputStateProvider, LocalInput, pack_local_input};
pub use mitm::{MITM_SERVERS, MitmServer, find_mitm_server};
pub use poller::{PollSummary, poll_once};
pub use session::{InitError, SessionManager};
