//! GGRS-backed netcode engine
//!
//! GGRS needs every remote address before its P2P session can be built, but
//! a host registers its remote actor without one. A hosting `GgrsSession`
//! therefore stays in `AwaitingPeer` until the first inbound datagram names
//! the peer, then builds the P2P session.
//!
//! Player numbering: the host is always GGRS player 0 and the guest player 1,
//! so both sides agree without negotiation.
//!
//! Emulator state is not captured. Each save cell instead holds a running
//! xxh3 digest of every input the session advanced with, and that digest is
//! the frame checksum GGRS exchanges for desync detection. Peers that applied
//! the same confirmed inputs agree on it; rollbacks restore it from the cell.

use std::net::SocketAddr;

use ggrs::{
    Config, DesyncDetection, GgrsError, GgrsEvent, GgrsRequest, P2PSession, PlayerType,
    SessionBuilder, SessionState,
};

use xxhash_rust::xxh3::Xxh3;

use crate::input::{INPUT_FRAME_SIZE, InputFrame};

use super::backend::{ActorHandle, ActorKind, EngineSession, NetcodeEngine};
use super::config::{DESYNC_CHECK_INTERVAL, SessionConfig};
use super::events::{AdapterError, EngineError, GameEvent, NetworkEvent};
use super::local_socket::LocalSocket;

/// GGRS configuration for netplay sessions
pub struct GgrsConfig;

impl Config for GgrsConfig {
    type Input = InputFrame;
    /// Input digest bytes standing in for emulator state
    type State = Vec<u8>;
    type Address = SocketAddr;
}

/// Creates GGRS sessions bound to UDP sockets
#[derive(Debug, Default)]
pub struct GgrsEngine;

impl GgrsEngine {
    pub fn new() -> Self {
        Self
    }
}

impl NetcodeEngine for GgrsEngine {
    type Adapter = LocalSocket;
    type Session = GgrsSession;

    fn create_session(&mut self) -> Result<GgrsSession, EngineError> {
        Ok(GgrsSession::default())
    }

    fn create_adapter(&mut self, port: u16) -> Result<LocalSocket, AdapterError> {
        LocalSocket::bind_port(port).map_err(|e| AdapterError::Bind {
            port,
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Actor {
    Local,
    Remote(Option<SocketAddr>),
}

enum Phase {
    /// Actors are being registered
    Idle,
    /// Started as host; no peer has sent anything yet
    AwaitingPeer,
    /// P2P session built (boxed, GGRS sessions are large)
    Running(Box<P2PSession<GgrsConfig>>),
}

/// A GGRS P2P session in the making
pub struct GgrsSession {
    socket: Option<LocalSocket>,
    actors: Vec<Actor>,
    /// GGRS player handle per actor, filled when the P2P session is built
    player_handles: Vec<usize>,
    config: Option<SessionConfig>,
    phase: Phase,
    events: Vec<GameEvent>,
    /// Digest of all inputs advanced so far
    input_digest: u64,
    /// Local input was accepted since the last update
    input_accepted: bool,
}

impl Default for GgrsSession {
    fn default() -> Self {
        Self {
            socket: None,
            actors: Vec::new(),
            player_handles: Vec::new(),
            config: None,
            phase: Phase::Idle,
            events: Vec::new(),
            input_digest: 0,
            input_accepted: false,
        }
    }
}

impl GgrsSession {
    /// Whether the session waits for a peer to contact it
    fn is_hosting(&self) -> bool {
        self.actors
            .iter()
            .any(|actor| matches!(actor, Actor::Remote(None)))
    }

    /// GGRS player handle for each actor: locals first when hosting,
    /// remotes first when joining.
    fn assign_player_handles(&self) -> Vec<usize> {
        let hosting = self.is_hosting();
        let (first, second): (Vec<usize>, Vec<usize>) = (0..self.actors.len())
            .partition(|&i| matches!(self.actors[i], Actor::Local) == hosting);

        let mut handles = vec![0; self.actors.len()];
        for (player, actor) in first.into_iter().chain(second).enumerate() {
            handles[actor] = player;
        }
        handles
    }

    /// Whether the GGRS session has been built
    pub fn is_connected(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// GGRS player handle of an actor, once assigned
    pub fn player_handle(&self, actor: ActorHandle) -> Option<usize> {
        self.player_handles.get(actor.0).copied()
    }

    /// Build the P2P session. The socket is only handed over once every
    /// player is registered; earlier failures leave it attached.
    fn build_p2p(&mut self) -> Result<(), EngineError> {
        let config = self.config.clone().ok_or(EngineError::NotRunning)?;
        if self.socket.is_none() {
            return Err(EngineError::NoAdapter);
        }

        let num_players = self.actors.len();
        if num_players != config.num_players {
            tracing::debug!(
                configured = config.num_players,
                actors = num_players,
                "Player count follows registered actors"
            );
        }
        if config.post_sync_joining {
            tracing::debug!("Post-sync joining is not supported by GGRS, ignoring");
        }

        let desync = if config.desync_detection {
            DesyncDetection::On {
                interval: DESYNC_CHECK_INTERVAL,
            }
        } else {
            DesyncDetection::Off
        };

        let player_handles = self.assign_player_handles();

        let mut builder = SessionBuilder::<GgrsConfig>::new()
            .with_num_players(num_players)
            .with_max_prediction_window(config.input_prediction_window)
            .with_input_delay(0)
            .with_sparse_saving_mode(config.limited_saving)
            .with_desync_detection_mode(desync);

        for (actor, &player) in self.actors.iter().zip(&player_handles) {
            let player_type = match actor {
                Actor::Local => PlayerType::Local,
                Actor::Remote(Some(addr)) => PlayerType::Remote(*addr),
                Actor::Remote(None) => return Err(EngineError::NotRunning),
            };
            builder = builder.add_player(player_type, player)?;
        }

        let socket = self.socket.take().ok_or(EngineError::NoAdapter)?;
        let session = builder.start_p2p_session(socket)?;
        tracing::info!(players = num_players, "GGRS P2P session started");

        self.player_handles = player_handles;
        self.phase = Phase::Running(Box::new(session));
        Ok(())
    }

    /// Accept the first peer to contact a hosting session.
    ///
    /// Fails when the session cannot be built for that peer; the session is
    /// unusable afterwards.
    fn accept_peer(&mut self) -> Result<(), EngineError> {
        let Some(peer) = self.socket.as_mut().and_then(LocalSocket::poll_for_peer) else {
            return Ok(());
        };

        for actor in &mut self.actors {
            if let Actor::Remote(addr) = actor
                && addr.is_none()
            {
                *addr = Some(peer);
                break;
            }
        }

        match self.build_p2p() {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, %peer, "Failed to start session with peer");
                self.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    fn collect_requests(&mut self, requests: Vec<GgrsRequest<GgrsConfig>>) {
        for request in requests {
            let event = match request {
                GgrsRequest::SaveGameState { cell, frame } => {
                    let digest = self.input_digest;
                    let state = digest.to_le_bytes().to_vec();
                    cell.save(frame, Some(state), Some(digest as u128));
                    GameEvent::Save { frame }
                }
                GgrsRequest::LoadGameState { cell, frame } => {
                    if let Some(state) = cell.load()
                        && let Ok(bytes) = <[u8; 8]>::try_from(state.as_slice())
                    {
                        self.input_digest = u64::from_le_bytes(bytes);
                    }
                    GameEvent::Load { frame }
                }
                GgrsRequest::AdvanceFrame { inputs } => {
                    let inputs: Vec<InputFrame> =
                        inputs.into_iter().map(|(input, _status)| input).collect();
                    self.input_digest = advance_digest(self.input_digest, &inputs);
                    GameEvent::Advance { inputs }
                }
            };
            self.events.push(event);
        }
    }
}

/// Fold one frame's inputs, in player order, into the running digest
fn advance_digest(digest: u64, inputs: &[InputFrame]) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(&digest.to_le_bytes());
    hasher.update(bytemuck::cast_slice(inputs));
    hasher.digest()
}

impl EngineSession for GgrsSession {
    type Adapter = LocalSocket;

    fn set_adapter(&mut self, adapter: LocalSocket) {
        self.socket = Some(adapter);
    }

    fn add_actor(&mut self, kind: ActorKind<'_>) -> ActorHandle {
        let actor = match kind {
            ActorKind::Local => Actor::Local,
            ActorKind::Remote(addr) => Actor::Remote(addr.map(|a| a.socket_addr())),
        };
        self.actors.push(actor);
        ActorHandle(self.actors.len() - 1)
    }

    fn start(&mut self, config: &SessionConfig) -> Result<(), EngineError> {
        if config.input_size != INPUT_FRAME_SIZE {
            return Err(EngineError::Ggrs(format!(
                "input size {} does not match {}",
                config.input_size, INPUT_FRAME_SIZE
            )));
        }
        if self.socket.is_none() {
            return Err(EngineError::NoAdapter);
        }
        self.config = Some(config.clone());

        if self.is_hosting() {
            self.phase = Phase::AwaitingPeer;
            return Ok(());
        }

        let peer = self.actors.iter().find_map(|actor| match actor {
            Actor::Remote(addr) => *addr,
            Actor::Local => None,
        });
        if let (Some(peer), Some(socket)) = (peer, self.socket.as_mut()) {
            socket.connect(peer);
        }
        self.build_p2p()
    }

    fn add_local_input(&mut self, actor: ActorHandle, input: InputFrame) -> Result<(), EngineError> {
        let player = self
            .player_handle(actor)
            .ok_or(EngineError::UnknownActor(actor.0))?;
        match &mut self.phase {
            Phase::Running(session) => {
                session.add_local_input(player, input)?;
                self.input_accepted = true;
                Ok(())
            }
            Phase::Idle | Phase::AwaitingPeer => Err(EngineError::NotRunning),
        }
    }

    fn network_poll(&mut self) -> Result<(), EngineError> {
        match &mut self.phase {
            Phase::Running(session) => {
                session.poll_remote_clients();
                Ok(())
            }
            Phase::AwaitingPeer => self.accept_peer(),
            Phase::Idle => Ok(()),
        }
    }

    fn update_session(&mut self) -> std::vec::Drain<'_, GameEvent> {
        let mut ggrs_events = Vec::new();
        let mut requests = Vec::new();
        // GGRS only advances once every local player has input for the frame
        let input_accepted = std::mem::take(&mut self.input_accepted);

        if let Phase::Running(session) = &mut self.phase {
            if input_accepted && session.current_state() == SessionState::Running {
                match session.advance_frame() {
                    Ok(reqs) => requests = reqs,
                    Err(GgrsError::PredictionThreshold) => {
                        tracing::debug!("Prediction threshold reached, waiting for remote input");
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to advance frame"),
                }
            }
            ggrs_events.extend(session.events());
        }

        self.collect_requests(requests);
        self.events
            .extend(ggrs_events.into_iter().map(|e| GameEvent::Network(translate_event(e))));
        self.events.drain(..)
    }
}

fn translate_event(event: GgrsEvent<GgrsConfig>) -> NetworkEvent {
    match event {
        GgrsEvent::Synchronizing { total, count, .. } => NetworkEvent::Synchronizing {
            count: count as u32,
            total: total as u32,
        },
        GgrsEvent::Synchronized { .. } => NetworkEvent::Synchronized,
        GgrsEvent::Disconnected { .. } => NetworkEvent::Disconnected,
        GgrsEvent::NetworkInterrupted {
            disconnect_timeout, ..
        } => NetworkEvent::Interrupted {
            disconnect_timeout_ms: disconnect_timeout as u64,
        },
        GgrsEvent::NetworkResumed { .. } => NetworkEvent::Resumed,
        GgrsEvent::WaitRecommendation { skip_frames } => NetworkEvent::WaitRecommendation {
            skip_frames: skip_frames as u32,
        },
        GgrsEvent::DesyncDetected {
            frame,
            local_checksum,
            remote_checksum,
            ..
        } => NetworkEvent::Desync {
            frame,
            local_checksum: local_checksum as u128,
            remote_checksum: remote_checksum as u128,
        },
    }
}
