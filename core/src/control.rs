//! Netplay control surface
//!
//! The frontend drives netplay through [`Netplay::dispatch`] with a
//! [`ControlRequest`], and through the facade methods for enabling and
//! disabling sessions. Requests without a backing implementation report
//! `false` instead of failing hard.

use thiserror::Error;

use crate::config::NetplaySettings;
use crate::driver::NetDriverState;
use crate::engine::NetcodeEngine;
use crate::input::InputStateProvider;
use crate::session::SessionManager;

/// Every control operation the frontend can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    IsEnabled,
    IsServer,
    IsConnected,
    IsPlaying,
    IsSpectating,
    IsReplaying,
    IsDataInited,
    EnableServer,
    EnableClient,
    Disable,
    Disconnect,
    /// Per-tick hook before the core runs
    PreFrame,
    /// Per-tick hook after the core runs
    PostFrame,
    AllowPause,
    AllowTimeskip,
    Pause,
    Unpause,
    GameWatch,
    PlayerChat(String),
    LoadSavestate,
    Reset,
    FinishedNatTraversal,
    DesyncPush,
    DesyncPop,
    RefreshClientInfo,
    SetCorePacketInterface,
    UseCorePacketInterface,
    KickClient { client: u32 },
    BanClient { client: u32 },
    AddForkArg(String),
    GetForkArgs,
    ClearForkArgs,
}

impl ControlRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsEnabled => "is_enabled",
            Self::IsServer => "is_server",
            Self::IsConnected => "is_connected",
            Self::IsPlaying => "is_playing",
            Self::IsSpectating => "is_spectating",
            Self::IsReplaying => "is_replaying",
            Self::IsDataInited => "is_data_inited",
            Self::EnableServer => "enable_server",
            Self::EnableClient => "enable_client",
            Self::Disable => "disable",
            Self::Disconnect => "disconnect",
            Self::PreFrame => "pre_frame",
            Self::PostFrame => "post_frame",
            Self::AllowPause => "allow_pause",
            Self::AllowTimeskip => "allow_timeskip",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::GameWatch => "game_watch",
            Self::PlayerChat(_) => "player_chat",
            Self::LoadSavestate => "load_savestate",
            Self::Reset => "reset",
            Self::FinishedNatTraversal => "finished_nat_traversal",
            Self::DesyncPush => "desync_push",
            Self::DesyncPop => "desync_pop",
            Self::RefreshClientInfo => "refresh_client_info",
            Self::SetCorePacketInterface => "set_core_packet_interface",
            Self::UseCorePacketInterface => "use_core_packet_interface",
            Self::KickClient { .. } => "kick_client",
            Self::BanClient { .. } => "ban_client",
            Self::AddForkArg(_) => "add_fork_arg",
            Self::GetForkArgs => "get_fork_args",
            Self::ClearForkArgs => "clear_fork_args",
        }
    }
}

/// Why a control request was not carried out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("netplay control request not supported: {0}")]
    Unsupported(&'static str),
}

/// Netplay front door: one per process, owned by the frontend
pub struct Netplay<E: NetcodeEngine, P: InputStateProvider> {
    manager: SessionManager<E>,
    input: P,
    settings: NetplaySettings,
    driver: NetDriverState,
}

impl<E: NetcodeEngine, P: InputStateProvider> Netplay<E, P> {
    pub fn new(engine: E, input: P, settings: NetplaySettings) -> Self {
        Self {
            manager: SessionManager::new(engine),
            input,
            settings,
            driver: NetDriverState::new(),
        }
    }

    /// Handle a control request; `false` means failed or unsupported.
    pub fn dispatch(&mut self, request: ControlRequest) -> bool {
        match self.execute(&request) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "Control request rejected");
                false
            }
        }
    }

    fn execute(&mut self, request: &ControlRequest) -> Result<bool, ControlError> {
        use ControlRequest as R;

        match request {
            R::EnableServer => {
                let port = self.settings.netplay.port;
                Ok(self.init_netplay(None, port, None))
            }
            // Always joins; an empty configured server fails resolution
            R::EnableClient => {
                let netplay = &self.settings.netplay;
                Ok(self
                    .manager
                    .init(&netplay.server, netplay.port, false, &self.settings)
                    .is_ok())
            }
            R::Disable | R::Disconnect => {
                self.deinit_netplay();
                Ok(true)
            }
            R::PreFrame => Ok(self.manager.push_local_input(&self.input)),
            R::PostFrame => {
                self.manager.poll();
                Ok(true)
            }
            R::IsEnabled | R::IsConnected | R::IsPlaying => Ok(self.manager.is_running()),
            R::IsServer => Ok(self.manager.is_running() && self.manager.is_host()),
            R::IsSpectating => Ok(self.is_spectating()),
            R::AllowPause | R::AllowTimeskip => Ok(true),
            R::IsReplaying
            | R::IsDataInited
            | R::Pause
            | R::Unpause
            | R::GameWatch
            | R::PlayerChat(_)
            | R::LoadSavestate
            | R::Reset
            | R::FinishedNatTraversal
            | R::DesyncPush
            | R::DesyncPop
            | R::RefreshClientInfo
            | R::SetCorePacketInterface
            | R::UseCorePacketInterface
            | R::KickClient { .. }
            | R::BanClient { .. }
            | R::AddForkArg(_)
            | R::GetForkArgs
            | R::ClearForkArgs => Err(ControlError::Unsupported(request.name())),
        }
    }

    /// Start a session: host when `server` is absent or empty, otherwise
    /// join it. Succeeds immediately if a session is already running.
    ///
    /// The relay session id is accepted for API compatibility and ignored.
    pub fn init_netplay(
        &mut self,
        server: Option<&str>,
        port: u16,
        _mitm_session: Option<&str>,
    ) -> bool {
        let server = server.unwrap_or_default();
        let is_host = server.is_empty();
        self.manager.init(server, port, is_host, &self.settings).is_ok()
    }

    /// Stop the running session, if any
    pub fn deinit_netplay(&mut self) {
        self.manager.teardown();
    }

    /// Remember a connect target for frontend startup; does not connect.
    pub fn init_netplay_deferred(
        &mut self,
        server: Option<&str>,
        port: u16,
        _mitm_session: Option<&str>,
    ) -> bool {
        self.driver.register_deferred(server, port);
        true
    }

    /// Peers are version-checked by the engine handshake
    pub fn compatible_version(&self, _version: &str) -> bool {
        true
    }

    /// The engine owns its rollback buffers; nothing to rebuild
    pub fn reinit_serialization(&mut self) -> bool {
        true
    }

    pub fn is_spectating(&self) -> bool {
        false
    }

    /// The engine synchronizes state itself
    pub fn force_send_savestate(&mut self) {}

    pub fn settings(&self) -> &NetplaySettings {
        &self.settings
    }

    /// Replace the settings; applies to the next session start.
    pub fn set_settings(&mut self, settings: NetplaySettings) {
        self.settings = settings;
    }

    pub fn session_manager(&self) -> &SessionManager<E> {
        &self.manager
    }

    pub fn driver_state(&self) -> &NetDriverState {
        &self.driver
    }

    pub fn driver_state_mut(&mut self) -> &mut NetDriverState {
        &mut self.driver
    }

    pub fn input(&self) -> &P {
        &self.input
    }
}
