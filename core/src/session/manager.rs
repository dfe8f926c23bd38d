//! Session creation, teardown and per-tick hooks

use thiserror::Error;

use crate::address::{self, RemoteAddress, ResolutionError};
use crate::config::NetplaySettings;
use crate::engine::{
    ActorHandle, ActorKind, AdapterError, EngineError, EngineSession, NetcodeEngine, SessionConfig,
};
use crate::input::{InputStateProvider, LocalInput, pack_local_input};
use crate::poller::{self, PollSummary};

/// Why a session could not be started
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// The live netplay session.
///
/// Either fully populated and running, or completely empty.
pub struct Session<S> {
    /// Engine session; owns the transport adapter
    handle: Option<S>,
    config: SessionConfig,
    local_actor: Option<ActorHandle>,
    remote_actor: Option<ActorHandle>,
    remote_addr: Option<RemoteAddress>,
    listen_port: u16,
    is_host: bool,
    running: bool,
    /// Last submitted input, for read-back only
    last_input: LocalInput,
}

impl<S> Default for Session<S> {
    fn default() -> Self {
        Self {
            handle: None,
            config: SessionConfig::default(),
            local_actor: None,
            remote_actor: None,
            remote_addr: None,
            listen_port: 0,
            is_host: false,
            running: false,
            last_input: LocalInput::default(),
        }
    }
}

impl<S> Session<S> {
    /// Running sessions hold an engine session and a local actor (and a
    /// remote address when joining); stopped sessions hold nothing.
    pub fn is_consistent(&self) -> bool {
        if self.running {
            self.handle.is_some()
                && self.local_actor.is_some()
                && (self.is_host || self.remote_addr.is_some())
        } else {
            self.handle.is_none() && self.remote_addr.is_none()
        }
    }
}

/// Owns the one netplay session and the engine that creates it
pub struct SessionManager<E: NetcodeEngine> {
    engine: E,
    session: Session<E::Session>,
}

impl<E: NetcodeEngine> SessionManager<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            session: Session::default(),
        }
    }

    /// Start a session as host or guest.
    ///
    /// Returns `Ok` without touching anything when a session is already
    /// running. On failure nothing is kept: the engine session, adapter and
    /// resolved address built so far are dropped.
    pub fn init(
        &mut self,
        server: &str,
        port: u16,
        is_host: bool,
        settings: &NetplaySettings,
    ) -> Result<(), InitError> {
        if self.session.running {
            return Ok(());
        }

        // Drop anything left over from an earlier attempt
        self.session = Session::default();

        match self.build_session(server, port, is_host, settings) {
            Ok(session) => {
                tracing::info!(
                    port = session.listen_port,
                    role = if is_host { "host" } else { "client" },
                    "Netplay session started"
                );
                self.session = session;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to start netplay session");
                Err(e)
            }
        }
    }

    fn build_session(
        &mut self,
        server: &str,
        port: u16,
        is_host: bool,
        settings: &NetplaySettings,
    ) -> Result<Session<E::Session>, InitError> {
        let listen_port = if is_host {
            port
        } else {
            settings.netplay.bind_port.unwrap_or(port)
        };

        let mut handle = self.engine.create_session()?;
        let adapter = self.engine.create_adapter(listen_port)?;
        let config = SessionConfig::from_settings(settings);

        handle.set_adapter(adapter);
        let local_actor = handle.add_actor(ActorKind::Local);

        let remote_addr = if is_host {
            None
        } else {
            Some(address::resolve(server, port)?)
        };
        let remote_actor = handle.add_actor(ActorKind::Remote(remote_addr.as_ref()));

        handle.start(&config)?;

        Ok(Session {
            handle: Some(handle),
            config,
            local_actor: Some(local_actor),
            remote_actor: Some(remote_actor),
            remote_addr,
            listen_port,
            is_host,
            running: true,
            last_input: LocalInput::default(),
        })
    }

    /// Stop the session and release everything it owns. Safe to repeat.
    pub fn teardown(&mut self) {
        if self.session.handle.is_some() {
            tracing::info!("Shutting down netplay session");
        }
        self.session = Session::default();
    }

    /// Pack local input and submit it for this tick.
    ///
    /// Returns false when no session is running.
    pub fn push_local_input(&mut self, provider: &dyn InputStateProvider) -> bool {
        if !self.session.running {
            return false;
        }
        let (Some(handle), Some(local)) = (self.session.handle.as_mut(), self.session.local_actor)
        else {
            return false;
        };

        let packed = pack_local_input(provider);
        self.session.last_input = packed.raw;

        if let Err(e) = handle.add_local_input(local, packed.frame) {
            tracing::debug!(error = %e, "Local input not accepted");
        }
        true
    }

    /// Drive the network step and drain events; `None` when not running.
    ///
    /// A session the engine reports dead is torn down here.
    pub fn poll(&mut self) -> Option<PollSummary> {
        if !self.session.running {
            return None;
        }
        let handle = self.session.handle.as_mut()?;
        match poller::poll_once(handle) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(error = %e, "Netplay session failed");
                self.teardown();
                None
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    pub fn is_host(&self) -> bool {
        self.session.is_host
    }

    pub fn session(&self) -> &Session<E::Session> {
        &self.session
    }

    pub fn remote_address(&self) -> Option<&RemoteAddress> {
        self.session.remote_addr.as_ref()
    }

    pub fn listen_port(&self) -> u16 {
        self.session.listen_port
    }

    pub fn config(&self) -> &SessionConfig {
        &self.session.config
    }

    pub fn local_actor(&self) -> Option<ActorHandle> {
        self.session.local_actor
    }

    pub fn remote_actor(&self) -> Option<ActorHandle> {
        self.session.remote_actor
    }

    /// Last submitted local input
    pub fn last_input(&self) -> LocalInput {
        self.session.last_input
    }

    /// Engine session, while one exists
    pub fn engine_session(&self) -> Option<&E::Session> {
        self.session.handle.as_ref()
    }
}
