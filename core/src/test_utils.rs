//! Shared test utilities for integration and unit tests

use std::cell::{Cell, RefCell};
use std::net::SocketAddr;
use std::rc::Rc;

use crate::engine::{
    ActorHandle, ActorKind, AdapterError, EngineError, EngineSession, GameEvent, NetcodeEngine,
    SessionConfig,
};
use crate::input::{
    DEVICE_ANALOG, DEVICE_ID_ANALOG_X, DEVICE_ID_ANALOG_Y, DEVICE_ID_JOYPAD_MASK,
    DEVICE_INDEX_ANALOG_LEFT, DEVICE_JOYPAD, InputFrame, InputStateProvider,
};

// ============================================================================
// Mock Input Provider
// ============================================================================

/// Controllable input provider; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct MockInput {
    buttons: Rc<Cell<u16>>,
    lx: Rc<Cell<i16>>,
    ly: Rc<Cell<i16>>,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buttons(&self, buttons: u16) {
        self.buttons.set(buttons);
    }

    pub fn set_axes(&self, lx: i16, ly: i16) {
        self.lx.set(lx);
        self.ly.set(ly);
    }
}

impl InputStateProvider for MockInput {
    fn state(&self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        if port != 0 {
            return 0;
        }
        match (device, index, id) {
            (DEVICE_JOYPAD, 0, DEVICE_ID_JOYPAD_MASK) => self.buttons.get() as i16,
            (DEVICE_ANALOG, DEVICE_INDEX_ANALOG_LEFT, DEVICE_ID_ANALOG_X) => self.lx.get(),
            (DEVICE_ANALOG, DEVICE_INDEX_ANALOG_LEFT, DEVICE_ID_ANALOG_Y) => self.ly.get(),
            _ => 0,
        }
    }
}

// ============================================================================
// Mock Netcode Engine
// ============================================================================

/// Actor registration as recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedActor {
    Local,
    Remote(Option<SocketAddr>),
}

/// Everything the mock engine observed
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    pub sessions_created: u32,
    pub sessions_live: u32,
    pub adapters_created: u32,
    pub adapters_live: u32,
    pub adapter_ports: Vec<u16>,
    pub actors: Vec<RecordedActor>,
    pub started_with: Option<SessionConfig>,
    pub inputs: Vec<(ActorHandle, InputFrame)>,
    pub network_polls: u32,
    pub updates: u32,
}

#[derive(Debug, Default)]
struct MockShared {
    log: MockLog,
    pending: Vec<GameEvent>,
    fail_session: bool,
    fail_adapter: bool,
    fail_start: bool,
    fail_network_poll: bool,
}

/// Netcode engine double that records calls and counts live handles
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    shared: Rc<RefCell<MockShared>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded calls
    pub fn log(&self) -> MockLog {
        self.shared.borrow().log.clone()
    }

    /// Events the next `update_session` will report
    pub fn queue_events(&self, events: impl IntoIterator<Item = GameEvent>) {
        self.shared.borrow_mut().pending.extend(events);
    }

    pub fn fail_session_create(&self, fail: bool) {
        self.shared.borrow_mut().fail_session = fail;
    }

    pub fn fail_adapter_create(&self, fail: bool) {
        self.shared.borrow_mut().fail_adapter = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.shared.borrow_mut().fail_start = fail;
    }

    pub fn fail_network_poll(&self, fail: bool) {
        self.shared.borrow_mut().fail_network_poll = fail;
    }
}

impl NetcodeEngine for MockEngine {
    type Adapter = MockAdapter;
    type Session = MockSession;

    fn create_session(&mut self) -> Result<MockSession, EngineError> {
        let mut shared = self.shared.borrow_mut();
        if shared.fail_session {
            return Err(EngineError::SessionCreate);
        }
        shared.log.sessions_created += 1;
        shared.log.sessions_live += 1;
        Ok(MockSession {
            shared: Rc::clone(&self.shared),
            adapter: None,
            actors: 0,
            buffer: Vec::new(),
        })
    }

    fn create_adapter(&mut self, port: u16) -> Result<MockAdapter, AdapterError> {
        let mut shared = self.shared.borrow_mut();
        if shared.fail_adapter {
            return Err(AdapterError::Bind {
                port,
                reason: "address in use".to_string(),
            });
        }
        shared.log.adapters_created += 1;
        shared.log.adapters_live += 1;
        shared.log.adapter_ports.push(port);
        Ok(MockAdapter {
            shared: Rc::clone(&self.shared),
        })
    }
}

/// Transport adapter double
#[derive(Debug)]
pub struct MockAdapter {
    shared: Rc<RefCell<MockShared>>,
}

impl Drop for MockAdapter {
    fn drop(&mut self) {
        self.shared.borrow_mut().log.adapters_live -= 1;
    }
}

/// Engine session double
#[derive(Debug)]
pub struct MockSession {
    shared: Rc<RefCell<MockShared>>,
    adapter: Option<MockAdapter>,
    actors: usize,
    buffer: Vec<GameEvent>,
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.shared.borrow_mut().log.sessions_live -= 1;
    }
}

impl EngineSession for MockSession {
    type Adapter = MockAdapter;

    fn set_adapter(&mut self, adapter: MockAdapter) {
        self.adapter = Some(adapter);
    }

    fn add_actor(&mut self, kind: ActorKind<'_>) -> ActorHandle {
        let recorded = match kind {
            ActorKind::Local => RecordedActor::Local,
            ActorKind::Remote(addr) => RecordedActor::Remote(addr.map(|a| a.socket_addr())),
        };
        self.shared.borrow_mut().log.actors.push(recorded);
        self.actors += 1;
        ActorHandle(self.actors - 1)
    }

    fn start(&mut self, config: &SessionConfig) -> Result<(), EngineError> {
        let mut shared = self.shared.borrow_mut();
        if shared.fail_start {
            return Err(EngineError::Ggrs("start rejected".to_string()));
        }
        if self.adapter.is_none() {
            return Err(EngineError::NoAdapter);
        }
        shared.log.started_with = Some(config.clone());
        Ok(())
    }

    fn add_local_input(&mut self, actor: ActorHandle, input: InputFrame) -> Result<(), EngineError> {
        if actor.0 >= self.actors {
            return Err(EngineError::UnknownActor(actor.0));
        }
        self.shared.borrow_mut().log.inputs.push((actor, input));
        Ok(())
    }

    fn network_poll(&mut self) -> Result<(), EngineError> {
        let mut shared = self.shared.borrow_mut();
        shared.log.network_polls += 1;
        if shared.fail_network_poll {
            return Err(EngineError::Ggrs("peer rejected".to_string()));
        }
        Ok(())
    }

    fn update_session(&mut self) -> std::vec::Drain<'_, GameEvent> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.log.updates += 1;
            self.buffer.append(&mut shared.pending);
        }
        self.buffer.drain(..)
    }
}
