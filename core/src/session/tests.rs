//! Tests for the session manager

use std::net::{Ipv4Addr, SocketAddr};

use crate::config::NetplaySettings;
use crate::engine::{EngineError, GameEvent, INPUT_PREDICTION_WINDOW};
use crate::test_utils::{MockEngine, MockInput, RecordedActor};

use super::{InitError, SessionManager};

fn manager() -> (MockEngine, SessionManager<MockEngine>) {
    let engine = MockEngine::new();
    (engine.clone(), SessionManager::new(engine))
}

#[test]
fn test_new_manager_is_empty() {
    let (_engine, manager) = manager();
    assert!(!manager.is_running());
    assert!(!manager.is_host());
    assert!(manager.remote_address().is_none());
    assert!(manager.engine_session().is_none());
    assert!(manager.session().is_consistent());
}

#[test]
fn test_init_host() {
    let (engine, mut manager) = manager();
    manager
        .init("", 55435, true, &NetplaySettings::default())
        .unwrap();

    assert!(manager.is_running());
    assert!(manager.is_host());
    assert!(manager.remote_address().is_none());
    assert_eq!(manager.listen_port(), 55435);
    assert!(manager.session().is_consistent());

    let log = engine.log();
    assert_eq!(log.sessions_live, 1);
    assert_eq!(log.adapters_live, 1);
    assert_eq!(log.adapter_ports, vec![55435]);
    assert_eq!(
        log.actors,
        vec![RecordedActor::Local, RecordedActor::Remote(None)]
    );
}

#[test]
fn test_init_builds_config_from_settings() {
    let (engine, mut manager) = manager();
    let mut settings = NetplaySettings::default();
    settings.input.max_users = 1;
    settings.rewind.buffer_size_kb = 8;

    manager.init("", 7000, true, &settings).unwrap();

    let started = engine.log().started_with.unwrap();
    assert_eq!(started.num_players, 1);
    assert_eq!(started.state_size, 8 * 1024);
    assert_eq!(started.input_size, 4);
    assert_eq!(started.input_prediction_window, INPUT_PREDICTION_WINDOW);
    assert!(started.desync_detection);
    assert!(!started.limited_saving);
    assert!(!started.post_sync_joining);
    assert_eq!(manager.config(), &started);
}

#[test]
fn test_init_client_resolves_remote() {
    let (engine, mut manager) = manager();
    manager
        .init("127.0.0.1", 6000, false, &NetplaySettings::default())
        .unwrap();

    assert!(manager.is_running());
    assert!(!manager.is_host());
    let remote = SocketAddr::from((Ipv4Addr::LOCALHOST, 6000));
    assert_eq!(manager.remote_address().unwrap().socket_addr(), remote);
    assert_eq!(
        engine.log().actors,
        vec![RecordedActor::Local, RecordedActor::Remote(Some(remote))]
    );
    assert!(manager.session().is_consistent());
}

#[test]
fn test_init_client_uses_bind_port() {
    let (engine, mut manager) = manager();
    let mut settings = NetplaySettings::default();
    settings.netplay.bind_port = Some(6001);

    manager.init("127.0.0.1", 6000, false, &settings).unwrap();

    assert_eq!(manager.listen_port(), 6001);
    assert_eq!(engine.log().adapter_ports, vec![6001]);
    assert_eq!(manager.remote_address().unwrap().socket_addr().port(), 6000);
}

#[test]
fn test_init_is_idempotent() {
    let (engine, mut manager) = manager();
    let settings = NetplaySettings::default();
    manager.init("", 55435, true, &settings).unwrap();
    let before = engine.log();

    manager.init("127.0.0.1", 1234, false, &settings).unwrap();

    let after = engine.log();
    assert_eq!(after.sessions_created, before.sessions_created);
    assert_eq!(after.adapters_created, before.adapters_created);
    assert!(manager.is_host());
    assert_eq!(manager.listen_port(), 55435);
}

#[test]
fn test_init_client_empty_server_fails() {
    let (engine, mut manager) = manager();
    let result = manager.init("", 55435, false, &NetplaySettings::default());

    assert!(matches!(result, Err(InitError::Resolution(_))));
    assert!(!manager.is_running());
    let log = engine.log();
    assert_eq!(log.sessions_live, 0);
    assert_eq!(log.adapters_live, 0);
}

#[test]
fn test_init_adapter_failure_releases_session() {
    let (engine, mut manager) = manager();
    engine.fail_adapter_create(true);

    let result = manager.init("", 55435, true, &NetplaySettings::default());

    assert!(matches!(result, Err(InitError::Adapter(_))));
    assert!(!manager.is_running());
    let log = engine.log();
    assert_eq!(log.sessions_created, 1);
    assert_eq!(log.sessions_live, 0);
    assert!(manager.session().is_consistent());
}

#[test]
fn test_init_session_create_failure() {
    let (engine, mut manager) = manager();
    engine.fail_session_create(true);

    let result = manager.init("", 55435, true, &NetplaySettings::default());

    assert!(matches!(
        result,
        Err(InitError::Engine(EngineError::SessionCreate))
    ));
    assert_eq!(engine.log().adapters_created, 0);
}

#[test]
fn test_init_start_failure_releases_everything() {
    let (engine, mut manager) = manager();
    engine.fail_start(true);

    let result = manager.init("127.0.0.1", 55435, false, &NetplaySettings::default());

    assert!(matches!(result, Err(InitError::Engine(_))));
    assert!(manager.remote_address().is_none());
    let log = engine.log();
    assert_eq!(log.sessions_live, 0);
    assert_eq!(log.adapters_live, 0);
}

#[test]
fn test_teardown_resets_everything() {
    let (engine, mut manager) = manager();
    manager
        .init("127.0.0.1", 55435, false, &NetplaySettings::default())
        .unwrap();

    manager.teardown();

    assert!(!manager.is_running());
    assert!(!manager.is_host());
    assert!(manager.remote_address().is_none());
    assert!(manager.local_actor().is_none());
    assert!(manager.remote_actor().is_none());
    assert_eq!(manager.listen_port(), 0);
    let log = engine.log();
    assert_eq!(log.sessions_live, 0);
    assert_eq!(log.adapters_live, 0);
}

#[test]
fn test_teardown_twice_is_safe() {
    let (_engine, mut manager) = manager();
    manager.teardown();
    manager
        .init("", 55435, true, &NetplaySettings::default())
        .unwrap();
    manager.teardown();
    manager.teardown();
    assert!(!manager.is_running());
    assert!(manager.session().is_consistent());
}

#[test]
fn test_push_local_input_when_stopped() {
    let (engine, mut manager) = manager();
    let input = MockInput::new();
    assert!(!manager.push_local_input(&input));
    assert!(engine.log().inputs.is_empty());
}

#[test]
fn test_push_local_input_submits_and_caches() {
    let (engine, mut manager) = manager();
    manager
        .init("", 55435, true, &NetplaySettings::default())
        .unwrap();

    let input = MockInput::new();
    input.set_buttons(0x0081);
    input.set_axes(0x0102, -2);

    assert!(manager.push_local_input(&input));

    let log = engine.log();
    assert_eq!(log.inputs.len(), 1);
    let (actor, frame) = log.inputs[0];
    assert_eq!(Some(actor), manager.local_actor());
    assert_eq!(frame.buttons, 0x0081);
    assert_eq!(frame.analog, 0x02FE);

    let last = manager.last_input();
    assert_eq!(last.buttons, 0x0081);
    assert_eq!(last.lx, 0x0102);
    assert_eq!(last.ly, -2);
}

#[test]
fn test_poll_when_stopped_is_noop() {
    let (engine, mut manager) = manager();
    assert!(manager.poll().is_none());
    assert_eq!(engine.log().network_polls, 0);
}

#[test]
fn test_poll_drains_engine() {
    let (engine, mut manager) = manager();
    manager
        .init("", 55435, true, &NetplaySettings::default())
        .unwrap();
    engine.queue_events([GameEvent::Save { frame: 0 }, GameEvent::Load { frame: 0 }]);

    let summary = manager.poll().unwrap();
    assert_eq!(summary.unhandled_state_requests(), 2);
    assert_eq!(engine.log().network_polls, 1);
}

#[test]
fn test_poll_failure_tears_down() {
    let (engine, mut manager) = manager();
    manager
        .init("127.0.0.1", 55435, false, &NetplaySettings::default())
        .unwrap();
    engine.fail_network_poll(true);

    assert!(manager.poll().is_none());

    assert!(!manager.is_running());
    assert!(manager.remote_address().is_none());
    assert!(manager.session().is_consistent());
    let log = engine.log();
    assert_eq!(log.sessions_live, 0);
    assert_eq!(log.adapters_live, 0);

    // Stays stopped; later polls do not reach the engine
    assert!(manager.poll().is_none());
    assert_eq!(engine.log().network_polls, 1);
}
