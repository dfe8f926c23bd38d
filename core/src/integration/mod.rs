//! Integration tests for the netplay core
//!
//! Drives the control surface end to end against the mock engine: enable,
//! per-frame hooks, teardown, and resource accounting across cycles. A
//! loopback test runs two real GGRS peers.


#[cfg(test)]
pub(crate) mod test_utils {
    use crate::config::NetplaySettings;
    use crate::control::Netplay;
    use crate::test_utils::{MockEngine, MockInput};

    /// Facade over a mock engine, plus handles to inspect both
    pub fn new_test_netplay(
        settings: NetplaySettings,
    ) -> (MockEngine, MockInput, Netplay<MockEngine, MockInput>) {
        let engine = MockEngine::new();
        let input = MockInput::new();
        let netplay = Netplay::new(engine.clone(), input.clone(), settings);
        (engine, input, netplay)
    }

    /// Settings for a client joining `server`
    pub fn client_settings(server: &str, port: u16) -> NetplaySettings {
        let mut settings = NetplaySettings::default();
        settings.netplay.server = server.to_string();
        settings.netplay.port = port;
        settings
    }
}
