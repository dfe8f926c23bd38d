//! Engine session configuration
//!
//! Provides the configuration handed to the netcode engine when a session
//! starts, and the constants it is built from.

use crate::config::NetplaySettings;
use crate::input::INPUT_FRAME_SIZE;

/// Maximum frames a peer may simulate ahead of confirmed remote input
pub const INPUT_PREDICTION_WINDOW: usize = 2;

/// Frames between desync checksum exchanges
pub const DESYNC_CHECK_INTERVAL: u32 = 10;

/// Settings for starting an engine session
///
/// Built in one piece from [`NetplaySettings`] so a half-configured session
/// is never observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of players in the session (1 or 2)
    pub num_players: usize,
    /// Maximum spectators (spectating is unsupported, always 0)
    pub max_spectators: usize,
    /// Maximum prediction frames
    pub input_prediction_window: usize,
    /// Spectator delay in frames
    pub spectator_delay: usize,
    /// Size of one player's input payload in bytes
    pub input_size: usize,
    /// Per-player state buffer size in bytes
    pub state_size: usize,
    /// Save state only when required instead of every frame
    pub limited_saving: bool,
    /// Allow players to join after the session synchronized
    pub post_sync_joining: bool,
    /// Exchange checksums to detect diverging simulations
    pub desync_detection: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            max_spectators: 0,
            input_prediction_window: INPUT_PREDICTION_WINDOW,
            spectator_delay: 0,
            input_size: INPUT_FRAME_SIZE,
            state_size: 0,
            limited_saving: false,
            post_sync_joining: false,
            desync_detection: true,
        }
    }
}

impl SessionConfig {
    /// Create the session config for the current settings
    pub fn from_settings(settings: &NetplaySettings) -> Self {
        Self {
            num_players: if settings.input.max_users > 1 { 2 } else { 1 },
            state_size: settings.rewind.buffer_size_kb as usize * 1024,
            desync_detection: settings.netplay.desync_detection,
            ..Default::default()
        }
    }
}
