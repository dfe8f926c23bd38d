//! Synthetic input for sessions without a real controller

use std::cell::Cell;

use netplay_core::input::{
    DEVICE_ANALOG, DEVICE_ID_ANALOG_X, DEVICE_ID_ANALOG_Y, DEVICE_ID_JOYPAD_MASK, DEVICE_JOYPAD,
    InputStateProvider,
};

/// Walks a single pressed button across the pad and sweeps the left stick.
#[derive(Debug, Default)]
pub struct SyntheticInput {
    frame: Cell<u32>,
}

impl SyntheticInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next frame's pattern
    pub fn advance(&self) {
        self.frame.set(self.frame.get().wrapping_add(1));
    }
}

impl InputStateProvider for SyntheticInput {
    fn state(&self, port: u32, device: u32, _index: u32, id: u32) -> i16 {
        if port != 0 {
            return 0;
        }
        let frame = self.frame.get();
        match (device, id) {
            // One of 16 buttons held for 15 frames at a time
            (DEVICE_JOYPAD, DEVICE_ID_JOYPAD_MASK) => (1u16 << ((frame / 15) % 16)) as i16,
            (DEVICE_ANALOG, DEVICE_ID_ANALOG_X) => ((frame % 256) as i16 - 128) * 256,
            (DEVICE_ANALOG, DEVICE_ID_ANALOG_Y) => (127 - (frame % 256) as i16) * 256,
            _ => 0,
        }
    }
}
