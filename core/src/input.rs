//! Local input acquisition and packing
//!
//! Each tick the local player's controller state is read from the frontend's
//! input driver and squeezed into the fixed four-byte payload the netcode
//! engine exchanges with peers.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Digital joypad device
pub const DEVICE_JOYPAD: u32 = 1;
/// Analog stick device
pub const DEVICE_ANALOG: u32 = 5;
/// Joypad id that returns the full button bitmask
pub const DEVICE_ID_JOYPAD_MASK: u32 = 256;
/// Left analog stick index
pub const DEVICE_INDEX_ANALOG_LEFT: u32 = 0;
/// Horizontal analog axis
pub const DEVICE_ID_ANALOG_X: u32 = 0;
/// Vertical analog axis
pub const DEVICE_ID_ANALOG_Y: u32 = 1;

/// Frontend input driver as seen by netplay.
///
/// Given a port/device/index/id quadruple, returns the current sample.
pub trait InputStateProvider {
    fn state(&self, port: u32, device: u32, index: u32, id: u32) -> i16;
}

impl<T: InputStateProvider + ?Sized> InputStateProvider for &T {
    fn state(&self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        (**self).state(port, device, index, id)
    }
}

impl<T: InputStateProvider + ?Sized> InputStateProvider for Box<T> {
    fn state(&self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        (**self).state(port, device, index, id)
    }
}

/// Per-frame input payload exchanged through the netcode engine
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct InputFrame {
    /// Joypad button bitmask
    pub buttons: u16,
    /// Left stick, X low byte in the high half and Y low byte in the low half
    pub analog: u16,
}

/// Size of [`InputFrame`] on the wire
pub const INPUT_FRAME_SIZE: usize = std::mem::size_of::<InputFrame>();

/// Unpacked controller sample, cached for UI read-back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalInput {
    pub buttons: u16,
    pub lx: i16,
    pub ly: i16,
}

/// A packed frame together with the sample it was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedInput {
    pub frame: InputFrame,
    pub raw: LocalInput,
}

/// Read player 0's controller and pack it into an [`InputFrame`].
///
/// Only the low byte of each analog axis survives.
pub fn pack_local_input(provider: &dyn InputStateProvider) -> PackedInput {
    let buttons = provider.state(0, DEVICE_JOYPAD, 0, DEVICE_ID_JOYPAD_MASK) as u16;
    let lx = provider.state(0, DEVICE_ANALOG, DEVICE_INDEX_ANALOG_LEFT, DEVICE_ID_ANALOG_X);
    let ly = provider.state(0, DEVICE_ANALOG, DEVICE_INDEX_ANALOG_LEFT, DEVICE_ID_ANALOG_Y);

    PackedInput {
        frame: InputFrame {
            buttons,
            analog: pack_analog(lx, ly),
        },
        raw: LocalInput { buttons, lx, ly },
    }
}

fn pack_analog(lx: i16, ly: i16) -> u16 {
    ((lx as u16 & 0xFF) << 8) | (ly as u16 & 0xFF)
}
