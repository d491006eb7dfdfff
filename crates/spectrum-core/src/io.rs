//! ULA port decoding: keyboard reads and border/EAR writes on port `0xFE`.
//!
//! Only the low byte of the port address takes part in decoding. Every other
//! port reads as `0xFF` and ignores writes.

use crate::KeyboardMatrix;

/// Low byte matched by the ULA port decoder.
pub const ULA_PORT_LOW: u8 = 0xFE;

/// Mask for the 3-bit border colour.
pub const BORDER_MASK: u8 = 0x07;

/// Bit of the output value driving the EAR/speaker line.
pub const EAR_BIT: u8 = 0x10;

/// Value returned for unimplemented ports.
pub const FLOATING_BUS: u8 = 0xFF;

/// Border colour and EAR line latched by the last ULA port write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct UlaLatch {
    border: u8,
    ear: bool,
}

impl UlaLatch {
    /// Returns the border colour (`0..=7`).
    #[must_use]
    pub const fn border(&self) -> u8 {
        self.border
    }

    /// Sets the border colour, keeping only the low three bits.
    pub const fn set_border(&mut self, value: u8) {
        self.border = value & BORDER_MASK;
    }

    /// Returns the EAR line level.
    #[must_use]
    pub const fn ear(&self) -> bool {
        self.ear
    }

    /// Latches an output value written to the ULA port.
    pub const fn latch(&mut self, value: u8) {
        self.set_border(value);
        self.ear = value & EAR_BIT != 0;
    }
}

/// Returns `true` when `port` is decoded by the ULA.
#[must_use]
pub const fn is_ula_port(port: u16) -> bool {
    port.to_le_bytes()[0] == ULA_PORT_LOW
}

/// Services a CPU `IN` from `port`.
#[must_use]
pub fn port_read(keyboard: &KeyboardMatrix, port: u16) -> u8 {
    if !is_ula_port(port) {
        return FLOATING_BUS;
    }
    keyboard.scan(port.to_be_bytes()[0])
}

/// Services a CPU `OUT` of `value` to `port`.
pub const fn port_write(latch: &mut UlaLatch, port: u16, value: u8) {
    if is_ula_port(port) {
        latch.latch(value);
    }
}
