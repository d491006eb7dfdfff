//! Colour-attribute byte decoding and the per-cell pixel rule.

/// Attribute bit selecting flashing ink/paper exchange.
pub const FLASH_BIT: u8 = 0x80;
/// Attribute bit selecting the bright palette half.
pub const BRIGHT_BIT: u8 = 0x40;
/// Colour-index bit marking a bright colour.
pub const BRIGHT_INDEX_BIT: u8 = 0x08;

/// Decoded view of one attribute byte: `F B P2 P1 P0 I2 I1 I0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attribute(u8);

impl Attribute {
    /// Wraps a raw attribute byte.
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Flash flag (bit 7).
    #[must_use]
    pub const fn flash(self) -> bool {
        self.0 & FLASH_BIT != 0
    }

    /// Bright flag (bit 6).
    #[must_use]
    pub const fn bright(self) -> bool {
        self.0 & BRIGHT_BIT != 0
    }

    /// Paper colour (bits 5-3).
    #[must_use]
    pub const fn paper(self) -> u8 {
        (self.0 >> 3) & 0x07
    }

    /// Ink colour (bits 2-0).
    #[must_use]
    pub const fn ink(self) -> u8 {
        self.0 & 0x07
    }

    /// Returns `(colour for set pixels, colour for clear pixels)` in this flash phase.
    #[must_use]
    pub const fn colours(self, flash_phase: bool) -> (u8, u8) {
        let bright = if self.bright() { BRIGHT_INDEX_BIT } else { 0 };
        let ink = self.ink() | bright;
        let paper = self.paper() | bright;
        if self.flash() && flash_phase {
            (paper, ink)
        } else {
            (ink, paper)
        }
    }

    /// Expands one bitmap byte into eight colour indices, MSB first.
    pub fn decode_cell(self, bits: u8, flash_phase: bool, out: &mut [u8]) {
        let (set, clear) = self.colours(flash_phase);
        for (bit, pixel) in (0..8).rev().zip(out.iter_mut()) {
            *pixel = if bits & (1 << bit) != 0 { set } else { clear };
        }
    }
}
