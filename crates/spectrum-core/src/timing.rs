//! Raster timing constants and the per-scanline cycle carry.

use crate::video::FRAME_HEIGHT;

/// CPU clock cycles (T-states) per scanline.
pub const CYCLES_PER_SCANLINE: u32 = 224;

/// Scanlines per frame, including top and bottom border.
#[allow(clippy::cast_possible_truncation)]
pub const SCANLINES_PER_FRAME: u32 = FRAME_HEIGHT as u32;

/// CPU clock cycles per frame.
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_SCANLINE * SCANLINES_PER_FRAME;

/// Value placed on the data bus during the frame interrupt.
pub const INTERRUPT_BUS_VALUE: u8 = 0x00;

const _: () = assert!(CYCLES_PER_FRAME == 69_888);

/// Signed difference between cycles run and cycles owed on the previous line.
///
/// Instructions cannot be split, so the engine overshoots; a positive carry
/// shortens the next request and a negative one lengthens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CycleCarry(i64);

impl CycleCarry {
    /// Seeds the carry from cycles already spent before the first scanline.
    #[must_use]
    pub fn from_prologue(cycles: u32) -> Self {
        Self(i64::from(cycles))
    }

    /// Returns the raw carry value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Cycles to request for the next scanline, never below zero.
    #[must_use]
    pub fn next_request(self) -> u32 {
        let wanted = i64::from(CYCLES_PER_SCANLINE) - self.0;
        u32::try_from(wanted.max(0)).unwrap_or(u32::MAX)
    }

    /// Records the cycles the engine actually consumed on this scanline.
    pub fn settle(&mut self, consumed: u32) {
        self.0 = i64::from(consumed) - i64::from(CYCLES_PER_SCANLINE);
    }
}
