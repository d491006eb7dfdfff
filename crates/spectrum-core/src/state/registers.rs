//! Z80 register file exchanged with the execution engine and snapshot loader.

/// Z80 register file shared between the machine and the engine.
///
/// Only the snapshot loader interprets these fields; the engine is free to
/// keep additional internal state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuRegisters {
    /// Accumulator.
    pub a: u8,
    /// Flags.
    pub f: u8,
    /// `BC` pair.
    pub bc: u16,
    /// `DE` pair.
    pub de: u16,
    /// `HL` pair.
    pub hl: u16,
    /// Alternate `AF'` pair.
    pub alt_af: u16,
    /// Alternate `BC'` pair.
    pub alt_bc: u16,
    /// Alternate `DE'` pair.
    pub alt_de: u16,
    /// Alternate `HL'` pair.
    pub alt_hl: u16,
    /// Index register `IX`.
    pub ix: u16,
    /// Index register `IY`.
    pub iy: u16,
    /// Stack pointer.
    pub sp: u16,
    /// Program counter.
    pub pc: u16,
    /// Interrupt vector base.
    pub i: u8,
    /// Memory refresh register, all eight bits.
    pub r: u8,
    /// Interrupt enable flip-flop 1.
    pub iff1: bool,
    /// Interrupt enable flip-flop 2.
    pub iff2: bool,
    /// Interrupt mode (`0..=2`, masked to two bits).
    pub im: u8,
}

impl CpuRegisters {
    /// Returns the `AF` pair.
    #[must_use]
    pub const fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f])
    }

    /// Writes the `AF` pair.
    pub const fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.f = f;
    }
}
