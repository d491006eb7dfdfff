//! Fixed 30-byte `.z80` header with named field extraction.
//!
//! Words are little-endian except `AF'`, stored as `A'` then `F'`.

use crate::{CpuRegisters, SnapshotError};

/// Length of the fixed header.
pub const HEADER_LEN: usize = 30;

const OFFSET_A: usize = 0;
const OFFSET_F: usize = 1;
const OFFSET_BC: usize = 2;
const OFFSET_HL: usize = 4;
const OFFSET_PC: usize = 6;
const OFFSET_SP: usize = 8;
const OFFSET_I: usize = 10;
const OFFSET_R: usize = 11;
const OFFSET_FLAGS: usize = 12;
const OFFSET_DE: usize = 13;
const OFFSET_ALT_BC: usize = 15;
const OFFSET_ALT_DE: usize = 17;
const OFFSET_ALT_HL: usize = 19;
const OFFSET_ALT_A: usize = 21;
const OFFSET_ALT_F: usize = 22;
const OFFSET_IY: usize = 23;
const OFFSET_IX: usize = 25;
const OFFSET_IFF1: usize = 27;
const OFFSET_IFF2: usize = 28;
const OFFSET_IM: usize = 29;

/// Flags-byte bit holding bit 7 of `R`.
const FLAG_R7: u8 = 0x01;
/// Flags-byte bit marking an RLE-compressed classic payload.
const FLAG_COMPRESSED: u8 = 0x20;

/// Reads a little-endian word at `offset`, `None` past the end of `bytes`.
#[must_use]
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Option<u16> {
    let lo = *bytes.get(offset)?;
    let hi = *bytes.get(offset.checked_add(1)?)?;
    Some(u16::from_le_bytes([lo, hi]))
}

/// Parsed copy of the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotHeader {
    raw: [u8; HEADER_LEN],
}

impl SnapshotHeader {
    /// Copies the header from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::TruncatedHeader`] when `data` is shorter than
    /// [`HEADER_LEN`].
    pub fn parse(data: &[u8]) -> Result<Self, SnapshotError> {
        let raw = data
            .get(..HEADER_LEN)
            .and_then(|bytes| <[u8; HEADER_LEN]>::try_from(bytes).ok())
            .ok_or(SnapshotError::TruncatedHeader {
                needed: HEADER_LEN,
                available: data.len(),
            })?;
        Ok(Self { raw })
    }

    const fn byte(&self, offset: usize) -> u8 {
        self.raw[offset]
    }

    const fn word(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.raw[offset], self.raw[offset + 1]])
    }

    /// Accumulator.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.byte(OFFSET_A)
    }

    /// Flags register.
    #[must_use]
    pub const fn f(&self) -> u8 {
        self.byte(OFFSET_F)
    }

    /// `BC` pair.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        self.word(OFFSET_BC)
    }

    /// `HL` pair.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        self.word(OFFSET_HL)
    }

    /// Header `PC`; zero marks the extended format.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.word(OFFSET_PC)
    }

    /// Stack pointer.
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.word(OFFSET_SP)
    }

    /// Interrupt vector base.
    #[must_use]
    pub const fn i(&self) -> u8 {
        self.byte(OFFSET_I)
    }

    /// `DE` pair.
    #[must_use]
    pub const fn de(&self) -> u16 {
        self.word(OFFSET_DE)
    }

    /// Flags byte 12, with the historical `0xFF` value read as `1`.
    #[must_use]
    pub const fn flags(&self) -> u8 {
        match self.byte(OFFSET_FLAGS) {
            0xFF => 0x01,
            other => other,
        }
    }

    /// Full `R` register: low seven bits from byte 11, bit 7 from the flags byte.
    #[must_use]
    pub const fn r(&self) -> u8 {
        (self.byte(OFFSET_R) & 0x7F) | ((self.flags() & FLAG_R7) << 7)
    }

    /// Border colour stored in flags bits 1-3.
    #[must_use]
    pub const fn border(&self) -> u8 {
        (self.flags() >> 1) & 0x07
    }

    /// Whether a classic payload is RLE-compressed (flags bit 5).
    #[must_use]
    pub const fn compressed(&self) -> bool {
        self.flags() & FLAG_COMPRESSED != 0
    }

    /// Whether the payload uses the extended, paged layout.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.pc() == 0
    }

    /// Alternate `AF'` pair, stored high byte first.
    #[must_use]
    pub const fn alt_af(&self) -> u16 {
        u16::from_be_bytes([self.byte(OFFSET_ALT_A), self.byte(OFFSET_ALT_F)])
    }

    /// Alternate `BC'` pair.
    #[must_use]
    pub const fn alt_bc(&self) -> u16 {
        self.word(OFFSET_ALT_BC)
    }

    /// Alternate `DE'` pair.
    #[must_use]
    pub const fn alt_de(&self) -> u16 {
        self.word(OFFSET_ALT_DE)
    }

    /// Alternate `HL'` pair.
    #[must_use]
    pub const fn alt_hl(&self) -> u16 {
        self.word(OFFSET_ALT_HL)
    }

    /// `IY` index register.
    #[must_use]
    pub const fn iy(&self) -> u16 {
        self.word(OFFSET_IY)
    }

    /// `IX` index register.
    #[must_use]
    pub const fn ix(&self) -> u16 {
        self.word(OFFSET_IX)
    }

    /// Interrupt flip-flop 1.
    #[must_use]
    pub const fn iff1(&self) -> bool {
        self.byte(OFFSET_IFF1) != 0
    }

    /// Interrupt flip-flop 2.
    #[must_use]
    pub const fn iff2(&self) -> bool {
        self.byte(OFFSET_IFF2) != 0
    }

    /// Interrupt mode, low two bits of byte 29.
    #[must_use]
    pub const fn im(&self) -> u8 {
        self.byte(OFFSET_IM) & 0x03
    }

    /// Writes every header register into `cpu`. `PC` is taken as stored.
    pub const fn apply_registers(&self, cpu: &mut CpuRegisters) {
        cpu.a = self.a();
        cpu.f = self.f();
        cpu.bc = self.bc();
        cpu.hl = self.hl();
        cpu.sp = self.sp();
        cpu.de = self.de();
        cpu.pc = self.pc();
        cpu.i = self.i();
        cpu.r = self.r();
        cpu.alt_bc = self.alt_bc();
        cpu.alt_de = self.alt_de();
        cpu.alt_hl = self.alt_hl();
        cpu.alt_af = self.alt_af();
        cpu.iy = self.iy();
        cpu.ix = self.ix();
        cpu.iff1 = self.iff1();
        cpu.iff2 = self.iff2();
        cpu.im = self.im();
    }
}
