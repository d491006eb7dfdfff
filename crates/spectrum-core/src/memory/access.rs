//! Address-masked byte access over the flat 64 KiB backing store.
//!
//! Every host- or bus-supplied address is reduced modulo 64 KiB before it
//! touches the backing store, so no access can fall outside the array.

use crate::{decode_memory_region, AddressSpace, MemoryRegion};

/// Mask applied to wide addresses before indexing.
pub const ADDRESS_MASK: u32 = 0xFFFF;

/// Reduces a wide address to its 16-bit bus address.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn wrap_address(addr: u32) -> u16 {
    (addr & ADDRESS_MASK) as u16
}

/// Reads the byte at `addr` after wraparound.
#[must_use]
pub fn read_byte(memory: &AddressSpace, addr: u32) -> u8 {
    memory[usize::from(wrap_address(addr))]
}

/// Writes `value` at `addr` after wraparound and returns the previous byte.
pub fn write_byte(memory: &mut AddressSpace, addr: u32, value: u8) -> u8 {
    let cell = &mut memory[usize::from(wrap_address(addr))];
    std::mem::replace(cell, value)
}

/// Returns `true` when a CPU bus write to `addr` should land.
///
/// With `rom_write_protect` set, writes into the ROM region are dropped the
/// way the real machine ignores them.
#[must_use]
pub const fn bus_write_allowed(addr: u16, rom_write_protect: bool) -> bool {
    !(rom_write_protect && matches!(decode_memory_region(addr), MemoryRegion::Rom))
}
