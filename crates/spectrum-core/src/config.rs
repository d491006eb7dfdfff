//! Host-supplied machine configuration.

use crate::{ConfigError, ROM_BYTES};

/// How snapshot page blocks with an unrecognised identifier are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum UnsupportedPagePolicy {
    /// Drop the block and leave memory untouched.
    #[default]
    Skip,
    /// Decode the block at address `0x0000`, overwriting ROM, as older loaders did.
    ///
    /// Only unrecognised identifiers are affected; page 0 (the ROM image) is
    /// always skipped under either policy.
    LoadAtZero,
}

/// Immutable configuration for a machine instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// ROM image copied to `0x0000` on every reset; empty leaves ROM zeroed.
    pub rom: Vec<u8>,
    /// Drops CPU bus writes to the ROM region.
    pub rom_write_protect: bool,
    /// Handling for snapshot pages other than 0, 4, 5 and 8.
    pub unsupported_pages: UnsupportedPagePolicy,
}

impl MachineConfig {
    /// Returns a configuration carrying `rom`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RomTooLarge`] when `rom` exceeds 16 KiB.
    pub fn with_rom(rom: &[u8]) -> Result<Self, ConfigError> {
        if rom.len() > ROM_BYTES {
            return Err(ConfigError::RomTooLarge {
                len: rom.len(),
                max: ROM_BYTES,
            });
        }
        Ok(Self {
            rom: rom.to_vec(),
            ..Self::default()
        })
    }

    /// Returns the ROM image clipped to the ROM region.
    #[must_use]
    pub fn rom_image(&self) -> &[u8] {
        &self.rom[..self.rom.len().min(ROM_BYTES)]
    }
}
