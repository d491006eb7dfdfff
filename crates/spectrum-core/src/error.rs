//! Error types surfaced by snapshot loading, configuration and frame rendering.

use thiserror::Error;

/// Structural problems found while decoding a `.z80` snapshot.
///
/// The machine is always re-initialised before decoding starts, so on error
/// it holds a clean state plus whatever blocks were applied before the fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SnapshotError {
    /// Fewer bytes than the fixed header.
    #[error("snapshot header needs {needed} bytes, got {available}")]
    TruncatedHeader {
        /// Bytes required.
        needed: usize,
        /// Bytes supplied.
        available: usize,
    },
    /// Extended header length points past the end of the input.
    #[error("extended header declares {declared} bytes but only {available} follow")]
    TruncatedExtendedHeader {
        /// Declared extension length.
        declared: usize,
        /// Bytes present after the length field.
        available: usize,
    },
    /// Fewer than three bytes left where a page block header was expected.
    #[error("page block header at offset {offset} is truncated")]
    TruncatedBlockHeader {
        /// Input offset of the partial header.
        offset: usize,
    },
    /// A page block declares more data than remains in the input.
    #[error("page {page} declares {declared} bytes at offset {offset}, only {available} remain")]
    TruncatedBlock {
        /// Page identifier from the block header.
        page: u8,
        /// Input offset of the block data.
        offset: usize,
        /// Declared data length.
        declared: usize,
        /// Bytes actually remaining.
        available: usize,
    },
}

/// Rejected machine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// ROM image does not fit the 16 KiB ROM region.
    #[error("rom image is {len} bytes, at most {max} allowed")]
    RomTooLarge {
        /// Supplied image length.
        len: usize,
        /// Size of the ROM region.
        max: usize,
    },
}

/// Output buffer passed to the frame scheduler is too small.
///
/// Recoverable: nothing was executed or written, resize and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("frame buffer holds {supplied} bytes, {needed} required")]
pub struct FrameBufferTooSmall {
    /// Bytes required for a full frame.
    pub needed: usize,
    /// Bytes supplied by the caller.
    pub supplied: usize,
}

impl FrameBufferTooSmall {
    /// Bytes missing from the supplied buffer.
    #[must_use]
    pub const fn shortfall(&self) -> usize {
        self.needed.saturating_sub(self.supplied)
    }
}
