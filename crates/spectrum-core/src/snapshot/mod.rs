//! `.z80` snapshot loading.
//!
//! Two layouts share the 30-byte [`SnapshotHeader`]:
//!
//! - classic (`PC != 0`): everything after the header is the 48K image from
//!   `0x4000`, RLE-compressed when flags bit 5 is set;
//! - extended (`PC == 0`): a length-prefixed extension header carries the real
//!   `PC`, then page blocks `len:u16 page:u8 data` follow to the end of input.
//!
//! Every offset and length is checked against the input; structural problems
//! surface as [`SnapshotError`].

/// Fixed header decoding.
pub mod header;
/// Run-length decompression.
pub mod rle;

pub use header::{read_u16_le, SnapshotHeader, HEADER_LEN};
pub use rle::{unpack, Encoding, Unpacked};

use crate::{MachineState, SnapshotError, UnsupportedPagePolicy};

/// Input offset of the extension-header length word.
pub const EXTENDED_LENGTH_OFFSET: usize = 30;
/// Input offset of the real `PC` in the extended layout.
pub const EXTENDED_PC_OFFSET: usize = 32;
/// Input offset of the hardware-mode byte in the extended layout.
pub const EXTENDED_HARDWARE_OFFSET: usize = 34;
/// Page-block length value marking an uncompressed 16 KiB block.
pub const RAW_BLOCK_MARKER: u16 = 0xFFFF;
/// Size of a page.
pub const PAGE_BYTES: usize = 0x4000;
/// Size of a page-block header.
pub const BLOCK_HEADER_LEN: usize = 3;
/// Load address of a classic payload.
pub const CLASSIC_LOAD_ADDRESS: u16 = 0x4000;

/// Detected snapshot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SnapshotFormat {
    /// Header `PC` non-zero, single payload at `0x4000`.
    Classic {
        /// Whether the payload was RLE-compressed.
        compressed: bool,
    },
    /// Header `PC` zero, paged payload.
    Extended {
        /// Declared extension-header length.
        header_len: u16,
        /// Hardware-mode byte, when the extension header carries one.
        hardware_mode: Option<u8>,
    },
}

/// Where a page identifier loads in the 48K map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PageTarget {
    /// Page 0, the ROM. Never loaded.
    Rom,
    /// A RAM page with its load address.
    Ram {
        /// First address written.
        base: u16,
    },
    /// Any identifier the 48K map has no slot for.
    Unsupported(u8),
}

impl PageTarget {
    /// Maps a page identifier: 4 → `0x8000`, 5 → `0xC000`, 8 → `0x4000`.
    #[must_use]
    pub const fn from_id(page: u8) -> Self {
        match page {
            0 => Self::Rom,
            4 => Self::Ram { base: 0x8000 },
            5 => Self::Ram { base: 0xC000 },
            8 => Self::Ram { base: 0x4000 },
            other => Self::Unsupported(other),
        }
    }

    /// Load address under `policy`, or `None` when the block is skipped.
    #[must_use]
    pub const fn load_address(self, policy: UnsupportedPagePolicy) -> Option<u16> {
        match (self, policy) {
            (Self::Ram { base }, _) => Some(base),
            (Self::Unsupported(_), UnsupportedPagePolicy::LoadAtZero) => Some(0x0000),
            (Self::Rom | Self::Unsupported(_), _) => None,
        }
    }
}

/// What happened to one page block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PageLoad {
    /// Identifier from the block header.
    pub page: u8,
    /// Mapping of that identifier.
    pub target: PageTarget,
    /// Address decoding started at, `None` when skipped.
    pub loaded_at: Option<u16>,
    /// Bytes written to memory.
    pub bytes_written: usize,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SnapshotSummary {
    /// Detected layout.
    pub format: SnapshotFormat,
    /// Per-block outcomes in input order; empty for classic snapshots.
    pub pages: Vec<PageLoad>,
    /// Bytes written by a classic payload; zero for extended snapshots.
    pub classic_bytes: usize,
}

/// Decodes `data` into `state`, which the caller has already re-initialised.
///
/// Registers and border come from the header; memory from the payload. Hosts
/// go through [`crate::Machine::load_snapshot`], which resets first.
///
/// # Errors
///
/// Returns a [`SnapshotError`] describing the first structural problem.
pub(crate) fn load_into(
    state: &mut MachineState,
    data: &[u8],
    policy: UnsupportedPagePolicy,
) -> Result<SnapshotSummary, SnapshotError> {
    let header = SnapshotHeader::parse(data)?;
    header.apply_registers(&mut state.cpu);
    state.ula.set_border(header.border());

    if header.is_extended() {
        load_extended(state, data, policy)
    } else {
        let compressed = header.compressed();
        let encoding = if compressed {
            Encoding::Rle { end_marker: true }
        } else {
            Encoding::Raw
        };
        let out = unpack(
            &mut state.memory,
            CLASSIC_LOAD_ADDRESS,
            &data[HEADER_LEN..],
            encoding,
        );
        log::debug!(
            "classic snapshot: compressed={compressed} wrote {} bytes, end marker {}",
            out.produced,
            out.hit_end_marker
        );
        Ok(SnapshotSummary {
            format: SnapshotFormat::Classic { compressed },
            pages: Vec::new(),
            classic_bytes: out.produced,
        })
    }
}

fn load_extended(
    state: &mut MachineState,
    data: &[u8],
    policy: UnsupportedPagePolicy,
) -> Result<SnapshotSummary, SnapshotError> {
    let available = data.len().saturating_sub(EXTENDED_PC_OFFSET);
    let header_len = read_u16_le(data, EXTENDED_LENGTH_OFFSET).ok_or(
        SnapshotError::TruncatedExtendedHeader {
            declared: 0,
            available,
        },
    )?;
    let blocks_start = EXTENDED_PC_OFFSET + usize::from(header_len);
    let pc = read_u16_le(data, EXTENDED_PC_OFFSET)
        .filter(|_| blocks_start <= data.len())
        .ok_or(SnapshotError::TruncatedExtendedHeader {
            declared: usize::from(header_len),
            available,
        })?;
    state.cpu.pc = pc;

    let hardware_mode = if header_len >= 3 {
        data.get(EXTENDED_HARDWARE_OFFSET).copied()
    } else {
        None
    };
    log::debug!(
        "extended snapshot: header {header_len} bytes, pc {pc:#06x}, hardware mode {hardware_mode:?}"
    );

    let mut pages = Vec::new();
    let mut offset = blocks_start;
    while offset < data.len() {
        let block_header = data
            .get(offset..offset + BLOCK_HEADER_LEN)
            .ok_or(SnapshotError::TruncatedBlockHeader { offset })?;
        let declared = u16::from_le_bytes([block_header[0], block_header[1]]);
        let page = block_header[2];
        offset += BLOCK_HEADER_LEN;

        let (len, encoding) = if declared == RAW_BLOCK_MARKER {
            (PAGE_BYTES, Encoding::Raw)
        } else {
            (
                usize::from(declared),
                Encoding::Rle { end_marker: false },
            )
        };
        let block = data
            .get(offset..offset + len)
            .ok_or(SnapshotError::TruncatedBlock {
                page,
                offset,
                declared: len,
                available: data.len() - offset,
            })?;

        let target = PageTarget::from_id(page);
        let loaded_at = target.load_address(policy);
        match (target, loaded_at) {
            (PageTarget::Unsupported(_), Some(base)) => {
                log::warn!("page {page} has no 48K slot, loading at {base:#06x}");
            }
            (_, None) => log::warn!("skipping page {page} ({target:?})"),
            (PageTarget::Rom | PageTarget::Ram { .. }, Some(_)) => {}
        }
        let bytes_written = loaded_at.map_or(0, |base| {
            unpack(&mut state.memory, base, block, encoding).produced
        });

        pages.push(PageLoad {
            page,
            target,
            loaded_at,
            bytes_written,
        });
        offset += len;
    }

    Ok(SnapshotSummary {
        format: SnapshotFormat::Extended {
            header_len,
            hardware_mode,
        },
        pages,
        classic_bytes: 0,
    })
}
