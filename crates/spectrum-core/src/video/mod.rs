//! Raster renderer turning the display file into colour-index scanlines.
//!
//! A frame is 352x312 bytes. Scanlines `48..240` carry the 256-pixel bitmap
//! between 48-pixel side borders; every other scanline is solid border.

/// Attribute byte decoding and the pixel rule.
pub mod attribute;
/// RGB palette for colour indices.
pub mod palette;

pub use attribute::Attribute;
pub use palette::{rgb, PALETTE_RGB};

use crate::{AddressSpace, ATTRIBUTES_START, BITMAP_START};

/// Width of a rendered scanline in pixels.
pub const FRAME_WIDTH: usize = 352;
/// Number of scanlines per frame.
pub const FRAME_HEIGHT: usize = 312;
/// Bytes required for one rendered frame.
pub const FRAME_BYTES: usize = FRAME_WIDTH * FRAME_HEIGHT;
/// Width of the left and right border bands.
pub const BORDER_SIDE: usize = 48;
/// First scanline carrying bitmap data.
pub const SCREEN_TOP: usize = 48;
/// Width of the bitmap area.
pub const SCREEN_WIDTH: usize = 256;
/// Height of the bitmap area.
pub const SCREEN_HEIGHT: usize = 192;
/// Character cells per bitmap row.
pub const CELL_COLUMNS: usize = SCREEN_WIDTH / 8;

const _: () = assert!(BORDER_SIDE * 2 + SCREEN_WIDTH == FRAME_WIDTH);
const _: () = assert!(SCREEN_TOP + SCREEN_HEIGHT < FRAME_HEIGHT);

/// Flash phase for a frame number: on while bit 4 is set.
#[must_use]
pub const fn flash_phase(frame_counter: u64) -> bool {
    frame_counter & 0x10 != 0
}

/// Returns the bitmap address of screen row `y0` (`0..192`).
///
/// The row index is re-interleaved as `[Y7 Y6][Y2 Y1 Y0][Y5 Y4 Y3]` before
/// scaling by the 32-byte row pitch.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn bitmap_row_address(y0: u8) -> u16 {
    let interleaved = (y0 & 0xC0) | ((y0 << 3) & 0x38) | ((y0 >> 3) & 0x07);
    BITMAP_START + ((interleaved as u16) << 5)
}

/// Returns the attribute address of screen row `y0` (`0..192`).
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn attribute_row_address(y0: u8) -> u16 {
    ATTRIBUTES_START + (y0 as u16 / 8) * 32
}

/// Returns `Some(y0)` when scanline `y` falls inside the bitmap band.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn screen_row(y: usize) -> Option<u8> {
    if y < SCREEN_TOP || y >= SCREEN_TOP + SCREEN_HEIGHT {
        None
    } else {
        Some((y - SCREEN_TOP) as u8)
    }
}

/// Renders scanline `y` into `line`, which must be [`FRAME_WIDTH`] bytes.
///
/// Reads only `memory`, `border` and `flash_phase`; there is no other state.
pub fn render_scanline(
    memory: &AddressSpace,
    border: u8,
    flash_phase: bool,
    y: usize,
    line: &mut [u8],
) {
    debug_assert_eq!(line.len(), FRAME_WIDTH);

    let Some(y0) = screen_row(y) else {
        line.fill(border);
        return;
    };

    let (left, rest) = line.split_at_mut(BORDER_SIDE);
    let (bitmap, right) = rest.split_at_mut(SCREEN_WIDTH);
    left.fill(border);
    right.fill(border);

    let bitmap_base = usize::from(bitmap_row_address(y0));
    let attribute_base = usize::from(attribute_row_address(y0));

    for (column, cell) in bitmap.chunks_exact_mut(8).enumerate() {
        let bits = memory[bitmap_base + column];
        let attribute = Attribute::new(memory[attribute_base + column]);
        attribute.decode_cell(bits, flash_phase, cell);
    }
}

/// Renders a whole frame without running any CPU code.
pub fn render_frame_static(
    memory: &AddressSpace,
    border: u8,
    flash_phase: bool,
    frame: &mut [u8],
) {
    for (y, line) in frame
        .chunks_exact_mut(FRAME_WIDTH)
        .take(FRAME_HEIGHT)
        .enumerate()
    {
        render_scanline(memory, border, flash_phase, y, line);
    }
}
