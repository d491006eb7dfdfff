//! RGB values for the sixteen colour indices written into frame buffers.

/// Channel level of a normal (non-bright) colour.
pub const NORMAL_LEVEL: u8 = 0xD7;
/// Channel level of a bright colour.
pub const BRIGHT_LEVEL: u8 = 0xFF;

/// `[r, g, b]` for each colour index; index bit 0 is blue, 1 red, 2 green, 3 bright.
pub const PALETTE_RGB: [[u8; 3]; 16] = build_palette();

const fn build_palette() -> [[u8; 3]; 16] {
    let mut palette = [[0; 3]; 16];
    let mut index = 0;
    while index < 16 {
        let level = if index & 0x08 != 0 {
            BRIGHT_LEVEL
        } else {
            NORMAL_LEVEL
        };
        palette[index] = [
            channel(index, 0x02, level),
            channel(index, 0x04, level),
            channel(index, 0x01, level),
        ];
        index += 1;
    }
    palette
}

const fn channel(index: usize, mask: usize, level: u8) -> u8 {
    if index & mask != 0 {
        level
    } else {
        0
    }
}

/// Returns the RGB triple for a colour index; only the low four bits are used.
#[must_use]
pub const fn rgb(index: u8) -> [u8; 3] {
    PALETTE_RGB[(index & 0x0F) as usize]
}
