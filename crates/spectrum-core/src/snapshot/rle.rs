//! `.z80` run-length scheme: `ED ED count value` expands to `count` copies.
//!
//! Output goes straight into the 64 KiB image; the destination wraps at the
//! top of memory and advances only by bytes actually produced.

use crate::AddressSpace;

/// Escape byte; two in a row start a run.
pub const ESCAPE: u8 = 0xED;

/// Sequence that terminates a compressed classic payload.
pub const END_MARKER: [u8; 4] = [0x00, ESCAPE, ESCAPE, 0x00];

/// How a block of source bytes is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Bytes are copied verbatim.
    Raw,
    /// Run-length encoded.
    Rle {
        /// Stop at [`END_MARKER`] (classic payloads only).
        end_marker: bool,
    },
}

/// Result of unpacking one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unpacked {
    /// Destination address following the last byte written.
    pub next: u16,
    /// Bytes written to memory.
    pub produced: usize,
    /// Source bytes consumed.
    pub consumed: usize,
    /// Whether decoding stopped at the end marker.
    pub hit_end_marker: bool,
}

/// Unpacks `src` into `memory` starting at `start`.
///
/// An escape pair too close to the end of `src` to carry a count and value is
/// copied literally.
pub fn unpack(memory: &mut AddressSpace, start: u16, src: &[u8], encoding: Encoding) -> Unpacked {
    let mut dest = start;
    let mut produced = 0;
    let mut emit = |value: u8| {
        memory[usize::from(dest)] = value;
        dest = dest.wrapping_add(1);
        produced += 1;
    };

    let Encoding::Rle { end_marker } = encoding else {
        src.iter().copied().for_each(&mut emit);
        return Unpacked {
            next: dest,
            produced,
            consumed: src.len(),
            hit_end_marker: false,
        };
    };

    let mut index = 0;
    let mut hit_end_marker = false;
    while index < src.len() {
        let window = src.get(index..index + 4);
        if end_marker && window == Some(&END_MARKER[..]) {
            hit_end_marker = true;
            break;
        }

        match window {
            Some(&[ESCAPE, ESCAPE, count, value]) => {
                (0..count).for_each(|_| emit(value));
                index += 4;
            }
            _ => {
                emit(src[index]);
                index += 1;
            }
        }
    }

    Unpacked {
        next: dest,
        produced,
        consumed: index,
        hit_end_marker,
    }
}

#[cfg(test)]
mod tests {
    use super::{unpack, Encoding, Unpacked};
    use crate::new_address_space;

    const CLASSIC: Encoding = Encoding::Rle { end_marker: true };
    const PAGED: Encoding = Encoding::Rle { end_marker: false };

    #[test]
    fn escape_sequence_expands_run() {
        let mut memory = new_address_space();
        let out = unpack(&mut memory, 0x4000, &[0xED, 0xED, 0x05, 0x2A], CLASSIC);

        assert_eq!(&memory[0x4000..0x4005], &[0x2A; 5]);
        assert_eq!(memory[0x4005], 0);
        assert_eq!(
            out,
            Unpacked {
                next: 0x4005,
                produced: 5,
                consumed: 4,
                hit_end_marker: false
            }
        );
    }

    #[test]
    fn literals_pass_through_around_runs() {
        let mut memory = new_address_space();
        let src = [0x01, 0xED, 0x02, 0xED, 0xED, 0x03, 0xFF, 0x04];
        let out = unpack(&mut memory, 0x8000, &src, PAGED);

        assert_eq!(
            &memory[0x8000..0x8007],
            &[0x01, 0xED, 0x02, 0xFF, 0xFF, 0xFF, 0x04]
        );
        assert_eq!(out.produced, 7);
        assert_eq!(out.consumed, src.len());
    }

    #[test]
    fn end_marker_halts_classic_payload() {
        let mut memory = new_address_space();
        let src = [0x11, 0x00, 0xED, 0xED, 0x00, 0x22, 0x33];
        let out = unpack(&mut memory, 0x4000, &src, CLASSIC);

        assert_eq!(memory[0x4000], 0x11);
        assert_eq!(memory[0x4001], 0x00);
        assert_eq!(memory[0x4002], 0x00);
        assert!(out.hit_end_marker);
        assert_eq!(out.produced, 1);
        assert_eq!(out.consumed, 1);
    }

    #[test]
    fn end_marker_bytes_decode_normally_in_paged_blocks() {
        let mut memory = new_address_space();
        let src = [0x00, 0xED, 0xED, 0x00, 0x22];
        let out = unpack(&mut memory, 0xC000, &src, PAGED);

        assert!(!out.hit_end_marker);
        assert_eq!(memory[0xC000], 0x00);
        assert_eq!(out.produced, 1);
        assert_eq!(out.consumed, src.len());
    }

    #[test]
    fn truncated_escape_is_copied_literally() {
        let mut memory = new_address_space();
        let out = unpack(&mut memory, 0x4000, &[0xAA, 0xED, 0xED, 0x09], PAGED);

        assert_eq!(&memory[0x4000..0x4004], &[0xAA, 0xED, 0xED, 0x09]);
        assert_eq!(out.produced, 4);
    }

    #[test]
    fn raw_block_copies_and_wraps_at_top_of_memory() {
        let mut memory = new_address_space();
        let out = unpack(&mut memory, 0xFFFE, &[1, 2, 3, 0xED], Encoding::Raw);

        assert_eq!(memory[0xFFFE], 1);
        assert_eq!(memory[0xFFFF], 2);
        assert_eq!(memory[0x0000], 3);
        assert_eq!(memory[0x0001], 0xED);
        assert_eq!(out.next, 0x0002);
    }

    #[test]
    fn zero_count_run_produces_nothing() {
        let mut memory = new_address_space();
        let out = unpack(&mut memory, 0x4000, &[0xED, 0xED, 0x00, 0x55, 0x66], PAGED);
        assert_eq!(memory[0x4000], 0x66);
        assert_eq!(out.produced, 1);
    }
}
