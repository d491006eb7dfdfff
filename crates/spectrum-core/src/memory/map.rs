//! Fixed 48K memory map and address decoding helpers.

/// Inclusive start address of the ROM region.
pub const ROM_START: u16 = 0x0000;
/// Inclusive end address of the ROM region.
pub const ROM_END: u16 = 0x3FFF;
/// Inclusive start address of the screen bitmap.
pub const BITMAP_START: u16 = 0x4000;
/// Inclusive end address of the screen bitmap.
pub const BITMAP_END: u16 = 0x57FF;
/// Inclusive start address of the colour-attribute table.
pub const ATTRIBUTES_START: u16 = 0x5800;
/// Inclusive end address of the colour-attribute table.
pub const ATTRIBUTES_END: u16 = 0x5AFF;
/// Inclusive start address of general-purpose RAM above the display file.
pub const RAM_START: u16 = 0x5B00;
/// Inclusive end address of general-purpose RAM.
pub const RAM_END: u16 = 0xFFFF;

/// Size in bytes of the ROM region.
pub const ROM_BYTES: usize = ROM_END as usize + 1;

/// Fixed-region descriptor for the 48K memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: MemoryRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

/// Region classification for 16-bit addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryRegion {
    /// System ROM (`0x0000..=0x3FFF`).
    Rom,
    /// Screen bitmap (`0x4000..=0x57FF`).
    Bitmap,
    /// Colour attributes (`0x5800..=0x5AFF`).
    Attributes,
    /// General RAM (`0x5B00..=0xFFFF`).
    Ram,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Rom => (ROM_START, ROM_END),
            Self::Bitmap => (BITMAP_START, BITMAP_END),
            Self::Attributes => (ATTRIBUTES_START, ATTRIBUTES_END),
            Self::Ram => (RAM_START, RAM_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Returns the descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }
}

/// Region layout in ascending address order.
pub const FIXED_MEMORY_REGIONS: [RegionDescriptor; 4] = [
    MemoryRegion::Rom.descriptor(),
    MemoryRegion::Bitmap.descriptor(),
    MemoryRegion::Attributes.descriptor(),
    MemoryRegion::Ram.descriptor(),
];

const _: () = assert_fixed_region_layout();

const fn assert_fixed_region_layout() {
    let mut index = 0;
    while index < FIXED_MEMORY_REGIONS.len() {
        let descriptor = FIXED_MEMORY_REGIONS[index];
        assert!(
            descriptor.start <= descriptor.end,
            "region start cannot be greater than end"
        );

        if index > 0 {
            let previous = FIXED_MEMORY_REGIONS[index - 1];
            assert!(
                previous.end.wrapping_add(1) == descriptor.start,
                "fixed regions must be contiguous"
            );
        }

        index += 1;
    }

    assert!(
        FIXED_MEMORY_REGIONS[0].start == 0x0000 && FIXED_MEMORY_REGIONS[3].end == u16::MAX,
        "fixed regions must cover full address space"
    );
    assert!(
        (BITMAP_END - BITMAP_START) as usize + 1 == 32 * 192,
        "bitmap holds 192 rows of 32 bytes"
    );
    assert!(
        (ATTRIBUTES_END - ATTRIBUTES_START) as usize + 1 == 32 * 24,
        "attribute table holds 24 rows of 32 cells"
    );
}

/// Decodes a 16-bit address into its memory region.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> MemoryRegion {
    match addr {
        ROM_START..=ROM_END => MemoryRegion::Rom,
        BITMAP_START..=BITMAP_END => MemoryRegion::Bitmap,
        ATTRIBUTES_START..=ATTRIBUTES_END => MemoryRegion::Attributes,
        RAM_START..=RAM_END => MemoryRegion::Ram,
    }
}
