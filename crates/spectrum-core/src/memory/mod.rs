//! Memory model primitives and the fixed 48K address map.

/// Address-masked byte access helpers.
pub mod access;
/// Fixed memory-region map and address decoder.
pub mod map;

pub use access::{bus_write_allowed, read_byte, wrap_address, write_byte, ADDRESS_MASK};
pub use map::{
    decode_memory_region, MemoryRegion, RegionDescriptor, ATTRIBUTES_END, ATTRIBUTES_START,
    BITMAP_END, BITMAP_START, FIXED_MEMORY_REGIONS, RAM_END, RAM_START, ROM_BYTES, ROM_END,
    ROM_START,
};

/// Size in bytes of the flat address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Flat 64 KiB image; every 16-bit address indexes it.
pub type AddressSpace = [u8; ADDRESS_SPACE_BYTES];

/// Allocates a zeroed 64 KiB address-space backing store.
#[must_use]
pub fn new_address_space() -> Box<AddressSpace> {
    Box::new([0; ADDRESS_SPACE_BYTES])
}

/// Serde adapter for a boxed [`AddressSpace`]; images of any other length are
/// rejected on the way in.
#[cfg(feature = "serde")]
pub(crate) mod image_serde {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::{AddressSpace, ADDRESS_SPACE_BYTES};

    pub fn serialize<S: Serializer>(
        image: &AddressSpace,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        image[..].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Box<AddressSpace>, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let len = bytes.len();
        bytes
            .into_boxed_slice()
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"exactly 65536 bytes"))
    }

}
