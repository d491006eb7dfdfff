//! Machine core for a 48K ZX Spectrum.
//!
//! Memory, keyboard matrix, ULA port, raster renderer, `.z80` snapshot loader
//! and frame scheduler. Instruction execution is delegated to an injected
//! [`CpuEngine`].

/// Memory model primitives and fixed region map.
pub mod memory;
pub use memory::{
    bus_write_allowed, decode_memory_region, new_address_space, read_byte, wrap_address,
    write_byte, AddressSpace, MemoryRegion, RegionDescriptor, ADDRESS_MASK, ADDRESS_SPACE_BYTES,
    ATTRIBUTES_END, ATTRIBUTES_START, BITMAP_END, BITMAP_START, FIXED_MEMORY_REGIONS, RAM_END,
    RAM_START, ROM_BYTES, ROM_END, ROM_START,
};

/// Keyboard half-row matrix.
pub mod keyboard;
pub use keyboard::{Key, KeyboardMatrix, ALL_RELEASED, HALF_ROW_COUNT};

/// ULA port decoding and the border/EAR latch.
pub mod io;
pub use io::UlaLatch;

/// CPU engine boundary.
pub mod cpu;
pub use cpu::{CpuEngine, SystemBus};

/// Register file, run state and the aggregate machine state.
pub mod state;
pub use state::{CpuRegisters, MachineState, RunState};

/// Bus view lent to the engine.
pub mod bus;
pub use bus::MachineBus;

/// Raster renderer.
pub mod video;
pub use video::{rgb, Attribute, FRAME_BYTES, FRAME_HEIGHT, FRAME_WIDTH, PALETTE_RGB};

/// Raster timing constants.
pub mod timing;
pub use timing::{CycleCarry, CYCLES_PER_FRAME, CYCLES_PER_SCANLINE, SCANLINES_PER_FRAME};

/// Error types.
pub mod error;
pub use error::{ConfigError, FrameBufferTooSmall, SnapshotError};

/// Host-supplied configuration.
pub mod config;
pub use config::{MachineConfig, UnsupportedPagePolicy};

/// `.z80` snapshot loader.
pub mod snapshot;
pub use snapshot::{PageLoad, PageTarget, SnapshotFormat, SnapshotSummary};

/// Frame scheduler.
pub mod scheduler;
pub use scheduler::{run_frame, FrameStats};

/// Host-facing machine handle.
pub mod machine;
pub use machine::Machine;

#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
