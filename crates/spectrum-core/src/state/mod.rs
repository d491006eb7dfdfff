//! Aggregate machine state owned by one emulator instance.

/// Z80 register file.
pub mod registers;
/// Terminal-state tracking.
pub mod run_state;

pub use registers::CpuRegisters;
pub use run_state::RunState;

use crate::{
    io::UlaLatch, memory, new_address_space, video, AddressSpace, KeyboardMatrix, MachineBus,
    ROM_BYTES,
};

/// Complete hardware state of one 48K machine.
///
/// Memory is always exactly 64 KiB; the keyboard and border latch mask every
/// write; the frame counter only moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Register file lent to the CPU engine.
    pub cpu: CpuRegisters,
    /// Flat 64 KiB image shared by CPU and video.
    #[cfg_attr(feature = "serde", serde(with = "crate::memory::image_serde"))]
    pub memory: Box<AddressSpace>,
    /// Inverted-logic key matrix.
    pub keyboard: KeyboardMatrix,
    /// Border colour and EAR latch.
    pub ula: UlaLatch,
    frame_counter: u64,
    run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl MachineState {
    /// Creates a powered-on state with `rom` copied to address zero.
    #[must_use]
    pub fn new(rom: &[u8]) -> Self {
        let mut state = Self {
            cpu: CpuRegisters::default(),
            memory: new_address_space(),
            keyboard: KeyboardMatrix::default(),
            ula: UlaLatch::default(),
            frame_counter: 0,
            run_state: RunState::Running,
        };
        state.load_rom(rom);
        state
    }

    /// Restores power-on state: zeroed memory plus ROM, released keys,
    /// black border, frame zero, running. The register file is cleared; the
    /// engine resets it afterwards.
    pub fn reinitialize(&mut self, rom: &[u8]) {
        self.cpu = CpuRegisters::default();
        self.memory.fill(0);
        self.load_rom(rom);
        self.keyboard.release_all();
        self.ula = UlaLatch::default();
        self.frame_counter = 0;
        self.run_state = RunState::Running;
    }

    fn load_rom(&mut self, rom: &[u8]) {
        let len = rom.len().min(ROM_BYTES);
        self.memory[..len].copy_from_slice(&rom[..len]);
    }

    /// Frames rendered since the last reset.
    #[must_use]
    pub const fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub(crate) const fn advance_frame(&mut self) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }

    /// Current flash phase derived from the frame counter.
    #[must_use]
    pub const fn flash_phase(&self) -> bool {
        video::flash_phase(self.frame_counter)
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns `true` once the engine signalled completion.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.run_state.is_done()
    }

    /// Latches the terminal state.
    pub const fn mark_done(&mut self) {
        self.run_state = RunState::Done;
    }

    /// Border colour (`0..=7`).
    #[must_use]
    pub const fn border(&self) -> u8 {
        self.ula.border()
    }

    /// Reads memory at `addr` modulo 64 KiB.
    #[must_use]
    pub fn read_memory(&self, addr: u32) -> u8 {
        memory::read_byte(&self.memory, addr)
    }

    /// Writes memory at `addr` modulo 64 KiB and returns the previous byte.
    pub fn write_memory(&mut self, addr: u32, value: u8) -> u8 {
        memory::write_byte(&mut self.memory, addr, value)
    }

    /// Renders scanline `y` of the current display file into `line`.
    pub fn render_scanline(&self, y: usize, line: &mut [u8]) {
        video::render_scanline(&self.memory, self.border(), self.flash_phase(), y, line);
    }

    /// Splits the state into the register file and a bus over the rest.
    pub fn split_bus(&mut self, rom_write_protect: bool) -> (&mut CpuRegisters, MachineBus<'_>) {
        let bus = MachineBus::new(
            &mut self.memory,
            &self.keyboard,
            &mut self.ula,
            &mut self.run_state,
            rom_write_protect,
        );
        (&mut self.cpu, bus)
    }
}

#[cfg(test)]
mod tests {
    use super::{MachineState, RunState};
    use crate::{CpuRegisters, KeyboardMatrix, ADDRESS_SPACE_BYTES};

    #[test]
    fn new_state_copies_rom_and_releases_keys() {
        let state = MachineState::new(&[0xF3, 0xAF, 0x11]);
        assert_eq!(state.memory.len(), ADDRESS_SPACE_BYTES);
        assert_eq!(&state.memory[..3], &[0xF3, 0xAF, 0x11]);
        assert_eq!(state.memory[3], 0);
        assert_eq!(state.keyboard, KeyboardMatrix::default());
        assert_eq!(state.border(), 0);
        assert_eq!(state.frame_counter(), 0);
        assert_eq!(state.run_state(), RunState::Running);
    }

    #[test]
    fn reinitialize_discards_everything_but_rom() {
        let mut state = MachineState::new(&[0x01, 0x02]);
        state.memory[0x0000] = 0xFF;
        state.memory[0x8000] = 0xAA;
        state.cpu.pc = 0x1234;
        state.keyboard.key_down(0x0001);
        state.ula.latch(0x17);
        state.advance_frame();
        state.mark_done();

        state.reinitialize(&[0x01, 0x02]);

        assert_eq!(state.memory[0x0000], 0x01);
        assert_eq!(state.memory[0x8000], 0x00);
        assert_eq!(state.cpu, CpuRegisters::default());
        assert_eq!(state.keyboard, KeyboardMatrix::default());
        assert_eq!(state.border(), 0);
        assert!(!state.ula.ear());
        assert_eq!(state.frame_counter(), 0);
        assert!(!state.is_done());
    }

    #[test]
    fn memory_access_wraps_modulo_64k() {
        let mut state = MachineState::default();
        assert_eq!(state.write_memory(0x1_4000, 0x5A), 0x00);
        assert_eq!(state.read_memory(0x4000), 0x5A);
        assert_eq!(state.write_memory(0x4000, 0x00), 0x5A);
    }

    #[test]
    fn flash_phase_follows_frame_counter() {
        let mut state = MachineState::default();
        for _ in 0..16 {
            assert!(!state.flash_phase());
            state.advance_frame();
        }
        assert!(state.flash_phase());
    }
}
