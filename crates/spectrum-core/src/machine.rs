//! Host-facing machine handle.

use crate::{
    scheduler::{self, FrameStats},
    snapshot::{self, SnapshotSummary},
    CpuEngine, FrameBufferTooSmall, MachineConfig, MachineState, SnapshotError,
};

/// One emulated 48K machine driven by an injected CPU engine.
///
/// Owns all of its state; independent instances share nothing. Dropping the
/// handle releases it.
#[derive(Debug)]
pub struct Machine<E: CpuEngine> {
    engine: E,
    state: MachineState,
    config: MachineConfig,
}

impl<E: CpuEngine> Machine<E> {
    /// Creates a powered-on machine.
    #[must_use]
    pub fn new(engine: E, config: MachineConfig) -> Self {
        let mut machine = Self {
            engine,
            state: MachineState::new(config.rom_image()),
            config,
        };
        machine.engine.reset(&mut machine.state.cpu);
        machine
    }

    /// Returns the machine to power-on state and resets the engine.
    pub fn reset(&mut self) {
        self.state.reinitialize(self.config.rom_image());
        self.engine.reset(&mut self.state.cpu);
        log::debug!("machine reset");
    }

    /// Resets the machine, then loads a `.z80` snapshot over it.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] for malformed input. The machine is left
    /// reset with whatever the loader applied before the problem was found.
    pub fn load_snapshot(&mut self, data: &[u8]) -> Result<SnapshotSummary, SnapshotError> {
        self.reset();
        let result = snapshot::load_into(&mut self.state, data, self.config.unsupported_pages);
        match &result {
            Ok(summary) => log::info!(
                "loaded {:?} snapshot, pc {:#06x}",
                summary.format,
                self.state.cpu.pc
            ),
            Err(err) => log::warn!("snapshot rejected: {err}"),
        }
        result
    }

    /// Marks the key with matrix code `code` (`row << 8 | bit`) as held.
    pub fn key_down(&mut self, code: u16) {
        self.state.keyboard.key_down(code);
    }

    /// Marks the key with matrix code `code` as released.
    pub fn key_up(&mut self, code: u16) {
        self.state.keyboard.key_up(code);
    }

    /// Runs one frame and renders it into `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameBufferTooSmall`] when `frame` cannot hold a full frame.
    pub fn render_frame(&mut self, frame: &mut [u8]) -> Result<FrameStats, FrameBufferTooSmall> {
        scheduler::run_frame(&mut self.engine, &mut self.state, &self.config, frame)
    }

    /// Reads memory at `addr` modulo 64 KiB.
    #[must_use]
    pub fn read_memory(&self, addr: u32) -> u8 {
        self.state.read_memory(addr)
    }

    /// Writes memory at `addr` modulo 64 KiB, returning the previous byte.
    ///
    /// Host writes bypass ROM write protection.
    pub fn write_memory(&mut self, addr: u32, value: u8) -> u8 {
        self.state.write_memory(addr, value)
    }

    /// Frames rendered since the last reset.
    #[must_use]
    pub const fn frame_counter(&self) -> u64 {
        self.state.frame_counter()
    }

    /// Returns `true` once the engine signalled completion.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Machine state.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable machine state, for hosts that poke registers or latches directly.
    pub const fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Configuration fixed at construction.
    #[must_use]
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The injected engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// The injected engine, mutably.
    pub const fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Consumes the machine and returns its engine.
    #[must_use]
    pub fn into_engine(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::Machine;
    use crate::{CpuEngine, CpuRegisters, MachineConfig, SystemBus};

    #[derive(Debug, Default)]
    struct ResetCounter {
        resets: usize,
    }

    impl CpuEngine for ResetCounter {
        fn reset(&mut self, cpu: &mut CpuRegisters) {
            self.resets += 1;
            cpu.sp = 0xFFFF;
        }

        fn interrupt(&mut self, _: &mut CpuRegisters, _: u8, _: &mut dyn SystemBus) -> u32 {
            0
        }

        fn execute(&mut self, _: &mut CpuRegisters, cycles: u32, _: &mut dyn SystemBus) -> u32 {
            cycles
        }
    }

    #[test]
    fn new_resets_engine_and_installs_rom() {
        let config = MachineConfig::with_rom(&[0xF3, 0xAF]).expect("rom fits");
        let machine = Machine::new(ResetCounter::default(), config);

        assert_eq!(machine.engine().resets, 1);
        assert_eq!(machine.state().cpu.sp, 0xFFFF);
        assert_eq!(machine.read_memory(0), 0xF3);
        assert_eq!(machine.read_memory(1), 0xAF);
        assert_eq!(machine.frame_counter(), 0);
    }

    #[test]
    fn reset_restores_rom_after_host_writes() {
        let config = MachineConfig::with_rom(&[0x3E]).expect("rom fits");
        let mut machine = Machine::new(ResetCounter::default(), config);
        machine.write_memory(0, 0x00);
        machine.write_memory(0x9000, 0x77);
        machine.key_down(0x0101);

        machine.reset();

        assert_eq!(machine.read_memory(0), 0x3E);
        assert_eq!(machine.read_memory(0x9000), 0x00);
        assert_eq!(machine.state().keyboard.half_row(1), Some(0xFF));
        assert_eq!(machine.engine().resets, 2);
    }

    #[test]
    fn failed_snapshot_leaves_machine_reset() {
        let mut machine = Machine::new(ResetCounter::default(), MachineConfig::default());
        machine.write_memory(0x8000, 0x42);

        assert!(machine.load_snapshot(&[0; 12]).is_err());
        assert_eq!(machine.read_memory(0x8000), 0x00);
        assert!(!machine.is_done());
    }
}
