//! Bus view handed to the CPU engine for the duration of one call.

use crate::{
    bus_write_allowed, io, state::RunState, AddressSpace, KeyboardMatrix, SystemBus, UlaLatch,
};

/// Borrowed memory, keyboard, ULA latch and run state wired to [`SystemBus`].
#[derive(Debug)]
pub struct MachineBus<'a> {
    memory: &'a mut AddressSpace,
    keyboard: &'a KeyboardMatrix,
    ula: &'a mut UlaLatch,
    run_state: &'a mut RunState,
    rom_write_protect: bool,
}

impl<'a> MachineBus<'a> {
    /// Builds a bus over the given pieces of machine state.
    #[must_use]
    pub const fn new(
        memory: &'a mut AddressSpace,
        keyboard: &'a KeyboardMatrix,
        ula: &'a mut UlaLatch,
        run_state: &'a mut RunState,
        rom_write_protect: bool,
    ) -> Self {
        Self {
            memory,
            keyboard,
            ula,
            run_state,
            rom_write_protect,
        }
    }
}

impl SystemBus for MachineBus<'_> {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self.memory[usize::from(addr)]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        if bus_write_allowed(addr, self.rom_write_protect) {
            self.memory[usize::from(addr)] = value;
        }
    }

    fn read_port(&mut self, port: u16) -> u8 {
        io::port_read(self.keyboard, port)
    }

    fn write_port(&mut self, port: u16, value: u8) {
        io::port_write(self.ula, port, value);
    }

    fn signal_done(&mut self) {
        if !self.run_state.is_done() {
            log::debug!("cpu engine signalled completion");
        }
        *self.run_state = RunState::Done;
    }
}
