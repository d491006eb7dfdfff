//! Boundary with the external Z80 execution engine.
//!
//! The machine owns a [`CpuRegisters`] file and lends it to a [`CpuEngine`]
//! together with a [`SystemBus`] view of memory, ports and the terminal flag.
//! The core never decodes instructions itself.

use crate::CpuRegisters;

/// Callbacks the engine uses to reach machine hardware during a call.
pub trait SystemBus {
    /// Reads a memory byte.
    fn read_byte(&mut self, addr: u16) -> u8;

    /// Writes a memory byte.
    fn write_byte(&mut self, addr: u16, value: u8);

    /// Services an `IN` instruction.
    fn read_port(&mut self, port: u16) -> u8;

    /// Services an `OUT` instruction.
    fn write_port(&mut self, port: u16, value: u8);

    /// Marks the machine terminal, for example after halt-and-loop detection.
    fn signal_done(&mut self);
}

/// External Z80 engine driven by the frame scheduler.
///
/// Implementations may overshoot a cycle request because instructions are
/// not divisible; the scheduler carries the difference into the next line.
pub trait CpuEngine {
    /// Puts the register file (and any engine-internal state) in power-on state.
    fn reset(&mut self, cpu: &mut CpuRegisters);

    /// Delivers a maskable interrupt with `bus_value` on the data bus.
    ///
    /// Returns the cycles consumed by the interrupt prologue, zero when the
    /// interrupt was not accepted.
    fn interrupt(&mut self, cpu: &mut CpuRegisters, bus_value: u8, bus: &mut dyn SystemBus)
        -> u32;

    /// Executes instructions until at least `cycles` cycles elapsed.
    ///
    /// Returns the number of cycles actually consumed.
    fn execute(&mut self, cpu: &mut CpuRegisters, cycles: u32, bus: &mut dyn SystemBus) -> u32;
}
