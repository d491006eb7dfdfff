//! Frame scheduler: one interrupt, 312 scanlines of CPU time, one picture.

use crate::{
    timing::{CycleCarry, INTERRUPT_BUS_VALUE},
    video::{self, FRAME_BYTES, FRAME_WIDTH},
    CpuEngine, FrameBufferTooSmall, MachineConfig, MachineState,
};

/// Accounting for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameStats {
    /// Cycles consumed by the engine, interrupt prologue included.
    pub cycles: u64,
    /// Carry left after the last scanline.
    pub carry: i64,
    /// Whether the engine ran; `false` for a machine already done.
    pub executed: bool,
}

/// Runs one frame of `engine` against `state` and renders it into `frame`.
///
/// Each scanline is drawn right after the CPU time owed for it, so raster
/// effects produced mid-frame show up on the lines that follow. Once the engine
/// signals done it is not called again; the remaining lines still render. A
/// machine that is already done renders its current memory and leaves the
/// frame counter alone.
///
/// # Errors
///
/// Returns [`FrameBufferTooSmall`] when `frame` is shorter than
/// [`FRAME_BYTES`]; nothing is executed or written in that case.
pub fn run_frame<E: CpuEngine + ?Sized>(
    engine: &mut E,
    state: &mut MachineState,
    config: &MachineConfig,
    frame: &mut [u8],
) -> Result<FrameStats, FrameBufferTooSmall> {
    if frame.len() < FRAME_BYTES {
        return Err(FrameBufferTooSmall {
            needed: FRAME_BYTES,
            supplied: frame.len(),
        });
    }
    let frame = &mut frame[..FRAME_BYTES];

    if state.is_done() {
        video::render_frame_static(&state.memory, state.border(), state.flash_phase(), frame);
        return Ok(FrameStats::default());
    }

    let prologue = {
        let (cpu, mut bus) = state.split_bus(config.rom_write_protect);
        engine.interrupt(cpu, INTERRUPT_BUS_VALUE, &mut bus)
    };
    let mut carry = CycleCarry::from_prologue(prologue);
    let mut cycles = u64::from(prologue);

    for (y, line) in frame.chunks_exact_mut(FRAME_WIDTH).enumerate() {
        if !state.is_done() {
            let consumed = {
                let (cpu, mut bus) = state.split_bus(config.rom_write_protect);
                engine.execute(cpu, carry.next_request(), &mut bus)
            };
            carry.settle(consumed);
            cycles += u64::from(consumed);
        }
        state.render_scanline(y, line);
    }

    state.advance_frame();
    log::trace!(
        "frame {} done: {cycles} cycles, carry {}",
        state.frame_counter(),
        carry.value()
    );

    Ok(FrameStats {
        cycles,
        carry: carry.value(),
        executed: true,
    })
}
