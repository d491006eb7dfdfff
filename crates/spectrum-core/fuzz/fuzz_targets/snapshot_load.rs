#![no_main]

use libfuzzer_sys::fuzz_target;
use spectrum_core::{
    CpuEngine, CpuRegisters, Machine, MachineConfig, SystemBus, UnsupportedPagePolicy,
    FRAME_BYTES,
};

#[derive(Default)]
struct IdleEngine;

impl CpuEngine for IdleEngine {
    fn reset(&mut self, _cpu: &mut CpuRegisters) {}

    fn interrupt(&mut self, _cpu: &mut CpuRegisters, _: u8, _: &mut dyn SystemBus) -> u32 {
        0
    }

    fn execute(&mut self, cpu: &mut CpuRegisters, cycles: u32, bus: &mut dyn SystemBus) -> u32 {
        let opcode = bus.read_byte(cpu.pc);
        bus.write_port(0x00FE, opcode);
        cpu.pc = cpu.pc.wrapping_add(1);
        cycles
    }
}

fuzz_target!(|data: &[u8]| {
    let policy = if data.first().is_some_and(|b| b & 1 == 1) {
        UnsupportedPagePolicy::LoadAtZero
    } else {
        UnsupportedPagePolicy::Skip
    };
    let config = MachineConfig {
        unsupported_pages: policy,
        ..MachineConfig::default()
    };
    let mut machine = Machine::new(IdleEngine, config);

    if machine.load_snapshot(data).is_ok() {
        let mut frame = vec![0; FRAME_BYTES];
        let _ = machine.render_frame(&mut frame);
        assert!(frame.iter().all(|&pixel| pixel < 16));
    }
});
