//! Deterministic frame fingerprint for cross-host comparison.
//!
//! Loads a synthetic snapshot, drives it with a toy engine that paints border
//! stripes and scrolls the bitmap, then hashes the rendered frames.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p spectrum-core --example frame_fingerprint
//! ```

use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use spectrum_core::{CpuEngine, CpuRegisters, Key, Machine, MachineConfig, SystemBus, FRAME_BYTES};
use thiserror as _;

const FRAMES: usize = 50;

/// Toy engine: every scanline it bumps the border colour and rotates one
/// bitmap byte, reading the keyboard to decide the direction.
#[derive(Default)]
struct StripeEngine {
    line: u16,
}

impl CpuEngine for StripeEngine {
    fn reset(&mut self, cpu: &mut CpuRegisters) {
        *cpu = CpuRegisters::default();
        self.line = 0;
    }

    fn interrupt(
        &mut self,
        cpu: &mut CpuRegisters,
        _bus_value: u8,
        _bus: &mut dyn SystemBus,
    ) -> u32 {
        if !cpu.iff1 {
            return 0;
        }
        self.line = 0;
        13
    }

    fn execute(&mut self, cpu: &mut CpuRegisters, cycles: u32, bus: &mut dyn SystemBus) -> u32 {
        let addr = 0x4000 + (self.line % 0x1800);
        let byte = bus.read_byte(addr);
        let left = bus.read_port(0xFEFE) & 0x01 == 0;
        let rotated = if left {
            byte.rotate_left(1)
        } else {
            byte.rotate_right(1)
        };
        bus.write_byte(addr, rotated);
        bus.write_port(0x00FE, (self.line / 8).to_le_bytes()[0]);
        cpu.pc = cpu.pc.wrapping_add(1);
        self.line = self.line.wrapping_add(1);
        cycles + u32::from(self.line % 3)
    }
}

fn snapshot() -> Vec<u8> {
    let mut data = vec![0; 30];
    data[6..8].copy_from_slice(&0x8000_u16.to_le_bytes());
    data[12] = 0x20 | (2 << 1);
    data[27] = 1;
    data.extend_from_slice(&[0xED, 0xED, 0xFF, 0x81, 0x3C, 0x42]);
    data.extend_from_slice(&[0xED, 0xED, 0x20, 0x57]);
    data.extend_from_slice(&[0x00, 0xED, 0xED, 0x00]);
    data
}

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let mut machine = Machine::new(StripeEngine::default(), MachineConfig::default());
    machine
        .load_snapshot(&snapshot())
        .expect("synthetic snapshot is well formed");

    let mut frame = vec![0; FRAME_BYTES];
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for index in 0..FRAMES {
        if index == FRAMES / 2 {
            machine.key_down(Key::CapsShift.code());
        }
        let stats = machine.render_frame(&mut frame).expect("buffer fits");
        hash_bytes(&mut hash, &stats.cycles.to_le_bytes());
        hash_bytes(&mut hash, &frame);
    }
    hash_bytes(&mut hash, &machine.state().cpu.pc.to_le_bytes());

    format!("{hash:016x}")
}

fn main() {
    env_logger::init();
    println!("{}", fingerprint());
}
