//! Frame scheduling, raster and host-API coverage against a scripted engine.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation,
    clippy::too_many_lines
)]

use env_logger as _;
use log as _;
use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use spectrum_core::{
    new_address_space, CpuEngine, CpuRegisters, FrameBufferTooSmall, Key, Machine, MachineConfig,
    SystemBus, ADDRESS_SPACE_BYTES, CYCLES_PER_SCANLINE, FRAME_BYTES, FRAME_HEIGHT, FRAME_WIDTH,
};
use thiserror as _;

#[derive(Debug, Clone, Copy)]
enum Action {
    Out(u16, u8),
    Poke(u16, u8),
    /// Reads `port` and stores the result at `addr`.
    InTo(u16, u16),
    Done,
}

#[derive(Debug, Default)]
struct ScriptedEngine {
    script: Vec<(usize, Action)>,
    line: usize,
    interrupts: usize,
    executes: usize,
    prologue: u32,
}

impl ScriptedEngine {
    fn with_script(script: Vec<(usize, Action)>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }
}

impl CpuEngine for ScriptedEngine {
    fn reset(&mut self, cpu: &mut CpuRegisters) {
        *cpu = CpuRegisters::default();
        self.line = 0;
    }

    fn interrupt(
        &mut self,
        _cpu: &mut CpuRegisters,
        _bus_value: u8,
        _bus: &mut dyn SystemBus,
    ) -> u32 {
        self.interrupts += 1;
        self.line = 0;
        self.prologue
    }

    fn execute(&mut self, cpu: &mut CpuRegisters, cycles: u32, bus: &mut dyn SystemBus) -> u32 {
        self.executes += 1;
        for &(line, action) in &self.script {
            if line != self.line {
                continue;
            }
            match action {
                Action::Out(port, value) => bus.write_port(port, value),
                Action::Poke(addr, value) => bus.write_byte(addr, value),
                Action::InTo(port, addr) => {
                    let value = bus.read_port(port);
                    bus.write_byte(addr, value);
                }
                Action::Done => bus.signal_done(),
            }
        }
        cpu.pc = cpu.pc.wrapping_add(1);
        self.line += 1;
        cycles
    }
}

fn machine(script: Vec<(usize, Action)>) -> Machine<ScriptedEngine> {
    Machine::new(ScriptedEngine::with_script(script), MachineConfig::default())
}

fn row(frame: &[u8], y: usize) -> &[u8] {
    &frame[y * FRAME_WIDTH..(y + 1) * FRAME_WIDTH]
}

#[test]
fn fresh_machine_renders_black_frame() {
    let mut machine = machine(Vec::new());
    let mut frame = vec![0xAA; FRAME_BYTES];

    let stats = machine.render_frame(&mut frame).expect("buffer fits");

    assert!(frame.iter().all(|&b| b == 0));
    assert_eq!(machine.frame_counter(), 1);
    assert_eq!(machine.engine().interrupts, 1);
    assert_eq!(machine.engine().executes, FRAME_HEIGHT);
    assert_eq!(stats.cycles, 156 * 2 * u64::from(CYCLES_PER_SCANLINE));
}

#[test]
fn border_change_mid_frame_shows_from_that_line_on() {
    let mut machine = machine(vec![(100, Action::Out(0x00FE, 0x02))]);
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");

    assert!(row(&frame, 99).iter().all(|&b| b == 0));
    assert!(row(&frame, 100)[..48].iter().all(|&b| b == 2));
    assert!(row(&frame, 311).iter().all(|&b| b == 2));
    assert_eq!(machine.state().border(), 2);
}

#[test]
fn odd_ports_do_not_reach_the_border() {
    let mut machine = machine(vec![(0, Action::Out(0x00FF, 0x07))]);
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");

    assert_eq!(machine.state().border(), 0);
}

#[test]
fn pixel_written_before_its_line_is_visible() {
    // Top-left cell: bitmap 0x4000, attribute 0x5800 with bright white ink on blue paper.
    let mut machine = machine(vec![
        (0, Action::Poke(0x4000, 0b1000_0001)),
        (0, Action::Poke(0x5800, 0x4F)),
    ]);
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");

    let line = row(&frame, 48);
    assert_eq!(&line[48..56], &[15, 9, 9, 9, 9, 9, 9, 15]);
    assert!(line[..48].iter().all(|&b| b == 0));
}

#[test]
fn flash_cells_swap_after_sixteen_frames() {
    let mut machine = machine(Vec::new());
    machine.write_memory(0x4000, 0xF0);
    machine.write_memory(0x5800, 0x80 | (1 << 3) | 6);
    let mut frame = vec![0; FRAME_BYTES];

    for _ in 0..16 {
        machine.render_frame(&mut frame).expect("buffer fits");
        assert_eq!(&row(&frame, 48)[48..56], &[6, 6, 6, 6, 1, 1, 1, 1]);
    }
    machine.render_frame(&mut frame).expect("buffer fits");
    assert_eq!(&row(&frame, 48)[48..56], &[1, 1, 1, 1, 6, 6, 6, 6]);
}

#[test]
fn engine_sees_pressed_key_through_the_ula_port() {
    let mut machine = machine(vec![(0, Action::InTo(0xFEFE, 0x9000))]);
    machine.key_down(Key::CapsShift.code());
    machine.key_down(Key::Z.code());
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");
    assert_eq!(machine.read_memory(0x9000), 0xFC);

    machine.key_up(Key::CapsShift.code());
    machine.render_frame(&mut frame).expect("buffer fits");
    assert_eq!(machine.read_memory(0x9000), 0xFD);
}

#[test]
fn done_machine_stops_calling_the_engine_until_reset() {
    let mut machine = machine(vec![(5, Action::Done)]);
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");
    assert!(machine.is_done());
    assert_eq!(machine.frame_counter(), 1);
    let executes = machine.engine().executes;

    let stats = machine.render_frame(&mut frame).expect("buffer fits");
    assert!(!stats.executed);
    assert_eq!(machine.engine().executes, executes);
    assert_eq!(machine.frame_counter(), 1);

    machine.reset();
    assert!(!machine.is_done());
    assert_eq!(machine.frame_counter(), 0);
}

#[test]
fn done_signal_ends_execution_within_the_same_frame() {
    let mut machine = machine(vec![
        (5, Action::Done),
        (6, Action::Out(0x00FE, 0x07)),
        (200, Action::Poke(0x9000, 0xAA)),
    ]);
    let mut frame = vec![0; FRAME_BYTES];

    let stats = machine.render_frame(&mut frame).expect("buffer fits");

    assert!(stats.executed);
    assert!(machine.is_done());
    assert_eq!(machine.engine().executes, 6);
    assert_eq!(machine.state().border(), 0);
    assert_eq!(machine.read_memory(0x9000), 0x00);
    assert!(row(&frame, 311).iter().all(|&b| b == 0));
}

#[test]
fn host_supplied_memory_image_is_rendered() {
    let mut machine = machine(Vec::new());
    let mut image = new_address_space();
    image[0x4000] = 0xFF;
    image[0x5800] = 0x07;
    image[0xFFFF] = 0x5A;
    machine.state_mut().memory = image;
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");

    assert_eq!(machine.state().memory.len(), ADDRESS_SPACE_BYTES);
    assert_eq!(&row(&frame, 48)[48..56], &[7; 8]);
    assert_eq!(machine.read_memory(0xFFFF), 0x5A);
}

#[test]
fn rom_write_protection_applies_to_engine_writes_only() {
    let config = MachineConfig {
        rom_write_protect: true,
        ..MachineConfig::with_rom(&[0xC3, 0x00, 0x00]).expect("rom fits")
    };
    let engine = ScriptedEngine::with_script(vec![(0, Action::Poke(0x0000, 0x00))]);
    let mut machine = Machine::new(engine, config);
    let mut frame = vec![0; FRAME_BYTES];

    machine.render_frame(&mut frame).expect("buffer fits");
    assert_eq!(machine.read_memory(0), 0xC3);

    assert_eq!(machine.write_memory(0, 0x00), 0xC3);
    assert_eq!(machine.read_memory(0), 0x00);
}

#[test]
fn interrupt_prologue_is_counted_in_frame_cycles() {
    let engine = ScriptedEngine {
        prologue: 19,
        ..ScriptedEngine::default()
    };
    let mut machine = Machine::new(engine, MachineConfig::default());
    let mut frame = vec![0; FRAME_BYTES];

    let stats = machine.render_frame(&mut frame).expect("buffer fits");

    assert_eq!(stats.cycles, 19 + 156 * 2 * u64::from(CYCLES_PER_SCANLINE));
    assert_eq!(stats.carry, 19);
}

#[rstest]
#[case(0, FRAME_BYTES)]
#[case(1, FRAME_BYTES - 1)]
#[case(FRAME_BYTES - 352, 352)]
fn short_buffers_report_shortfall(#[case] len: usize, #[case] shortfall: usize) {
    let mut machine = machine(Vec::new());
    let mut frame = vec![0x55; len];

    let err = machine.render_frame(&mut frame).unwrap_err();

    assert_eq!(err.shortfall(), shortfall);
    assert_eq!(
        err,
        FrameBufferTooSmall {
            needed: FRAME_BYTES,
            supplied: len
        }
    );
    assert_eq!(machine.frame_counter(), 0);
    assert_eq!(machine.engine().interrupts, 0);
    assert!(frame.iter().all(|&b| b == 0x55));
}

proptest! {
    #[test]
    fn host_memory_access_wraps_modulo_64k(addr in any::<u32>(), value in any::<u8>()) {
        let mut machine = machine(Vec::new());
        machine.write_memory(addr, value);
        prop_assert_eq!(machine.read_memory(addr & 0xFFFF), value);
        prop_assert_eq!(machine.read_memory(addr), value);
    }

    #[test]
    fn key_down_then_up_restores_matrix(codes in proptest::collection::vec((0_u16..8, any::<u8>()), 1..10)) {
        let mut machine = machine(Vec::new());
        let before = machine.state().keyboard;
        for &(row, mask) in &codes {
            machine.key_down((row << 8) | u16::from(mask));
        }
        for &(row, mask) in &codes {
            machine.key_up((row << 8) | u16::from(mask));
        }
        prop_assert_eq!(machine.state().keyboard, before);
    }

    #[test]
    fn out_of_range_half_rows_are_ignored(row in 8_u16..=0xFF, mask in any::<u8>()) {
        let mut machine = machine(Vec::new());
        let before = machine.state().keyboard;
        machine.key_down((row << 8) | u16::from(mask));
        prop_assert_eq!(machine.state().keyboard, before);
        machine.key_up((row << 8) | u16::from(mask));
        prop_assert_eq!(machine.state().keyboard, before);
    }

    #[test]
    fn port_read_is_and_of_selected_rows(
        pressed in proptest::collection::vec((0_u16..8, any::<u8>()), 0..12),
        high in any::<u8>(),
    ) {
        let mut machine = machine(Vec::new());
        for &(row, mask) in &pressed {
            machine.key_down((row << 8) | u16::from(mask));
        }
        let rows = machine.state().keyboard.rows();
        let expected = (0..8)
            .filter(|row| high & (1 << row) == 0)
            .fold(0xFF, |acc, row| acc & rows[row]);
        let port = (u16::from(high) << 8) | 0xFE;
        prop_assert_eq!(spectrum_core::io::port_read(&machine.state().keyboard, port), expected);
    }
}
