//! End-to-end CPU programs run through a full console, cartridge loader
//! included.

use famicore_core::{Bus, Cartridge, Console, Status};
use proptest::prelude::*;

/// Build a complete iNES image: one 16 KiB PRG bank with `program` at
/// `$C000` (the bank mirrors across `$8000`/`$C000`) and the reset vector
/// pointing there.
fn ines_image(program: &[u8]) -> Vec<u8> {
    let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1, 0x01, 0];
    data.extend_from_slice(&[0; 8]);
    let mut prg = vec![0xEAu8; 0x4000];
    prg[..program.len()].copy_from_slice(program);
    prg[0x3FFC] = 0x00;
    prg[0x3FFD] = 0xC0;
    data.extend_from_slice(&prg);
    data.extend_from_slice(&[0; 0x2000]); // CHR
    data
}

fn console_with(program: &[u8]) -> Console {
    let cartridge = Cartridge::load(&ines_image(program)).expect("valid image");
    Console::power_on(cartridge).expect("NROM is supported")
}

#[test]
fn lda_tax_literals() {
    // LDA #$42; TAX; BRK
    let mut console = console_with(&[0xA9, 0x42, 0xAA, 0x00]);
    console.step();
    console.step();
    let cpu = console.cpu();
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.x, 0x42);
    assert!(!cpu.status.contains(Status::Z));
    assert!(!cpu.status.contains(Status::N));
}

#[test]
fn adc_overflow_literals() {
    // CLC; LDA #$80; ADC #$80
    let mut console = console_with(&[0x18, 0xA9, 0x80, 0x69, 0x80]);
    for _ in 0..3 {
        console.step();
    }
    let cpu = console.cpu();
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.status.contains(Status::C));
    assert!(cpu.status.contains(Status::V));
    assert!(cpu.status.contains(Status::Z));
    assert!(!cpu.status.contains(Status::N));
}

#[test]
fn dex_wrap_literals() {
    // LDX #$FF; DEX
    let mut console = console_with(&[0xA2, 0xFF, 0xCA]);
    console.step();
    console.step();
    assert_eq!(console.cpu().x, 0xFE);
    assert!(!console.cpu().status.contains(Status::Z));
    assert!(console.cpu().status.contains(Status::N));

    // From $01: DEX to zero, then around to $FF.
    let mut console = console_with(&[0xA2, 0x01, 0xCA, 0xCA]);
    console.step();
    console.step();
    assert_eq!(console.cpu().x, 0x00);
    assert!(console.cpu().status.contains(Status::Z));
    assert!(!console.cpu().status.contains(Status::N));
    console.step();
    assert_eq!(console.cpu().x, 0xFF);
    assert!(!console.cpu().status.contains(Status::Z));
    assert!(console.cpu().status.contains(Status::N));
}

#[test]
fn program_runs_from_the_mirrored_bank() {
    // The same bank serves $8000 and $C000; a JMP across the mirror lands
    // on identical bytes.
    let mut console = console_with(&[0xA9, 0x07, 0x4C, 0x05, 0x80, 0xE8]);
    console.step(); // LDA
    console.step(); // JMP $8005
    assert_eq!(console.cpu().pc, 0x8005);
    console.step(); // INX, fetched through the mirror
    assert_eq!(console.cpu().x, 1);
}

#[test]
fn trace_line_matches_register_state() {
    let mut console = console_with(&[0xA9, 0x42]);
    let line = famicore_cpu::trace_line(console.cpu(), console.bus());
    assert!(line.starts_with("C000  A9 42"), "{line}");
    assert!(line.contains("LDA #$42"), "{line}");
    assert!(line.contains("P:24 SP:FD"), "{line}");
    console.step();
    assert_eq!(console.cpu().a, 0x42);
}

proptest! {
    /// RAM answers at every 2 KiB mirror of a written address.
    #[test]
    fn ram_mirroring(addr in 0u16..0x0800, value in any::<u8>(), k in 1u16..4) {
        let mut console = console_with(&[]);
        console.bus_mut().write(addr, value);
        prop_assert_eq!(console.bus_mut().read(addr ^ (k * 0x0800)), value);
    }
}
