//! Property and scenario tests for the instruction set, driven against a
//! flat 64 KiB RAM bus.

use famicore_cpu::{Bus, Cpu, Status};
use proptest::prelude::*;

struct FlatBus {
    memory: [u8; 0x10000],
}

impl FlatBus {
    fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut memory = [0u8; 0x10000];
        memory[origin as usize..origin as usize + program.len()].copy_from_slice(program);
        memory[0xFFFC] = origin as u8;
        memory[0xFFFD] = (origin >> 8) as u8;
        Self { memory }
    }
}

impl Bus for FlatBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
    fn write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
    fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
}

fn run(program: &[u8], steps: usize) -> (Cpu, FlatBus) {
    let mut bus = FlatBus::with_program(0xC000, program);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    for _ in 0..steps {
        cpu.step(&mut bus);
    }
    (cpu, bus)
}

#[test]
fn lda_tax_scenario() {
    // LDA #$42; TAX; BRK
    let (cpu, _) = run(&[0xA9, 0x42, 0xAA, 0x00], 2);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.x, 0x42);
    assert!(!cpu.status.contains(Status::Z));
    assert!(!cpu.status.contains(Status::N));
}

#[test]
fn pc_wraps_modulo_64k() {
    // A NOP fetched at $FFFF leaves PC at $0000.
    let mut bus = FlatBus::with_program(0xC000, &[]);
    bus.memory[0xFFFF] = 0xEA;
    bus.memory[0xFFFC] = 0xFF;
    bus.memory[0xFFFD] = 0xFF;
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc, 0x0000);
}

#[test]
fn stack_pointer_wraps_modulo_256() {
    // 260 pushes must bring SP back around.
    let program = vec![0x48u8; 260]; // PHA x260
    let mut bus = FlatBus::with_program(0xC000, &program);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    let start = cpu.sp;
    for _ in 0..260 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.sp, start.wrapping_sub(4));
}

proptest! {
    /// ADC arithmetic identity: A' + 256*C' == A + M + C (mod 512), with V
    /// set exactly on signed overflow.
    #[test]
    fn adc_identity(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        // CLC/SEC; LDA #a; ADC #m
        let carry_op = if carry { 0x38 } else { 0x18 };
        let (cpu, _) = run(&[carry_op, 0xA9, a, 0x69, m], 3);

        let expected = u16::from(a) + u16::from(m) + u16::from(carry);
        let got = u16::from(cpu.a) + 256 * u16::from(cpu.status.contains(Status::C));
        prop_assert_eq!(got % 512, expected % 512);

        let signed_overflow = {
            let result = expected as u8;
            (a ^ result) & (m ^ result) & 0x80 != 0
        };
        prop_assert_eq!(cpu.status.contains(Status::V), signed_overflow);
        prop_assert_eq!(cpu.status.contains(Status::Z), expected as u8 == 0);
        prop_assert_eq!(cpu.status.contains(Status::N), expected as u8 & 0x80 != 0);
    }

    /// Every byte survives a PHA/PLA round trip.
    #[test]
    fn stack_round_trip(value in any::<u8>()) {
        // LDA #v; PHA; LDA #$00; PLA
        let (cpu, _) = run(&[0xA9, value, 0x48, 0xA9, 0x00, 0x68], 4);
        prop_assert_eq!(cpu.a, value);
        prop_assert_eq!(cpu.status.contains(Status::Z), value == 0);
        prop_assert_eq!(cpu.status.contains(Status::N), value & 0x80 != 0);
    }

    /// CMP: carry set exactly when the register is >= the operand, Z on
    /// equality.
    #[test]
    fn cmp_orders_unsigned(a in any::<u8>(), m in any::<u8>()) {
        let (cpu, _) = run(&[0xA9, a, 0xC9, m], 2);
        prop_assert_eq!(cpu.status.contains(Status::C), a >= m);
        prop_assert_eq!(cpu.status.contains(Status::Z), a == m);
    }

    /// SBC mirrors ADC with the operand inverted.
    #[test]
    fn sbc_matches_adc_of_complement(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        let carry_op = if carry { 0x38 } else { 0x18 };
        let (sbc_cpu, _) = run(&[carry_op, 0xA9, a, 0xE9, m], 3);
        let (adc_cpu, _) = run(&[carry_op, 0xA9, a, 0x69, !m], 3);
        prop_assert_eq!(sbc_cpu.a, adc_cpu.a);
        prop_assert_eq!(sbc_cpu.status, adc_cpu.status);
    }

    /// Shift pairs reconstruct the input: ROL then ROR with the carry
    /// threaded through is the identity on A.
    #[test]
    fn rol_ror_round_trip(value in any::<u8>(), carry in any::<bool>()) {
        let carry_op = if carry { 0x38 } else { 0x18 };
        let (cpu, _) = run(&[carry_op, 0xA9, value, 0x2A, 0x6A], 4);
        prop_assert_eq!(cpu.a, value);
    }
}
