//! Execution trace formatting.
//!
//! Renders one line per instruction in the classic nestest register-column
//! layout, using side-effect-free `peek` reads so tracing never perturbs
//! PPU ports or other live hardware.

use std::fmt::Write;

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::opcodes::OPCODE_TABLE;

/// Format the instruction at the CPU's current PC as a trace line:
///
/// ```text
/// C000  A9 42     LDA #$42                        A:00 X:00 Y:00 P:24 SP:FD CYC:8
/// ```
///
/// Must be called before the instruction executes; the registers shown are
/// the state going into the instruction.
#[must_use]
pub fn trace_line(cpu: &Cpu, bus: &impl Bus) -> String {
    let opcode = bus.peek(cpu.pc);
    let info = &OPCODE_TABLE[opcode as usize];
    let len = info.mode.operand_len();

    let lo = bus.peek(cpu.pc.wrapping_add(1));
    let hi = bus.peek(cpu.pc.wrapping_add(2));

    let mut bytes = format!("{opcode:02X}");
    if len >= 1 {
        write!(bytes, " {lo:02X}").unwrap();
    }
    if len >= 2 {
        write!(bytes, " {hi:02X}").unwrap();
    }

    let operand = format_operand(info.mode, cpu, lo, hi);
    let mnemonic = if info.official {
        format!(" {}", info.mnemonic)
    } else {
        format!("*{}", info.mnemonic)
    };
    let disasm = format!("{mnemonic} {operand}");

    format!(
        "{:04X}  {:<9}{:<33}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        cpu.pc,
        bytes,
        disasm,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        cpu.cycles()
    )
}

fn format_operand(mode: AddrMode, cpu: &Cpu, lo: u8, hi: u8) -> String {
    let word = u16::from(hi) << 8 | u16::from(lo);
    match mode {
        AddrMode::Imp => String::new(),
        AddrMode::Acc => "A".to_string(),
        AddrMode::Imm => format!("#${lo:02X}"),
        AddrMode::Zp0 => format!("${lo:02X}"),
        AddrMode::Zpx => format!("${lo:02X},X"),
        AddrMode::Zpy => format!("${lo:02X},Y"),
        AddrMode::Abs => format!("${word:04X}"),
        AddrMode::Abx => format!("${word:04X},X"),
        AddrMode::Aby => format!("${word:04X},Y"),
        AddrMode::Ind => format!("(${word:04X})"),
        AddrMode::Izx => format!("(${lo:02X},X)"),
        AddrMode::Izy => format!("(${lo:02X}),Y"),
        // Branch targets print absolute, as in the nestest log.
        AddrMode::Rel => {
            let target = cpu
                .pc
                .wrapping_add(2)
                .wrapping_add_signed(i16::from(lo as i8));
            format!("${target:04X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus([u8; 0x10000]);

    impl Bus for FlatBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.0[addr as usize]
        }
        fn write(&mut self, addr: u16, value: u8) {
            self.0[addr as usize] = value;
        }
        fn peek(&self, addr: u16) -> u8 {
            self.0[addr as usize]
        }
    }

    fn bus_with(program: &[u8]) -> FlatBus {
        let mut bus = FlatBus([0; 0x10000]);
        bus.0[0xC000..0xC000 + program.len()].copy_from_slice(program);
        bus.0[0xFFFC] = 0x00;
        bus.0[0xFFFD] = 0xC0;
        bus
    }

    #[test]
    fn formats_immediate_load() {
        let mut bus = bus_with(&[0xA9, 0x42]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let line = trace_line(&cpu, &bus);
        assert!(line.starts_with("C000  A9 42"), "{line}");
        assert!(line.contains("LDA #$42"), "{line}");
        assert!(line.contains("A:00 X:00 Y:00 P:24 SP:FD"), "{line}");
    }

    #[test]
    fn formats_branch_target_as_absolute() {
        let mut bus = bus_with(&[0xF0, 0x05]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("BEQ $C007"), "{line}");
    }

    #[test]
    fn unofficial_opcodes_are_starred() {
        let mut bus = bus_with(&[0x04, 0x10]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("*NOP $10"), "{line}");
    }
}
