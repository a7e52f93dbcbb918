//! Opcode decode table.
//!
//! Maps every one of the 256 opcode bytes to its operation, addressing mode
//! and base cycle cost. The 151 official opcodes are fully implemented;
//! unofficial rows decode with their real operand width and cycle cost but
//! execute as NOPs, and the JAM rows are softened into two-cycle NOPs so a
//! stray fetch into data can never wedge the core.

use crate::addressing::AddrMode;

/// Executable operation, one variant per official 6502 mnemonic.
///
/// Dispatching over `(Op, AddrMode)` keeps the interpreter exhaustive-match
/// checkable instead of hiding control flow behind per-opcode function
/// pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // variants are the canonical 6502 mnemonics
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
}

/// Decoded information for a single opcode byte.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    /// Mnemonic as printed in execution traces.
    pub mnemonic: &'static str,
    /// Operation executed for this opcode.
    pub op: Op,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Base cycle cost.
    pub cycles: u8,
    /// True when a page crossing adds one cycle (read-pattern indexing).
    pub page_penalty: bool,
    /// False for unofficial opcodes (executed as NOPs).
    pub official: bool,
}

const fn of(mnemonic: &'static str, op: Op, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, op, mode, cycles, page_penalty: false, official: true }
}

/// Official opcode whose indexed read may cross a page (+1 cycle).
const fn ofp(mnemonic: &'static str, op: Op, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, op, mode, cycles, page_penalty: true, official: true }
}

/// Unofficial opcode: decoded for operand width and cycles, executed as NOP.
const fn un(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, op: Op::Nop, mode, cycles, page_penalty: false, official: false }
}

/// Unofficial opcode with a page-cross penalty.
const fn unp(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, op: Op::Nop, mode, cycles, page_penalty: true, official: false }
}

use AddrMode::{Abs, Abx, Aby, Acc, Imm, Imp, Ind, Izx, Izy, Rel, Zp0, Zpx, Zpy};

/// The full 256-entry decode table, indexed by opcode byte.
#[rustfmt::skip]
pub const OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00
    of("BRK", Op::Brk, Imp, 7),  of("ORA", Op::Ora, Izx, 6),  un("JAM", Imp, 2),           un("SLO", Izx, 8),
    un("NOP", Zp0, 3),           of("ORA", Op::Ora, Zp0, 3),  of("ASL", Op::Asl, Zp0, 5),  un("SLO", Zp0, 5),
    of("PHP", Op::Php, Imp, 3),  of("ORA", Op::Ora, Imm, 2),  of("ASL", Op::Asl, Acc, 2),  un("ANC", Imm, 2),
    un("NOP", Abs, 4),           of("ORA", Op::Ora, Abs, 4),  of("ASL", Op::Asl, Abs, 6),  un("SLO", Abs, 6),
    // 0x10
    of("BPL", Op::Bpl, Rel, 2),  ofp("ORA", Op::Ora, Izy, 5), un("JAM", Imp, 2),           un("SLO", Izy, 8),
    un("NOP", Zpx, 4),           of("ORA", Op::Ora, Zpx, 4),  of("ASL", Op::Asl, Zpx, 6),  un("SLO", Zpx, 6),
    of("CLC", Op::Clc, Imp, 2),  ofp("ORA", Op::Ora, Aby, 4), un("NOP", Imp, 2),           un("SLO", Aby, 7),
    unp("NOP", Abx, 4),          ofp("ORA", Op::Ora, Abx, 4), of("ASL", Op::Asl, Abx, 7),  un("SLO", Abx, 7),
    // 0x20
    of("JSR", Op::Jsr, Abs, 6),  of("AND", Op::And, Izx, 6),  un("JAM", Imp, 2),           un("RLA", Izx, 8),
    of("BIT", Op::Bit, Zp0, 3),  of("AND", Op::And, Zp0, 3),  of("ROL", Op::Rol, Zp0, 5),  un("RLA", Zp0, 5),
    of("PLP", Op::Plp, Imp, 4),  of("AND", Op::And, Imm, 2),  of("ROL", Op::Rol, Acc, 2),  un("ANC", Imm, 2),
    of("BIT", Op::Bit, Abs, 4),  of("AND", Op::And, Abs, 4),  of("ROL", Op::Rol, Abs, 6),  un("RLA", Abs, 6),
    // 0x30
    of("BMI", Op::Bmi, Rel, 2),  ofp("AND", Op::And, Izy, 5), un("JAM", Imp, 2),           un("RLA", Izy, 8),
    un("NOP", Zpx, 4),           of("AND", Op::And, Zpx, 4),  of("ROL", Op::Rol, Zpx, 6),  un("RLA", Zpx, 6),
    of("SEC", Op::Sec, Imp, 2),  ofp("AND", Op::And, Aby, 4), un("NOP", Imp, 2),           un("RLA", Aby, 7),
    unp("NOP", Abx, 4),          ofp("AND", Op::And, Abx, 4), of("ROL", Op::Rol, Abx, 7),  un("RLA", Abx, 7),
    // 0x40
    of("RTI", Op::Rti, Imp, 6),  of("EOR", Op::Eor, Izx, 6),  un("JAM", Imp, 2),           un("SRE", Izx, 8),
    un("NOP", Zp0, 3),           of("EOR", Op::Eor, Zp0, 3),  of("LSR", Op::Lsr, Zp0, 5),  un("SRE", Zp0, 5),
    of("PHA", Op::Pha, Imp, 3),  of("EOR", Op::Eor, Imm, 2),  of("LSR", Op::Lsr, Acc, 2),  un("ALR", Imm, 2),
    of("JMP", Op::Jmp, Abs, 3),  of("EOR", Op::Eor, Abs, 4),  of("LSR", Op::Lsr, Abs, 6),  un("SRE", Abs, 6),
    // 0x50
    of("BVC", Op::Bvc, Rel, 2),  ofp("EOR", Op::Eor, Izy, 5), un("JAM", Imp, 2),           un("SRE", Izy, 8),
    un("NOP", Zpx, 4),           of("EOR", Op::Eor, Zpx, 4),  of("LSR", Op::Lsr, Zpx, 6),  un("SRE", Zpx, 6),
    of("CLI", Op::Cli, Imp, 2),  ofp("EOR", Op::Eor, Aby, 4), un("NOP", Imp, 2),           un("SRE", Aby, 7),
    unp("NOP", Abx, 4),          ofp("EOR", Op::Eor, Abx, 4), of("LSR", Op::Lsr, Abx, 7),  un("SRE", Abx, 7),
    // 0x60
    of("RTS", Op::Rts, Imp, 6),  of("ADC", Op::Adc, Izx, 6),  un("JAM", Imp, 2),           un("RRA", Izx, 8),
    un("NOP", Zp0, 3),           of("ADC", Op::Adc, Zp0, 3),  of("ROR", Op::Ror, Zp0, 5),  un("RRA", Zp0, 5),
    of("PLA", Op::Pla, Imp, 4),  of("ADC", Op::Adc, Imm, 2),  of("ROR", Op::Ror, Acc, 2),  un("ARR", Imm, 2),
    of("JMP", Op::Jmp, Ind, 5),  of("ADC", Op::Adc, Abs, 4),  of("ROR", Op::Ror, Abs, 6),  un("RRA", Abs, 6),
    // 0x70
    of("BVS", Op::Bvs, Rel, 2),  ofp("ADC", Op::Adc, Izy, 5), un("JAM", Imp, 2),           un("RRA", Izy, 8),
    un("NOP", Zpx, 4),           of("ADC", Op::Adc, Zpx, 4),  of("ROR", Op::Ror, Zpx, 6),  un("RRA", Zpx, 6),
    of("SEI", Op::Sei, Imp, 2),  ofp("ADC", Op::Adc, Aby, 4), un("NOP", Imp, 2),           un("RRA", Aby, 7),
    unp("NOP", Abx, 4),          ofp("ADC", Op::Adc, Abx, 4), of("ROR", Op::Ror, Abx, 7),  un("RRA", Abx, 7),
    // 0x80
    un("NOP", Imm, 2),           of("STA", Op::Sta, Izx, 6),  un("NOP", Imm, 2),           un("SAX", Izx, 6),
    of("STY", Op::Sty, Zp0, 3),  of("STA", Op::Sta, Zp0, 3),  of("STX", Op::Stx, Zp0, 3),  un("SAX", Zp0, 3),
    of("DEY", Op::Dey, Imp, 2),  un("NOP", Imm, 2),           of("TXA", Op::Txa, Imp, 2),  un("XAA", Imm, 2),
    of("STY", Op::Sty, Abs, 4),  of("STA", Op::Sta, Abs, 4),  of("STX", Op::Stx, Abs, 4),  un("SAX", Abs, 4),
    // 0x90
    of("BCC", Op::Bcc, Rel, 2),  of("STA", Op::Sta, Izy, 6),  un("JAM", Imp, 2),           un("SHA", Izy, 6),
    of("STY", Op::Sty, Zpx, 4),  of("STA", Op::Sta, Zpx, 4),  of("STX", Op::Stx, Zpy, 4),  un("SAX", Zpy, 4),
    of("TYA", Op::Tya, Imp, 2),  of("STA", Op::Sta, Aby, 5),  of("TXS", Op::Txs, Imp, 2),  un("TAS", Aby, 5),
    un("SHY", Abx, 5),           of("STA", Op::Sta, Abx, 5),  un("SHX", Aby, 5),           un("SHA", Aby, 5),
    // 0xA0
    of("LDY", Op::Ldy, Imm, 2),  of("LDA", Op::Lda, Izx, 6),  of("LDX", Op::Ldx, Imm, 2),  un("LAX", Izx, 6),
    of("LDY", Op::Ldy, Zp0, 3),  of("LDA", Op::Lda, Zp0, 3),  of("LDX", Op::Ldx, Zp0, 3),  un("LAX", Zp0, 3),
    of("TAY", Op::Tay, Imp, 2),  of("LDA", Op::Lda, Imm, 2),  of("TAX", Op::Tax, Imp, 2),  un("LXA", Imm, 2),
    of("LDY", Op::Ldy, Abs, 4),  of("LDA", Op::Lda, Abs, 4),  of("LDX", Op::Ldx, Abs, 4),  un("LAX", Abs, 4),
    // 0xB0
    of("BCS", Op::Bcs, Rel, 2),  ofp("LDA", Op::Lda, Izy, 5), un("JAM", Imp, 2),           unp("LAX", Izy, 5),
    of("LDY", Op::Ldy, Zpx, 4),  of("LDA", Op::Lda, Zpx, 4),  of("LDX", Op::Ldx, Zpy, 4),  un("LAX", Zpy, 4),
    of("CLV", Op::Clv, Imp, 2),  ofp("LDA", Op::Lda, Aby, 4), of("TSX", Op::Tsx, Imp, 2),  unp("LAS", Aby, 4),
    ofp("LDY", Op::Ldy, Abx, 4), ofp("LDA", Op::Lda, Abx, 4), ofp("LDX", Op::Ldx, Aby, 4), unp("LAX", Aby, 4),
    // 0xC0
    of("CPY", Op::Cpy, Imm, 2),  of("CMP", Op::Cmp, Izx, 6),  un("NOP", Imm, 2),           un("DCP", Izx, 8),
    of("CPY", Op::Cpy, Zp0, 3),  of("CMP", Op::Cmp, Zp0, 3),  of("DEC", Op::Dec, Zp0, 5),  un("DCP", Zp0, 5),
    of("INY", Op::Iny, Imp, 2),  of("CMP", Op::Cmp, Imm, 2),  of("DEX", Op::Dex, Imp, 2),  un("AXS", Imm, 2),
    of("CPY", Op::Cpy, Abs, 4),  of("CMP", Op::Cmp, Abs, 4),  of("DEC", Op::Dec, Abs, 6),  un("DCP", Abs, 6),
    // 0xD0
    of("BNE", Op::Bne, Rel, 2),  ofp("CMP", Op::Cmp, Izy, 5), un("JAM", Imp, 2),           un("DCP", Izy, 8),
    un("NOP", Zpx, 4),           of("CMP", Op::Cmp, Zpx, 4),  of("DEC", Op::Dec, Zpx, 6),  un("DCP", Zpx, 6),
    of("CLD", Op::Cld, Imp, 2),  ofp("CMP", Op::Cmp, Aby, 4), un("NOP", Imp, 2),           un("DCP", Aby, 7),
    unp("NOP", Abx, 4),          ofp("CMP", Op::Cmp, Abx, 4), of("DEC", Op::Dec, Abx, 7),  un("DCP", Abx, 7),
    // 0xE0
    of("CPX", Op::Cpx, Imm, 2),  of("SBC", Op::Sbc, Izx, 6),  un("NOP", Imm, 2),           un("ISC", Izx, 8),
    of("CPX", Op::Cpx, Zp0, 3),  of("SBC", Op::Sbc, Zp0, 3),  of("INC", Op::Inc, Zp0, 5),  un("ISC", Zp0, 5),
    of("INX", Op::Inx, Imp, 2),  of("SBC", Op::Sbc, Imm, 2),  of("NOP", Op::Nop, Imp, 2),  un("SBC", Imm, 2),
    of("CPX", Op::Cpx, Abs, 4),  of("SBC", Op::Sbc, Abs, 4),  of("INC", Op::Inc, Abs, 6),  un("ISC", Abs, 6),
    // 0xF0
    of("BEQ", Op::Beq, Rel, 2),  ofp("SBC", Op::Sbc, Izy, 5), un("JAM", Imp, 2),           un("ISC", Izy, 8),
    un("NOP", Zpx, 4),           of("SBC", Op::Sbc, Zpx, 4),  of("INC", Op::Inc, Zpx, 6),  un("ISC", Zpx, 6),
    of("SED", Op::Sed, Imp, 2),  ofp("SBC", Op::Sbc, Aby, 4), un("NOP", Imp, 2),           un("ISC", Aby, 7),
    unp("NOP", Abx, 4),          ofp("SBC", Op::Sbc, Abx, 4), of("INC", Op::Inc, Abx, 7),  un("ISC", Abx, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_count() {
        let count = OPCODE_TABLE.iter().filter(|i| i.official).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn lda_rows() {
        assert_eq!(OPCODE_TABLE[0xA9].op, Op::Lda);
        assert_eq!(OPCODE_TABLE[0xA9].mode, AddrMode::Imm);
        assert_eq!(OPCODE_TABLE[0xA9].cycles, 2);
        assert_eq!(OPCODE_TABLE[0xB1].mode, AddrMode::Izy);
        assert!(OPCODE_TABLE[0xB1].page_penalty);
    }

    #[test]
    fn stores_never_take_the_page_penalty() {
        for opcode in [0x9D, 0x99, 0x91] {
            let info = &OPCODE_TABLE[opcode];
            assert_eq!(info.op, Op::Sta);
            assert!(!info.page_penalty, "STA {opcode:02X} must not pay the read penalty");
        }
        assert_eq!(OPCODE_TABLE[0x9D].cycles, 5);
        assert_eq!(OPCODE_TABLE[0x91].cycles, 6);
    }

    #[test]
    fn jmp_modes() {
        assert_eq!(OPCODE_TABLE[0x4C].mode, AddrMode::Abs);
        assert_eq!(OPCODE_TABLE[0x4C].cycles, 3);
        assert_eq!(OPCODE_TABLE[0x6C].mode, AddrMode::Ind);
        assert_eq!(OPCODE_TABLE[0x6C].cycles, 5);
    }

    #[test]
    fn unofficial_rows_execute_as_nop() {
        assert_eq!(OPCODE_TABLE[0x03].op, Op::Nop);
        assert_eq!(OPCODE_TABLE[0x03].mode, AddrMode::Izx);
        assert!(!OPCODE_TABLE[0x03].official);
        // JAM rows are defused to two-cycle NOPs.
        assert_eq!(OPCODE_TABLE[0x02].op, Op::Nop);
        assert_eq!(OPCODE_TABLE[0x02].cycles, 2);
    }

    #[test]
    fn rmw_cycle_costs() {
        assert_eq!(OPCODE_TABLE[0x06].cycles, 5); // ASL zp
        assert_eq!(OPCODE_TABLE[0x1E].cycles, 7); // ASL abs,X
        assert_eq!(OPCODE_TABLE[0xE6].cycles, 5); // INC zp
        assert_eq!(OPCODE_TABLE[0xDE].cycles, 7); // DEC abs,X
    }
}
