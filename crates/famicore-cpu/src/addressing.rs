//! 6502 addressing modes.
//!
//! Every opcode carries one of thirteen addressing modes that determines how
//! the operand location is formed from the bytes following the opcode.

/// Operand addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// Implied: no operand (CLC, INX, RTS, ...).
    Imp,
    /// Accumulator: the operand is A (ASL A, ROR A, ...).
    Acc,
    /// Immediate: one constant byte at PC.
    Imm,
    /// Zero page: one-byte address into `$0000-$00FF`.
    Zp0,
    /// Zero page indexed by X, wrapping within the zero page.
    Zpx,
    /// Zero page indexed by Y, wrapping within the zero page.
    Zpy,
    /// Relative: signed one-byte branch offset from the next instruction.
    Rel,
    /// Absolute: full 16-bit address.
    Abs,
    /// Absolute indexed by X.
    Abx,
    /// Absolute indexed by Y.
    Aby,
    /// Indirect: 16-bit pointer, JMP only. Carries the `JMP ($xxFF)` bug:
    /// the pointer's high byte is fetched from the start of the same page.
    Ind,
    /// Indexed indirect `($zp,X)`: zero-page pointer indexed before the fetch.
    Izx,
    /// Indirect indexed `($zp),Y`: zero-page pointer fetched, then Y added.
    Izy,
}

impl AddrMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Imp | Self::Acc => 0,
            Self::Imm | Self::Zp0 | Self::Zpx | Self::Zpy | Self::Rel | Self::Izx | Self::Izy => 1,
            Self::Abs | Self::Abx | Self::Aby | Self::Ind => 2,
        }
    }
}
