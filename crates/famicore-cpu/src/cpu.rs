//! 6502 interpreter.
//!
//! The core executes whole instructions and spreads their cost over a cycle
//! debt: `tick` burns one clock per call, and only fetches the next
//! instruction once the previous one's debt is paid off. Interrupt latches
//! are polled at instruction boundaries only.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::opcodes::{Op, OPCODE_TABLE};
use crate::status::Status;
use crate::vectors;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resolved operand location for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    /// No operand (implied instructions).
    None,
    /// The operand is the accumulator.
    Accumulator,
    /// The operand lives at this bus address.
    Address(u16),
}

/// Ricoh 2A03 CPU core.
///
/// Register file, interrupt latches and cycle accounting. Memory access goes
/// through a [`Bus`] passed to each stepping call, so the CPU holds no
/// reference to the rest of the machine.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer into page `$01`.
    pub sp: u8,
    /// Status flags.
    pub status: Status,
    /// Total clock cycles consumed.
    cycles: u64,
    /// Cycles left before the current instruction finishes.
    debt: u32,
    /// DMA stall cycles still to burn.
    stall: u32,
    /// NMI latch, set by the PPU at VBlank start.
    nmi_pending: bool,
    /// IRQ latch.
    irq_pending: bool,
}

impl Cpu {
    /// Create a CPU in its pre-reset power-on state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: Status::POWER_ON,
            cycles: 0,
            debt: 0,
            stall: 0,
            nmi_pending: false,
            irq_pending: false,
        }
    }

    /// Run the RESET sequence: clear the register file, load PC from the
    /// vector at `$FFFC` and charge the 8-cycle startup debt.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.debt = 8;
        self.stall = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        log::debug!("CPU reset, PC=${:04X}", self.pc);
    }

    /// Latch a non-maskable interrupt. Consumed at the next instruction
    /// boundary regardless of the I flag.
    pub fn signal_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Latch a maskable interrupt. Consumed at the next instruction boundary
    /// if the I flag is clear.
    pub fn signal_irq(&mut self) {
        self.irq_pending = true;
    }

    /// Add DMA stall cycles; the CPU burns these before resuming execution.
    pub fn add_stall(&mut self, cycles: u32) {
        self.stall += cycles;
    }

    /// Total clock cycles consumed so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// True when the next `tick` will fetch an instruction.
    #[must_use]
    pub fn at_instruction_boundary(&self) -> bool {
        self.debt == 0 && self.stall == 0
    }

    /// Advance exactly one clock cycle.
    ///
    /// While an instruction (or DMA stall) is in progress this only pays
    /// down the debt. Otherwise it polls the interrupt latches, executes one
    /// instruction, and charges its full cycle cost as new debt.
    pub fn tick(&mut self, bus: &mut impl Bus) {
        self.cycles += 1;
        if self.stall > 0 {
            self.stall -= 1;
            return;
        }
        if self.debt > 0 {
            self.debt -= 1;
            return;
        }
        let spent = self.execute_next(bus);
        self.debt = u32::from(spent).saturating_sub(1);
    }

    /// Execute one whole instruction (or service a pending DMA stall cycle)
    /// and return the cycles consumed. Test and trace harnesses use this to
    /// advance instruction-at-a-time.
    pub fn step(&mut self, bus: &mut impl Bus) -> u8 {
        if self.stall > 0 {
            self.stall -= 1;
            self.cycles += 1;
            return 1;
        }
        self.debt = 0;
        let spent = self.execute_next(bus);
        self.cycles += u64::from(spent);
        spent
    }

    /// Poll interrupts, then fetch, decode and execute one instruction.
    fn execute_next(&mut self, bus: &mut impl Bus) -> u8 {
        if self.nmi_pending {
            self.nmi_pending = false;
            log::trace!("NMI taken at PC=${:04X}", self.pc);
            self.interrupt(bus, vectors::NMI);
            return 7;
        }
        if self.irq_pending && !self.status.contains(Status::I) {
            self.irq_pending = false;
            log::trace!("IRQ taken at PC=${:04X}", self.pc);
            self.interrupt(bus, vectors::IRQ);
            return 7;
        }

        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let info = &OPCODE_TABLE[opcode as usize];

        let (operand, crossed) = self.fetch_operand(info.mode, bus);
        let mut spent = info.cycles;
        if crossed && info.page_penalty {
            spent += 1;
        }
        spent + self.execute(info.op, operand, crossed, bus)
    }

    /// Hardware interrupt entry: push PC and P (B clear), set I, jump
    /// through the vector.
    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.push_word(bus, self.pc);
        self.push(bus, self.status.to_stack_byte(false));
        self.status.insert(Status::I);
        self.pc = bus.read_u16(vector);
    }

    // ===== Operand formation =====

    fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.fetch_byte(bus));
        let hi = u16::from(self.fetch_byte(bus));
        hi << 8 | lo
    }

    /// 16-bit pointer read that wraps within the zero page.
    fn read_zp_word(&self, bus: &mut impl Bus, zp: u8) -> u16 {
        let lo = u16::from(bus.read(u16::from(zp)));
        let hi = u16::from(bus.read(u16::from(zp.wrapping_add(1))));
        hi << 8 | lo
    }

    /// Resolve the operand location for `mode`, consuming operand bytes at
    /// PC. The bool reports a page crossing for modes that can incur the
    /// one-cycle read penalty.
    fn fetch_operand(&mut self, mode: AddrMode, bus: &mut impl Bus) -> (Operand, bool) {
        fn crossed(from: u16, to: u16) -> bool {
            from & 0xFF00 != to & 0xFF00
        }

        match mode {
            AddrMode::Imp => (Operand::None, false),
            AddrMode::Acc => (Operand::Accumulator, false),
            AddrMode::Imm => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddrMode::Zp0 => {
                let zp = self.fetch_byte(bus);
                (Operand::Address(u16::from(zp)), false)
            }
            AddrMode::Zpx => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                (Operand::Address(u16::from(zp)), false)
            }
            AddrMode::Zpy => {
                let zp = self.fetch_byte(bus).wrapping_add(self.y);
                (Operand::Address(u16::from(zp)), false)
            }
            AddrMode::Abs => {
                let addr = self.fetch_word(bus);
                (Operand::Address(addr), false)
            }
            AddrMode::Abx => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.x));
                (Operand::Address(addr), crossed(base, addr))
            }
            AddrMode::Aby => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), crossed(base, addr))
            }
            AddrMode::Ind => {
                let ptr = self.fetch_word(bus);
                let lo = u16::from(bus.read(ptr));
                // The pointer's high byte is fetched from the start of the
                // same page when the pointer sits at $xxFF.
                let hi_at = (ptr & 0xFF00) | u16::from((ptr as u8).wrapping_add(1));
                let hi = u16::from(bus.read(hi_at));
                (Operand::Address(hi << 8 | lo), false)
            }
            AddrMode::Izx => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                (Operand::Address(self.read_zp_word(bus, zp)), false)
            }
            AddrMode::Izy => {
                let zp = self.fetch_byte(bus);
                let base = self.read_zp_word(bus, zp);
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), crossed(base, addr))
            }
            AddrMode::Rel => {
                let offset = self.fetch_byte(bus) as i8;
                let target = self.pc.wrapping_add_signed(i16::from(offset));
                (Operand::Address(target), crossed(self.pc, target))
            }
        }
    }

    // ===== Execution =====

    /// Execute `op` against the resolved operand. Returns extra cycles
    /// beyond the table cost (branch-taken penalties only).
    fn execute(&mut self, op: Op, operand: Operand, crossed: bool, bus: &mut impl Bus) -> u8 {
        match op {
            // Loads and stores
            Op::Lda => {
                self.a = self.load(bus, operand);
                self.status.set_zn(self.a);
            }
            Op::Ldx => {
                self.x = self.load(bus, operand);
                self.status.set_zn(self.x);
            }
            Op::Ldy => {
                self.y = self.load(bus, operand);
                self.status.set_zn(self.y);
            }
            Op::Sta => self.store(bus, operand, self.a),
            Op::Stx => self.store(bus, operand, self.x),
            Op::Sty => self.store(bus, operand, self.y),

            // Register transfers
            Op::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Op::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Op::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Op::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Op::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            // TXS is the one transfer that leaves the flags alone.
            Op::Txs => self.sp = self.x,

            // Stack
            Op::Pha => self.push(bus, self.a),
            Op::Php => self.push(bus, self.status.to_stack_byte(true)),
            Op::Pla => {
                self.a = self.pop(bus);
                self.status.set_zn(self.a);
            }
            Op::Plp => self.status = Status::from_stack_byte(self.pop(bus)),

            // Logic
            Op::And => {
                self.a &= self.load(bus, operand);
                self.status.set_zn(self.a);
            }
            Op::Ora => {
                self.a |= self.load(bus, operand);
                self.status.set_zn(self.a);
            }
            Op::Eor => {
                self.a ^= self.load(bus, operand);
                self.status.set_zn(self.a);
            }
            Op::Bit => {
                let value = self.load(bus, operand);
                self.status.set(Status::Z, self.a & value == 0);
                self.status.set(Status::N, value & 0x80 != 0);
                self.status.set(Status::V, value & 0x40 != 0);
            }

            // Arithmetic
            Op::Adc => {
                let value = self.load(bus, operand);
                self.add_with_carry(value);
            }
            Op::Sbc => {
                let value = self.load(bus, operand);
                self.add_with_carry(!value);
            }
            Op::Cmp => {
                let value = self.load(bus, operand);
                self.compare(self.a, value);
            }
            Op::Cpx => {
                let value = self.load(bus, operand);
                self.compare(self.x, value);
            }
            Op::Cpy => {
                let value = self.load(bus, operand);
                self.compare(self.y, value);
            }

            // Increments and decrements
            Op::Inc => {
                let value = self.load(bus, operand).wrapping_add(1);
                self.store(bus, operand, value);
                self.status.set_zn(value);
            }
            Op::Dec => {
                let value = self.load(bus, operand).wrapping_sub(1);
                self.store(bus, operand, value);
                self.status.set_zn(value);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            // Shifts and rotates
            Op::Asl => {
                let value = self.load(bus, operand);
                self.status.set(Status::C, value & 0x80 != 0);
                let result = value << 1;
                self.store(bus, operand, result);
                self.status.set_zn(result);
            }
            Op::Lsr => {
                let value = self.load(bus, operand);
                self.status.set(Status::C, value & 0x01 != 0);
                let result = value >> 1;
                self.store(bus, operand, result);
                self.status.set_zn(result);
            }
            Op::Rol => {
                let value = self.load(bus, operand);
                let carry_in = u8::from(self.status.contains(Status::C));
                self.status.set(Status::C, value & 0x80 != 0);
                let result = value << 1 | carry_in;
                self.store(bus, operand, result);
                self.status.set_zn(result);
            }
            Op::Ror => {
                let value = self.load(bus, operand);
                let carry_in = u8::from(self.status.contains(Status::C));
                self.status.set(Status::C, value & 0x01 != 0);
                let result = value >> 1 | carry_in << 7;
                self.store(bus, operand, result);
                self.status.set_zn(result);
            }

            // Control flow
            Op::Jmp => {
                if let Operand::Address(addr) = operand {
                    self.pc = addr;
                }
            }
            Op::Jsr => {
                if let Operand::Address(addr) = operand {
                    // The pushed return address points at the final operand
                    // byte; RTS adds one on the way back.
                    self.push_word(bus, self.pc.wrapping_sub(1));
                    self.pc = addr;
                }
            }
            Op::Rts => {
                self.pc = self.pop_word(bus).wrapping_add(1);
            }
            Op::Rti => {
                self.status = Status::from_stack_byte(self.pop(bus));
                self.pc = self.pop_word(bus);
            }
            Op::Brk => {
                // The byte after the opcode is padding; it is skipped on
                // return.
                self.push_word(bus, self.pc.wrapping_add(1));
                self.push(bus, self.status.to_stack_byte(true));
                self.status.insert(Status::I);
                self.pc = bus.read_u16(vectors::IRQ);
            }

            // Branches
            Op::Bcc => return self.branch(!self.status.contains(Status::C), operand, crossed),
            Op::Bcs => return self.branch(self.status.contains(Status::C), operand, crossed),
            Op::Bne => return self.branch(!self.status.contains(Status::Z), operand, crossed),
            Op::Beq => return self.branch(self.status.contains(Status::Z), operand, crossed),
            Op::Bpl => return self.branch(!self.status.contains(Status::N), operand, crossed),
            Op::Bmi => return self.branch(self.status.contains(Status::N), operand, crossed),
            Op::Bvc => return self.branch(!self.status.contains(Status::V), operand, crossed),
            Op::Bvs => return self.branch(self.status.contains(Status::V), operand, crossed),

            // Flag writes
            Op::Clc => self.status.remove(Status::C),
            Op::Sec => self.status.insert(Status::C),
            Op::Cli => self.status.remove(Status::I),
            Op::Sei => self.status.insert(Status::I),
            Op::Cld => self.status.remove(Status::D),
            Op::Sed => self.status.insert(Status::D),
            Op::Clv => self.status.remove(Status::V),

            Op::Nop => {
                // Unofficial NOP variants still perform their operand read.
                if let Operand::Address(addr) = operand {
                    let _ = bus.read(addr);
                }
            }
        }
        0
    }

    fn load(&mut self, bus: &mut impl Bus, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator | Operand::None => self.a,
        }
    }

    fn store(&mut self, bus: &mut impl Bus, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => bus.write(addr, value),
            Operand::Accumulator => self.a = value,
            Operand::None => {}
        }
    }

    fn add_with_carry(&mut self, value: u8) {
        let carry = u16::from(self.status.contains(Status::C));
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;
        self.status.set(Status::C, sum > 0xFF);
        // Signed overflow: operands agree in sign and the result disagrees.
        self.status
            .set(Status::V, (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0);
        self.a = result;
        self.status.set_zn(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(Status::C, register >= value);
        self.status.set_zn(register.wrapping_sub(value));
    }

    fn branch(&mut self, condition: bool, operand: Operand, crossed: bool) -> u8 {
        let Operand::Address(target) = operand else {
            return 0;
        };
        if condition {
            self.pc = target;
            1 + u8::from(crossed)
        } else {
            0
        }
    }

    // ===== Stack =====

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    fn pop_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pop(bus));
        let hi = u16::from(self.pop(bus));
        hi << 8 | lo
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
