//! CPU status register (P) flags.
//!
//! Bit layout, high to low: `NV1B DIZC`. Bit 5 is hard-wired to 1 on the
//! 2A03; bit 4 (Break) only exists on copies of P pushed to the stack.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Processor status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Status: u8 {
        /// Carry: unsigned overflow out of bit 7 (or borrow-clear on compares).
        const C = 1 << 0;
        /// Zero: last result was zero.
        const Z = 1 << 1;
        /// Interrupt disable: masks IRQ (never NMI).
        const I = 1 << 2;
        /// Decimal mode: latches but has no effect on the 2A03.
        const D = 1 << 3;
        /// Break: set on stack copies pushed by PHP/BRK, clear for IRQ/NMI.
        const B = 1 << 4;
        /// Unused: reads as 1 in the on-chip register.
        const U = 1 << 5;
        /// Overflow: signed overflow of the last arithmetic result.
        const V = 1 << 6;
        /// Negative: bit 7 of the last result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Register value after a reset: interrupt disable and the wired bit.
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Update Z and N from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }

    /// Byte to push for this register. B is set for PHP/BRK snapshots and
    /// clear for hardware interrupts; U is always set on the stack.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let bits = self.bits() | Self::U.bits();
        if brk { bits | Self::B.bits() } else { bits & !Self::B.bits() }
    }

    /// Rebuild the register from a byte pulled off the stack. The pulled B
    /// bit is discarded and U forced on, matching the on-chip register.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
