//! Mapper 0: NROM.
//!
//! No banking at all. PRG-ROM appears at `$8000-$FFFF`; a 16 KiB board
//! mirrors its single bank into the upper half. CHR is a flat 8 KiB of ROM
//! or RAM on the PPU side.

use crate::cartridge::Cartridge;
use crate::mapper::{Mapper, Mirroring};

/// NROM board (NROM-128 and NROM-256).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nrom {
    prg_rom: Vec<u8>,
    /// CHR-ROM contents, or 8 KiB of zeroed CHR-RAM.
    chr: Vec<u8>,
    chr_writable: bool,
    mirroring: Mirroring,
}

impl Nrom {
    /// Build the board from a parsed cartridge.
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        let chr_writable = cartridge.has_chr_ram();
        let chr = if chr_writable {
            vec![0; Cartridge::CHR_BLOCK]
        } else {
            cartridge.chr_rom
        };
        Self {
            prg_rom: cartridge.prg_rom,
            chr,
            chr_writable,
            mirroring: cartridge.mirroring,
        }
    }
}

impl Mapper for Nrom {
    fn read_prg(&self, addr: u16) -> u8 {
        if addr < 0x8000 {
            // No PRG-RAM on an NROM board; the window below $8000 is empty.
            return 0;
        }
        // A 16 KiB image mirrors into the upper bank.
        let offset = (addr as usize - 0x8000) % self.prg_rom.len();
        self.prg_rom[offset]
    }

    fn write_prg(&mut self, _addr: u16, _value: u8) {
        // No registers; writes fall on ROM and are ignored.
    }

    fn read_chr(&self, addr: u16) -> u8 {
        self.chr[usize::from(addr & 0x1FFF)]
    }

    fn write_chr(&mut self, addr: u16, value: u8) {
        if self.chr_writable {
            self.chr[usize::from(addr & 0x1FFF)] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_id(&self) -> u8 {
        0
    }
}
