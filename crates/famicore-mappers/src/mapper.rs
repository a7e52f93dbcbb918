//! Mapper trait.
//!
//! On-cartridge logic sits between both buses and the ROM chips: the CPU
//! side covers `$4020-$FFFF` and the PPU side covers the pattern tables at
//! `$0000-$1FFF`. Everything a mapper can do for this core is captured by
//! the four bus accessors plus the mirroring it wires for the nametables.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nametable mirroring arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mirroring {
    /// Horizontal mirroring: `$2000`/`$2400` share a table, as do
    /// `$2800`/`$2C00` (the `[AA][BB]` layout).
    #[default]
    Horizontal,
    /// Vertical mirroring: `$2000`/`$2800` share, `$2400`/`$2C00` share
    /// (the `[AB][AB]` layout).
    Vertical,
    /// Four-screen VRAM on the cartridge.
    FourScreen,
}

/// Cartridge bus translation.
pub trait Mapper: Send + Sync {
    /// CPU-side read, `$4020-$FFFF`.
    fn read_prg(&self, addr: u16) -> u8;

    /// CPU-side write, `$4020-$FFFF`. Bank-switching mappers latch their
    /// registers here.
    fn write_prg(&mut self, addr: u16, value: u8);

    /// PPU-side read of the pattern tables, `$0000-$1FFF`.
    fn read_chr(&self, addr: u16) -> u8;

    /// PPU-side write, `$0000-$1FFF`. Only effective for CHR-RAM boards.
    fn write_chr(&mut self, addr: u16, value: u8);

    /// Nametable mirroring currently in effect.
    fn mirroring(&self) -> Mirroring;

    /// iNES mapper number.
    fn mapper_id(&self) -> u8;
}
