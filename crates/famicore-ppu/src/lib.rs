//! Ricoh 2C02 PPU core for the famicore NES emulator.
//!
//! The PPU owns its register file, the v/t/x/w scroll cluster, nametable
//! and palette RAM, and OAM. Pattern-table traffic leaves the chip through
//! the [`ChrBus`] trait, which the system bus backs with the cartridge
//! mapper. One [`Ppu::tick`] advances one dot of the 341x262 frame; the
//! clock owner calls it three times per CPU cycle and collects the NMI and
//! frame latches afterwards.
//!
//! ```
//! use famicore_mappers::Mirroring;
//! use famicore_ppu::{ChrBus, Ppu};
//!
//! struct NoChr;
//!
//! impl ChrBus for NoChr {
//!     fn read_chr(&mut self, _addr: u16) -> u8 {
//!         0
//!     }
//!     fn write_chr(&mut self, _addr: u16, _value: u8) {}
//! }
//!
//! let mut ppu = Ppu::new(Mirroring::Horizontal);
//! let mut chr = NoChr;
//! ppu.write_register(0x2000, 0x80, &mut chr); // NMI on
//! while !ppu.take_nmi() {
//!     ppu.tick(&mut chr);
//! }
//! assert_eq!(ppu.scanline(), 241);
//! ```

mod oam;
mod palette;
mod ppu;
mod registers;
mod scroll;
mod vram;

pub use oam::{Oam, Sprite};
pub use palette::NES_PALETTE;
pub use ppu::{ChrBus, Ppu, DOTS_PER_SCANLINE, FRAME_HEIGHT, FRAME_WIDTH, SCANLINES_PER_FRAME};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::Scroll;
pub use vram::Vram;
