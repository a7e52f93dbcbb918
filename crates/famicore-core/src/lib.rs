//! famicore emulation core.
//!
//! Ties the subsystem crates into a runnable machine: the [`Console`]
//! owns a [`Cpu`](famicore_cpu::Cpu), the [`NesBus`] behind it, and the
//! PPU and mapper behind that. A host feeds it a parsed [`Cartridge`] and
//! drives [`Console::tick`] (or [`Console::step_frame`]), collecting
//! frames with [`Console::take_frame`].
//!
//! ```no_run
//! use famicore_core::{Cartridge, Console};
//!
//! let data = std::fs::read("game.nes").unwrap();
//! let cartridge = Cartridge::load(&data).unwrap();
//! let mut console = Console::power_on(cartridge).unwrap();
//!
//! loop {
//!     console.step_frame();
//!     if let Some(rgba) = console.take_frame() {
//!         // present 256x240 RGBA pixels
//!         # let _ = rgba;
//!         # break;
//!     }
//! }
//! ```

mod bus;
mod console;

pub use bus::NesBus;
pub use console::Console;

// The construction-time surface a host needs, re-exported from the
// subsystem crates.
pub use famicore_cpu::{Bus, Cpu, Status};
pub use famicore_mappers::{Cartridge, Mapper, Mirroring, RomError};
pub use famicore_ppu::{Ppu, FRAME_HEIGHT, FRAME_WIDTH, NES_PALETTE};
