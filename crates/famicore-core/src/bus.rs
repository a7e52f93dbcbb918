//! System bus.
//!
//! Routes every CPU access to its destination:
//!
//! ```text
//! $0000-$1FFF  2 KiB internal RAM, mirrored every 2 KiB
//! $2000-$3FFF  8 PPU ports, mirrored every 8 bytes
//! $4014        OAM DMA trigger
//! $4000-$401F  APU and I/O (outside this core; reads as 0)
//! $4020-$FFFF  cartridge, via the mapper
//! ```
//!
//! The bus also adapts the mapper onto the PPU's pattern-table window and
//! owns the OAM DMA page latch.

use famicore_cpu::Bus;
use famicore_mappers::Mapper;
use famicore_ppu::{ChrBus, Ppu};

/// The mapper seen through the PPU's pattern-table window.
struct MapperChr<'a>(&'a mut dyn Mapper);

impl ChrBus for MapperChr<'_> {
    fn read_chr(&mut self, addr: u16) -> u8 {
        self.0.read_chr(addr)
    }
    fn write_chr(&mut self, addr: u16, value: u8) {
        self.0.write_chr(addr, value)
    }
}

/// CPU-visible system bus: RAM, PPU ports, DMA latch and the cartridge.
pub struct NesBus {
    ram: [u8; 0x0800],
    /// Picture processing unit.
    pub ppu: Ppu,
    /// Cartridge board.
    pub mapper: Box<dyn Mapper>,
    /// Page latched by a `$4014` write, waiting for the clock owner to run
    /// the transfer.
    oam_dma_page: Option<u8>,
}

impl NesBus {
    /// Build the bus around a mapper; the PPU inherits the cartridge's
    /// nametable wiring.
    #[must_use]
    pub fn new(mapper: Box<dyn Mapper>) -> Self {
        let ppu = Ppu::new(mapper.mirroring());
        Self {
            ram: [0; 0x0800],
            ppu,
            mapper,
            oam_dma_page: None,
        }
    }

    /// Clear RAM and reset the PPU (console reset).
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.ppu.reset();
        self.oam_dma_page = None;
    }

    /// Advance the PPU one dot against the cartridge's pattern tables.
    pub fn step_ppu(&mut self) {
        self.ppu.tick(&mut MapperChr(self.mapper.as_mut()));
    }

    /// Take the latched OAM DMA page, if a `$4014` write is pending.
    pub fn take_oam_dma(&mut self) -> Option<u8> {
        self.oam_dma_page.take()
    }

    /// Copy 256 bytes from `page << 8` into OAM through this bus.
    pub fn run_oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        for offset in 0..256u16 {
            let value = self.read(base.wrapping_add(offset));
            self.ppu.oam_dma_write(value);
        }
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => {
                let Self { ppu, mapper, .. } = self;
                ppu.read_register(addr, &mut MapperChr(mapper.as_mut()))
            }
            // Controller ports and the APU/I-O window live outside this
            // core and read back 0.
            0x4000..=0x401F => 0,
            _ => self.mapper.read_prg(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)] = value,
            0x2000..=0x3FFF => {
                let Self { ppu, mapper, .. } = self;
                ppu.write_register(addr, value, &mut MapperChr(mapper.as_mut()));
            }
            0x4014 => self.oam_dma_page = Some(value),
            0x4000..=0x401F => {}
            _ => self.mapper.write_prg(addr, value),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            // PPU port reads are destructive; a peek shows nothing.
            0x2000..=0x401F => 0,
            _ => self.mapper.read_prg(addr),
        }
    }
}
