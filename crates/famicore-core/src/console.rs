//! Console: the clock owner tying CPU, PPU and cartridge together.
//!
//! The clock ratio is fixed at three PPU dots per CPU cycle, ordered
//! CPU-first within each [`Console::tick`]. Interrupts the PPU raises in a
//! tick are latched and reach the CPU at its next instruction boundary.

use famicore_cpu::{Bus, Cpu};
use famicore_mappers::{create_mapper, Cartridge, RomError};
use famicore_ppu::NES_PALETTE;

use crate::bus::NesBus;

/// A powered NES core: CPU, system bus and everything behind it.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
}

impl Console {
    /// Power on with a cartridge: build the mapper, wire the bus, and run
    /// the CPU's reset sequence.
    ///
    /// # Errors
    ///
    /// [`RomError::UnsupportedMapper`] when the cartridge needs a board
    /// this core does not implement.
    pub fn power_on(cartridge: Cartridge) -> Result<Self, RomError> {
        let mapper = create_mapper(cartridge)?;
        log::debug!("powering on with mapper {}", mapper.mapper_id());
        let mut bus = NesBus::new(mapper);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        Ok(Self { cpu, bus })
    }

    /// Console reset: RAM cleared, PPU registers cleared, CPU re-vectored.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        log::debug!("console reset");
    }

    /// Advance one CPU cycle and three PPU dots.
    pub fn tick(&mut self) {
        self.service_oam_dma();
        self.cpu.tick(&mut self.bus);
        for _ in 0..3 {
            self.bus.step_ppu();
        }
        if self.bus.ppu.take_nmi() {
            self.cpu.signal_nmi();
        }
    }

    /// Run one whole CPU instruction (or one stall cycle), keeping the PPU
    /// in step. Returns the CPU cycles consumed.
    pub fn step(&mut self) -> u8 {
        self.service_oam_dma();
        let cycles = self.cpu.step(&mut self.bus);
        for _ in 0..u32::from(cycles) * 3 {
            self.bus.step_ppu();
        }
        if self.bus.ppu.take_nmi() {
            self.cpu.signal_nmi();
        }
        cycles
    }

    /// Run until the PPU finishes the frame in progress.
    pub fn step_frame(&mut self) {
        loop {
            self.tick();
            if self.bus.ppu.frame_ready() {
                break;
            }
        }
    }

    /// Take the finished frame, if one is waiting, as 256x240 RGBA bytes.
    pub fn take_frame(&mut self) -> Option<Vec<u8>> {
        if !self.bus.ppu.take_frame() {
            return None;
        }
        let indices = self.bus.ppu.frame_buffer();
        let mut rgba = vec![0u8; indices.len() * 4];
        for (pixel, &index) in rgba.chunks_exact_mut(4).zip(indices) {
            let (r, g, b) = NES_PALETTE[usize::from(index & 0x3F)];
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
            pixel[3] = 0xFF;
        }
        Some(rgba)
    }

    /// A `$4014` write latches a DMA request; run the copy and charge the
    /// CPU its stall before the next cycle executes.
    fn service_oam_dma(&mut self) {
        if let Some(page) = self.bus.take_oam_dma() {
            // One extra cycle when the transfer starts on an odd CPU cycle.
            let stall = if self.cpu.cycles() % 2 == 1 { 514 } else { 513 };
            self.bus.run_oam_dma(page);
            self.cpu.add_stall(stall);
            log::trace!("OAM DMA from page ${page:02X}, {stall} cycle stall");
        }
    }

    /// The CPU, for inspection.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The system bus, for inspection.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable bus access, for hosts that seed RAM or poke ports directly.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Side-effect-free memory read at a CPU address.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }
}
