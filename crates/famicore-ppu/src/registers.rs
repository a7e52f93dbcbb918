//! PPU control, mask and status registers.
//!
//! These are the bit-packed register latches behind the CPU-visible ports
//! `$2000`, `$2001` and `$2002`. Multi-bit fields are only reached through
//! the accessor methods; nothing outside this module touches raw bits.

use bitflags::bitflags;

bitflags! {
    /// PPUCTRL (`$2000`, write-only).
    ///
    /// ```text
    /// 7  bit  0
    /// VPHB SINN
    /// |||| ||++- base nametable select
    /// |||| |+--- VRAM increment on PPUDATA access (0: +1, 1: +32)
    /// |||| +---- sprite pattern table for 8x8 sprites
    /// |||+------ background pattern table
    /// ||+------- sprite size (0: 8x8, 1: 8x16)
    /// |+-------- master/slave (unused on the NES)
    /// +--------- NMI at VBlank start
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuCtrl: u8 {
        /// Nametable select, low bit.
        const NAMETABLE_X = 1 << 0;
        /// Nametable select, high bit.
        const NAMETABLE_Y = 1 << 1;
        /// PPUDATA access increments v by 32 instead of 1.
        const VRAM_INCREMENT = 1 << 2;
        /// 8x8 sprites fetch from pattern table 1.
        const SPRITE_TABLE = 1 << 3;
        /// Background fetches from pattern table 1.
        const BACKGROUND_TABLE = 1 << 4;
        /// 8x16 sprite mode.
        const SPRITE_SIZE = 1 << 5;
        /// Master/slave select, unused.
        const MASTER_SLAVE = 1 << 6;
        /// Raise NMI when VBlank begins.
        const NMI_ENABLE = 1 << 7;
    }
}

impl PpuCtrl {
    /// Step applied to v after each PPUDATA access: 1 across, 32 down.
    #[inline]
    #[must_use]
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) { 32 } else { 1 }
    }

    /// Pattern table base for the background.
    #[inline]
    #[must_use]
    pub fn background_table(self) -> u16 {
        if self.contains(Self::BACKGROUND_TABLE) { 0x1000 } else { 0x0000 }
    }

    /// Pattern table base for 8x8 sprites (ignored in 8x16 mode).
    #[inline]
    #[must_use]
    pub fn sprite_table(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) { 0x1000 } else { 0x0000 }
    }

    /// Sprite height in pixels.
    #[inline]
    #[must_use]
    pub fn sprite_height(self) -> i16 {
        if self.contains(Self::SPRITE_SIZE) { 16 } else { 8 }
    }

    /// True when an NMI should fire at VBlank start.
    #[inline]
    #[must_use]
    pub fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

bitflags! {
    /// PPUMASK (`$2001`, write-only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuMask: u8 {
        /// Greyscale output.
        const GREYSCALE = 1 << 0;
        /// Show background in the leftmost 8 pixels.
        const SHOW_BACKGROUND_LEFT = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const SHOW_SPRITES_LEFT = 1 << 2;
        /// Background rendering enable.
        const SHOW_BACKGROUND = 1 << 3;
        /// Sprite rendering enable.
        const SHOW_SPRITES = 1 << 4;
        /// Red emphasis.
        const EMPHASIZE_RED = 1 << 5;
        /// Green emphasis.
        const EMPHASIZE_GREEN = 1 << 6;
        /// Blue emphasis.
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

impl PpuMask {
    /// Rendering is on when either layer is shown. This gates the scroll
    /// counter updates during visible scanlines.
    #[inline]
    #[must_use]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BACKGROUND | Self::SHOW_SPRITES)
    }

    /// Background layer enabled.
    #[inline]
    #[must_use]
    pub fn show_background(self) -> bool {
        self.contains(Self::SHOW_BACKGROUND)
    }

    /// Sprite layer enabled.
    #[inline]
    #[must_use]
    pub fn show_sprites(self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }
}

bitflags! {
    /// PPUSTATUS (`$2002`, read-only). The low five bits are undriven.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        /// More than eight sprites landed on one scanline.
        const SPRITE_OVERFLOW = 1 << 5;
        /// Opaque sprite-0 pixel overlapped an opaque background pixel.
        const SPRITE_ZERO_HIT = 1 << 6;
        /// Currently inside vertical blank.
        const VBLANK = 1 << 7;
    }
}
