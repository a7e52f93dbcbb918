//! iNES cartridge image parsing.
//!
//! The 16-byte iNES header:
//!
//! ```text
//! Byte 0-3:  Magic "NES" + MS-DOS EOF (4E 45 53 1A)
//! Byte 4:    PRG-ROM size in 16 KiB blocks
//! Byte 5:    CHR-ROM size in 8 KiB blocks (0 = cartridge carries CHR-RAM)
//! Byte 6:    Flags: bit 0 mirroring (0 horizontal / 1 vertical),
//!            bit 2 trainer present, bit 3 four-screen VRAM,
//!            bits 4-7 mapper number low nybble
//! Byte 7:    Bits 4-7 mapper number high nybble
//! Byte 8-15: Extended fields (unused here)
//! ```

use crate::mapper::Mirroring;

/// Errors raised while parsing a ROM image. Construction is the only
/// fallible part of the core; execution never fails.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RomError {
    /// The file does not start with the iNES magic number.
    #[error("invalid iNES magic: expected [4E 45 53 1A], got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Structurally invalid image: truncated data or a zero-sized PRG-ROM.
    #[error("malformed iNES image: {0}")]
    Format(String),

    /// The cartridge requests a mapper this core does not implement.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// A parsed cartridge: PRG/CHR data plus the routing facts the mappers
/// need. Immutable once loaded.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cartridge {
    /// Program ROM, `16 KiB × prg_blocks`.
    pub prg_rom: Vec<u8>,
    /// Pattern ROM, `8 KiB × chr_blocks`; empty means the cartridge has
    /// CHR-RAM instead.
    pub chr_rom: Vec<u8>,
    /// iNES mapper number.
    pub mapper_id: u8,
    /// Nametable mirroring wired on the board.
    pub mirroring: Mirroring,
}

impl Cartridge {
    /// PRG-ROM block granularity.
    pub const PRG_BLOCK: usize = 16 * 1024;
    /// CHR-ROM block granularity.
    pub const CHR_BLOCK: usize = 8 * 1024;

    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
    const HEADER_LEN: usize = 16;
    const TRAINER_LEN: usize = 512;

    /// Parse a complete iNES file image.
    ///
    /// # Errors
    ///
    /// [`RomError::InvalidMagic`] when the magic bytes are wrong, and
    /// [`RomError::Format`] when the header claims zero PRG blocks or the
    /// data runs out before the declared ROM regions end.
    pub fn load(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < Self::HEADER_LEN {
            return Err(RomError::Format(format!(
                "file too small for a header: {} bytes",
                data.len()
            )));
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != Self::MAGIC {
            return Err(RomError::InvalidMagic(magic));
        }

        let prg_blocks = usize::from(data[4]);
        let chr_blocks = usize::from(data[5]);
        if prg_blocks == 0 {
            return Err(RomError::Format("PRG-ROM size is zero".into()));
        }

        let flags6 = data[6];
        let flags7 = data[7];
        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);
        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = Self::HEADER_LEN;
        if flags6 & 0x04 != 0 {
            // Trainer data is irrelevant to execution; skip over it.
            offset += Self::TRAINER_LEN;
        }

        let prg_len = prg_blocks * Self::PRG_BLOCK;
        let chr_len = chr_blocks * Self::CHR_BLOCK;
        if data.len() < offset + prg_len + chr_len {
            return Err(RomError::Format(format!(
                "truncated image: expected {} bytes, got {}",
                offset + prg_len + chr_len,
                data.len()
            )));
        }

        let prg_rom = data[offset..offset + prg_len].to_vec();
        let chr_rom = data[offset + prg_len..offset + prg_len + chr_len].to_vec();

        log::debug!(
            "loaded cartridge: mapper {mapper_id}, {prg_blocks}x16K PRG, {chr_blocks}x8K CHR, {mirroring:?} mirroring"
        );

        Ok(Self {
            prg_rom,
            chr_rom,
            mapper_id,
            mirroring,
        })
    }

    /// Number of 16 KiB PRG-ROM blocks.
    #[must_use]
    pub fn prg_blocks(&self) -> usize {
        self.prg_rom.len() / Self::PRG_BLOCK
    }

    /// Number of 8 KiB CHR-ROM blocks (0 for CHR-RAM cartridges).
    #[must_use]
    pub fn chr_blocks(&self) -> usize {
        self.chr_rom.len() / Self::CHR_BLOCK
    }

    /// True when the cartridge carries writable CHR-RAM instead of CHR-ROM.
    #[must_use]
    pub fn has_chr_ram(&self) -> bool {
        self.chr_rom.is_empty()
    }
}
