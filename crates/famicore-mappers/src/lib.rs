//! Cartridge and mapper support for the famicore NES emulator.
//!
//! A [`Cartridge`] is the parsed iNES image; a [`Mapper`] is the board
//! logic that translates both buses onto it. [`create_mapper`] picks the
//! board implementation from the header's mapper number.
//!
//! ```
//! use famicore_mappers::{create_mapper, Cartridge};
//!
//! # fn image() -> Vec<u8> {
//! #     let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1, 0, 0];
//! #     data.extend_from_slice(&[0; 8]);
//! #     data.resize(16 + 16 * 1024 + 8 * 1024, 0);
//! #     data
//! # }
//! let cartridge = Cartridge::load(&image())?;
//! let mapper = create_mapper(cartridge)?;
//! assert_eq!(mapper.mapper_id(), 0);
//! # Ok::<(), famicore_mappers::RomError>(())
//! ```

mod cartridge;
mod mapper;
mod nrom;

pub use cartridge::{Cartridge, RomError};
pub use mapper::{Mapper, Mirroring};
pub use nrom::Nrom;

/// Instantiate the board for a cartridge, consuming it.
///
/// # Errors
///
/// [`RomError::UnsupportedMapper`] when the mapper number has no
/// implementation in this core.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, RomError> {
    match cartridge.mapper_id {
        0 => Ok(Box::new(Nrom::new(cartridge))),
        id => Err(RomError::UnsupportedMapper(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_image(mapper: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1, 0, mapper & 0xF0];
        data[6] = (mapper & 0x0F) << 4;
        data.extend_from_slice(&[0; 8]);
        data.resize(16 + 16 * 1024 + 8 * 1024, 0);
        data
    }

    #[test]
    fn mapper_zero_is_supported() {
        let cartridge = Cartridge::load(&nrom_image(0)).unwrap();
        let mapper = create_mapper(cartridge).unwrap();
        assert_eq!(mapper.mapper_id(), 0);
        assert_eq!(mapper.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn other_mappers_are_rejected_with_their_id() {
        let cartridge = Cartridge::load(&nrom_image(4)).unwrap();
        assert!(matches!(
            create_mapper(cartridge),
            Err(RomError::UnsupportedMapper(4))
        ));
    }
}
