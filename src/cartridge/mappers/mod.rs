// Mappers module - cartridge bank-switching hardware
//
// Each mapper translates CPU and PPU addresses into PRG/CHR offsets and, for
// the more capable boards, drives the IRQ line. The factory below picks the
// implementation from the iNES mapper number.

mod mapper0;
mod mapper1;
mod mapper10;
mod mapper11;
mod mapper2;
mod mapper3;
mod mapper4;
mod mapper5;
mod mapper66;
mod mapper7;
mod mapper71;
mod mapper9;

use super::{Cartridge, Mapper};
use mapper0::Mapper0;
use mapper1::Mapper1;
use mapper10::Mapper10;
use mapper11::Mapper11;
use mapper2::Mapper2;
use mapper3::Mapper3;
use mapper4::Mapper4;
use mapper5::Mapper5;
use mapper66::Mapper66;
use mapper7::Mapper7;
use mapper71::Mapper71;
use mapper9::Mapper9;

/// Error type for mapper creation
#[derive(Debug)]
pub enum MapperError {
    /// The requested mapper number is not in the implemented set
    UnsupportedMapper(u16),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "mapper {} is not supported", num)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Create a mapper instance from the mapper number in the cartridge header.
///
/// # Errors
/// Returns `MapperError::UnsupportedMapper` for numbers outside the
/// implemented set.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.mapper {
        0 => Ok(Box::new(Mapper0::new(cartridge))),
        1 => Ok(Box::new(Mapper1::new(cartridge))),
        2 => Ok(Box::new(Mapper2::new(cartridge))),
        3 => Ok(Box::new(Mapper3::new(cartridge))),
        4 => Ok(Box::new(Mapper4::new(cartridge))),
        5 => Ok(Box::new(Mapper5::new(cartridge))),
        7 => Ok(Box::new(Mapper7::new(cartridge))),
        9 => Ok(Box::new(Mapper9::new(cartridge))),
        10 => Ok(Box::new(Mapper10::new(cartridge))),
        11 => Ok(Box::new(Mapper11::new(cartridge))),
        66 => Ok(Box::new(Mapper66::new(cartridge))),
        71 => Ok(Box::new(Mapper71::new(cartridge))),
        mapper_num => {
            log::error!("unsupported mapper {}", mapper_num);
            Err(MapperError::UnsupportedMapper(mapper_num))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Mirroring;

    fn test_cartridge(mapper: u16) -> Cartridge {
        Cartridge {
            prg_rom: vec![0xAA; 32 * 1024],
            chr_rom: vec![0xBB; 8 * 1024],
            chr_is_ram: false,
            mapper,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
        }
    }

    #[test]
    fn test_supported_mappers_construct() {
        for id in [0u16, 1, 2, 3, 4, 5, 7, 9, 10, 11, 66, 71] {
            let result = create_mapper(test_cartridge(id));
            assert!(result.is_ok(), "mapper {} should construct", id);
        }
    }

    #[test]
    fn test_unsupported_mapper() {
        let result = create_mapper(test_cartridge(99));
        assert!(matches!(result, Err(MapperError::UnsupportedMapper(99))));
    }
}
