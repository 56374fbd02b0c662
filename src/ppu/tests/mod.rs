// PPU unit tests, grouped by concern

mod quirks;
mod registers;

use super::Ppu;
use crate::cartridge::{create_mapper, Cartridge, Mapper, Mirroring};
use std::cell::RefCell;
use std::rc::Rc;

/// A PPU wired to an NROM cartridge with writable CHR-RAM.
pub(super) fn ppu_with_chr_ram() -> Ppu {
    let cartridge = Cartridge {
        prg_rom: vec![0; 16 * 1024],
        chr_rom: vec![0; 8 * 1024],
        chr_is_ram: true,
        mapper: 0,
        mirroring: Mirroring::Horizontal,
        has_battery: false,
    };
    let mapper: Rc<RefCell<Box<dyn Mapper>>> =
        Rc::new(RefCell::new(create_mapper(cartridge).unwrap()));

    let mut ppu = Ppu::new();
    ppu.set_mapper(mapper);
    ppu
}

/// Advance the PPU to the given position (from wherever it currently is).
pub(super) fn run_to(ppu: &mut Ppu, scanline: i16, cycle: u16) {
    // Bounded by two frames so a broken counter fails fast
    for _ in 0..(341 * 262 * 2) {
        if ppu.scanline() == scanline && ppu.cycle() == cycle {
            return;
        }
        ppu.tick();
    }
    panic!("PPU never reached ({}, {})", scanline, cycle);
}
