// PPU memory space: pattern tables, nametables, palette RAM

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Map a nametable address ($2000-$2FFF) to an offset in internal
    /// VRAM according to the active mirroring mode.
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical = match self.mirroring {
            Mirroring::Horizontal => match table {
                0 | 1 => 0,
                _ => 1,
            },
            Mirroring::Vertical => match table {
                0 | 2 => 0,
                _ => 1,
            },
            Mirroring::SingleScreenA => 0,
            Mirroring::SingleScreenB => 1,
            // The cartridge supplies 4KB; all four tables are distinct
            Mirroring::FourScreen => table,
        };

        physical * NAMETABLE_SIZE + offset
    }

    /// Map a palette address ($3F00-$3FFF) to palette RAM.
    ///
    /// $3F10/$3F14/$3F18/$3F1C mirror $3F00/$3F04/$3F08/$3F0C: sprite
    /// palette entry 0 is the shared backdrop.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 16 && addr % 4 == 0 {
            addr - 16
        } else {
            addr
        }
    }

    /// Read from PPU address space.
    ///
    /// Every access is also reported to the mapper's A12 observer, which
    /// is what clocks MMC3-style IRQ counters.
    pub(super) fn read_ppu_memory(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        self.observe_address(addr);

        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow().ppu_read(addr)
                } else {
                    0
                }
            }
            0x2000..=0x3EFF => {
                let nt_addr = addr & 0x2FFF;
                self.nametable_fetch(nt_addr)
            }
            0x3F00..=0x3FFF => self.palette_ram[self.mirror_palette_addr(addr)],
            _ => unreachable!(),
        }
    }

    /// Write to PPU address space.
    pub(super) fn write_ppu_memory(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        self.observe_address(addr);

        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().ppu_write(addr, data);
                }
            }
            0x2000..=0x3EFF => {
                let nt_addr = addr & 0x2FFF;
                self.nametable_store(nt_addr, data);
            }
            0x3F00..=0x3FFF => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index] = data;
            }
            _ => unreachable!(),
        }
    }

    /// Nametable read, honoring a mapper-supplied per-table map (MMC5).
    fn nametable_fetch(&self, addr: u16) -> u8 {
        let table = (addr >> 10) & 0x03;
        let offset = addr & 0x03FF;

        if let Some(mapper) = &self.mapper {
            // Take the map in its own statement so the borrow is released
            // before any further mapper call
            let map = mapper.borrow().nametable_map();
            if let Some(map) = map {
                return match map[table as usize] {
                    0 => self.nametables[offset as usize],
                    1 => self.nametables[NAMETABLE_SIZE + offset as usize],
                    _ => mapper.borrow().nametable_read(table, offset),
                };
            }
        }

        self.nametables[self.mirror_nametable_addr(addr)]
    }

    /// Nametable write, honoring a mapper-supplied per-table map.
    fn nametable_store(&mut self, addr: u16, data: u8) {
        let table = (addr >> 10) & 0x03;
        let offset = addr & 0x03FF;

        if let Some(mapper) = self.mapper.clone() {
            let map = mapper.borrow().nametable_map();
            if let Some(map) = map {
                match map[table as usize] {
                    0 => self.nametables[offset as usize] = data,
                    1 => self.nametables[NAMETABLE_SIZE + offset as usize] = data,
                    _ => mapper.borrow_mut().nametable_write(table, offset, data),
                }
                return;
            }
        }

        let index = self.mirror_nametable_addr(addr);
        self.nametables[index] = data;
    }

    /// Report the driven address to the mapper (A12 IRQ clocking).
    fn observe_address(&self, addr: u16) {
        if let Some(mapper) = &self.mapper {
            mapper.borrow_mut().a12_observe(addr, self.dot);
        }
    }
}
