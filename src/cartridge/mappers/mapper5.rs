// Mapper 5 (MMC5) - partial implementation of the big Nintendo board
//
// Covered here:
// - PRG banking modes 0-3 ($5100) over 8KB slots, with the ROM/RAM select
//   bit on each bank register; $5113 banks the PRG-RAM window at $6000
// - CHR banking ($5101 mode, $5120-$5127 sprite set, $5128-$512B
//   background set)
// - 1KB-granular nametable map ($5105) with extended RAM and fill modes
// - Extended RAM at $5C00-$5FFF with the four access modes ($5104)
// - Scanline counter IRQ ($5203 compare, $5204 enable/status)
// - 8x8 multiplier ($5205/$5206)
//
// Not covered (beyond this core's scope): vertical split mode, ExGrafix
// attribute mode tile fetches, and MMC5A extensions.
//
// Split background/sprite CHR is approximated: the register set written
// most recently supplies the banks for subsequent fetches, which is the
// usual partial-MMC5 compromise and renders the common titles correctly.

use std::cell::Cell;

use crate::cartridge::{Cartridge, Mapper, Mirroring};

/// CHR bank granularity at mode 3 (1KB)
const CHR_BANK_SIZE: usize = 1024;

/// 8KB PRG slot size
const PRG_SLOT_SIZE: usize = 8 * 1024;

/// Total PRG-RAM carried by the board (64KB, banked 8KB at a time)
const PRG_RAM_SIZE: usize = 64 * 1024;

/// Extended RAM size
const EXRAM_SIZE: usize = 1024;

/// Mapper 5 implementation (MMC5, partial)
pub struct Mapper5 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    prg_ram: Vec<u8>,
    chr_is_ram: bool,

    /// $5100: PRG mode 0-3
    prg_mode: u8,
    /// $5101: CHR mode 0-3
    chr_mode: u8,
    /// $5104: extended RAM mode 0-3
    exram_mode: u8,
    /// $5105: 2-bit source per nametable
    nt_mapping: u8,
    /// $5106/$5107: fill-mode tile and attribute
    fill_tile: u8,
    fill_attr: u8,
    /// $5113-$5117: PRG bank registers (RAM window + four ROM/RAM slots)
    prg_banks: [u8; 5],
    /// $5120-$5127: sprite CHR banks
    chr_sprite: [u8; 8],
    /// $5128-$512B: background CHR banks
    chr_background: [u8; 4],
    /// True when the background set was written more recently
    chr_bg_last: bool,

    /// $5C00-$5FFF extended RAM
    exram: [u8; EXRAM_SIZE],

    /// $5203: scanline compare value
    irq_compare: u8,
    /// $5204 bit 7: IRQ enable
    irq_enabled: bool,
    /// Cell because the $5204 status read acknowledges the line
    irq_pending: Cell<bool>,
    /// Rendering is inside the visible frame
    in_frame: bool,

    /// $5205/$5206 multiplier operands
    mul_a: u8,
    mul_b: u8,
}

impl Mapper5 {
    pub fn new(cartridge: Cartridge) -> Self {
        let last_bank = (cartridge.prg_rom.len() / PRG_SLOT_SIZE).saturating_sub(1) as u8;
        Mapper5 {
            prg_rom: cartridge.prg_rom,
            chr_mem: cartridge.chr_rom,
            prg_ram: vec![0; PRG_RAM_SIZE],
            chr_is_ram: cartridge.chr_is_ram,
            prg_mode: 3,
            chr_mode: 3,
            exram_mode: 0,
            nt_mapping: 0,
            fill_tile: 0,
            fill_attr: 0,
            // Power-on: everything points at the last ROM bank
            prg_banks: [0, 0x80 | last_bank, 0x80 | last_bank, 0x80 | last_bank, last_bank],
            chr_sprite: [0; 8],
            chr_background: [0; 4],
            chr_bg_last: false,
            exram: [0; EXRAM_SIZE],
            irq_compare: 0,
            irq_enabled: false,
            irq_pending: Cell::new(false),
            in_frame: false,
            mul_a: 0xFF,
            mul_b: 0xFF,
        }
    }

    fn rom_slots(&self) -> usize {
        (self.prg_rom.len() / PRG_SLOT_SIZE).max(1)
    }

    /// Resolve a CPU address in $8000-$FFFF to (is_rom, bank, offset).
    ///
    /// Bank registers carry the ROM select in bit 7; slots resolved to RAM
    /// index into the banked PRG-RAM instead. $5117 (the top slot) is
    /// always ROM.
    fn resolve_prg(&self, address: u16) -> (bool, usize, usize) {
        let offset_8k = (address & 0x1FFF) as usize;
        let slot = ((address - 0x8000) / 0x2000) as usize; // 0-3

        let pick = |reg: u8, forced_rom: bool| -> (bool, usize) {
            let rom = forced_rom || reg & 0x80 != 0;
            (rom, (reg & 0x7F) as usize)
        };

        match self.prg_mode {
            // One 32KB bank from $5117
            0 => {
                let (_, bank) = pick(self.prg_banks[4], true);
                (true, (bank & !3) + slot, offset_8k)
            }
            // Two 16KB banks from $5115/$5117
            1 => {
                if slot < 2 {
                    let (rom, bank) = pick(self.prg_banks[2], false);
                    (rom, (bank & !1) + slot, offset_8k)
                } else {
                    let (_, bank) = pick(self.prg_banks[4], true);
                    (true, (bank & !1) + (slot - 2), offset_8k)
                }
            }
            // 16KB + 8KB + 8KB
            2 => match slot {
                0 | 1 => {
                    let (rom, bank) = pick(self.prg_banks[2], false);
                    (rom, (bank & !1) + slot, offset_8k)
                }
                2 => {
                    let (rom, bank) = pick(self.prg_banks[3], false);
                    (rom, bank, offset_8k)
                }
                _ => {
                    let (_, bank) = pick(self.prg_banks[4], true);
                    (true, bank, offset_8k)
                }
            },
            // Four 8KB banks
            _ => {
                let reg = match slot {
                    0 => self.prg_banks[1],
                    1 => self.prg_banks[2],
                    2 => self.prg_banks[3],
                    _ => self.prg_banks[4],
                };
                let (rom, bank) = pick(reg, slot == 3);
                (rom, bank, offset_8k)
            }
        }
    }

    fn prg_read(&self, address: u16) -> u8 {
        let (rom, bank, offset) = self.resolve_prg(address);
        if rom {
            self.prg_rom[(bank % self.rom_slots()) * PRG_SLOT_SIZE + offset]
        } else {
            self.prg_ram[(bank * PRG_SLOT_SIZE + offset) % PRG_RAM_SIZE]
        }
    }

    /// Map a PPU pattern address through the active CHR set.
    fn map_chr_address(&self, address: u16) -> usize {
        // Bank granularity from the CHR mode: 8K, 4K, 2K or 1K
        let shift = match self.chr_mode {
            0 => 13,
            1 => 12,
            2 => 11,
            _ => 10,
        };
        let bank_span = 1usize << shift;
        let region = (address as usize) >> shift;

        let bank = if self.chr_bg_last {
            // Background registers cover 4KB and repeat over both pattern
            // halves
            let idx = match self.chr_mode {
                0 | 1 => 3,
                2 => (region & 1) * 2 + 1,
                _ => region & 3,
            };
            self.chr_background[idx] as usize
        } else {
            let idx = match self.chr_mode {
                0 => 7,
                1 => region * 4 + 3,
                2 => region * 2 + 1,
                _ => region,
            };
            self.chr_sprite[idx.min(7)] as usize
        };

        let banks = (self.chr_mem.len() / bank_span).max(1);
        (bank % banks) * bank_span + (address as usize & (bank_span - 1))
    }

    /// Source selector for one nametable (0-3)
    fn nt_source(&self, table: u16) -> u8 {
        (self.nt_mapping >> (table * 2)) & 0x03
    }
}

impl Mapper for Mapper5 {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x5204 => {
                // Status: bit 7 pending, bit 6 in-frame; the read
                // acknowledges the IRQ line
                let status =
                    ((self.irq_pending.get() as u8) << 7) | ((self.in_frame as u8) << 6);
                self.irq_pending.set(false);
                status
            }
            0x5205 => (self.mul_a as u16 * self.mul_b as u16) as u8,
            0x5206 => ((self.mul_a as u16 * self.mul_b as u16) >> 8) as u8,
            0x5C00..=0x5FFF => {
                if self.exram_mode >= 2 {
                    self.exram[(address - 0x5C00) as usize]
                } else {
                    0
                }
            }
            0x6000..=0x7FFF => {
                let bank = (self.prg_banks[0] & 0x0F) as usize;
                self.prg_ram[(bank * PRG_SLOT_SIZE + (address - 0x6000) as usize) % PRG_RAM_SIZE]
            }
            0x8000..=0xFFFF => self.prg_read(address),
            _ => 0,
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        match address {
            0x5100 => self.prg_mode = value & 0x03,
            0x5101 => self.chr_mode = value & 0x03,
            0x5104 => self.exram_mode = value & 0x03,
            0x5105 => self.nt_mapping = value,
            0x5106 => self.fill_tile = value,
            0x5107 => self.fill_attr = value & 0x03,
            0x5113..=0x5117 => {
                self.prg_banks[(address - 0x5113) as usize] = value;
            }
            0x5120..=0x5127 => {
                self.chr_sprite[(address - 0x5120) as usize] = value;
                self.chr_bg_last = false;
            }
            0x5128..=0x512B => {
                self.chr_background[(address - 0x5128) as usize] = value;
                self.chr_bg_last = true;
            }
            0x5203 => self.irq_compare = value,
            0x5204 => self.irq_enabled = value & 0x80 != 0,
            0x5205 => self.mul_a = value,
            0x5206 => self.mul_b = value,
            0x5C00..=0x5FFF => {
                // Mode 3 is read-only; modes 0/1 are nametable storage but
                // CPU writes are still accepted outside rendering
                if self.exram_mode != 3 {
                    self.exram[(address - 0x5C00) as usize] = value;
                }
            }
            0x6000..=0x7FFF => {
                let bank = (self.prg_banks[0] & 0x0F) as usize;
                let index = (bank * PRG_SLOT_SIZE + (address - 0x6000) as usize) % PRG_RAM_SIZE;
                self.prg_ram[index] = value;
            }
            0x8000..=0xFFFF => {
                // RAM-mapped slots are writable
                let (rom, bank, offset) = self.resolve_prg(address);
                if !rom {
                    self.prg_ram[(bank * PRG_SLOT_SIZE + offset) % PRG_RAM_SIZE] = value;
                }
            }
            _ => {}
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => {
                let index = self.map_chr_address(address);
                self.chr_mem[index % self.chr_mem.len()]
            }
            _ => 0,
        }
    }

    fn ppu_write(&mut self, address: u16, value: u8) {
        if self.chr_is_ram {
            if let 0x0000..=0x1FFF = address {
                let len = self.chr_mem.len();
                let index = self.map_chr_address(address);
                self.chr_mem[index % len] = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        // Best-effort translation of the common $5105 values; exact layout
        // comes from nametable_map
        match self.nt_mapping {
            0x50 => Mirroring::Horizontal,
            0x44 => Mirroring::Vertical,
            0x00 => Mirroring::SingleScreenA,
            0x55 => Mirroring::SingleScreenB,
            _ => Mirroring::FourScreen,
        }
    }

    fn irq_asserted(&self) -> bool {
        self.irq_pending.get()
    }

    fn irq_clear(&mut self) {
        self.irq_pending.set(false);
    }

    fn scanline_tick(&mut self, scanline: i16, rendering: bool) {
        self.in_frame = rendering && (0..240).contains(&scanline);
        if !self.in_frame {
            return;
        }
        if scanline as u8 == self.irq_compare && self.irq_compare != 0 && self.irq_enabled {
            self.irq_pending.set(true);
        }
    }

    fn nametable_map(&self) -> Option<[u8; 4]> {
        Some([
            self.nt_source(0),
            self.nt_source(1),
            self.nt_source(2),
            self.nt_source(3),
        ])
    }

    fn nametable_read(&self, table: u16, offset: u16) -> u8 {
        match self.nt_source(table) {
            // ExRAM as nametable storage, only legal in modes 0/1
            2 => {
                if self.exram_mode <= 1 {
                    self.exram[offset as usize % EXRAM_SIZE]
                } else {
                    0
                }
            }
            // Fill mode
            3 => {
                if offset >= 0x3C0 {
                    // Attribute quadrants replicated from the fill attribute
                    let a = self.fill_attr;
                    a | (a << 2) | (a << 4) | (a << 6)
                } else {
                    self.fill_tile
                }
            }
            _ => 0,
        }
    }

    fn nametable_write(&mut self, table: u16, offset: u16, value: u8) {
        if self.nt_source(table) == 2 && self.exram_mode <= 1 {
            self.exram[offset as usize % EXRAM_SIZE] = value;
        }
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }

    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.prg_ram)
    }
}
