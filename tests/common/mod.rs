// Shared helpers for the integration tests: tiny in-memory iNES images

#![allow(dead_code)]

/// Route core log output through the test harness (idempotent).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Options for building a test image
pub struct RomBuilder {
    prg_units: u8,
    chr_units: u8,
    mapper: u16,
    flags6: u8,
    program: Vec<u8>,
    program_offset: usize,
    patches: Vec<(usize, u8)>,
}

impl RomBuilder {
    pub fn new() -> Self {
        RomBuilder {
            prg_units: 1,
            chr_units: 1,
            mapper: 0,
            flags6: 0,
            program: Vec::new(),
            program_offset: 0,
            patches: Vec::new(),
        }
    }

    pub fn mapper(mut self, mapper: u16) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn prg_units(mut self, units: u8) -> Self {
        self.prg_units = units;
        self
    }

    pub fn battery(mut self) -> Self {
        self.flags6 |= 0x02;
        self
    }

    /// Place the program at a PRG offset (CPU address $8000 + offset for
    /// a 16KB image).
    pub fn program_at(mut self, offset: usize, program: &[u8]) -> Self {
        self.program = program.to_vec();
        self.program_offset = offset;
        self
    }

    pub fn program(self, program: &[u8]) -> Self {
        self.program_at(0, program)
    }

    /// Patch one PRG byte (offset relative to the PRG start).
    pub fn patch_prg(mut self, offset: usize, value: u8) -> Self {
        self.patches.push((offset, value));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let prg_size = self.prg_units as usize * 16 * 1024;
        let mut prg = vec![0u8; prg_size];
        prg[self.program_offset..self.program_offset + self.program.len()]
            .copy_from_slice(&self.program);

        // Reset vector -> $8000 + program offset
        let entry = 0x8000u16 + self.program_offset as u16;
        prg[prg_size - 4] = (entry & 0xFF) as u8;
        prg[prg_size - 3] = (entry >> 8) as u8;

        for (offset, value) in self.patches {
            prg[offset] = value;
        }

        let mut rom = vec![0u8; 16];
        rom[0..4].copy_from_slice(b"NES\x1A");
        rom[4] = self.prg_units;
        rom[5] = self.chr_units;
        rom[6] = self.flags6 | (((self.mapper & 0x0F) as u8) << 4);
        rom[7] = (self.mapper & 0xF0) as u8;
        rom.extend(prg);
        rom.extend(vec![0u8; self.chr_units as usize * 8 * 1024]);
        rom
    }
}

impl Default for RomBuilder {
    fn default() -> Self {
        Self::new()
    }
}
