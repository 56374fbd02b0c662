// Emulator module - the master-cycle scheduler
//
// One `clock()` call is one CPU master cycle: three PPU dots, one APU
// tick, then either a DMA cycle or CPU progress, then interrupt delivery.
// The CPU executes instructions atomically; the scheduler burns their
// cycle cost (plus DMA and DMC stalls) one master cycle at a time, so
// interrupts land exactly at instruction boundaries.

mod battery;
mod config;
mod runner;

pub use battery::Battery;
pub use config::{AudioConfig, BatteryConfig, EmulatorConfig, VideoConfig};
pub use runner::{Runner, RunnerError};

use crate::audio::Resampler;
use crate::bus::Bus;
use crate::cartridge::{create_mapper, Cartridge, INesError, Mapper, MapperError};
use crate::cpu::Cpu;
use crate::display::DoubleBuffer;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Errors surfaced while loading a ROM
#[derive(Debug)]
pub enum LoadError {
    /// The image failed header validation
    InvalidRom(INesError),
    /// The image names a mapper outside the implemented set
    UnsupportedMapper(MapperError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::InvalidRom(e) => write!(f, "invalid ROM: {}", e),
            LoadError::UnsupportedMapper(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<INesError> for LoadError {
    fn from(e: INesError) -> Self {
        LoadError::InvalidRom(e)
    }
}

impl From<MapperError> for LoadError {
    fn from(e: MapperError) -> Self {
        LoadError::UnsupportedMapper(e)
    }
}

/// In-flight OAM DMA transfer
struct OamDma {
    /// Source page (high address byte)
    page: u8,
    /// OAMADDR at trigger time; the destination counts up from here
    oam_start: u8,
    /// Cycles completed so far
    step: u16,
    /// 513 or 514 depending on trigger parity
    total: u16,
    /// Byte latched by the most recent get cycle
    latch: u8,
}

/// The emulator core: CPU + bus + scheduler state
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,

    /// Cycles the CPU side still owes (instruction cost, interrupt entry,
    /// DMC stalls)
    cpu_stall: u32,
    /// Active OAM DMA, if any
    dma: Option<OamDma>,
    /// Master cycle counter; parity decides DMA alignment
    master_cycles: u64,

    resampler: Resampler,
    /// Samples produced since the last drain
    samples: Vec<f32>,

    /// Finished frames, shared with the presentation side
    frames: DoubleBuffer,

    battery: Option<Battery>,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_frames(DoubleBuffer::new())
    }

    /// Build around an existing framebuffer pair (the runner creates the
    /// pair first so the host can hold a handle before the thread starts).
    pub fn with_frames(frames: DoubleBuffer) -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            cpu_stall: 0,
            dma: None,
            master_cycles: 0,
            resampler: Resampler::new(44_100.0),
            samples: Vec::new(),
            frames,
            battery: None,
        }
    }

    /// Load a ROM image from memory and reset into it.
    pub fn load_rom_bytes(&mut self, data: &[u8]) -> Result<(), LoadError> {
        self.unload();

        let cartridge = Cartridge::from_ines_bytes(data)?;
        let battery = if cartridge.has_battery {
            Some(Battery::for_cartridge(&cartridge))
        } else {
            None
        };

        let mapper: Rc<RefCell<Box<dyn Mapper>>> =
            Rc::new(RefCell::new(create_mapper(cartridge)?));

        // Restore battery-backed work RAM before the game boots
        if let Some(battery) = &battery {
            if let Some(ram) = mapper.borrow_mut().prg_ram_mut() {
                battery.load_into(ram);
            }
        }

        self.bus.attach_mapper(mapper);
        self.battery = battery;
        self.reset();
        Ok(())
    }

    /// Load a ROM image from disk.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let cartridge_bytes = std::fs::read(path).map_err(|e| LoadError::InvalidRom(e.into()))?;
        self.load_rom_bytes(&cartridge_bytes)
    }

    /// Detach the cartridge, writing battery RAM back to disk first.
    pub fn unload(&mut self) {
        self.flush_battery();
        self.battery = None;
        self.bus = Bus::new();
        self.cpu = Cpu::new();
        self.cpu_stall = 0;
        self.dma = None;
    }

    /// Write battery RAM out without unloading (also runs on drop).
    pub fn flush_battery(&mut self) {
        if let (Some(battery), Some(mapper)) = (&self.battery, self.bus.mapper()) {
            if let Some(ram) = mapper.borrow().prg_ram() {
                battery.save(ram);
            }
        }
    }

    /// Press the reset button: CPU/PPU/APU restart, cartridge state
    /// survives.
    pub fn reset(&mut self) {
        self.bus.ppu.reset();
        self.bus.apu.reset();
        self.cpu.reset(&mut self.bus);
        self.cpu_stall = 0;
        self.dma = None;
        self.resampler.reset();
    }

    /// Advance one CPU master cycle.
    pub fn clock(&mut self) {
        // Three PPU dots per CPU cycle
        self.bus.ppu.tick();
        self.bus.ppu.tick();
        self.bus.ppu.tick();

        self.bus.apu.tick();

        // Service a DMC fetch: one bus read, four stolen CPU cycles
        if let Some(addr) = self.bus.apu.dmc_pending_fetch() {
            let byte = self.bus.read(addr);
            self.bus.apu.dmc_supply_sample(byte);
            self.cpu_stall += 4;
        }

        if self.resampler.step() {
            let sample = self.bus.apu.output_sample();
            self.samples.push(sample);
        }

        // A latched $4014 write starts the DMA at the next instruction
        // boundary; the activation cycle is the first of the 513/514
        if self.dma.is_none() && self.cpu_stall == 0 {
            if let Some(page) = self.bus.take_dma_request() {
                let total = if self.master_cycles % 2 == 1 { 514 } else { 513 };
                self.dma = Some(OamDma {
                    page,
                    oam_start: self.bus.ppu.oam_addr,
                    step: 0,
                    total,
                    latch: 0,
                });
            }
        }

        if self.dma.is_some() {
            self.dma_cycle();
        } else {
            self.cpu_cycle();
        }

        self.master_cycles = self.master_cycles.wrapping_add(1);
    }

    /// CPU side of one master cycle: at an instruction boundary, deliver
    /// at most one interrupt, then run the next instruction; otherwise
    /// burn one cycle of the current cost.
    fn cpu_cycle(&mut self) {
        if self.cpu_stall == 0 {
            // Priority: NMI edge, then APU IRQ, then mapper IRQ. The
            // level-triggered lines stay asserted until acknowledged, but
            // entry raises I so they deliver once.
            if self.bus.ppu.take_nmi() {
                self.cpu_stall += self.cpu.nmi(&mut self.bus) as u32;
            } else if self.bus.apu.irq_pending() {
                self.cpu_stall += self.cpu.irq(&mut self.bus) as u32;
            } else if self
                .bus
                .mapper()
                .map(|m| m.borrow().irq_asserted())
                .unwrap_or(false)
            {
                self.cpu_stall += self.cpu.irq(&mut self.bus) as u32;
            }

            if self.cpu_stall == 0 {
                self.cpu_stall += self.cpu.step(&mut self.bus) as u32;
            }
        }

        self.cpu_stall = self.cpu_stall.saturating_sub(1);
    }

    /// One cycle of the OAM DMA coprocessor: alignment idles, then
    /// alternating get/put cycles moving 256 bytes into OAM.
    fn dma_cycle(&mut self) {
        let Some(dma) = &mut self.dma else {
            return;
        };

        let idle = dma.total - 512;
        if dma.step >= idle {
            let k = dma.step - idle;
            let index = (k / 2) as u8;
            if k % 2 == 0 {
                // Get cycle
                let addr = ((dma.page as u16) << 8) | index as u16;
                dma.latch = self.bus.read(addr);
            } else {
                // Put cycle
                let dest = dma.oam_start.wrapping_add(index);
                self.bus.ppu.oam_write(dest, dma.latch);
            }
        }

        dma.step += 1;
        if dma.step >= dma.total {
            self.dma = None;
        }
    }

    /// Run master cycles until the PPU finishes the current frame, then
    /// publish it. Returns false when the swap was skipped because the
    /// consumer held the front buffer.
    pub fn step_frame(&mut self) -> bool {
        loop {
            self.clock();
            if self.bus.ppu.take_frame_ready() {
                return self.frames.publish(self.bus.ppu.frame());
            }
        }
    }

    /// Shared handle to the finished-frame pair.
    pub fn frames(&self) -> DoubleBuffer {
        self.frames.clone()
    }

    /// Drain the audio produced since the last call.
    pub fn take_audio_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.samples)
    }

    /// Configure resampler and mixer for the host device rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.resampler.set_sample_rate(sample_rate);
        self.bus.apu.set_sample_rate(sample_rate);
    }

    pub fn set_controller1(&mut self, state: crate::input::Controller) {
        self.bus.controllers.set_controller1(state);
    }

    pub fn set_controller2(&mut self, state: crate::input::Controller) {
        self.bus.controllers.set_controller2(state);
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn master_cycles(&self) -> u64 {
        self.master_cycles
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.flush_battery();
    }
}
