// famicore - a cycle-accurate NES emulation core
//
// The crate models the console's three clock domains in lockstep: the
// 2A03 CPU, the 2C02 PPU at three dots per CPU cycle, and the APU in the
// CPU domain. `emulator::Emulator` is the assembled machine; the other
// modules are its parts and are usable on their own for tests and tools.

pub mod apu;
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;

pub use apu::Apu;
pub use audio::{Mixer, Resampler};
pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, MapperError, Mirroring};
pub use cpu::Cpu;
pub use display::{DoubleBuffer, FrameBuffer, NES_PALETTE};
pub use emulator::{Battery, Emulator, EmulatorConfig, LoadError, Runner, RunnerError};
pub use input::{Controller, ControllerIO};
pub use ppu::Ppu;

#[cfg(feature = "audio")]
pub use audio::{AudioError, AudioOutput};
