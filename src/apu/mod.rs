// APU module - 2A03 Audio Processing Unit
//
// Five channels (two pulse, triangle, noise, DMC) driven by a frame
// sequencer, mixed through the console's nonlinear network. `tick()` runs
// once per CPU cycle. The DMC cannot touch the bus itself; it publishes a
// fetch request that the scheduler services, charging the CPU a 4-cycle
// stall per byte.
//
// ## Register map
//
// | Address       | Channel           |
// |---------------|-------------------|
// | $4000-$4003   | Pulse 1           |
// | $4004-$4007   | Pulse 2           |
// | $4008-$400B   | Triangle          |
// | $400C-$400F   | Noise             |
// | $4010-$4013   | DMC               |
// | $4015         | Status (R/W)      |
// | $4017         | Frame counter (W) |

pub mod channels;
pub mod components;
pub mod constants;

use crate::audio::Mixer;
use channels::{DmcChannel, NoiseChannel, PulseChannel, TriangleChannel};
use components::{FrameCounter, FrameEvent};

/// The APU state
pub struct Apu {
    pulse1: PulseChannel,
    pulse2: PulseChannel,
    triangle: TriangleChannel,
    noise: NoiseChannel,
    dmc: DmcChannel,
    frame_counter: FrameCounter,

    /// CPU cycles elapsed; drives the half-rate timer clocks and the
    /// $4017 write-delay parity
    cycles: u64,

    mixer: Mixer,
}

impl Apu {
    pub fn new() -> Self {
        Apu {
            pulse1: PulseChannel::new(1),
            pulse2: PulseChannel::new(2),
            triangle: TriangleChannel::new(),
            noise: NoiseChannel::new(),
            dmc: DmcChannel::new(),
            frame_counter: FrameCounter::new(),
            cycles: 0,
            mixer: Mixer::new(),
        }
    }

    /// Reset to power-on state; the mixer (and its host sample rate)
    /// survives.
    pub fn reset(&mut self) {
        self.pulse1 = PulseChannel::new(1);
        self.pulse2 = PulseChannel::new(2);
        self.triangle = TriangleChannel::new();
        self.noise = NoiseChannel::new();
        self.dmc = DmcChannel::new();
        self.frame_counter.reset();
        self.cycles = 0;
    }

    /// Configure the output filters for the host device rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.mixer.set_sample_rate(sample_rate);
    }

    /// Advance one CPU cycle.
    pub fn tick(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);

        for event in self.frame_counter.clock() {
            match event {
                FrameEvent::QuarterFrame => self.clock_quarter_frame(),
                FrameEvent::HalfFrame => self.clock_half_frame(),
                FrameEvent::SetIrq => {}
            }
        }

        // Pulse timers run at half the CPU rate; the rest count CPU cycles
        if self.cycles % 2 == 0 {
            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
        }
        self.triangle.clock_timer();
        self.noise.clock_timer();
        self.dmc.clock_timer();
    }

    /// Quarter frame: envelopes and the triangle linear counter.
    fn clock_quarter_frame(&mut self) {
        self.pulse1.clock_envelope();
        self.pulse2.clock_envelope();
        self.noise.clock_envelope();
        self.triangle.clock_linear_counter();
    }

    /// Half frame: length counters and sweep units.
    fn clock_half_frame(&mut self) {
        self.pulse1.clock_length_counter();
        self.pulse1.clock_sweep();
        self.pulse2.clock_length_counter();
        self.pulse2.clock_sweep();
        self.triangle.clock_length_counter();
        self.noise.clock_length_counter();
    }

    // ========================================
    // Register interface
    // ========================================

    /// Read an APU register; only $4015 is wired.
    pub fn read_register(&mut self, addr: u16) -> u8 {
        match addr {
            0x4015 => {
                let mut status = 0u8;
                if self.pulse1.length_counter.is_active() {
                    status |= 0x01;
                }
                if self.pulse2.length_counter.is_active() {
                    status |= 0x02;
                }
                if self.triangle.length_counter.is_active() {
                    status |= 0x04;
                }
                if self.noise.length_counter.is_active() {
                    status |= 0x08;
                }
                if self.dmc.is_active() {
                    status |= 0x10;
                }
                if self.frame_counter.irq_pending() {
                    status |= 0x40;
                }
                if self.dmc.irq_pending() {
                    status |= 0x80;
                }

                // Reading acknowledges the frame IRQ, not the DMC IRQ
                self.frame_counter.clear_irq();
                status
            }
            _ => 0,
        }
    }

    /// Write an APU register.
    pub fn write_register(&mut self, addr: u16, data: u8) {
        match addr {
            0x4000 => self.pulse1.write_register_0(data),
            0x4001 => self.pulse1.write_register_1(data),
            0x4002 => self.pulse1.write_register_2(data),
            0x4003 => self.pulse1.write_register_3(data),
            0x4004 => self.pulse2.write_register_0(data),
            0x4005 => self.pulse2.write_register_1(data),
            0x4006 => self.pulse2.write_register_2(data),
            0x4007 => self.pulse2.write_register_3(data),
            0x4008 => self.triangle.write_register_0(data),
            0x400A => self.triangle.write_register_2(data),
            0x400B => self.triangle.write_register_3(data),
            0x400C => self.noise.write_register_0(data),
            0x400E => self.noise.write_register_2(data),
            0x400F => self.noise.write_register_3(data),
            0x4010 => self.dmc.write_register_0(data),
            0x4011 => self.dmc.write_register_1(data),
            0x4012 => self.dmc.write_register_2(data),
            0x4013 => self.dmc.write_register_3(data),
            0x4015 => {
                self.pulse1.set_enabled(data & 0x01 != 0);
                self.pulse2.set_enabled(data & 0x02 != 0);
                self.triangle.set_enabled(data & 0x04 != 0);
                self.noise.set_enabled(data & 0x08 != 0);
                self.dmc.set_enabled(data & 0x10 != 0);
                self.dmc.clear_irq();
            }
            0x4017 => {
                self.frame_counter
                    .write_control(data, self.cycles % 2 == 0);
            }
            _ => {}
        }
    }

    // ========================================
    // Scheduler interface
    // ========================================

    /// Level of the combined IRQ line (frame IRQ or DMC IRQ).
    pub fn irq_pending(&self) -> bool {
        self.frame_counter.irq_pending() || self.dmc.irq_pending()
    }

    /// Address the DMC wants read, when its buffer ran dry.
    pub fn dmc_pending_fetch(&self) -> Option<u16> {
        self.dmc.pending_fetch()
    }

    /// Hand the DMC its fetched byte. The caller stalls the CPU 4 cycles.
    pub fn dmc_supply_sample(&mut self, data: u8) {
        self.dmc.supply_sample(data);
    }

    /// One mixed, filtered output sample for the host stream.
    pub fn output_sample(&mut self) -> f32 {
        self.mixer.mix(
            self.pulse1.output(),
            self.pulse2.output(),
            self.triangle.output(),
            self.noise.output(),
            self.dmc.output(),
        )
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
