// The 2A03 output network
//
// Channel levels combine nonlinearly; the canonical formulas
//
// ```text
// pulse_out = 95.88 / (8128 / (pulse1 + pulse2) + 100)
// tnd_out   = 159.79 / (1 / (tri/8227 + noise/12241 + dmc/22638) + 100)
// ```
//
// are precomputed into the standard 31-entry pulse table and 203-entry
// triangle/noise/DMC table. The analog path behind the mixer is modeled
// with a ~12 kHz one-pole low-pass and a ~90 Hz one-pole high-pass,
// followed by a soft clip.

use std::f32::consts::PI;

/// Low-pass cutoff of the console's output stage
const LOW_PASS_HZ: f32 = 12_000.0;

/// High-pass cutoff (AC coupling)
const HIGH_PASS_HZ: f32 = 90.0;

/// One-pole low-pass filter
#[derive(Debug, Clone, Copy, Default)]
struct LowPass {
    alpha: f32,
    state: f32,
}

impl LowPass {
    fn configure(&mut self, cutoff: f32, sample_rate: f32) {
        let rc = 1.0 / (2.0 * PI * cutoff);
        let dt = 1.0 / sample_rate;
        self.alpha = dt / (rc + dt);
    }

    fn apply(&mut self, input: f32) -> f32 {
        self.state += self.alpha * (input - self.state);
        self.state
    }
}

/// One-pole high-pass filter
#[derive(Debug, Clone, Copy, Default)]
struct HighPass {
    alpha: f32,
    prev_input: f32,
    state: f32,
}

impl HighPass {
    fn configure(&mut self, cutoff: f32, sample_rate: f32) {
        let rc = 1.0 / (2.0 * PI * cutoff);
        let dt = 1.0 / sample_rate;
        self.alpha = rc / (rc + dt);
    }

    fn apply(&mut self, input: f32) -> f32 {
        self.state = self.alpha * (self.state + input - self.prev_input);
        self.prev_input = input;
        self.state
    }
}

/// Nonlinear mixer with output filtering
pub struct Mixer {
    /// pulse_table[p1 + p2]
    pulse_table: [f32; 31],
    /// tnd_table[3*triangle + 2*noise + dmc]
    tnd_table: [f32; 203],
    low_pass: LowPass,
    high_pass: HighPass,
    volume: f32,
}

impl Mixer {
    pub fn new() -> Self {
        let mut pulse_table = [0.0f32; 31];
        for (n, entry) in pulse_table.iter_mut().enumerate().skip(1) {
            *entry = 95.52 / (8128.0 / n as f32 + 100.0);
        }

        let mut tnd_table = [0.0f32; 203];
        for (n, entry) in tnd_table.iter_mut().enumerate().skip(1) {
            *entry = 163.67 / (24329.0 / n as f32 + 100.0);
        }

        let mut mixer = Mixer {
            pulse_table,
            tnd_table,
            low_pass: LowPass::default(),
            high_pass: HighPass::default(),
            volume: 1.0,
        };
        mixer.set_sample_rate(44_100.0);
        mixer
    }

    /// Reconfigure the filters for the host sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        let rate = sample_rate as f32;
        self.low_pass.configure(LOW_PASS_HZ.min(rate * 0.45), rate);
        self.high_pass.configure(HIGH_PASS_HZ, rate);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mix one sample from the raw channel levels.
    pub fn mix(&mut self, pulse1: u8, pulse2: u8, triangle: u8, noise: u8, dmc: u8) -> f32 {
        let pulse_index = (pulse1 + pulse2) as usize;
        let tnd_index = 3 * triangle as usize + 2 * noise as usize + dmc as usize;

        let raw = self.pulse_table[pulse_index.min(30)] + self.tnd_table[tnd_index.min(202)];

        let filtered = self.high_pass.apply(self.low_pass.apply(raw));
        soft_clip(filtered * 2.0 * self.volume)
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Gentle saturation instead of hard clamping.
fn soft_clip(x: f32) -> f32 {
    x.tanh()
}
