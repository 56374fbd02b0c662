// CPU-rate to host-rate decimation
//
// A fractional accumulator advances by one per CPU cycle; every time it
// crosses the cycles-per-sample ratio, one output sample is due. The
// emulator then asks the APU for a (filtered) sample, so no intermediate
// CPU-rate buffer exists.

use super::CPU_CLOCK_HZ;

/// Fractional-accumulator downsampler
pub struct Resampler {
    /// CPU cycles per host sample
    ratio: f64,
    accumulator: f64,
}

impl Resampler {
    pub fn new(sample_rate: f64) -> Self {
        Resampler {
            ratio: CPU_CLOCK_HZ / sample_rate,
            accumulator: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.ratio = CPU_CLOCK_HZ / sample_rate;
        self.accumulator = 0.0;
    }

    /// Advance one CPU cycle; true when an output sample is due.
    #[inline]
    pub fn step(&mut self) -> bool {
        self.accumulator += 1.0;
        if self.accumulator >= self.ratio {
            self.accumulator -= self.ratio;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
