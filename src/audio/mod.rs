// Audio module - mixing, resampling, and host output
//
// The APU produces channel levels at CPU rate; the mixer folds them
// through the console's nonlinear network and a pair of one-pole filters.
// The resampler decimates to the host device rate, and (behind the
// `audio` feature) `output` feeds a cpal stream through a lock-free ring
// buffer.

mod mixer;
mod resampler;

#[cfg(feature = "audio")]
mod output;

pub use mixer::Mixer;
pub use resampler::Resampler;

#[cfg(feature = "audio")]
pub use output::{AudioError, AudioOutput};

/// NES CPU clock rate (NTSC), the native rate of the sample stream
pub const CPU_CLOCK_HZ: f64 = 1_789_773.0;
