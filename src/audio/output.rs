// Host audio output: cpal stream fed through a lock-free SPSC ring
//
// The emulation thread pushes mono f32 samples; the device callback pops
// them. The producer never blocks (overflow drops samples) and the
// consumer substitutes silence on underrun, so neither side can stall the
// other.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;

/// Ring capacity in seconds of audio
const BUFFER_SECONDS: f32 = 0.1;

/// Failures while opening the host audio device
#[derive(Debug)]
pub enum AudioError {
    /// No default output device exists
    NoDevice,
    /// The default config could not be queried
    NoConfig(String),
    /// Only f32 output streams are supported
    UnsupportedFormat(SampleFormat),
    /// Stream construction or playback failed
    Stream(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no default audio output device"),
            AudioError::NoConfig(e) => write!(f, "no default output config: {}", e),
            AudioError::UnsupportedFormat(fmt) => {
                write!(f, "unsupported sample format {:?}", fmt)
            }
            AudioError::Stream(e) => write!(f, "audio stream error: {}", e),
        }
    }
}

impl std::error::Error for AudioError {}

/// Handle to the running output stream
pub struct AudioOutput {
    producer: ringbuf::HeapProd<f32>,
    sample_rate: u32,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Open the default output device and start playback.
    ///
    /// Callers are expected to treat failure as non-fatal: log it and run
    /// without sound.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::NoConfig(e.to_string()))?;

        if supported.sample_format() != SampleFormat::F32 {
            return Err(AudioError::UnsupportedFormat(supported.sample_format()));
        }

        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;

        let capacity = ((sample_rate as f32 * BUFFER_SECONDS) as usize).max(1);
        let (producer, mut consumer) = HeapRb::<f32>::new(capacity).split();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    for frame in data.chunks_mut(channels) {
                        // Mono source: duplicate across channels, silence
                        // on underrun
                        let sample = consumer.try_pop().unwrap_or(0.0);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                |err| log::warn!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Stream(e.to_string()))?;

        Ok(AudioOutput {
            producer,
            sample_rate,
            _stream: stream,
        })
    }

    /// Push one sample; dropped silently when the ring is full.
    #[inline]
    pub fn push_sample(&mut self, sample: f32) {
        let _ = self.producer.try_push(sample);
    }

    /// The device sample rate the emulator should resample to.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
