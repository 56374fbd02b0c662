// The emulation thread
//
// The core is single-threaded and built around non-Send cell types, so
// the whole emulator is constructed and driven inside its own thread. The
// host keeps three things: a run flag, a shared controller state, and the
// framebuffer pair. Frame pacing sleeps against absolute monotonic
// deadlines; in turbo mode it never sleeps.

use super::{Emulator, EmulatorConfig, LoadError};
use crate::display::DoubleBuffer;
use crate::input::Controller;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Failures while starting the emulation thread
#[derive(Debug)]
pub enum RunnerError {
    /// ROM rejected during in-thread construction
    Load(LoadError),
    /// The thread died before reporting readiness
    ThreadStartup,
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::Load(e) => write!(f, "{}", e),
            RunnerError::ThreadStartup => write!(f, "emulation thread failed to start"),
        }
    }
}

impl std::error::Error for RunnerError {}

/// Live button state shared between the host and the emulation thread
#[derive(Default)]
struct SharedInput {
    port1: Controller,
    port2: Controller,
}

/// Handle to a running emulation thread
pub struct Runner {
    running: Arc<AtomicBool>,
    input: Arc<Mutex<SharedInput>>,
    frames: DoubleBuffer,
    handle: Option<JoinHandle<()>>,
}

impl Runner {
    /// Load `rom` and start emulating it on a dedicated thread.
    ///
    /// The emulator itself is built inside the thread (its interior
    /// mutability is single-thread only); load errors are reported back
    /// through a startup channel before the loop begins.
    pub fn spawn(rom: Vec<u8>, config: EmulatorConfig) -> Result<Runner, RunnerError> {
        let running = Arc::new(AtomicBool::new(true));
        let input = Arc::new(Mutex::new(SharedInput::default()));
        let frames = DoubleBuffer::new();

        let thread_running = running.clone();
        let thread_input = input.clone();
        let thread_frames = frames.clone();
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = std::thread::Builder::new()
            .name("famicore-emulation".into())
            .spawn(move || {
                emulation_main(
                    rom,
                    config,
                    thread_running,
                    thread_input,
                    thread_frames,
                    ready_tx,
                );
            })
            .map_err(|_| RunnerError::ThreadStartup)?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Runner {
                running,
                input,
                frames,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(RunnerError::Load(e))
            }
            Err(_) => Err(RunnerError::ThreadStartup),
        }
    }

    /// Shared handle to the finished frames.
    pub fn frames(&self) -> DoubleBuffer {
        self.frames.clone()
    }

    /// Update the live controller state.
    pub fn set_controllers(&self, port1: Controller, port2: Controller) {
        if let Ok(mut input) = self.input.lock() {
            input.port1 = port1;
            input.port2 = port2;
        }
    }

    /// Ask the thread to stop at the next frame boundary and wait for it.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Body of the emulation thread.
fn emulation_main(
    rom: Vec<u8>,
    config: EmulatorConfig,
    running: Arc<AtomicBool>,
    input: Arc<Mutex<SharedInput>>,
    frames: DoubleBuffer,
    ready_tx: mpsc::Sender<Result<(), LoadError>>,
) {
    let mut emulator = Emulator::with_frames(frames);
    if let Err(e) = emulator.load_rom_bytes(&rom) {
        let _ = ready_tx.send(Err(e));
        return;
    }

    // Audio is best-effort: a missing device means a silent run, not a
    // failed one
    #[cfg(feature = "audio")]
    let mut audio = if config.audio.enabled {
        match crate::audio::AudioOutput::new() {
            Ok(output) => {
                emulator.set_sample_rate(output.sample_rate() as f64);
                Some(output)
            }
            Err(e) => {
                log::warn!("audio unavailable: {}; continuing without sound", e);
                None
            }
        }
    } else {
        None
    };

    let _ = ready_tx.send(Ok(()));

    let frame_duration = Duration::from_secs_f64(1.0 / config.video.fps);
    let mut deadline = Instant::now() + frame_duration;

    while running.load(Ordering::Acquire) {
        if let Ok(shared) = input.lock() {
            emulator.set_controller1(shared.port1);
            emulator.set_controller2(shared.port2);
        }

        emulator.step_frame();

        #[cfg(feature = "audio")]
        if let Some(output) = &mut audio {
            for sample in emulator.take_audio_samples() {
                output.push_sample(sample);
            }
        }
        #[cfg(not(feature = "audio"))]
        emulator.take_audio_samples();

        if config.video.vsync {
            let now = Instant::now();
            if now < deadline {
                std::thread::sleep(deadline - now);
            }
            deadline += frame_duration;
            // After a long stall, realign instead of sprinting to catch up
            if deadline < Instant::now() {
                deadline = Instant::now() + frame_duration;
            }
        } else {
            deadline = Instant::now() + frame_duration;
        }
    }

    // Battery write-back happens in the emulator's drop
}
