// Packed framebuffers and the front/back handoff
//
// `FrameBuffer` is one 256x240 BGRA plane. `DoubleBuffer` owns a pair:
// the producer fills the back plane and tries to swap at the frame
// boundary; if the consumer is mid-read the swap is skipped and the same
// back plane is reused (one dropped frame, never a stall).

use super::palette::palette_to_bgra;
use std::sync::{Arc, Mutex, TryLockError};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;
pub const BYTES_PER_PIXEL: usize = 4;

/// Byte size of one packed plane
const PLANE_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL;

/// One packed BGRA frame
pub struct FrameBuffer {
    pixels: Box<[u8]>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        let mut fb = FrameBuffer {
            pixels: vec![0u8; PLANE_BYTES].into_boxed_slice(),
        };
        // Alpha is constant; paint it once
        for pixel in fb.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel[3] = 0xFF;
        }
        fb
    }

    /// Convert a plane of palette indices into this buffer.
    pub fn fill_from_indices(&mut self, indices: &[u8]) {
        for (pixel, &index) in self
            .pixels
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(indices.iter())
        {
            pixel.copy_from_slice(&palette_to_bgra(index));
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels[..]
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Front/back pair with a non-blocking swap
///
/// Clones share the same planes, so one handle lives on the emulation
/// thread and another on the presentation thread.
#[derive(Clone)]
pub struct DoubleBuffer {
    inner: Arc<Mutex<Planes>>,
}

struct Planes {
    front: FrameBuffer,
    back: FrameBuffer,
}

impl DoubleBuffer {
    pub fn new() -> Self {
        DoubleBuffer {
            inner: Arc::new(Mutex::new(Planes {
                front: FrameBuffer::new(),
                back: FrameBuffer::new(),
            })),
        }
    }

    /// Producer side: convert the finished index plane into the back
    /// buffer and try to promote it. Returns false when the consumer held
    /// the lock and the frame was dropped.
    pub fn publish(&self, indices: &[u8]) -> bool {
        match self.inner.try_lock() {
            Ok(mut planes) => {
                let planes = &mut *planes;
                planes.back.fill_from_indices(indices);
                std::mem::swap(&mut planes.front, &mut planes.back);
                true
            }
            Err(TryLockError::WouldBlock) => false,
            Err(TryLockError::Poisoned(_)) => false,
        }
    }

    /// Consumer side: read the front buffer under the lock.
    pub fn with_front<R>(&self, reader: impl FnOnce(&[u8]) -> R) -> R {
        let planes = match self.inner.lock() {
            Ok(planes) => planes,
            Err(poisoned) => poisoned.into_inner(),
        };
        reader(planes.front.as_bytes())
    }
}

impl Default for DoubleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
