//! # Display Frame Buffer
//!
//! The single persistent presentation raster and the compositor that owns it.
//!
//! ## Philosophy
//!
//! This is NOT a window system. There is one buffer, allocated once at
//! startup, and one way to change it: a full redraw.
//!
//! ## Design Principles
//!
//! 1. **Full-frame redraw**: Damage is recorded but the whole frame is rebuilt
//! 2. **Deferred service**: A redraw requested mid-step is serviced once the step returns
//! 3. **Deterministic**: Same display tree → bit-identical buffer (checked by CRC-32)
//! 4. **No readers mid-redraw**: The buffer is only presented once marked ready

pub mod compositor;

pub use compositor::Compositor;

use hal::{Framebuffer, FramebufferInfo, PixelFormat};

/// Heap-backed frame buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFramebuffer {
    info: FramebufferInfo,
    pixels: Vec<u8>,
}

impl MemoryFramebuffer {
    /// Allocates a zeroed (black) buffer
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let info = FramebufferInfo::packed(width, height, format);
        Self {
            info,
            pixels: vec![0; info.buffer_size()],
        }
    }
}

impl Framebuffer for MemoryFramebuffer {
    fn info(&self) -> FramebufferInfo {
        self.info
    }

    fn buffer(&self) -> &[u8] {
        &self.pixels
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}
