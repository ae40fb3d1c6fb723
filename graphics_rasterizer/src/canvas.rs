//! Drawing targets
//!
//! [`PixelSink`] is what the shape rasterizer writes to. Both owned rasters
//! and the frame buffer (through [`Canvas`]) implement it.

use crate::color::Color;
use crate::geometry::Rect;
use crate::raster::Raster;
use hal::{Framebuffer, FramebufferInfo};

/// Anything pixels can be blended into
pub trait PixelSink {
    /// Writable area; pixels outside are dropped
    fn bounds(&self) -> Rect;

    /// Blends one pixel (source-over); out-of-bounds writes are ignored
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Blends the half-open span `[x0, x1)` on row `y`, clipped to [`bounds`]
    ///
    /// [`bounds`]: PixelSink::bounds
    fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        let bounds = self.bounds();
        if y < bounds.y || y >= bounds.bottom() {
            return;
        }
        for x in x0.max(bounds.x)..x1.min(bounds.right()) {
            self.blend_pixel(x, y, color);
        }
    }
}

/// Clipped view of the frame buffer used during a redraw
pub struct Canvas<'a> {
    framebuffer: &'a mut dyn Framebuffer,
    info: FramebufferInfo,
    clip: Rect,
}

impl<'a> Canvas<'a> {
    pub fn new(framebuffer: &'a mut dyn Framebuffer) -> Self {
        let info = framebuffer.info();
        let clip = Rect::sized(info.width as u32, info.height as u32);
        Self {
            framebuffer,
            info,
            clip,
        }
    }

    /// Full frame area
    pub fn frame(&self) -> Rect {
        Rect::sized(self.info.width as u32, self.info.height as u32)
    }

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Restricts drawing to `clip` (within the frame); returns the previous clip
    pub fn set_clip(&mut self, clip: Rect) -> Rect {
        let previous = self.clip;
        self.clip = clip.intersect(&self.frame());
        previous
    }

    pub fn reset_clip(&mut self) {
        self.clip = self.frame();
    }

    /// Overwrites the clip area with an opaque color
    pub fn clear(&mut self, color: Color) {
        let bytes = self.info.format.encode(color.r, color.g, color.b);
        let clip = self.clip;
        let buffer = self.framebuffer.buffer_mut();
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                let offset = self.info.offset(x as usize, y as usize);
                if offset + 4 <= buffer.len() {
                    buffer[offset..offset + 4].copy_from_slice(&bytes);
                }
            }
        }
    }

    /// Reads back a pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.frame().contains(x, y) {
            return None;
        }
        let offset = self.info.offset(x as usize, y as usize);
        let buffer = self.framebuffer.buffer();
        let bytes: [u8; 4] = buffer.get(offset..offset + 4)?.try_into().ok()?;
        let (r, g, b) = self.info.format.decode(bytes);
        Some(Color::rgb(r, g, b))
    }

    /// Composites a raster with its top-left at (x, y)
    pub fn blit(&mut self, raster: &Raster, x: i32, y: i32) {
        self.blit_region(raster, Rect::sized(raster.width(), raster.height()), x, y);
    }

    /// Composites the `src` part of a raster with its top-left at (x, y)
    pub fn blit_region(&mut self, raster: &Raster, src: Rect, x: i32, y: i32) {
        let src = src.intersect(&Rect::sized(raster.width(), raster.height()));
        let dest = Rect::new(x, y, src.width, src.height).intersect(&self.clip);
        for dy in dest.y..dest.bottom() {
            for dx in dest.x..dest.right() {
                let sx = (i64::from(src.x) + i64::from(dx) - i64::from(x)) as u32;
                let sy = (i64::from(src.y) + i64::from(dy) - i64::from(y)) as u32;
                if let Some(color) = raster.get(sx, sy) {
                    self.blend_pixel(dx, dy, color);
                }
            }
        }
    }

    /// Stretches a raster to cover `dest` (nearest-neighbour sampling)
    pub fn blit_scaled(&mut self, raster: &Raster, dest: Rect) {
        if raster.is_empty() || dest.is_empty() {
            return;
        }
        let visible = dest.intersect(&self.clip);
        let (sw, sh) = (u64::from(raster.width()), u64::from(raster.height()));
        let (dw, dh) = (u64::from(dest.width), u64::from(dest.height));
        for dy in visible.y..visible.bottom() {
            let sy = ((i64::from(dy) - i64::from(dest.y)) as u64 * sh / dh) as u32;
            for dx in visible.x..visible.right() {
                let sx = ((i64::from(dx) - i64::from(dest.x)) as u64 * sw / dw) as u32;
                if let Some(color) = raster.get(sx, sy) {
                    self.blend_pixel(dx, dy, color);
                }
            }
        }
    }
}

impl PixelSink for Canvas<'_> {
    fn bounds(&self) -> Rect {
        self.clip
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.is_transparent() || !self.clip.contains(x, y) {
            return;
        }
        let offset = self.info.offset(x as usize, y as usize);
        let format = self.info.format;
        let buffer = self.framebuffer.buffer_mut();
        let Some(slot) = buffer.get_mut(offset..offset + 4) else {
            return;
        };
        let (r, g, b) = if color.is_opaque() {
            (color.r, color.g, color.b)
        } else {
            let dst = format.decode([slot[0], slot[1], slot[2], slot[3]]);
            color.over_opaque(dst)
        };
        slot.copy_from_slice(&format.encode(r, g, b));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use hal::{Framebuffer, FramebufferInfo, PixelFormat};

    /// Minimal in-memory frame buffer for rasterizer tests
    pub struct TestFramebuffer {
        pub info: FramebufferInfo,
        pub bytes: Vec<u8>,
    }

    impl TestFramebuffer {
        pub fn new(width: usize, height: usize) -> Self {
            let info = FramebufferInfo::packed(width, height, PixelFormat::Rgb32);
            Self {
                info,
                bytes: vec![0; info.buffer_size()],
            }
        }
    }

    impl Framebuffer for TestFramebuffer {
        fn info(&self) -> FramebufferInfo {
            self.info
        }

        fn buffer(&self) -> &[u8] {
            &self.bytes
        }

        fn buffer_mut(&mut self) -> &mut [u8] {
            &mut self.bytes
        }
    }
}
