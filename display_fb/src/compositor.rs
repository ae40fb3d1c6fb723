//! Redraw contract
//!
//! `request_redraw` only records damage. The host services the request after
//! the engine's step returns: the buffer is cleared to the background, the
//! engine redraws its whole display tree, and the frame is marked ready.

use crate::MemoryFramebuffer;
use graphics_rasterizer::{Canvas, Color, Rect};
use hal::Framebuffer;
use tracing::trace;

/// Owner of the presentation buffer
#[derive(Debug)]
pub struct Compositor<F: Framebuffer = MemoryFramebuffer> {
    framebuffer: F,
    background: Color,
    damage: Option<Rect>,
    ready: bool,
    frames: u64,
}

impl<F: Framebuffer> Compositor<F> {
    pub fn new(framebuffer: F, background: Color) -> Self {
        Self {
            framebuffer,
            background,
            damage: None,
            ready: false,
            frames: 0,
        }
    }

    /// Full presentation area
    pub fn frame(&self) -> Rect {
        let info = self.framebuffer.info();
        Rect::sized(info.width as u32, info.height as u32)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Background is always painted opaque
    pub fn set_background(&mut self, color: Color) {
        self.background = Color::rgb(color.r, color.g, color.b);
    }

    /// Records a redraw request; overlapping requests are unioned
    pub fn request_redraw(&mut self, damage: Rect) {
        let damage = damage.intersect(&self.frame());
        self.damage = Some(match self.damage {
            Some(pending) if !pending.is_empty() => pending.union(&damage),
            _ => damage,
        });
        trace!(damage = ?self.damage, "redraw requested");
    }

    pub fn redraw_pending(&self) -> bool {
        self.damage.is_some()
    }

    /// Damage accumulated since the last redraw
    pub fn pending_damage(&self) -> Option<Rect> {
        self.damage
    }

    /// Clears to the background, runs `draw` over the full frame, marks ready
    ///
    /// Returns the CRC-32 of the finished frame.
    pub fn redraw_with(&mut self, draw: impl FnOnce(&mut Canvas<'_>)) -> u32 {
        let background = self.background;
        {
            let mut canvas = Canvas::new(&mut self.framebuffer);
            canvas.clear(background);
            draw(&mut canvas);
        }
        self.damage = None;
        self.ready = true;
        self.frames += 1;
        let checksum = self.checksum();
        trace!(frame = self.frames, checksum, "redraw complete");
        checksum
    }

    /// Services a pending request, if any
    pub fn service(&mut self, draw: impl FnOnce(&mut Canvas<'_>)) -> Option<u32> {
        if self.redraw_pending() {
            Some(self.redraw_with(draw))
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Hands out a finished frame once; `None` until the next redraw
    pub fn present(&mut self) -> Option<&[u8]> {
        if !self.ready {
            return None;
        }
        self.ready = false;
        Some(self.framebuffer.buffer())
    }

    /// Number of redraws completed
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// CRC-32 of the current buffer contents
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(self.framebuffer.buffer())
    }

    pub fn framebuffer(&self) -> &F {
        &self.framebuffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphics_rasterizer::{DisplayContext, RenderingSurface};
    use hal::PixelFormat;

    fn compositor() -> Compositor {
        Compositor::new(
            MemoryFramebuffer::new(64, 48, PixelFormat::Rgb32),
            Color::rgb(0, 0, 64),
        )
    }

    fn scene() -> Vec<(RenderingSurface, i32, i32)> {
        let display = DisplayContext::default();
        let mut art = display.create_line_art(true, Color::WHITE, Color::rgba(255, 0, 0, 128));
        art.set_size(30, 20);
        art.oval(2, 2, 26, 16);
        let mut text = display.create_text();
        text.set_font(8, false, false);
        text.add_text(0, 0, "Hello", Color::WHITE);
        vec![(art.into(), 4, 4), (text.into(), 10, 30)]
    }

    fn draw_scene(scene: &[(RenderingSurface, i32, i32)], canvas: &mut Canvas<'_>) {
        for (surface, x, y) in scene {
            surface.draw(canvas, *x, *y);
        }
    }

    #[test]
    fn test_request_records_and_unions_damage() {
        let mut comp = compositor();
        assert!(!comp.redraw_pending());
        comp.request_redraw(Rect::new(0, 0, 10, 10));
        comp.request_redraw(Rect::new(20, 20, 5, 5));
        assert_eq!(comp.pending_damage(), Some(Rect::new(0, 0, 25, 25)));
    }

    #[test]
    fn test_damage_clamped_to_frame() {
        let mut comp = compositor();
        comp.request_redraw(Rect::new(-10, -10, 1000, 1000));
        assert_eq!(comp.pending_damage(), Some(Rect::sized(64, 48)));
    }

    #[test]
    fn test_redraw_clears_full_frame_regardless_of_damage() {
        let mut comp = compositor();
        comp.redraw_with(|canvas| canvas.clear(Color::WHITE));
        comp.request_redraw(Rect::new(0, 0, 1, 1));
        comp.service(|_| {});
        let bytes = PixelFormat::Rgb32.encode(0, 0, 64);
        for pixel in comp.framebuffer().buffer().chunks_exact(4) {
            assert_eq!(pixel, bytes);
        }
    }

    #[test]
    fn test_present_once_per_redraw() {
        let mut comp = compositor();
        assert!(comp.present().is_none());
        assert!(comp.service(|_| {}).is_none());

        comp.request_redraw(comp.frame());
        assert!(comp.service(|_| {}).is_some());
        assert!(!comp.redraw_pending());
        assert!(comp.is_ready());
        assert_eq!(comp.present().map(|b| b.len()), Some(64 * 48 * 4));
        assert!(comp.present().is_none());
        assert_eq!(comp.frames(), 1);
    }

    #[test]
    fn test_consecutive_redraws_bit_identical() {
        let mut comp = compositor();
        let scene = scene();
        let first = comp.redraw_with(|canvas| draw_scene(&scene, canvas));
        let first_buffer = comp.framebuffer().buffer().to_vec();
        let second = comp.redraw_with(|canvas| draw_scene(&scene, canvas));
        assert_eq!(first, second);
        assert_eq!(first_buffer, comp.framebuffer().buffer());
        assert_ne!(first, crc32fast::hash(&vec![0; 64 * 48 * 4]));
    }
}
