//! Owned RGBA pixel grids
//!
//! Surfaces that keep pixels between draws (text runs, decoded stills) hold
//! a `Raster`. It is never the frame buffer itself.

use crate::canvas::PixelSink;
use crate::color::Color;
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Raster {
    /// Creates a fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wraps tightly packed RGBA8 bytes; `None` if the length does not match
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Overwrites every pixel
    pub fn fill(&mut self, color: Color) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Returns true if every pixel is opaque (an empty raster is not)
    pub fn is_fully_opaque(&self) -> bool {
        !self.pixels.is_empty() && self.pixels.iter().all(Color::is_opaque)
    }

    /// Returns true if every pixel is fully transparent
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.iter().all(Color::is_transparent)
    }
}

impl PixelSink for Raster {
    fn bounds(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || color.is_transparent() {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if let Some(dst) = self.get(x, y) {
            self.set(x, y, color.over(dst));
        }
    }
}
