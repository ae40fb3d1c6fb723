//! Colors with straight (non-premultiplied) alpha

use serde::{Deserialize, Serialize};

/// RGBA color, straight alpha, 255 = opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Builds a color from broadcast form, where the fourth channel is transparency
    pub const fn with_transparency(r: u8, g: u8, b: u8, transparency: u8) -> Self {
        Self::rgba(r, g, b, 255 - transparency)
    }

    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Blends this color over an opaque destination
    pub fn over_opaque(self, dst: (u8, u8, u8)) -> (u8, u8, u8) {
        match self.a {
            0 => dst,
            255 => (self.r, self.g, self.b),
            a => (
                mix(self.r, dst.0, a),
                mix(self.g, dst.1, a),
                mix(self.b, dst.2, a),
            ),
        }
    }

    /// Source-over composition onto a possibly translucent destination
    pub fn over(self, dst: Color) -> Color {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = u32::from(self.a);
        let da = u32::from(dst.a) * (255 - sa) / 255;
        let out_a = sa + da;
        let channel = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * da + out_a / 2) / out_a) as u8;
        Color::rgba(
            channel(self.r, dst.r),
            channel(self.g, dst.g),
            channel(self.b, dst.b),
            out_a as u8,
        )
    }
}

fn mix(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}
