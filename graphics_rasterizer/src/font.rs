//! Font selection and the built-in glyph set
//!
//! Families are resolved with a three-tier fallback: the reference broadcast
//! face, then a secondary face, then a generic sans-serif. All families are
//! rendered from the same scalable 5x7 dot-matrix glyphs; the family name
//! records which face the receiver would have used.

use crate::canvas::PixelSink;
use crate::color::Color;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Last-resort family, always available
pub const GENERIC_SANS: &str = "sans-serif";

/// Reference broadcast face
pub const REFERENCE_FONT: &str = "Tiresias Screenfont";

const GLYPH_COLUMNS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Glyph columns plus one blank spacing column
const CELL_COLUMNS: u32 = GLYPH_COLUMNS + 1;
/// Nominal em in dots; the glyph rows plus one for descenders
const EM_DOTS: f32 = 8.0;
/// Horizontal shear applied per row for italics, in dots
const ITALIC_SLANT: f32 = 0.2;

/// Weight/slant; bold wins when both are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        if bold {
            FontStyle::Bold
        } else if italic {
            FontStyle::Italic
        } else {
            FontStyle::Regular
        }
    }
}

/// A concrete selected font
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    size: u32,
    style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u32, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size: size.max(1),
            style,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    fn dot(&self) -> f32 {
        self.size as f32 / EM_DOTS
    }

    /// Pixel offset of dot boundary `n`
    fn dots(&self, n: f32) -> i32 {
        (n * self.dot()).round() as i32
    }

    /// Horizontal advance of every glyph, spacing column included
    pub fn advance(&self) -> u32 {
        let columns = CELL_COLUMNS + u32::from(self.style == FontStyle::Bold);
        (self.dots(columns as f32) as u32).max(1)
    }

    /// Width of the trailing blank column that tight fitting drops
    pub fn spacing(&self) -> u32 {
        (self.dots(1.0) as u32).min(self.advance() - 1)
    }

    /// Nominal line height before broadcast scaling
    pub fn nominal_height(&self) -> u32 {
        self.size
    }

    /// Tight width of `count` glyphs, saturating at `u32::MAX`
    pub fn run_width(&self, count: usize) -> u32 {
        if count == 0 {
            return 0;
        }
        let width = (count as u64)
            .saturating_mul(u64::from(self.advance()))
            .saturating_sub(u64::from(self.spacing()));
        u32::try_from(width).unwrap_or(u32::MAX)
    }

    /// Rasterizes one glyph with its cell's top-left at `(x, y)`
    pub fn draw_glyph<S: PixelSink + ?Sized>(&self, sink: &mut S, ch: char, x: i32, y: i32, color: Color) {
        let columns = glyph(ch);
        let bold = self.style == FontStyle::Bold;
        let (x, y) = (i64::from(x), i64::from(y));
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..GLYPH_ROWS {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let shear = if self.style == FontStyle::Italic {
                    (GLYPH_ROWS - 1 - row) as f32 * ITALIC_SLANT
                } else {
                    0.0
                };
                let left = col as f32 + shear;
                let x0 = x + i64::from(self.dots(left));
                let x1 = x + i64::from(self.dots(left + 1.0 + if bold { 1.0 } else { 0.0 }));
                let y0 = y + i64::from(self.dots(row as f32));
                let y1 = y + i64::from(self.dots(row as f32 + 1.0));
                let rect = Rect::from_edges(x0, y0, x1.max(x0 + 1), y1.max(y0 + 1))
                    .intersect(&sink.bounds());
                for py in rect.y..rect.bottom() {
                    sink.fill_span(py, rect.x, rect.right(), color);
                }
            }
        }
    }
}

/// Installed families and the fallback order
#[derive(Debug, Clone, PartialEq)]
pub struct FontCatalog {
    reference: String,
    secondary: Option<String>,
    installed: Vec<String>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new(REFERENCE_FONT, None, Vec::new())
    }
}

impl FontCatalog {
    pub fn new(reference: impl Into<String>, secondary: Option<String>, installed: Vec<String>) -> Self {
        Self {
            reference: reference.into(),
            secondary,
            installed,
        }
    }

    pub fn is_installed(&self, family: &str) -> bool {
        self.installed.iter().any(|f| f.eq_ignore_ascii_case(family))
    }

    /// Family chosen by the fallback order
    pub fn family(&self) -> &str {
        if self.is_installed(&self.reference) {
            return &self.reference;
        }
        match &self.secondary {
            Some(secondary) if self.is_installed(secondary) => secondary,
            _ => GENERIC_SANS,
        }
    }

    pub fn select(&self, size: u32, bold: bool, italic: bool) -> Font {
        Font::new(self.family(), size, FontStyle::from_flags(bold, italic))
    }
}

/// Column bitmaps, bit 0 is the top row
fn glyph(ch: char) -> &'static [u8; 5] {
    let code = ch as u32;
    if (0x20..0x7F).contains(&code) {
        &GLYPHS[(code - 0x20) as usize]
    } else {
        &GLYPHS[(u32::from(b'?') - 0x20) as usize]
    }
}

static GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;

    fn installed(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reference_font_preferred() {
        let catalog = FontCatalog::new(
            REFERENCE_FONT,
            Some("DejaVu Sans".to_string()),
            installed(&["DejaVu Sans", "tiresias screenfont"]),
        );
        assert_eq!(catalog.family(), "Tiresias Screenfont");
    }

    #[test]
    fn test_secondary_then_generic() {
        let secondary = Some("DejaVu Sans".to_string());
        let catalog = FontCatalog::new(REFERENCE_FONT, secondary.clone(), installed(&["DejaVu Sans"]));
        assert_eq!(catalog.family(), "DejaVu Sans");

        let catalog = FontCatalog::new(REFERENCE_FONT, secondary, installed(&["Arial"]));
        assert_eq!(catalog.family(), GENERIC_SANS);

        assert_eq!(FontCatalog::default().family(), GENERIC_SANS);
    }

    #[test]
    fn test_bold_wins_over_italic() {
        let font = FontCatalog::default().select(24, true, true);
        assert_eq!(font.style(), FontStyle::Bold);
        assert_eq!(FontStyle::from_flags(false, true), FontStyle::Italic);
        assert_eq!(FontStyle::from_flags(false, false), FontStyle::Regular);
    }

    #[test]
    fn test_metrics_at_em_multiple() {
        let font = Font::new(GENERIC_SANS, 16, FontStyle::Regular);
        assert_eq!(font.advance(), 12);
        assert_eq!(font.spacing(), 2);
        assert_eq!(font.run_width(0), 0);
        assert_eq!(font.run_width(3), 34);

        let bold = Font::new(GENERIC_SANS, 16, FontStyle::Bold);
        assert_eq!(bold.advance(), 14);
    }

    #[test]
    fn test_tiny_font_still_advances() {
        let font = Font::new(GENERIC_SANS, 1, FontStyle::Regular);
        assert_eq!(font.advance(), 1);
        assert_eq!(font.spacing(), 0);
        assert_eq!(font.run_width(4), 4);
    }

    #[test]
    fn test_glyph_draws_inside_cell() {
        let font = Font::new(GENERIC_SANS, 8, FontStyle::Regular);
        let mut raster = Raster::new(6, 8);
        font.draw_glyph(&mut raster, 'I', 0, 0, Color::WHITE);
        // 'I' is a vertical bar in the middle column
        assert_eq!(raster.get(2, 3), Some(Color::WHITE));
        assert_eq!(raster.get(0, 3), Some(Color::TRANSPARENT));
        assert_eq!(raster.get(5, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_unknown_char_uses_question_mark() {
        assert_eq!(glyph('\u{263A}'), glyph('?'));
        assert_eq!(glyph(' '), &[0; 5]);
    }
}
