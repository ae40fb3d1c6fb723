//! Text surface
//!
//! Single-line text runs. Broadcast fonts render taller than their nominal
//! point size, so every measured height is scaled by [`TEXT_HEIGHT_FACTOR`]
//! and run positions are divided by it, keeping measure and draw consistent.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::font::{Font, FontCatalog};
use crate::geometry::Rect;
use std::rc::Rc;

/// Rendered line height over nominal point size
pub const TEXT_HEIGHT_FACTOR: f32 = 1.241;

const DEFAULT_SIZE: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    x: i32,
    y: i32,
    text: String,
    color: Color,
    font: Font,
}

/// Laid-out text drawing surface
#[derive(Debug, Clone)]
pub struct TextSurface {
    catalog: Rc<FontCatalog>,
    font: Font,
    size: Option<(u32, u32)>,
    runs: Vec<TextRun>,
}

impl TextSurface {
    pub fn new(catalog: Rc<FontCatalog>) -> Self {
        let font = catalog.select(DEFAULT_SIZE, false, false);
        Self {
            catalog,
            font,
            size: None,
            runs: Vec::new(),
        }
    }

    /// Selects a font through the catalog's fallback order
    pub fn set_font(&mut self, size: u32, bold: bool, italic: bool) {
        self.font = self.catalog.select(size, bold, italic);
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Sets the layout box that runs are clipped to
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Line height after broadcast scaling
    pub fn line_height(&self) -> u32 {
        (self.font.nominal_height() as f32 * TEXT_HEIGHT_FACTOR).ceil() as u32
    }

    /// Measures `text` on one line
    ///
    /// Only the text before the first newline is considered. Returns the
    /// tight bounds of the longest prefix no wider than `max_width`, and the
    /// number of characters in that prefix.
    pub fn get_bounds(&self, text: &str, max_width: u32) -> (Rect, usize) {
        let line = first_line(text);
        let total = line.chars().count();
        let advance = self.font.advance() as usize;
        let spacing = self.font.spacing() as usize;

        let fit = if self.font.run_width(total) <= max_width {
            total
        } else {
            ((max_width as usize).saturating_add(spacing) / advance).min(total)
        };

        let rect = Rect::new(0, 0, self.font.run_width(fit), self.line_height());
        (rect, fit)
    }

    /// Adds a run; `y` is in scaled units and is divided back by the height factor
    pub fn add_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let y = (y as f32 / TEXT_HEIGHT_FACTOR).round() as i32;
        self.runs.push(TextRun {
            x,
            y,
            text: first_line(text).to_string(),
            color,
            font: self.font.clone(),
        });
    }

    /// Resets the surface to fully transparent
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let previous = self
            .size
            .map(|(w, h)| canvas.set_clip(Rect::new(x, y, w, h).intersect(&canvas.clip())));

        let right = canvas.clip().right();
        for run in &self.runs {
            let advance = i32::try_from(run.font.advance()).unwrap_or(i32::MAX);
            let mut pen = x.saturating_add(run.x);
            let top = y.saturating_add(run.y);
            for ch in run.text.chars() {
                if pen >= right {
                    break;
                }
                run.font.draw_glyph(canvas, ch, pen, top, run.color);
                pen = pen.saturating_add(advance);
            }
        }

        if let Some(clip) = previous {
            canvas.set_clip(clip);
        }
    }
}

fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or_default()
}
