//! Display context: the surface factory handed to the engine

use crate::bitmap::BitmapSurface;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::font::FontCatalog;
use crate::geometry::Rect;
use crate::line_art::LineArtSurface;
use crate::text::TextSurface;
use std::rc::Rc;

/// Creates fresh, independent rendering surfaces
///
/// Surfaces share nothing mutable with the context or each other. The
/// context never keeps a handle to what it created.
#[derive(Debug, Clone, Default)]
pub struct DisplayContext {
    catalog: Rc<FontCatalog>,
}

impl DisplayContext {
    pub fn new(catalog: FontCatalog) -> Self {
        Self {
            catalog: Rc::new(catalog),
        }
    }

    /// Replaces the font catalog; affects surfaces created afterwards
    pub fn set_catalog(&mut self, catalog: FontCatalog) {
        self.catalog = Rc::new(catalog);
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    pub fn create_line_art(&self, boxed: bool, line_color: Color, fill_color: Color) -> LineArtSurface {
        LineArtSurface::new(boxed, line_color, fill_color)
    }

    pub fn create_text(&self) -> TextSurface {
        TextSurface::new(Rc::clone(&self.catalog))
    }

    pub fn create_bitmap(&self, tiled: bool) -> BitmapSurface {
        BitmapSurface::new(tiled)
    }
}

/// Surface variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    LineArt,
    Text,
    Bitmap,
}

/// Any surface the engine holds
#[derive(Debug, Clone)]
pub enum RenderingSurface {
    LineArt(LineArtSurface),
    Text(TextSurface),
    Bitmap(BitmapSurface),
}

impl RenderingSurface {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            RenderingSurface::LineArt(_) => SurfaceKind::LineArt,
            RenderingSurface::Text(_) => SurfaceKind::Text,
            RenderingSurface::Bitmap(_) => SurfaceKind::Bitmap,
        }
    }

    /// Draws at `(x, y)`; bitmaps fill their natural size using the tiling
    /// mode they were created with
    pub fn draw(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        match self {
            RenderingSurface::LineArt(art) => art.draw(canvas, x, y),
            RenderingSurface::Text(text) => text.draw(canvas, x, y),
            RenderingSurface::Bitmap(bitmap) => {
                let (w, h) = bitmap.size();
                bitmap.draw(canvas, x, y, Rect::sized(w, h), bitmap.is_tiled());
            }
        }
    }

    /// Empties the surface; a bitmap is replaced by an empty one
    pub fn clear(&mut self) {
        match self {
            RenderingSurface::LineArt(art) => art.clear(),
            RenderingSurface::Text(text) => text.clear(),
            RenderingSurface::Bitmap(bitmap) => *bitmap = BitmapSurface::new(bitmap.is_tiled()),
        }
    }
}

impl From<LineArtSurface> for RenderingSurface {
    fn from(surface: LineArtSurface) -> Self {
        RenderingSurface::LineArt(surface)
    }
}

impl From<TextSurface> for RenderingSurface {
    fn from(surface: TextSurface) -> Self {
        RenderingSurface::Text(surface)
    }
}

impl From<BitmapSurface> for RenderingSurface {
    fn from(surface: BitmapSurface) -> Self {
        RenderingSurface::Bitmap(surface)
    }
}
