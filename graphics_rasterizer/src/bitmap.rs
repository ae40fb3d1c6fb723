//! Bitmap surface
//!
//! Holds at most one decoded raster and composites it stretched or tiled.

use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::raster::Raster;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from decoding a bitmap payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Empty image payload")]
    Empty,

    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Decoded pixel buffer does not match {width}x{height}")]
    Malformed { width: u32, height: u32 },
}

/// Where the current content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrigin {
    #[default]
    Empty,
    Still,
    MotionKeyframe,
}

/// Still-image drawing surface
#[derive(Debug, Clone, Default)]
pub struct BitmapSurface {
    tiled: bool,
    origin: ImageOrigin,
    raster: Option<Raster>,
    scaled: Option<(u32, u32)>,
}

impl BitmapSurface {
    pub fn new(tiled: bool) -> Self {
        Self {
            tiled,
            ..Self::default()
        }
    }

    /// Tiling mode requested at creation
    pub fn is_tiled(&self) -> bool {
        self.tiled
    }

    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    /// Decodes a compressed still (PNG), replacing any previous content
    ///
    /// On failure the surface is left empty.
    pub fn decode_still(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.raster = None;
        self.scaled = None;
        self.origin = ImageOrigin::Empty;

        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let image = image::load_from_memory(bytes)
            .inspect_err(|err| warn!(error = %err, len = bytes.len(), "still decode failed"))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let raster = Raster::from_rgba8(width, height, image.as_raw())
            .ok_or(DecodeError::Malformed { width, height })?;

        debug!(width, height, "decoded still");
        self.raster = Some(raster);
        self.origin = ImageOrigin::Still;
        Ok(())
    }

    /// Accepts a video key-frame payload; motion decoding is not performed
    pub fn decode_motion_keyframe(&mut self, bytes: &[u8]) {
        debug!(len = bytes.len(), "motion keyframe accepted, not decoded");
        self.raster = None;
        self.scaled = None;
        self.origin = ImageOrigin::MotionKeyframe;
    }

    /// Rescales motion imagery; stills keep their natural size
    pub fn scale(&mut self, width: u32, height: u32) {
        if self.origin == ImageOrigin::MotionKeyframe {
            self.scaled = Some((width, height));
        } else {
            debug!(width, height, "scale ignored for non-motion bitmap");
        }
    }

    /// Natural size of the content, or zero when nothing is decoded
    pub fn size(&self) -> (u32, u32) {
        match (&self.raster, self.scaled) {
            (_, Some(scaled)) => scaled,
            (Some(raster), None) => raster.size(),
            (None, None) => (0, 0),
        }
    }

    /// True when every visible pixel is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.raster
            .as_ref()
            .is_some_and(|r| !r.is_empty() && r.is_fully_opaque())
    }

    /// Composites into `dest`, given relative to the surface origin `(x, y)`
    pub fn draw(&self, canvas: &mut Canvas<'_>, x: i32, y: i32, dest: Rect, tiled: bool) {
        let Some(raster) = &self.raster else {
            return;
        };
        let dest = dest.translate(x, y);
        if !tiled {
            canvas.blit_scaled(raster, dest);
            return;
        }
        for tile in tiles_within(raster.size(), dest, canvas.clip()) {
            canvas.blit_region(raster, Rect::sized(tile.width, tile.height), tile.x, tile.y);
        }
    }
}

/// Tile rectangles covering `dest` with a `w`x`h` source, edge tiles clipped
pub fn tile_placements(size: (u32, u32), dest: Rect) -> Vec<Rect> {
    tiles_within(size, dest, dest)
}

/// The tiles of [`tile_placements`] that meet `window`
///
/// The grid stays anchored at `dest`'s origin; only the walk is limited.
fn tiles_within((w, h): (u32, u32), dest: Rect, window: Rect) -> Vec<Rect> {
    let visible = dest.intersect(&window);
    if w == 0 || h == 0 || visible.is_empty() {
        return Vec::new();
    }
    let (w, h) = (i64::from(w), i64::from(h));
    let (x0, y0) = (i64::from(dest.x), i64::from(dest.y));
    let (x1, y1) = (i64::from(dest.right()), i64::from(dest.bottom()));
    let first_x = x0 + (i64::from(visible.x) - x0) / w * w;
    let first_y = y0 + (i64::from(visible.y) - y0) / h * h;
    let (end_x, end_y) = (i64::from(visible.right()), i64::from(visible.bottom()));

    let mut tiles = Vec::new();
    let mut ty = first_y;
    while ty < end_y {
        let mut tx = first_x;
        while tx < end_x {
            tiles.push(Rect::from_edges(tx, ty, (tx + w).min(x1), (ty + h).min(y1)));
            tx += w;
        }
        ty += h;
    }
    tiles
}
