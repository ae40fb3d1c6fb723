//! # Graphics Rasterizer
//!
//! Rendering surfaces for the presentation engine, and the software
//! rasterizer they draw with.
//!
//! ## Philosophy
//!
//! - **Surfaces are engine-owned**: The host hands out fresh surfaces and never
//!   pools, reuses, or destroys them. Dropping a surface is the engine's business.
//! - **Position at draw time**: A surface remembers what to draw, not where.
//!   The same surface can be composited at a new offset without being rebuilt.
//! - **Deterministic**: Same surface state and offset → same pixels, always.
//! - **Drawing never fails**: Out-of-bounds geometry is clipped, not reported.
//!
//! ## Surfaces
//!
//! - [`LineArtSurface`]: lines, rectangles, ovals, arcs, sectors, polygons
//! - [`TextSurface`]: single-line text runs with broadcast font metrics
//! - [`BitmapSurface`]: decoded stills, stretched or tiled
//!
//! [`DisplayContext`] is the factory; [`RenderingSurface`] is the closed set
//! the engine can hold uniformly.

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod display;
pub mod font;
pub mod geometry;
pub mod line_art;
pub mod raster;
pub mod shapes;
pub mod text;

pub use bitmap::{tile_placements, BitmapSurface, DecodeError, ImageOrigin};
pub use canvas::{Canvas, PixelSink};
pub use color::Color;
pub use display::{DisplayContext, RenderingSurface, SurfaceKind};
pub use font::{Font, FontCatalog, FontStyle, GENERIC_SANS, REFERENCE_FONT};
pub use geometry::{Point, Rect};
pub use line_art::LineArtSurface;
pub use raster::Raster;
pub use text::{TextSurface, TEXT_HEIGHT_FACTOR};
