//! Line-art surface
//!
//! Records shapes in surface-local coordinates and rasterizes them when the
//! surface is drawn. Each shape snapshots the line and fill style current at
//! the time it was added, so later style changes do not repaint it.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::shapes;

/// Style captured when a shape is added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Style {
    line_width: u32,
    line_color: Color,
    fill_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Line { from: Point, to: Point },
    Rect { bounds: Rect },
    Oval { bounds: Rect },
    Arc { bounds: Rect, start: f32, sweep: f32, sector: bool },
    Polygon { filled: bool, points: Vec<Point> },
}

/// Vector drawing surface
#[derive(Debug, Clone)]
pub struct LineArtSurface {
    boxed: bool,
    size: Option<(u32, u32)>,
    style: Style,
    shapes: Vec<(Shape, Style)>,
}

impl LineArtSurface {
    pub fn new(boxed: bool, line_color: Color, fill_color: Color) -> Self {
        Self {
            boxed,
            size: None,
            style: Style {
                line_width: 1,
                line_color,
                fill_color,
            },
            shapes: Vec::new(),
        }
    }

    /// Drops every pending shape; style is kept
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Sets the surface extent, which also clears it
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.clear();
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn is_boxed(&self) -> bool {
        self.boxed
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.style.line_width = width;
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.style.line_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.style.fill_color = color;
    }

    pub fn line_width(&self) -> u32 {
        self.style.line_width
    }

    pub fn line_color(&self) -> Color {
        self.style.line_color
    }

    pub fn fill_color(&self) -> Color {
        self.style.fill_color
    }

    /// Number of shapes recorded since the last clear
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.push(Shape::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
        });
    }

    /// Filled rectangle with a border of the current line width
    pub fn bordered_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.push(Shape::Rect {
            bounds: Rect::new(x, y, width, height),
        });
    }

    pub fn oval(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.push(Shape::Oval {
            bounds: Rect::new(x, y, width, height),
        });
    }

    /// Arc (outline only) or sector (filled pie slice) of the inscribed ellipse
    ///
    /// Angles are degrees, counter-clockwise from three o'clock.
    #[allow(clippy::too_many_arguments)]
    pub fn arc_or_sector(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        start_angle: f32,
        sweep_angle: f32,
        is_sector: bool,
    ) {
        self.push(Shape::Arc {
            bounds: Rect::new(x, y, width, height),
            start: start_angle,
            sweep: sweep_angle,
            sector: is_sector,
        });
    }

    /// Closed filled polygon, or open polyline when `filled` is false
    pub fn polygon(&mut self, filled: bool, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        self.push(Shape::Polygon {
            filled,
            points: points.to_vec(),
        });
    }

    fn push(&mut self, shape: Shape) {
        self.shapes.push((shape, self.style));
    }

    /// Composites the recorded shapes with the surface origin at `(x, y)`
    pub fn draw(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let previous = match self.size {
            Some((w, h)) => Some(canvas.set_clip(Rect::new(x, y, w, h).intersect(&canvas.clip()))),
            None => None,
        };

        for (shape, style) in &self.shapes {
            draw_shape(canvas, shape, style, x, y);
        }

        if self.boxed {
            if let Some((w, h)) = self.size {
                shapes::stroke_rect(
                    canvas,
                    Rect::new(x, y, w, h),
                    self.style.line_width,
                    self.style.line_color,
                );
            }
        }

        if let Some(clip) = previous {
            canvas.set_clip(clip);
        }
    }
}

fn draw_shape(canvas: &mut Canvas<'_>, shape: &Shape, style: &Style, dx: i32, dy: i32) {
    let offset = |p: Point| p.offset(dx, dy);
    match shape {
        Shape::Line { from, to } => {
            shapes::draw_line(
                canvas,
                offset(*from),
                offset(*to),
                style.line_width,
                style.line_color,
            );
        }
        Shape::Rect { bounds } => {
            let bounds = bounds.translate(dx, dy);
            shapes::fill_rect(canvas, bounds, style.fill_color);
            shapes::stroke_rect(canvas, bounds, style.line_width, style.line_color);
        }
        Shape::Oval { bounds } => {
            let bounds = bounds.translate(dx, dy);
            shapes::fill_ellipse(canvas, bounds, style.fill_color);
            shapes::stroke_ellipse(canvas, bounds, style.line_width, style.line_color);
        }
        Shape::Arc {
            bounds,
            start,
            sweep,
            sector,
        } => {
            let bounds = bounds.translate(dx, dy);
            if *sector {
                shapes::fill_sector(canvas, bounds, *start, *sweep, style.fill_color);
                let outline = shapes::to_points(&shapes::sector_contour(bounds, *start, *sweep));
                shapes::stroke_polyline(canvas, &outline, true, style.line_width, style.line_color);
            } else {
                let arc = shapes::to_points(&shapes::arc_vertices(bounds, *start, *sweep));
                shapes::stroke_polyline(canvas, &arc, false, style.line_width, style.line_color);
            }
        }
        Shape::Polygon { filled, points } => {
            let points: Vec<Point> = points.iter().map(|&p| offset(p)).collect();
            if *filled {
                let vertices: Vec<shapes::Vertex> = points
                    .iter()
                    .map(|p| (p.x as f32 + 0.5, p.y as f32 + 0.5))
                    .collect();
                shapes::fill_polygon(canvas, &vertices, style.fill_color);
            }
            shapes::stroke_polyline(canvas, &points, *filled, style.line_width, style.line_color);
        }
    }
}
