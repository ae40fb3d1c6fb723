//! Scanline shape rasterization
//!
//! Everything here is generic over [`PixelSink`] so the same code draws into
//! an owned raster or straight into the frame buffer. Coordinates are in
//! pixels; a pixel is covered when its centre is inside the shape
//! (even-odd rule), which keeps output deterministic and gap-free.
//!
//! Work is bounded by the visible area, not by the shape: lines are walked
//! only where they cross the sink, and curves are sampled at most
//! [`MAX_ARC_STEPS`] times.

use crate::canvas::PixelSink;
use crate::color::Color;
use crate::geometry::{clamp_coord, Point, Rect};
use std::f32::consts::PI;

/// Floating point vertex
pub type Vertex = (f32, f32);

/// Upper bound on segments used to approximate one arc
pub const MAX_ARC_STEPS: usize = 2048;

/// Fills a rectangle (clipped to the sink)
pub fn fill_rect<S: PixelSink + ?Sized>(sink: &mut S, rect: Rect, color: Color) {
    if color.is_transparent() {
        return;
    }
    let rect = rect.intersect(&sink.bounds());
    for y in rect.y..rect.bottom() {
        sink.fill_span(y, rect.x, rect.right(), color);
    }
}

/// Draws a border of `width` pixels inside `rect`
///
/// The four edges never overlap, so translucent borders blend once.
pub fn stroke_rect<S: PixelSink + ?Sized>(sink: &mut S, rect: Rect, width: u32, color: Color) {
    if width == 0 || rect.is_empty() {
        return;
    }
    let w = i64::from(width.min(rect.width.div_ceil(2)).min(rect.height.div_ceil(2)));
    let (x0, y0) = (i64::from(rect.x), i64::from(rect.y));
    let (x1, y1) = (x0 + i64::from(rect.width), y0 + i64::from(rect.height));
    let bottom_edge = (y1 - w).max(y0 + w);
    let right_edge = (x1 - w).max(x0 + w);
    fill_rect(sink, Rect::from_edges(x0, y0, x1, y0 + w), color);
    fill_rect(sink, Rect::from_edges(x0, bottom_edge, x1, y1), color);
    fill_rect(sink, Rect::from_edges(x0, y0 + w, x0 + w, bottom_edge), color);
    fill_rect(sink, Rect::from_edges(right_edge, y0 + w, x1, bottom_edge), color);
}

/// Fills one or more closed contours using the even-odd rule
pub fn fill_contours<S: PixelSink + ?Sized>(sink: &mut S, contours: &[Vec<Vertex>], color: Color) {
    if color.is_transparent() {
        return;
    }
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for contour in contours {
        for &(_, y) in contour {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y > max_y {
        return;
    }

    let bounds = sink.bounds();
    let first_row = (min_y.floor() as i32).max(bounds.y);
    let last_row = (max_y.ceil() as i32).min(bounds.bottom());
    let mut crossings: Vec<f32> = Vec::new();

    for row in first_row..last_row {
        let sample_y = row as f32 + 0.5;
        crossings.clear();
        for contour in contours {
            let n = contour.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let (x0, y0) = contour[i];
                let (x1, y1) = contour[(i + 1) % n];
                if (y0 <= sample_y && y1 > sample_y) || (y1 <= sample_y && y0 > sample_y) {
                    let t = (sample_y - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil() as i32;
            let end = (pair[1] - 0.5).ceil() as i32;
            let start = start.max(bounds.x);
            let end = end.min(bounds.right());
            if start < end {
                sink.fill_span(row, start, end, color);
            }
        }
    }
}

/// Fills a single closed polygon
pub fn fill_polygon<S: PixelSink + ?Sized>(sink: &mut S, points: &[Vertex], color: Color) {
    fill_contours(sink, &[points.to_vec()], color);
}

/// Draws a straight line between pixel positions
///
/// One-pixel lines use Bresenham so they land exactly on the endpoints;
/// wider lines are filled as a quad centred on the segment.
pub fn draw_line<S: PixelSink + ?Sized>(
    sink: &mut S,
    from: Point,
    to: Point,
    width: u32,
    color: Color,
) {
    match width {
        0 => {}
        1 => bresenham(sink, from, to, color),
        _ => {
            let a = (from.x as f32 + 0.5, from.y as f32 + 0.5);
            let b = (to.x as f32 + 0.5, to.y as f32 + 0.5);
            fill_polygon(sink, &segment_quad(a, b, width as f32), color);
        }
    }
}

/// One-pixel line, walked only across the part that lands in the sink
///
/// Pixel `i` along the major axis sits at the rounded proportional offset
/// on the minor axis, so both endpoints are always hit exactly.
fn bresenham<S: PixelSink + ?Sized>(sink: &mut S, from: Point, to: Point, color: Color) {
    let bounds = sink.bounds();
    if bounds.is_empty() {
        return;
    }
    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let (dx, dy) = (i64::from(to.x) - x0, i64::from(to.y) - y0);
    let steps = dx.abs().max(dy.abs());

    let window = if dx.abs() >= dy.abs() {
        visible_steps(x0, dx.signum(), bounds.x, bounds.right(), steps)
    } else {
        visible_steps(y0, dy.signum(), bounds.y, bounds.bottom(), steps)
    };
    let Some((first, last)) = window else {
        return;
    };

    for i in first..=last {
        let x = x0 + proportional(i, dx, steps);
        let y = y0 + proportional(i, dy, steps);
        if bounds.contains(x as i32, y as i32) {
            sink.blend_pixel(x as i32, y as i32, color);
        }
    }
}

/// Step range `[first, last]` of `0..=steps` whose major coordinate
/// `start + sign * i` falls in `[min, max)`
fn visible_steps(start: i64, sign: i64, min: i32, max: i32, steps: i64) -> Option<(i64, i64)> {
    let (min, max) = (i64::from(min), i64::from(max));
    let (first, last) = match sign {
        0 => {
            if start >= min && start < max {
                (0, steps)
            } else {
                return None;
            }
        }
        s if s > 0 => ((min - start).max(0), (max - 1 - start).min(steps)),
        _ => ((start - max + 1).max(0), (start - min).min(steps)),
    };
    (first <= last).then_some((first, last))
}

/// `i * delta / steps`, rounded half up
fn proportional(i: i64, delta: i64, steps: i64) -> i64 {
    if steps == 0 {
        return 0;
    }
    let (i, delta, steps) = (i128::from(i), i128::from(delta), i128::from(steps));
    (2 * i * delta + steps).div_euclid(2 * steps) as i64
}

fn segment_quad(a: Vertex, b: Vertex, width: f32) -> Vec<Vertex> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    let half = width / 2.0;
    if len == 0.0 {
        return vec![
            (a.0 - half, a.1 - half),
            (a.0 + half, a.1 - half),
            (a.0 + half, a.1 + half),
            (a.0 - half, a.1 + half),
        ];
    }
    let (nx, ny) = (-dy / len * half, dx / len * half);
    vec![
        (a.0 + nx, a.1 + ny),
        (b.0 + nx, b.1 + ny),
        (b.0 - nx, b.1 - ny),
        (a.0 - nx, a.1 - ny),
    ]
}

/// Strokes consecutive segments; `closed` joins the last point to the first
pub fn stroke_polyline<S: PixelSink + ?Sized>(
    sink: &mut S,
    points: &[Point],
    closed: bool,
    width: u32,
    color: Color,
) {
    if points.len() < 2 {
        if let Some(&p) = points.first() {
            draw_line(sink, p, p, width, color);
        }
        return;
    }
    for pair in points.windows(2) {
        draw_line(sink, pair[0], pair[1], width, color);
    }
    if closed && points.len() > 2 {
        draw_line(sink, points[points.len() - 1], points[0], width, color);
    }
}

/// Samples an elliptical arc inscribed in `bounds`
///
/// Angles are in degrees, counter-clockwise from three o'clock. The number
/// of samples depends only on the geometry and never exceeds
/// [`MAX_ARC_STEPS`].
pub fn arc_vertices(bounds: Rect, start_deg: f32, sweep_deg: f32) -> Vec<Vertex> {
    let rx = bounds.width as f32 / 2.0;
    let ry = bounds.height as f32 / 2.0;
    let cx = bounds.x as f32 + rx;
    let cy = bounds.y as f32 + ry;
    let sweep = sweep_deg.clamp(-360.0, 360.0);
    let perimeter = PI * (rx + ry);
    let steps = ((perimeter * sweep.abs() / 360.0) / 2.0)
        .ceil()
        .max(8.0)
        .min(MAX_ARC_STEPS as f32) as usize;

    (0..=steps)
        .map(|i| {
            let deg = start_deg + sweep * i as f32 / steps as f32;
            let rad = deg.to_radians();
            (cx + rx * rad.cos(), cy - ry * rad.sin())
        })
        .collect()
}

fn ellipse_contour(bounds: Rect) -> Vec<Vertex> {
    let mut points = arc_vertices(bounds, 0.0, 360.0);
    points.pop();
    points
}

/// Fills the ellipse inscribed in `bounds`
pub fn fill_ellipse<S: PixelSink + ?Sized>(sink: &mut S, bounds: Rect, color: Color) {
    if bounds.is_empty() {
        return;
    }
    fill_polygon(sink, &ellipse_contour(bounds), color);
}

/// Draws the outline of the ellipse inscribed in `bounds`, `width` pixels thick
pub fn stroke_ellipse<S: PixelSink + ?Sized>(sink: &mut S, bounds: Rect, width: u32, color: Color) {
    if width == 0 || bounds.is_empty() {
        return;
    }
    let outer = ellipse_contour(bounds);
    let inset = i64::from(width);
    let inner_w = i64::from(bounds.width) - 2 * inset;
    let inner_h = i64::from(bounds.height) - 2 * inset;
    if inner_w <= 0 || inner_h <= 0 {
        fill_polygon(sink, &outer, color);
        return;
    }
    let inner = ellipse_contour(Rect::new(
        clamp_coord(i64::from(bounds.x) + inset),
        clamp_coord(i64::from(bounds.y) + inset),
        inner_w as u32,
        inner_h as u32,
    ));
    fill_contours(sink, &[outer, inner], color);
}

/// Fills a pie slice of the ellipse inscribed in `bounds`
pub fn fill_sector<S: PixelSink + ?Sized>(
    sink: &mut S,
    bounds: Rect,
    start_deg: f32,
    sweep_deg: f32,
    color: Color,
) {
    if bounds.is_empty() || sweep_deg == 0.0 {
        return;
    }
    fill_polygon(sink, &sector_contour(bounds, start_deg, sweep_deg), color);
}

/// Closed outline of a sector: centre, then the arc
pub fn sector_contour(bounds: Rect, start_deg: f32, sweep_deg: f32) -> Vec<Vertex> {
    let centre = (
        bounds.x as f32 + bounds.width as f32 / 2.0,
        bounds.y as f32 + bounds.height as f32 / 2.0,
    );
    let mut points = vec![centre];
    points.extend(arc_vertices(bounds, start_deg, sweep_deg));
    points
}

/// Rounds float vertices to pixel positions for stroking
pub fn to_points(vertices: &[Vertex]) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(vertices.len());
    for &(x, y) in vertices {
        let p = Point::new(x.floor() as i32, y.floor() as i32);
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;

    fn count(raster: &Raster, color: Color) -> usize {
        let mut n = 0;
        for y in 0..raster.height() {
            for x in 0..raster.width() {
                if raster.get(x, y) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut raster = Raster::new(4, 4);
        fill_rect(&mut raster, Rect::new(2, 2, 10, 10), Color::WHITE);
        assert_eq!(count(&raster, Color::WHITE), 4);
    }

    #[test]
    fn test_stroke_rect_border_only() {
        let mut raster = Raster::new(6, 6);
        stroke_rect(&mut raster, Rect::sized(6, 6), 1, Color::WHITE);
        assert_eq!(count(&raster, Color::WHITE), 20);
        assert_eq!(raster.get(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_stroke_rect_translucent_blends_once() {
        let mut raster = Raster::new(5, 5);
        let color = Color::rgba(255, 0, 0, 100);
        stroke_rect(&mut raster, Rect::sized(5, 5), 2, color);
        for (x, y) in [(0, 0), (4, 4), (0, 4), (1, 2)] {
            assert_eq!(raster.get(x, y), Some(color));
        }
    }

    #[test]
    fn test_polygon_square_covers_exact_pixels() {
        let mut raster = Raster::new(10, 10);
        fill_polygon(
            &mut raster,
            &[(2.0, 2.0), (6.0, 2.0), (6.0, 5.0), (2.0, 5.0)],
            Color::WHITE,
        );
        assert_eq!(count(&raster, Color::WHITE), 12);
        assert_eq!(raster.get(2, 2), Some(Color::WHITE));
        assert_eq!(raster.get(5, 4), Some(Color::WHITE));
        assert_eq!(raster.get(6, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_bresenham_hits_endpoints() {
        let mut raster = Raster::new(10, 10);
        draw_line(&mut raster, Point::new(1, 1), Point::new(8, 4), 1, Color::WHITE);
        assert_eq!(raster.get(1, 1), Some(Color::WHITE));
        assert_eq!(raster.get(8, 4), Some(Color::WHITE));
        assert_eq!(count(&raster, Color::WHITE), 8);
    }

    #[test]
    fn test_wide_horizontal_line() {
        let mut raster = Raster::new(10, 10);
        draw_line(&mut raster, Point::new(1, 5), Point::new(8, 5), 3, Color::WHITE);
        assert_eq!(raster.get(4, 4), Some(Color::WHITE));
        assert_eq!(raster.get(4, 5), Some(Color::WHITE));
        assert_eq!(raster.get(4, 6), Some(Color::WHITE));
        assert_eq!(raster.get(4, 7), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_ellipse_stays_inside_bounds() {
        let mut raster = Raster::new(20, 20);
        let bounds = Rect::new(2, 3, 12, 8);
        fill_ellipse(&mut raster, bounds, Color::WHITE);
        for y in 0..20 {
            for x in 0..20 {
                if raster.get(x, y) == Some(Color::WHITE) {
                    assert!(bounds.contains(x as i32, y as i32));
                }
            }
        }
        assert_eq!(raster.get(8, 7), Some(Color::WHITE));
    }

    #[test]
    fn test_stroke_ellipse_leaves_centre_empty() {
        let mut raster = Raster::new(20, 20);
        stroke_ellipse(&mut raster, Rect::sized(20, 20), 2, Color::WHITE);
        assert_eq!(raster.get(10, 10), Some(Color::TRANSPARENT));
        assert_eq!(raster.get(10, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_quarter_sector_fills_one_quadrant() {
        let mut raster = Raster::new(20, 20);
        fill_sector(&mut raster, Rect::sized(20, 20), 0.0, 90.0, Color::WHITE);
        // Upper right quadrant in y-down coordinates
        assert_eq!(raster.get(14, 5), Some(Color::WHITE));
        assert_eq!(raster.get(5, 5), Some(Color::TRANSPARENT));
        assert_eq!(raster.get(14, 14), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_arc_vertex_count_is_deterministic() {
        let a = arc_vertices(Rect::sized(50, 30), 10.0, 200.0);
        let b = arc_vertices(Rect::sized(50, 30), 10.0, 200.0);
        assert_eq!(a, b);
        assert!(a.len() >= 9);
    }

    #[test]
    fn test_line_across_whole_coordinate_range() {
        let mut raster = Raster::new(8, 8);
        draw_line(
            &mut raster,
            Point::new(i32::MIN + 10, 3),
            Point::new(i32::MAX - 10, 3),
            1,
            Color::WHITE,
        );
        assert_eq!(count(&raster, Color::WHITE), 8);
        assert_eq!(raster.get(0, 3), Some(Color::WHITE));
        assert_eq!(raster.get(7, 3), Some(Color::WHITE));
    }

    #[test]
    fn test_steep_line_far_outside_draws_nothing() {
        let mut raster = Raster::new(8, 8);
        draw_line(
            &mut raster,
            Point::new(i32::MAX - 1, i32::MIN),
            Point::new(i32::MAX - 1, i32::MAX),
            1,
            Color::WHITE,
        );
        assert_eq!(count(&raster, Color::WHITE), 0);
    }

    #[test]
    fn test_clipped_diagonal_matches_unclipped() {
        let mut clipped = Raster::new(10, 10);
        draw_line(&mut clipped, Point::new(-20, -10), Point::new(30, 15), 1, Color::WHITE);

        let mut full = Raster::new(60, 30);
        draw_line(&mut full, Point::new(0, 0), Point::new(50, 25), 1, Color::WHITE);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(clipped.get(x, y), full.get(x + 20, y + 10), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_huge_arc_sampling_is_capped() {
        let bounds = Rect::sized(20_000_000, 20_000_000);
        assert_eq!(arc_vertices(bounds, 0.0, 360.0).len(), MAX_ARC_STEPS + 1);
        assert!(sector_contour(bounds, 0.0, 90.0).len() <= MAX_ARC_STEPS + 2);

        let mut raster = Raster::new(8, 8);
        stroke_ellipse(&mut raster, Rect::new(-1000, -1000, 20_000_000, 20_000_000), 3, Color::WHITE);
        fill_ellipse(&mut raster, Rect::new(i32::MAX - 5, 0, u32::MAX, u32::MAX), Color::WHITE);
    }

    #[test]
    fn test_stroke_rect_extreme_extents() {
        let mut raster = Raster::new(6, 6);
        stroke_rect(&mut raster, Rect::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX), u32::MAX, Color::WHITE);
        assert_eq!(count(&raster, Color::WHITE), 36);

        let mut border = Raster::new(6, 6);
        stroke_rect(&mut border, Rect::new(1, 1, 4, 4), 1, Color::WHITE);
        assert_eq!(count(&border, Color::WHITE), 12);
        assert_eq!(border.get(2, 2), Some(Color::TRANSPARENT));
    }
}
