//! Integer geometry in frame coordinates (y grows downwards)

use serde::{Deserialize, Serialize};

/// Clamps a widened coordinate back into frame space
pub fn clamp_coord(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves the point, saturating at the coordinate range
    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Axis-aligned rectangle; empty when either dimension is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Rectangle spanning `[x0, x1)` by `[y0, y1)`, clamped to frame space
    pub fn from_edges(x0: i64, y0: i64, x1: i64, y1: i64) -> Rect {
        let (left, top) = (clamp_coord(x0), clamp_coord(y0));
        let width = (i64::from(clamp_coord(x1)) - i64::from(left)).max(0);
        let height = (i64::from(clamp_coord(y1)) - i64::from(top)).max(0);
        Rect::new(left, top, width as u32, height as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        clamp_coord(i64::from(self.x) + i64::from(self.width))
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        clamp_coord(i64::from(self.y) + i64::from(self.height))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Overlap of two rectangles (empty if they do not meet)
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            Rect::new(x0, y0, 0, 0)
        } else {
            Rect::from_edges(x0.into(), y0.into(), x1.into(), y1.into())
        }
    }

    /// Smallest rectangle covering both (empty rectangles are ignored)
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_edges(x0.into(), y0.into(), x1.into(), y1.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
        assert!(a.intersect(&Rect::new(20, 20, 1, 1)).is_empty());
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(2, 3, 4, 5);
        assert_eq!(a.union(&Rect::default()), a);
        assert_eq!(Rect::default().union(&a), a);
        assert_eq!(
            a.union(&Rect::new(10, 0, 1, 1)),
            Rect::new(2, 0, 9, 8)
        );
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(!r.contains(3, 1));
    }

    #[test]
    fn test_far_coordinates_saturate() {
        let wide = Rect::new(i32::MAX - 10, 0, u32::MAX, 1);
        assert_eq!(wide.right(), i32::MAX);
        assert_eq!(wide.translate(100, 0).x, i32::MAX);
        assert_eq!(Point::new(i32::MIN + 1, 0).offset(-5, 0).x, i32::MIN);

        let span = Rect::new(i32::MIN, 0, 1, 1).union(&Rect::new(i32::MAX - 1, 0, 1, 1));
        assert_eq!(span.x, i32::MIN);
        assert_eq!(span.width, u32::MAX);
        assert!(Rect::from_edges(5, 5, 2, 9).is_empty());
    }
}
