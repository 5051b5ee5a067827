//! Geometric primitives shared across the selection engine.
//!
//! Gesture geometry is sub-pixel (`Point`, f32); mask bounds are integer
//! pixel rectangles (`PixelRect`). All coordinates are in virtual-space
//! units, never viewport units.

/// A point with sub-pixel precision in virtual-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An integer pixel rectangle (origin + size) in virtual-space units.
///
/// A rectangle with zero width or height is "empty"; empty rectangles
/// compare position-insensitively in union/intersection logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    /// The canonical empty rectangle.
    pub const EMPTY: PixelRect = PixelRect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether the pixel (x, y) lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rectangle enclosing both operands. Empty operands do not
    /// contribute their position.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
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
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Overlapping region of both operands, empty if they do not overlap.
    pub fn intersection(&self, other: &PixelRect) -> PixelRect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            PixelRect::EMPTY
        } else {
            PixelRect::new(x0, y0, x1 - x0, y1 - y0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_ignores_empty() {
        let a = PixelRect::new(5, 5, 10, 10);
        assert_eq!(a.union(&PixelRect::EMPTY), a);
        assert_eq!(PixelRect::EMPTY.union(&a), a);
    }

    #[test]
    fn test_union_encloses_both() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, 5, 10, 10);
        assert_eq!(a.union(&b), PixelRect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let a = PixelRect::new(0, 0, 5, 5);
        let b = PixelRect::new(10, 10, 5, 5);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_intersection_overlap() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), PixelRect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_contains_edges() {
        let r = PixelRect::new(2, 3, 4, 5);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 8));
    }
}
