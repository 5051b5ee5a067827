//! Geometric shape rasterization into coverage masks.
//!
//! Converts a shape description (rectangle, ellipse, closed polygon) into
//! an alpha mask with optional edge anti-aliasing. One canonical
//! implementation per shape kind; the interaction layer only supplies
//! geometry.
//!
//! Anti-aliased coverage falls off linearly within one pixel of the shape
//! boundary; with anti-aliasing disabled a pixel is selected iff its
//! center lies inside the shape.

use ndarray::Array2;

use crate::geometry::Point;
use crate::mask::SelectionMask;
use crate::space::{Scope, VirtualCoordinateSpace};

/// Number of vertical subsamples per pixel row for anti-aliased polygon
/// fill.
const POLYGON_SUBSAMPLES: usize = 4;

/// A geometric selection shape in virtual-space coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle, `min` is the top-left corner.
    Rectangle { min: Point, max: Point },
    /// Axis-aligned ellipse with center and radii.
    Ellipse { center: Point, rx: f32, ry: f32 },
    /// Closed polygon from an ordered point sequence (implicitly closed
    /// back to the first point). Fewer than 3 points produce no mask.
    Polygon { points: Vec<Point> },
}

impl Shape {
    /// Rectangle from two opposite corners, in any order.
    pub fn rectangle(a: Point, b: Point) -> Self {
        Shape::Rectangle {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Ellipse inscribed in the rectangle spanned by two corners.
    pub fn ellipse(a: Point, b: Point) -> Self {
        Shape::Ellipse {
            center: Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
            rx: (a.x - b.x).abs() / 2.0,
            ry: (a.y - b.y).abs() / 2.0,
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Shape::Polygon { points }
    }
}

/// Rasterize a shape into a selection mask.
///
/// Output bounds are the tight bounding box of the shape clipped to the
/// addressable space. Degenerate shapes (zero-area rectangle or ellipse,
/// polygon with fewer than 3 points, shape entirely outside the space)
/// produce the empty mask.
pub fn rasterize(
    shape: &Shape,
    space: &VirtualCoordinateSpace,
    scope: Scope,
    antialias: bool,
) -> SelectionMask {
    match shape {
        Shape::Rectangle { min, max } => rasterize_rectangle(min, max, space, scope, antialias),
        Shape::Ellipse { center, rx, ry } => {
            rasterize_ellipse(center, *rx, *ry, space, scope, antialias)
        }
        Shape::Polygon { points } => rasterize_polygon(points, space, scope, antialias),
    }
}

fn rasterize_rectangle(
    min: &Point,
    max: &Point,
    space: &VirtualCoordinateSpace,
    scope: Scope,
    antialias: bool,
) -> SelectionMask {
    let x0 = min.x.max(0.0);
    let y0 = min.y.max(0.0);
    let x1 = max.x.min(space.width() as f32);
    let y1 = max.y.min(space.height() as f32);
    if x1 <= x0 || y1 <= y0 {
        return SelectionMask::empty(scope);
    }

    let px0 = x0.floor() as usize;
    let py0 = y0.floor() as usize;
    let px1 = (x1.ceil() as usize).min(space.width());
    let py1 = (y1.ceil() as usize).min(space.height());

    let mut coverage = Array2::<u8>::zeros((py1 - py0, px1 - px0));
    for py in py0..py1 {
        for px in px0..px1 {
            let value = if antialias {
                // Fraction of the pixel's area covered by the rectangle,
                // separable per axis
                let cov_x = (x1.min(px as f32 + 1.0) - x0.max(px as f32)).clamp(0.0, 1.0);
                let cov_y = (y1.min(py as f32 + 1.0) - y0.max(py as f32)).clamp(0.0, 1.0);
                (cov_x * cov_y * 255.0).round() as u8
            } else {
                let inside_x = x0 <= px as f32 + 0.5 && (px as f32 + 0.5) < x1;
                let inside_y = y0 <= py as f32 + 0.5 && (py as f32 + 0.5) < y1;
                if inside_x && inside_y {
                    255
                } else {
                    0
                }
            };
            coverage[[py - py0, px - px0]] = value;
        }
    }

    SelectionMask::from_coverage((px0, py0), coverage, scope)
}

fn rasterize_ellipse(
    center: &Point,
    rx: f32,
    ry: f32,
    space: &VirtualCoordinateSpace,
    scope: Scope,
    antialias: bool,
) -> SelectionMask {
    if rx <= 0.0 || ry <= 0.0 {
        return SelectionMask::empty(scope);
    }

    let px0 = ((center.x - rx).floor().max(0.0)) as usize;
    let py0 = ((center.y - ry).floor().max(0.0)) as usize;
    let px1 = (((center.x + rx).ceil()).max(0.0) as usize).min(space.width());
    let py1 = (((center.y + ry).ceil()).max(0.0) as usize).min(space.height());
    if px1 <= px0 || py1 <= py0 {
        return SelectionMask::empty(scope);
    }

    // Scale from normalized radius back to pixels for the falloff band
    let edge_scale = rx.min(ry);

    let mut coverage = Array2::<u8>::zeros((py1 - py0, px1 - px0));
    for py in py0..py1 {
        for px in px0..px1 {
            let nx = (px as f32 + 0.5 - center.x) / rx;
            let ny = (py as f32 + 0.5 - center.y) / ry;
            let r = (nx * nx + ny * ny).sqrt();
            let value = if antialias {
                // Approximate pixel distance to the boundary; linear
                // falloff across the one-pixel band straddling it
                let d = (1.0 - r) * edge_scale;
                ((d + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8
            } else if r <= 1.0 {
                255
            } else {
                0
            };
            coverage[[py - py0, px - px0]] = value;
        }
    }

    SelectionMask::from_coverage((px0, py0), coverage, scope)
}

fn rasterize_polygon(
    points: &[Point],
    space: &VirtualCoordinateSpace,
    scope: Scope,
    antialias: bool,
) -> SelectionMask {
    if points.len() < 3 {
        return SelectionMask::empty(scope);
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let px0 = (min_x.floor().max(0.0)) as usize;
    let py0 = (min_y.floor().max(0.0)) as usize;
    let px1 = ((max_x.ceil()).max(0.0) as usize).min(space.width());
    let py1 = ((max_y.ceil()).max(0.0) as usize).min(space.height());
    if px1 <= px0 || py1 <= py0 {
        return SelectionMask::empty(scope);
    }

    let width = px1 - px0;
    let mut coverage = Array2::<u8>::zeros((py1 - py0, width));
    let mut row_accum = vec![0.0f32; width];
    let mut crossings: Vec<f32> = Vec::new();

    let samples = if antialias { POLYGON_SUBSAMPLES } else { 1 };
    let weight = 1.0 / samples as f32;

    for py in py0..py1 {
        row_accum.iter_mut().for_each(|v| *v = 0.0);

        for s in 0..samples {
            let sy = py as f32 + (s as f32 + 0.5) / samples as f32;
            scanline_crossings(points, sy, &mut crossings);

            // Even-odd rule: crossings pair up into interior spans
            for pair in crossings.chunks_exact(2) {
                let a = pair[0].max(px0 as f32);
                let b = pair[1].min(px1 as f32);
                if b <= a {
                    continue;
                }
                if antialias {
                    let first = a.floor() as usize;
                    let last = (b.ceil() as usize).min(px1);
                    for px in first.max(px0)..last {
                        let frac =
                            (b.min(px as f32 + 1.0) - a.max(px as f32)).clamp(0.0, 1.0);
                        row_accum[px - px0] += frac * weight;
                    }
                } else {
                    // Hard fill: pixel centers inside the span
                    let first = (a - 0.5).ceil().max(px0 as f32) as usize;
                    let last = ((b - 0.5).ceil().max(0.0) as usize).min(px1);
                    for px in first..last {
                        row_accum[px - px0] = 1.0;
                    }
                }
            }
        }

        for (i, &v) in row_accum.iter().enumerate() {
            coverage[[py - py0, i]] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    SelectionMask::from_coverage((px0, py0), coverage, scope)
}

/// Intersections of the polygon's edges with the horizontal line `y`,
/// sorted ascending. Uses the half-open edge rule so vertices are not
/// counted twice.
fn scanline_crossings(points: &[Point], y: f32, out: &mut Vec<f32>) {
    out.clear();
    let n = points.len();
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        if (p.y <= y && q.y > y) || (q.y <= y && p.y > y) {
            let t = (y - p.y) / (q.y - p.y);
            out.push(p.x + t * (q.x - p.x));
        }
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;

    fn space(w: usize, h: usize) -> VirtualCoordinateSpace {
        VirtualCoordinateSpace::new(w, h).unwrap()
    }

    #[test]
    fn test_rectangle_hard_edges_exact() {
        // Integer-aligned rectangle without anti-aliasing is exact
        let shape = Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let mask = rasterize(&shape, &space(64, 64), Scope::Global, false);

        assert_eq!(mask.bounds(), PixelRect::new(10, 10, 20, 20));
        for y in 10..30 {
            for x in 10..30 {
                assert_eq!(mask.coverage_at(x, y), 255);
            }
        }
        assert_eq!(mask.coverage_at(9, 10), 0);
        assert_eq!(mask.coverage_at(30, 29), 0);
    }

    #[test]
    fn test_rectangle_antialiased_integer_edges_stay_hard() {
        let shape = Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let mask = rasterize(&shape, &space(64, 64), Scope::Global, true);
        assert_eq!(mask.bounds(), PixelRect::new(10, 10, 20, 20));
        assert_eq!(mask.coverage_at(10, 10), 255);
        assert_eq!(mask.coverage_at(29, 29), 255);
    }

    #[test]
    fn test_rectangle_fractional_edge_coverage() {
        // Right edge at x = 10.5: pixel 10 is half covered
        let shape = Shape::rectangle(Point::new(5.0, 5.0), Point::new(10.5, 10.0));
        let mask = rasterize(&shape, &space(32, 32), Scope::Global, true);
        assert_eq!(mask.coverage_at(9, 6), 255);
        let edge = mask.coverage_at(10, 6);
        assert!(edge > 100 && edge < 150, "edge coverage was {edge}");
    }

    #[test]
    fn test_rectangle_degenerate_is_empty() {
        let shape = Shape::rectangle(Point::new(5.0, 5.0), Point::new(5.0, 20.0));
        let mask = rasterize(&shape, &space(32, 32), Scope::Global, true);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_rectangle_clipped_to_space() {
        let shape = Shape::rectangle(Point::new(-10.0, -10.0), Point::new(8.0, 8.0));
        let mask = rasterize(&shape, &space(32, 32), Scope::Global, false);
        assert_eq!(mask.bounds(), PixelRect::new(0, 0, 8, 8));
    }

    #[test]
    fn test_ellipse_hard_contains_center_excludes_corner() {
        let shape = Shape::ellipse(Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        let mask = rasterize(&shape, &space(64, 64), Scope::Global, false);
        assert_eq!(mask.coverage_at(20, 20), 255);
        // Bounding-box corners are outside the ellipse
        assert_eq!(mask.coverage_at(10, 10), 0);
        assert_eq!(mask.coverage_at(29, 29), 0);
    }

    #[test]
    fn test_ellipse_antialiasing_monotone_along_radius() {
        let shape = Shape::ellipse(Point::new(2.0, 2.0), Point::new(42.0, 42.0));
        let mask = rasterize(&shape, &space(64, 64), Scope::Global, true);
        // Walk outward from center along +x: coverage never increases
        let mut prev = 255u8;
        for x in 22..46 {
            let v = mask.coverage_at(x, 22);
            assert!(v <= prev, "coverage increased from {prev} to {v} at x={x}");
            prev = v;
        }
        assert_eq!(mask.coverage_at(22, 22), 255);
        assert_eq!(mask.coverage_at(45, 22), 0);
    }

    #[test]
    fn test_polygon_under_three_points_is_empty() {
        let shape = Shape::polygon(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        let mask = rasterize(&shape, &space(32, 32), Scope::Global, true);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_polygon_square_matches_rectangle() {
        let poly = Shape::polygon(vec![
            Point::new(4.0, 4.0),
            Point::new(12.0, 4.0),
            Point::new(12.0, 12.0),
            Point::new(4.0, 12.0),
        ]);
        let mask = rasterize(&poly, &space(32, 32), Scope::Global, false);
        assert_eq!(mask.bounds(), PixelRect::new(4, 4, 8, 8));
        for y in 4..12 {
            for x in 4..12 {
                assert_eq!(mask.coverage_at(x, y), 255);
            }
        }
    }

    #[test]
    fn test_polygon_triangle_even_odd() {
        let tri = Shape::polygon(vec![
            Point::new(2.0, 2.0),
            Point::new(18.0, 2.0),
            Point::new(2.0, 18.0),
        ]);
        let mask = rasterize(&tri, &space(32, 32), Scope::Global, false);
        // Near the right angle: inside
        assert_eq!(mask.coverage_at(3, 3), 255);
        // Beyond the hypotenuse: outside
        assert_eq!(mask.coverage_at(15, 15), 0);
    }

    #[test]
    fn test_polygon_antialiased_diagonal_has_partial_coverage() {
        let tri = Shape::polygon(vec![
            Point::new(2.0, 2.0),
            Point::new(18.0, 2.0),
            Point::new(2.0, 18.0),
        ]);
        let mask = rasterize(&tri, &space(32, 32), Scope::Global, true);
        // A pixel the hypotenuse passes through gets partial coverage
        let v = mask.coverage_at(10, 9);
        assert!(v > 0 && v < 255, "expected partial coverage, got {v}");
    }
}
